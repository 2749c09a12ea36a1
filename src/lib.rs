//! Assemble a batch of images into a single PDF, one image per page.
//!
//! Candidate files go through [intake](ImageCollection::intake), which keeps the
//! image-typed ones in an ordered [ImageCollection]. [assemble] decodes them, fits each
//! onto its own A4 page with the aspect ratio preserved, and produces a [Document] that
//! can be [written](Document::write) as PDF. [Converter] ties these together behind a
//! lock, with notifications and an output sink, for use by a UI or the bundled CLI.
//!
//! # Example
//!
//! ```no_run
//! use images_to_pdf::{config::Config, Converter, DirectorySink, FileHandle};
//! use std::sync::Arc;
//!
//! # async fn run() -> images_to_pdf::Result<()> {
//! let converter = Converter::new(Config::default(), Arc::new(DirectorySink::new(".")));
//! converter
//!     .intake(vec![FileHandle::read("photo.jpg").await?])
//!     .await?;
//! let report = converter.convert().await?;
//! println!("{} page(s) written to {}", report.pages, report.location.display());
//! # Ok(())
//! # }
//! ```

mod assemble;
pub use assemble::*;

/// Loading and saving settings
pub mod config;

mod converter;
pub use converter::*;

mod decode;
pub use decode::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

mod intake;
pub use intake::*;

/// Page geometry and image fitting
pub mod layout;

mod notify;
pub use notify::*;

mod output;
pub use output::*;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

mod reference;
pub use reference::*;

pub(crate) mod refs;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
