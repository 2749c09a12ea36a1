//! Page geometry and image fitting.
//!
//! Every image gets a page of its own. [`fit_image`](crate::layout::fit_image) scales it
//! to the full usable width of the page, falling back to the full usable height when
//! the width-bound fit would run off the bottom, and anchors it at the top-left margin.
//!
//! # Example
//!
//! ```
//! use images_to_pdf::{Dimensions, Mm};
//! use images_to_pdf::layout::{fit_image, Margins};
//! use images_to_pdf::pagesize::{A4, DEFAULT_MARGIN};
//!
//! let placement = fit_image(Dimensions::new(2000, 1000), A4, &Margins::all(DEFAULT_MARGIN))
//!     .expect("non-zero dimensions");
//! assert_eq!(placement.width, Mm(190.0));
//! assert_eq!(placement.height, Mm(95.0));
//! ```

mod fit;
mod margins;

pub use fit::*;
pub use margins::*;
