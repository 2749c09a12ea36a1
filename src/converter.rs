//! The state a presentation layer drives: the image collection plus everything needed
//! to turn it into a document.
//!
//! The collection lives behind an async mutex. Intake, removal and conversion all wait
//! for it, so intake and removal queue up behind a running conversion instead of
//! changing the images underneath it. Conversions additionally hold a separate
//! assembly guard: a second conversion requested while one is running is turned away
//! with [`ConvertError::Busy`].

use crate::assemble::assemble;
use crate::config::Config;
use crate::decode::{ImageDecoder, RasterDecoder};
use crate::error::{ConvertError, Result};
use crate::info::Info;
use crate::intake::{FileHandle, ImageCollection, ImageItem, IntakeReport};
use crate::layout::Margins;
use crate::notify::{NotificationSink, TracingSink};
use crate::output::OutputSink;
use crate::pagesize::{A4, DEFAULT_MARGIN};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Whatever control the user picked files with; reset once its files are converted
pub trait InputControl: Send + Sync {
    fn reset(&self);
}

impl InputControl for () {
    fn reset(&self) {}
}

/// The outcome of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub pages: usize,
    pub location: PathBuf,
    pub bytes: usize,
}

pub struct Converter {
    collection: Mutex<ImageCollection>,
    /// Held for the whole of a conversion
    assembling: Mutex<()>,
    config: Config,
    decoder: Arc<dyn ImageDecoder>,
    notifications: Arc<dyn NotificationSink>,
    output: Arc<dyn OutputSink>,
    input: Arc<dyn InputControl>,
}

impl Converter {
    /// A converter with an empty collection that decodes with [RasterDecoder] and
    /// reports through [TracingSink]
    pub fn new(config: Config, output: Arc<dyn OutputSink>) -> Converter {
        Converter {
            collection: Mutex::new(ImageCollection::new()),
            assembling: Mutex::new(()),
            config,
            decoder: Arc::new(RasterDecoder),
            notifications: Arc::new(TracingSink),
            output,
            input: Arc::new(()),
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationSink>) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn with_input_control(mut self, input: Arc<dyn InputControl>) -> Self {
        self.input = input;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Adds the image-typed files of `files` to the end of the collection. See
    /// [ImageCollection::intake]; a batch with no images at all raises a warning.
    pub async fn intake(&self, files: Vec<FileHandle>) -> Result<IntakeReport> {
        let mut collection = self.collection.lock().await;
        match collection.intake(files) {
            Ok(report) => {
                debug!(
                    accepted = report.accepted.len(),
                    rejected = report.rejected,
                    total = collection.len(),
                    "intake"
                );
                Ok(report)
            }
            Err(err) => {
                self.notifications.warning("Please upload valid image files.");
                Err(err)
            }
        }
    }

    /// Removes the image at `index`, releasing its display reference
    pub async fn remove(&self, index: usize) -> Result<ImageItem> {
        self.collection.lock().await.remove(index)
    }

    /// A copy of the current collection, in page order
    pub async fn items(&self) -> Vec<ImageItem> {
        self.collection.lock().await.snapshot()
    }

    pub async fn len(&self) -> usize {
        self.collection.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.collection.lock().await.is_empty()
    }

    /// Number of display references not yet released
    pub async fn live_references(&self) -> usize {
        self.collection.lock().await.live_references()
    }

    /// Converts the whole collection into one document and hands it to the output sink.
    ///
    /// On success the collection is cleared and the input control reset. On failure
    /// the collection is left exactly as it was, so the offending image can be removed
    /// and the conversion retried.
    pub async fn convert(&self) -> Result<ConversionReport> {
        let Ok(_assembling) = self.assembling.try_lock() else {
            self.notifications.warning("A PDF is already being created, please wait.");
            return Err(ConvertError::Busy);
        };
        let mut collection = self.collection.lock().await;

        if collection.is_empty() {
            self.notifications.warning("No images uploaded.");
            return Err(ConvertError::EmptyCollection);
        }

        let items = collection.snapshot();
        match self.write_document(&items).await {
            Ok(report) => {
                info!(
                    pages = report.pages,
                    bytes = report.bytes,
                    location = %report.location.display(),
                    "converted images"
                );
                self.notifications.success("PDF created successfully!");
                collection.clear();
                self.input.reset();
                Ok(report)
            }
            Err(err) => {
                self.notifications
                    .error(&format!("Could not create the PDF: {err}"));
                Err(err)
            }
        }
    }

    async fn write_document(&self, items: &[ImageItem]) -> Result<ConversionReport> {
        let margins = Margins::all(DEFAULT_MARGIN);
        let mut document = assemble(
            items,
            A4,
            &margins,
            Arc::clone(&self.decoder),
            self.config.decode_timeout(),
        )
        .await?;
        document.set_info(self.info());

        let pages = document.page_count();
        let bytes = tokio::task::spawn_blocking(move || {
            let mut out = Vec::new();
            document.write(&mut out)?;
            Ok::<_, ConvertError>(out)
        })
        .await??;

        let size = bytes.len();
        let location = self.output.save(&self.config.output_name, bytes).await?;
        Ok(ConversionReport {
            pages,
            location,
            bytes: size,
        })
    }

    fn info(&self) -> Info {
        let mut info = Info::new();
        if let Some(title) = &self.config.title {
            info.title(title);
        }
        if let Some(author) = &self.config.author {
            info.author(author);
        }
        if let Some(subject) = &self.config.subject {
            info.subject(subject);
        }
        info
    }
}
