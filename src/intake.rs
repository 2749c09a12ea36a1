//! Intake of candidate files into the ordered image collection.

use crate::error::{ConvertError, Result};
use crate::image::{probe_dimensions, Dimensions};
use crate::reference::{ImageRef, ReferenceStore};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A candidate file as supplied by a file picker or drop target: a name, the media
/// type it declares, and its raw bytes.
#[derive(Clone, Debug)]
pub struct FileHandle {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl FileHandle {
    pub fn new<N: ToString, M: ToString, B: Into<Arc<[u8]>>>(
        name: N,
        media_type: M,
        bytes: B,
    ) -> FileHandle {
        FileHandle {
            name: name.to_string(),
            media_type: media_type.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, declaring a media type based on its extension the way a
    /// browser file picker would.
    pub async fn read<P: AsRef<Path>>(path: P) -> Result<FileHandle> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(FileHandle {
            name,
            media_type: media_type_for_path(path).to_string(),
            bytes: bytes.into(),
        })
    }

    /// Whether the declared media type is an image type
    pub fn is_image(&self) -> bool {
        self.media_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// Maps a file extension to the media type a browser would declare for it
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "tga" => "image/x-tga",
        "pbm" | "pgm" | "ppm" | "pnm" | "pam" => "image/x-portable-anymap",
        "qoi" => "image/qoi",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// One accepted image, tracked until it is removed or consumed by a conversion
#[derive(Clone, Debug)]
pub struct ImageItem {
    pub reference: ImageRef,
    pub source_name: String,
    pub media_type: String,
    /// Natural size, if it could be read from the file header at intake. Otherwise
    /// it is resolved when the image is decoded for assembly.
    pub dimensions: Option<Dimensions>,
}

impl ImageItem {
    pub fn bytes(&self) -> &Arc<[u8]> {
        self.reference.bytes()
    }
}

/// The outcome of a successful intake
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Newly appended items, in input order
    pub accepted: Vec<ImageItem>,
    /// How many candidates were dropped for not being images
    pub rejected: usize,
}

/// The ordered set of images waiting to be converted. Insertion order is display order
/// and page order; items are only ever appended or removed, never reordered.
#[derive(Debug, Default)]
pub struct ImageCollection {
    items: Vec<ImageItem>,
    references: ReferenceStore,
}

impl ImageCollection {
    pub fn new() -> ImageCollection {
        ImageCollection::default()
    }

    /// Appends the image-typed files of `files` to the end of the collection, dropping
    /// the rest. An empty batch is a no-op; a non-empty batch without a single image
    /// is rejected and leaves the collection untouched.
    pub fn intake(&mut self, files: Vec<FileHandle>) -> Result<IntakeReport> {
        if files.is_empty() {
            return Ok(IntakeReport::default());
        }

        let total = files.len();
        let images: Vec<FileHandle> = files.into_iter().filter(FileHandle::is_image).collect();
        let rejected = total - images.len();

        if images.is_empty() {
            return Err(ConvertError::InvalidInput { rejected });
        }

        let mut accepted = Vec::with_capacity(images.len());
        for file in images {
            let dimensions = probe_dimensions(&file.bytes);
            let reference = self.references.allocate(file.bytes);
            debug!(
                name = %file.name,
                reference = %reference.url(),
                ?dimensions,
                "accepted image"
            );
            accepted.push(ImageItem {
                reference,
                source_name: file.name,
                media_type: file.media_type,
                dimensions,
            });
        }

        self.items.extend(accepted.iter().cloned());
        Ok(IntakeReport { accepted, rejected })
    }

    /// Removes the item at `index`, releasing its reference. Items after it shift down
    /// by one.
    pub fn remove(&mut self, index: usize) -> Result<ImageItem> {
        if index >= self.items.len() {
            return Err(ConvertError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        self.references.release(&item.reference);
        debug!(name = %item.source_name, index, "removed image");
        Ok(item)
    }

    /// Releases every reference and empties the collection
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            self.references.release(&item.reference);
        }
    }

    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    /// A copy of the current items, for work that must not observe later changes
    pub fn snapshot(&self) -> Vec<ImageItem> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of display references still live
    pub fn live_references(&self) -> usize {
        self.references.live_count()
    }
}
