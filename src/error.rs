use crate::image::ImageError;
use std::time::Duration;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// All errors that the crate can generate. None of them are fatal: after any of
/// these the collection is either untouched or already cleared, and the caller can
/// carry on with the next intake or conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A non-empty batch contained no image-typed files
    #[error("no valid image files ({rejected} file(s) rejected)")]
    InvalidInput { rejected: usize },

    /// A conversion was requested with nothing in the collection
    #[error("no images to convert")]
    EmptyCollection,

    /// The collection is locked by a conversion that is still running
    #[error("a conversion is already in progress")]
    Busy,

    #[error("no image at index {index} (collection holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// An image could not be decoded
    #[error("failed to decode `{name}`")]
    Decode {
        name: String,
        #[source]
        source: ImageError,
    },

    /// An image did not finish decoding in time
    #[error("timed out after {timeout:?} waiting for `{name}` to decode")]
    DecodeTimeout { name: String, timeout: Duration },

    /// An image decoded to a size that can't be fitted onto a page
    #[error("`{name}` has unusable dimensions {width}x{height}")]
    InvalidDimensions {
        name: String,
        width: u32,
        height: u32,
    },

    /// The page order refers to a page which isn't in the document
    #[error("page missing from document")]
    PageMissing,

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// A background task panicked or was cancelled
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    /// [toml] failed to parse the configuration
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    /// [toml] failed to serialize the configuration
    ConfigWrite(#[from] toml::ser::Error),
}
