//! Turning accepted items into embeddable images.

use crate::image::{Image, ImageError};
use crate::intake::ImageItem;
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves an item's pixel data and natural dimensions. This is the one suspension
/// point of assembly: nothing about an image can be laid out until it has decoded.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(&self, item: &ImageItem) -> Result<Image, ImageError>;
}

/// Decodes file bytes with the `image` crate on tokio's blocking pool
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterDecoder;

#[async_trait]
impl ImageDecoder for RasterDecoder {
    async fn decode(&self, item: &ImageItem) -> Result<Image, ImageError> {
        let data = Arc::clone(item.bytes());
        let media_type = item.media_type.clone();
        tokio::task::spawn_blocking(move || Image::from_bytes(data, &media_type))
            .await
            .map_err(|e| ImageError::Io(std::io::Error::other(e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::tests::png;
    use crate::intake::{FileHandle, ImageCollection};

    #[tokio::test]
    async fn raster_decoder_reports_natural_size() {
        let mut collection = ImageCollection::new();
        collection
            .intake(vec![
                FileHandle::new("wide.png", "image/png", png(30, 12)),
                FileHandle::new("broken.png", "image/png", &b"nope"[..]),
            ])
            .unwrap();

        let image = RasterDecoder
            .decode(&collection.items()[0])
            .await
            .expect("decodes");
        assert_eq!((image.width, image.height), (30, 12));

        assert!(RasterDecoder.decode(&collection.items()[1]).await.is_err());
    }
}
