//! Laying a batch of images out into a paginated document.
//!
//! Assembly fans out one decode task per image, waits for all of them, and then builds
//! the document strictly in item order: completions are buffered by their original
//! index, so the page order never depends on which image happened to decode first.

use crate::decode::ImageDecoder;
use crate::document::Document;
use crate::error::{ConvertError, Result};
use crate::image::Image;
use crate::intake::ImageItem;
use crate::layout::{fit_image, Margins};
use crate::page::{ImageLayout, Page};
use crate::pagesize::PageSize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::debug;

/// Decodes every item and lays the results out one per page, in item order.
///
/// Each image must decode within `timeout`. The first image that fails or times out
/// aborts the rest and fails the whole assembly, naming that image.
pub async fn assemble(
    items: &[ImageItem],
    page_size: PageSize,
    margins: &Margins,
    decoder: Arc<dyn ImageDecoder>,
    timeout: Duration,
) -> Result<Document> {
    if items.is_empty() {
        return Err(ConvertError::EmptyCollection);
    }

    let images = decode_all(items, decoder, timeout).await?;
    build_document(images, page_size, margins)
}

/// Decodes all items concurrently, returning `(source name, image)` pairs in the same
/// order as `items`.
pub async fn decode_all(
    items: &[ImageItem],
    decoder: Arc<dyn ImageDecoder>,
    timeout: Duration,
) -> Result<Vec<(String, Image)>> {
    let mut tasks = JoinSet::new();
    for (index, item) in items.iter().cloned().enumerate() {
        let decoder = Arc::clone(&decoder);
        tasks.spawn(async move {
            let result = tokio::time::timeout(timeout, decoder.decode(&item)).await;
            (index, item.source_name, result)
        });
    }

    let mut slots: Vec<Option<(String, Image)>> = (0..items.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, name, result) = joined?;
        match result {
            Ok(Ok(image)) => {
                debug!(index, %name, width = image.width, height = image.height, "decoded image");
                slots[index] = Some((name, image));
            }
            Ok(Err(source)) => return Err(ConvertError::Decode { name, source }),
            Err(_) => return Err(ConvertError::DecodeTimeout { name, timeout }),
        }
    }

    // every task either filled its slot or returned early above
    Ok(slots.into_iter().flatten().collect())
}

/// Builds a document with one page per image, in the order given. The first image goes
/// on the document's first page; each later image gets a freshly appended page.
pub fn build_document(
    images: Vec<(String, Image)>,
    page_size: PageSize,
    margins: &Margins,
) -> Result<Document> {
    if images.is_empty() {
        return Err(ConvertError::EmptyCollection);
    }

    let mut document = Document::default();
    let mut current = document.add_page(Page::new(page_size, margins));

    for (index, (name, image)) in images.into_iter().enumerate() {
        let natural = image.dimensions();
        let placement =
            fit_image(natural, page_size, margins).ok_or(ConvertError::InvalidDimensions {
                name,
                width: natural.width,
                height: natural.height,
            })?;

        if index > 0 {
            current = document.add_page(Page::new(page_size, margins));
        }

        let image_id = document.add_image(image);
        document.pages[current].add_image(ImageLayout {
            image_id,
            position: placement.to_rect(page_size),
        });
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageError;
    use crate::intake::{FileHandle, ImageCollection};
    use crate::pagesize::{A4, DEFAULT_MARGIN};
    use crate::units::*;
    use async_trait::async_trait;
    use image::{DynamicImage, RgbImage};
    use pretty_assertions::assert_eq;

    fn blank(width: u32, height: u32) -> Image {
        Image::new_raster(DynamicImage::ImageRgb8(RgbImage::new(width, height)))
    }

    fn items(count: usize) -> Vec<ImageItem> {
        let mut collection = ImageCollection::new();
        let files = (0..count)
            .map(|i| FileHandle::new(format!("{i}.png"), "image/png", vec![i as u8]))
            .collect();
        collection.intake(files).unwrap();
        collection.snapshot()
    }

    fn index_of(item: &ImageItem) -> u32 {
        item.bytes()[0] as u32
    }

    /// Decodes item `i` into a `(100 + i) x 100` image, finishing later items first
    struct ReverseOrderDecoder {
        count: u32,
    }

    #[async_trait]
    impl ImageDecoder for ReverseOrderDecoder {
        async fn decode(&self, item: &ImageItem) -> Result<Image, ImageError> {
            let i = index_of(item);
            tokio::time::sleep(Duration::from_millis(10 * (self.count - i) as u64)).await;
            Ok(blank(100 + i, 100))
        }
    }

    /// Never finishes decoding the item at `stuck`
    struct StuckDecoder {
        stuck: u32,
    }

    #[async_trait]
    impl ImageDecoder for StuckDecoder {
        async fn decode(&self, item: &ImageItem) -> Result<Image, ImageError> {
            if index_of(item) == self.stuck {
                std::future::pending::<()>().await;
            }
            Ok(blank(10, 10))
        }
    }

    struct FailingDecoder;

    #[async_trait]
    impl ImageDecoder for FailingDecoder {
        async fn decode(&self, item: &ImageItem) -> Result<Image, ImageError> {
            if index_of(item) == 1 {
                Err(ImageError::Io(std::io::Error::other("corrupt")))
            } else {
                Ok(blank(10, 10))
            }
        }
    }

    fn page_widths(document: &Document) -> Vec<u32> {
        (0..document.page_count())
            .map(|i| {
                let page = document.page_at(i).expect("page exists");
                assert_eq!(page.contents.len(), 1, "one image per page");
                document.images[page.contents[0].image_id].width
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn pages_follow_item_order_not_completion_order() {
        let items = items(5);
        let document = assemble(
            &items,
            A4,
            &Margins::all(DEFAULT_MARGIN),
            Arc::new(ReverseOrderDecoder { count: 5 }),
            Duration::from_secs(5),
        )
        .await
        .expect("assembles");

        assert_eq!(document.page_count(), 5);
        assert_eq!(page_widths(&document), vec![100, 101, 102, 103, 104]);
    }

    #[tokio::test(start_paused = true)]
    async fn a_stuck_image_times_out_instead_of_hanging() {
        let items = items(3);
        let err = assemble(
            &items,
            A4,
            &Margins::all(DEFAULT_MARGIN),
            Arc::new(StuckDecoder { stuck: 2 }),
            Duration::from_secs(3),
        )
        .await
        .err()
        .expect("assembly fails");

        match err {
            ConvertError::DecodeTimeout { name, timeout } => {
                assert_eq!(name, "2.png");
                assert_eq!(timeout, Duration::from_secs(3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_failed_decode_names_the_image() {
        let items = items(3);
        let err = assemble(
            &items,
            A4,
            &Margins::all(DEFAULT_MARGIN),
            Arc::new(FailingDecoder),
            Duration::from_secs(5),
        )
        .await
        .err()
        .expect("assembly fails");
        assert!(matches!(err, ConvertError::Decode { ref name, .. } if name == "1.png"));
    }

    #[tokio::test]
    async fn nothing_to_assemble() {
        let err = assemble(
            &[],
            A4,
            &Margins::all(DEFAULT_MARGIN),
            Arc::new(FailingDecoder),
            Duration::from_secs(1),
        )
        .await
        .err()
        .expect("assembly fails");
        assert!(matches!(err, ConvertError::EmptyCollection));
    }

    #[test]
    fn build_document_fits_each_image_on_its_own_page() {
        let margins = Margins::all(DEFAULT_MARGIN);
        let document = build_document(
            vec![
                ("wide".to_string(), blank(2000, 1000)),
                ("tall".to_string(), blank(1000, 2000)),
            ],
            A4,
            &margins,
        )
        .expect("builds");

        assert_eq!(document.page_count(), 2);
        let wide = document.page_at(0).unwrap().contents[0].position;
        let tall = document.page_at(1).unwrap().contents[0].position;
        let close = |a: Pt, b: Mm| (a.0 - Pt::from(b).0).abs() < 1e-3;
        assert!(close(wide.width(), Mm(190.0)));
        assert!(close(wide.height(), Mm(95.0)));
        assert!(close(tall.width(), Mm(138.5)));
        assert!(close(tall.height(), Mm(277.0)));
        assert!(close(wide.x1, Mm(10.0)));
        assert!(close(tall.y2, Mm(287.0)));
    }

    #[test]
    fn zero_sized_images_are_rejected() {
        let err = build_document(
            vec![("empty".to_string(), blank(0, 0))],
            A4,
            &Margins::all(DEFAULT_MARGIN),
        )
        .err()
        .expect("fails");
        assert!(matches!(err, ConvertError::InvalidDimensions { width: 0, height: 0, .. }));
    }
}
