use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use images_to_pdf::config::Config;
use images_to_pdf::{
    ConvertError, Converter, DirectorySink, FileHandle, Image, ImageDecoder, ImageError,
    ImageItem, InputControl, MemoryOutput, MemorySink, Notification, RasterDecoder,
};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([30, 60, 90]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .expect("can encode png");
    buf
}

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([90, 60, 30]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(85))
        .expect("can encode jpeg");
    buf
}

fn count_pages(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}

#[derive(Default)]
struct CountingInput {
    resets: AtomicUsize,
}

impl InputControl for CountingInput {
    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    converter: Arc<Converter>,
    sink: Arc<MemorySink>,
    output: Arc<MemoryOutput>,
    input: Arc<CountingInput>,
}

fn harness(decoder: Arc<dyn ImageDecoder>) -> Harness {
    let sink = Arc::new(MemorySink::new());
    let output = Arc::new(MemoryOutput::new());
    let input = Arc::new(CountingInput::default());
    let converter = Converter::new(Config::default(), output.clone())
        .with_decoder(decoder)
        .with_notifications(sink.clone())
        .with_input_control(input.clone());
    Harness {
        converter: Arc::new(converter),
        sink,
        output,
        input,
    }
}

#[tokio::test]
async fn converts_every_image_and_resets() {
    let h = harness(Arc::new(RasterDecoder));

    h.converter
        .intake(vec![
            FileHandle::new("wide.png", "image/png", png(40, 20)),
            FileHandle::new("notes.txt", "text/plain", b"not an image".to_vec()),
        ])
        .await
        .unwrap();
    h.converter
        .intake(vec![FileHandle::new("tall.jpg", "image/jpeg", jpeg(20, 40))])
        .await
        .unwrap();
    assert_eq!(h.converter.len().await, 2);

    let report = h.converter.convert().await.expect("converts");
    assert_eq!(report.pages, 2);

    let saved = h.output.saved();
    assert_eq!(saved.len(), 1);
    let (name, pdf) = &saved[0];
    assert_eq!(name, "converted.pdf");
    assert_eq!(report.bytes, pdf.len());
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(count_pages(pdf), 2);

    assert!(h.converter.is_empty().await);
    assert_eq!(h.converter.live_references().await, 0);
    assert_eq!(h.input.resets.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.sink.notifications(),
        vec![Notification::Success("PDF created successfully!".to_string())]
    );

    // a fresh start behaves like first use
    h.converter
        .intake(vec![FileHandle::new("again.png", "image/png", png(5, 5))])
        .await
        .unwrap();
    let report = h.converter.convert().await.unwrap();
    assert_eq!(report.pages, 1);
    assert_eq!(h.output.saved().len(), 2);
}

#[tokio::test]
async fn converting_nothing_warns_and_writes_nothing() {
    let h = harness(Arc::new(RasterDecoder));
    let err = h.converter.convert().await.unwrap_err();
    assert!(matches!(err, ConvertError::EmptyCollection));
    assert!(h.output.saved().is_empty());
    assert_eq!(
        h.sink.notifications(),
        vec![Notification::Warning("No images uploaded.".to_string())]
    );
    assert_eq!(h.input.resets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn a_bad_image_fails_the_conversion_and_keeps_the_collection() {
    let h = harness(Arc::new(RasterDecoder));
    h.converter
        .intake(vec![
            FileHandle::new("good.png", "image/png", png(4, 4)),
            FileHandle::new("bad.png", "image/png", b"corrupt".to_vec()),
        ])
        .await
        .unwrap();

    let err = h.converter.convert().await.unwrap_err();
    assert!(matches!(err, ConvertError::Decode { ref name, .. } if name == "bad.png"));
    assert!(matches!(
        h.sink.notifications().as_slice(),
        [Notification::Error(_)]
    ));
    assert!(h.output.saved().is_empty());
    assert_eq!(h.converter.len().await, 2);
    assert_eq!(h.input.resets.load(Ordering::SeqCst), 0);

    // dropping the bad image lets the retry through
    let removed = h.converter.remove(1).await.unwrap();
    assert_eq!(removed.source_name, "bad.png");
    assert_eq!(h.converter.live_references().await, 1);
    let report = h.converter.convert().await.unwrap();
    assert_eq!(report.pages, 1);
}

/// Blocks every decode until released, announcing when the first one starts
struct GatedDecoder {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl ImageDecoder for GatedDecoder {
    async fn decode(&self, _item: &ImageItem) -> Result<Image, ImageError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(Image::new_raster(DynamicImage::ImageRgb8(RgbImage::new(8, 8))))
    }
}

#[tokio::test]
async fn collection_is_locked_while_converting() {
    let decoder = Arc::new(GatedDecoder {
        started: Notify::new(),
        release: Notify::new(),
    });
    let h = harness(decoder.clone());
    h.converter
        .intake(vec![FileHandle::new("only.png", "image/png", png(8, 8))])
        .await
        .unwrap();

    let converter = Arc::clone(&h.converter);
    let running = tokio::spawn(async move { converter.convert().await });
    decoder.started.notified().await;

    // a second conversion is turned away, with a warning
    assert!(matches!(
        h.converter.convert().await,
        Err(ConvertError::Busy)
    ));
    assert_eq!(
        h.sink.notifications(),
        vec![Notification::Warning(
            "A PDF is already being created, please wait.".to_string()
        )]
    );

    // intake queues behind the running conversion
    let converter = Arc::clone(&h.converter);
    let mut intake = tokio::spawn(async move {
        converter
            .intake(vec![FileHandle::new("late.png", "image/png", png(8, 8))])
            .await
    });
    assert!(tokio::time::timeout(Duration::from_millis(50), &mut intake)
        .await
        .is_err());

    decoder.release.notify_one();
    let report = running.await.unwrap().expect("first conversion succeeds");
    assert_eq!(report.pages, 1);

    intake.await.unwrap().expect("intake goes through afterwards");
    let items = h.converter.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].source_name, "late.png");
}

/// Decodes every item to a tiny blank raster without looking at its bytes
struct BlankDecoder;

#[async_trait]
impl ImageDecoder for BlankDecoder {
    async fn decode(&self, _item: &ImageItem) -> Result<Image, ImageError> {
        Ok(Image::new_raster(DynamicImage::ImageRgb8(RgbImage::new(2, 2))))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn intake_never_makes_a_conversion_busy() {
    let h = harness(Arc::new(BlankDecoder));
    let data = png(2, 2);

    let converter = Arc::clone(&h.converter);
    let feeder = tokio::spawn(async move {
        for round in 0..200 {
            let batch = (0..20)
                .map(|i| FileHandle::new(format!("{round}-{i}.png"), "image/png", data.clone()))
                .collect();
            converter.intake(batch).await.unwrap();
            tokio::task::yield_now().await;
        }
    });

    for _ in 0..100 {
        match h.converter.convert().await {
            Ok(_) | Err(ConvertError::EmptyCollection) => {}
            Err(err) => panic!("conversion refused while only intake was running: {err}"),
        }
    }
    feeder.await.unwrap();

    assert!(!h
        .sink
        .notifications()
        .iter()
        .any(|n| matches!(n, Notification::Warning(w) if w.contains("already"))));
}

#[tokio::test]
async fn writes_into_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().to_path_buf(),
        output_name: "album.pdf".to_string(),
        ..Config::default()
    };
    let converter = Converter::new(
        config.clone(),
        Arc::new(DirectorySink::new(config.output_dir.clone())),
    );

    let path = dir.path().join("photo.png");
    tokio::fs::write(&path, png(12, 6)).await.unwrap();
    converter
        .intake(vec![FileHandle::read(&path).await.unwrap()])
        .await
        .unwrap();

    let report = converter.convert().await.unwrap();
    assert_eq!(report.location, dir.path().join("album.pdf"));
    let pdf = tokio::fs::read(&report.location).await.unwrap();
    assert_eq!(count_pages(&pdf), 1);
}
