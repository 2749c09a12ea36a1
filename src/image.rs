use crate::refs::{ObjectReferences, RefType};
use image::{ColorType, DynamicImage, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Natural pixel dimensions of an image
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    /// width / height, or [None] if either side is zero
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

/// Reads just enough of the file header to learn its pixel dimensions, without
/// decoding any pixel data.
pub fn probe_dimensions(data: &[u8]) -> Option<Dimensions> {
    image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
        .map(|(width, height)| Dimensions { width, height })
}

/// The number of colour components declared in a JPEG's start-of-frame header
fn jpeg_components(data: &[u8]) -> Option<u8> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // fill byte
            0xFF => pos += 1,
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => pos += 2,
            // start of scan: no frame header seen
            0xDA => return None,
            // SOF0..SOF15, except DHT, JPG and DAC which share the range
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return data.get(pos + 9).copied();
            }
            _ => {
                let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
                pos += 2 + len;
            }
        }
    }
    None
}

pub enum RasterImageType {
    /// Three-component JPEG data, which PDF readers can decode themselves as DeviceRGB
    DirectlyEmbeddableJpeg(Arc<[u8]>),
    Image(DynamicImage),
}

/// An image ready to be embedded into a document
pub struct Image {
    pub image: RasterImageType,
    pub width: u32,
    pub height: u32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Decodes an image from its raw file bytes. `media_type` is only consulted for
    /// formats that can't be recognised from their contents (TGA).
    pub fn from_bytes(data: Arc<[u8]>, media_type: &str) -> Result<Image, ImageError> {
        let is_tga = matches!(
            media_type.trim().to_ascii_lowercase().as_str(),
            "image/x-tga" | "image/x-targa" | "image/tga"
        );

        let format = if is_tga {
            ImageFormat::Tga
        } else {
            image::guess_format(&data)?
        };
        let image = image::load_from_memory_with_format(&data, format)?;

        // CMYK JPEGs are also decoded to Rgb8, so check what the file itself holds
        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) if jpeg_components(&data) == Some(3) => {
                // we can embed it directly!
                let width = image.width();
                let height = image.height();

                Ok(Image {
                    image: RasterImageType::DirectlyEmbeddableJpeg(data),
                    width,
                    height,
                })
            }
            _ => Ok(Self::new_raster(image)),
        }
    }

    pub fn new_raster(image: DynamicImage) -> Image {
        let width = image.width();
        let height = image.height();
        Image {
            image: RasterImageType::Image(image),
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    fn encode(&self) -> EncodeOutput {
        match &self.image {
            RasterImageType::DirectlyEmbeddableJpeg(data) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: data.to_vec(),
                mask: None,
            },
            RasterImageType::Image(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }

        image.finish();

        // add a transparency mask if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
