//! Decoded base-colour images, ready for upload as RGBA8.

use anyhow::{Context, Result};
use image::imageops::FilterType;

/// Larger images are downscaled (keeping aspect) before upload.
pub const MAX_TEXTURE_SIZE: u32 = 2048;

#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, sRGB encoded.
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decode PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut img = image::load_from_memory(bytes).context("Failed to decode image")?;
        if img.width() > MAX_TEXTURE_SIZE || img.height() > MAX_TEXTURE_SIZE {
            log::debug!(
                "Downscaling {}x{} texture to fit {MAX_TEXTURE_SIZE}",
                img.width(),
                img.height()
            );
            img = img.resize(MAX_TEXTURE_SIZE, MAX_TEXTURE_SIZE, FilterType::Triangle);
        }
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// 1x1 image of one colour.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::from_pixel(width, height, Rgba(pixel))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let texture = TextureImage::decode(&png(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.rgba.len(), 3 * 2 * 4);
        assert_eq!(&texture.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn oversized_images_are_downscaled() {
        let texture = TextureImage::decode(&png(4096, 16, [255; 4])).unwrap();
        assert_eq!((texture.width, texture.height), (2048, 8));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(TextureImage::decode(b"\x89PNG but not really").is_err());
        assert_eq!(TextureImage::solid([1, 2, 3, 4]).rgba, vec![1, 2, 3, 4]);
    }
}
