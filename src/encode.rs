use std::io::Cursor;

use anyhow::Context;
use image::RgbImage;

use crate::error::{EnframeError, EnframeResult};

/// Encode an opaque RGB image as JPEG at the given quality (1-100).
pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> EnframeResult<Vec<u8>> {
    if quality == 0 || quality > 100 {
        return Err(EnframeError::validation("jpeg quality must be in 1..=100"));
    }

    let mut buffer = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);
    let (width, height) = rgb.dimensions();
    encoder
        .encode(rgb.as_raw(), width, height, image::ColorType::Rgb8.into())
        .context("encode jpeg")?;
    Ok(buffer)
}
