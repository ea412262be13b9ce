use image::RgbaImage;

use crate::error::{EnframeError, EnframeResult};

/// Upper bound on decoded input dimensions. Avoids pathological allocations
/// from absurd inputs.
pub(crate) const MAX_DIM: u32 = 16_384;

/// Decode arbitrary still-image bytes into straight-alpha RGBA8.
///
/// `what` names the input ("photo", "frame") so decode failures say which
/// side of the composite was unusable.
pub fn decode_rgba8(bytes: &[u8], what: &str) -> EnframeResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| EnframeError::decode(format!("{what}: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    ensure_raster_size(rgba.width(), rgba.height(), what)?;
    Ok(rgba)
}

pub(crate) fn ensure_raster_size(width: u32, height: u32, what: &str) -> EnframeResult<()> {
    if width == 0 || height == 0 {
        return Err(EnframeError::dimension(format!(
            "{what} has degenerate dimensions {width}x{height}"
        )));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(EnframeError::dimension(format!(
            "{what} is too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok(())
}
