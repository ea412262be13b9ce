use image::RgbaImage;

use crate::{
    decode::MAX_DIM,
    error::{EnframeError, EnframeResult},
};

/// Rasterization settings for vector frame assets.
#[derive(Clone, Copy, Debug)]
pub struct RasterOptions {
    /// Target length of the longest output side, in pixels.
    pub target_px: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { target_px: 1024 }
    }
}

impl RasterOptions {
    pub fn validate(&self) -> EnframeResult<()> {
        if self.target_px == 0 || self.target_px > MAX_DIM {
            return Err(EnframeError::validation(format!(
                "raster target_px must be in 1..={MAX_DIM}"
            )));
        }
        Ok(())
    }
}

/// Rasterize SVG bytes into a straight-alpha RGBA image.
///
/// The output preserves the SVG's intrinsic aspect ratio with the longest
/// side equal to `target_px`. Unparsable documents and degenerate intrinsic
/// sizes are decode errors, never silent failures.
pub fn rasterize_svg(bytes: &[u8], opts: &RasterOptions) -> EnframeResult<RgbaImage> {
    opts.validate()?;

    let usvg_opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &usvg_opts)
        .map_err(|e| EnframeError::decode(format!("parse svg: {e}")))?;

    let (width, height) = svg_raster_size(&tree, opts.target_px)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| EnframeError::decode("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // The renderer writes premultiplied alpha; the compositing path expects
    // straight alpha.
    let mut data = pixmap.data().to_vec();
    unpremultiply_rgba8_in_place(&mut data);

    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| EnframeError::decode("svg pixmap buffer size mismatch"))
}

/// Compute the output size for an SVG so the longest side equals `target_px`
/// and the aspect ratio of the intrinsic size is preserved.
pub fn svg_raster_size(tree: &usvg::Tree, target_px: u32) -> EnframeResult<(u32, u32)> {
    fn to_px(v: f32) -> EnframeResult<f64> {
        if !v.is_finite() || v <= 0.0 {
            return Err(EnframeError::decode("svg has invalid width/height"));
        }
        Ok(f64::from(v))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let scale = f64::from(target_px) / base_w.max(base_h);
    let w = (base_w * scale).round().max(1.0) as u32;
    let h = (base_h * scale).round().max(1.0) as u32;

    if w > MAX_DIM || h > MAX_DIM {
        return Err(EnframeError::decode(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    Ok((w, h))
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}
