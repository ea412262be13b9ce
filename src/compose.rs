use image::{RgbaImage, imageops};

use crate::{
    composite_cpu::{flatten_to_rgb, paste_opaque, paste_over},
    decode::{MAX_DIM, decode_rgba8, ensure_raster_size},
    encode::encode_jpeg,
    error::{EnframeError, EnframeResult},
    model::{ComposeMode, Transform},
    rotate_cpu::rotate_rgba_expand,
};

// Rotated/scaled intermediates may legitimately exceed `MAX_DIM` (rotating a
// full-size photo 45 degrees grows it by sqrt(2)) and the excess is clipped
// at paste time, so they get a looser cap that still refuses absurd scale
// factors before they allocate.
const MAX_TRANSFORM_DIM: u32 = MAX_DIM * 2;

/// Output settings shared by both compose modes.
#[derive(Clone, Copy, Debug)]
pub struct ComposeOptions {
    /// Opaque background color used when flattening remaining transparency.
    pub background: [u8; 3],
    /// JPEG encoder quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            background: [0, 0, 0],
            jpeg_quality: 85,
        }
    }
}

impl ComposeOptions {
    pub fn validate(&self) -> EnframeResult<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(EnframeError::validation("jpeg quality must be in 1..=100"));
        }
        Ok(())
    }
}

/// Square center-crop box for a photo: `(left, top, size)`.
///
/// The box always has `size = min(width, height)` and lies fully inside the
/// photo bounds.
pub fn center_crop_box(width: u32, height: u32) -> (u32, u32, u32) {
    let min_dim = width.min(height);
    ((width - min_dim) / 2, (height - min_dim) / 2, min_dim)
}

/// Composite a decoded photo beneath a decoded frame.
///
/// The frame's dimensions define the output canvas. The photo is placed
/// according to `mode`, then the frame is blended on top with its own alpha.
/// The result keeps its alpha channel; flattening and encoding are separate
/// steps shared by every caller.
pub fn compose_rgba(
    photo: &RgbaImage,
    frame: &RgbaImage,
    mode: &ComposeMode,
) -> EnframeResult<RgbaImage> {
    mode.validate()?;
    ensure_raster_size(photo.width(), photo.height(), "photo")?;
    ensure_raster_size(frame.width(), frame.height(), "frame")?;

    let (frame_w, frame_h) = frame.dimensions();
    let mut canvas = RgbaImage::new(frame_w, frame_h);

    match mode {
        ComposeMode::CenterCrop => {
            let (left, top, size) = center_crop_box(photo.width(), photo.height());
            let square = imageops::crop_imm(photo, left, top, size, size).to_image();
            let resized =
                imageops::resize(&square, frame_w, frame_h, imageops::FilterType::Lanczos3);
            paste_opaque(&mut canvas, &resized, 0, 0);
        }
        ComposeMode::Freeform(transform) => {
            let placed = transform_photo(photo, frame_w, frame_h, transform)?;
            let pos_x = (i64::from(frame_w) - i64::from(placed.width())).div_euclid(2)
                + i64::from(transform.offset_x);
            let pos_y = (i64::from(frame_h) - i64::from(placed.height())).div_euclid(2)
                + i64::from(transform.offset_y);
            paste_over(&mut canvas, &placed, pos_x, pos_y);
        }
    }

    paste_over(&mut canvas, frame, 0, 0);
    Ok(canvas)
}

/// Freeform placement: stretch to the frame, rotate clockwise, then scale
/// with truncating dimension arithmetic.
fn transform_photo(
    photo: &RgbaImage,
    frame_w: u32,
    frame_h: u32,
    transform: &Transform,
) -> EnframeResult<RgbaImage> {
    let fitted = imageops::resize(photo, frame_w, frame_h, imageops::FilterType::Lanczos3);
    let rotated = rotate_rgba_expand(&fitted, transform.rotation_degrees);

    let scaled_w = (f64::from(rotated.width()) * transform.scale) as u32;
    let scaled_h = (f64::from(rotated.height()) * transform.scale) as u32;
    if scaled_w == 0 || scaled_h == 0 {
        return Err(EnframeError::dimension(format!(
            "scaled photo has degenerate dimensions {scaled_w}x{scaled_h}"
        )));
    }
    if scaled_w > MAX_TRANSFORM_DIM || scaled_h > MAX_TRANSFORM_DIM {
        return Err(EnframeError::dimension(format!(
            "scaled photo is too large: {scaled_w}x{scaled_h} (max {MAX_TRANSFORM_DIM}x{MAX_TRANSFORM_DIM})"
        )));
    }

    if (scaled_w, scaled_h) == rotated.dimensions() {
        return Ok(rotated);
    }
    Ok(imageops::resize(
        &rotated,
        scaled_w,
        scaled_h,
        imageops::FilterType::Lanczos3,
    ))
}

/// Flatten a composited canvas and encode it as JPEG.
pub fn finish_jpeg(canvas: &RgbaImage, opts: &ComposeOptions) -> EnframeResult<Vec<u8>> {
    opts.validate()?;
    let rgb = flatten_to_rgb(canvas, opts.background);
    encode_jpeg(&rgb, opts.jpeg_quality)
}

/// The whole pipeline over raw bytes: decode both inputs, composite, flatten,
/// encode. This is the operation transports call.
#[tracing::instrument(skip(photo_bytes, frame_bytes))]
pub fn compose(
    photo_bytes: &[u8],
    frame_bytes: &[u8],
    mode: &ComposeMode,
    opts: &ComposeOptions,
) -> EnframeResult<Vec<u8>> {
    opts.validate()?;
    let photo = decode_rgba8(photo_bytes, "photo")?;
    let frame = decode_rgba8(frame_bytes, "frame")?;
    let canvas = compose_rgba(&photo, &frame, mode)?;
    finish_jpeg(&canvas, opts)
}
