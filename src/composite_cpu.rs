use image::{RgbImage, RgbaImage};

pub type Rgba8 = [u8; 4];

/// Straight-alpha source-over blend of `src` onto `dst`.
pub fn over_straight(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - sa;
    let da_scaled = mul_div255(u16::from(dst[3]), inv);
    let out_a = u16::from(add_sat_u8(sa as u8, da_scaled));
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = out_a as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * u32::from(sa) + u32::from(dst[i]) * u32::from(da_scaled);
        out[i] = ((num + u32::from(out_a) / 2) / u32::from(out_a)) as u8;
    }
    out
}

/// Paste `src` onto `canvas` with its top-left corner at `(left, top)`,
/// blending with the source's own alpha. Parts falling outside the canvas
/// are clipped silently.
pub fn paste_over(canvas: &mut RgbaImage, src: &RgbaImage, left: i64, top: i64) {
    let canvas_w = i64::from(canvas.width());
    let canvas_h = i64::from(canvas.height());
    for (sx, sy, px) in src.enumerate_pixels() {
        let dx = left + i64::from(sx);
        let dy = top + i64::from(sy);
        if dx < 0 || dy < 0 || dx >= canvas_w || dy >= canvas_h {
            continue;
        }
        let dst = canvas.get_pixel_mut(dx as u32, dy as u32);
        dst.0 = over_straight(dst.0, px.0);
    }
}

/// Paste `src` onto `canvas` fully opaque, ignoring the source's alpha
/// channel entirely. Same silent clipping as [`paste_over`].
pub fn paste_opaque(canvas: &mut RgbaImage, src: &RgbaImage, left: i64, top: i64) {
    let canvas_w = i64::from(canvas.width());
    let canvas_h = i64::from(canvas.height());
    for (sx, sy, px) in src.enumerate_pixels() {
        let dx = left + i64::from(sx);
        let dy = top + i64::from(sy);
        if dx < 0 || dy < 0 || dx >= canvas_w || dy >= canvas_h {
            continue;
        }
        canvas.put_pixel(dx as u32, dy as u32, image::Rgba([px[0], px[1], px[2], 255]));
    }
}

/// Flatten a straight-alpha RGBA canvas onto an opaque background color.
pub fn flatten_to_rgb(canvas: &RgbaImage, background: [u8; 3]) -> RgbImage {
    let mut out = RgbImage::new(canvas.width(), canvas.height());
    for (x, y, px) in canvas.enumerate_pixels() {
        let a = u16::from(px[3]);
        let inv = 255u16 - a;
        let mut flat = [0u8; 3];
        for i in 0..3 {
            flat[i] = add_sat_u8(
                mul_div255(u16::from(px[i]), a),
                mul_div255(u16::from(background[i]), inv),
            );
        }
        out.put_pixel(x, y, image::Rgb(flat));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
