use image::RgbaImage;

/// Rotate a straight-alpha RGBA image clockwise by `degrees`, expanding the
/// output bounds so no content is clipped. Pixels outside the rotated content
/// are fully transparent.
///
/// Quarter turns take exact paths; 0 (mod 360) is an identity copy.
pub fn rotate_rgba_expand(src: &RgbaImage, degrees: f64) -> RgbaImage {
    let angle = degrees.rem_euclid(360.0);
    if angle == 0.0 {
        return src.clone();
    }
    if angle == 90.0 {
        return image::imageops::rotate90(src);
    }
    if angle == 180.0 {
        return image::imageops::rotate180(src);
    }
    if angle == 270.0 {
        return image::imageops::rotate270(src);
    }
    rotate_arbitrary(src, angle)
}

fn rotate_arbitrary(src: &RgbaImage, angle_degrees: f64) -> RgbaImage {
    let rad = angle_degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    let src_w = f64::from(src.width());
    let src_h = f64::from(src.height());

    let out_w = (src_w * cos.abs() + src_h * sin.abs()).ceil().max(1.0) as u32;
    let out_h = (src_w * sin.abs() + src_h * cos.abs()).ceil().max(1.0) as u32;

    let cx = src_w / 2.0;
    let cy = src_h / 2.0;
    let ox = f64::from(out_w) / 2.0;
    let oy = f64::from(out_h) / 2.0;

    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - ox;
        let dy = f64::from(y) + 0.5 - oy;
        // Inverse of the clockwise rotation, mapping output pixel centers
        // back into source space (y points down in both spaces).
        let sx = cos * dx + sin * dy + cx - 0.5;
        let sy = -sin * dx + cos * dy + cy - 0.5;
        *px = image::Rgba(sample_bilinear(src, sx, sy));
    }
    out
}

/// Bilinear tap at `(x, y)`, treating everything outside the source as
/// transparent. Accumulates premultiplied so transparent neighbors do not
/// bleed their color channels into the result.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1.0, y0, fx * (1.0 - fy)),
        (x0, y0 + 1.0, (1.0 - fx) * fy),
        (x0 + 1.0, y0 + 1.0, fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (tap_x, tap_y, weight) in taps {
        if weight == 0.0 {
            continue;
        }
        let Some(px) = pixel_at(src, tap_x, tap_y) else {
            continue;
        };
        let a = f64::from(px[3]);
        acc[0] += weight * f64::from(px[0]) * a;
        acc[1] += weight * f64::from(px[1]) * a;
        acc[2] += weight * f64::from(px[2]) * a;
        acc[3] += weight * a;
    }

    if acc[3] <= 0.0 {
        return [0, 0, 0, 0];
    }
    [
        round_u8(acc[0] / acc[3]),
        round_u8(acc[1] / acc[3]),
        round_u8(acc[2] / acc[3]),
        round_u8(acc[3]),
    ]
}

fn pixel_at(src: &RgbaImage, x: f64, y: f64) -> Option<[u8; 4]> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let (xi, yi) = (x as i64, y as i64);
    if xi >= i64::from(src.width()) || yi >= i64::from(src.height()) {
        return None;
    }
    Some(src.get_pixel(xi as u32, yi as u32).0)
}

fn round_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
