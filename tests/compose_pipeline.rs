use std::io::Cursor;

use enframe::{ComposeMode, ComposeOptions, EnframeError, Transform, compose};

fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn flat_photo(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    png_bytes(&image::RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
}

/// Frame with an opaque border ring and a fully transparent window. The
/// border width stays on 16px JPEG macroblock boundaries so decoded colors
/// can be compared without chroma bleed from neighboring regions.
fn ring_frame(size: u32, border: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut frame = image::RgbaImage::new(size, size);
    for (x, y, px) in frame.enumerate_pixels_mut() {
        let inside = x >= border && x < size - border && y >= border && y < size - border;
        if !inside {
            *px = image::Rgba(rgba);
        }
    }
    png_bytes(&frame)
}

fn assert_near(actual: [u8; 3], expected: [u8; 3], tol: u8, what: &str) {
    for i in 0..3 {
        let d = (i32::from(actual[i]) - i32::from(expected[i])).abs();
        assert!(
            d <= i32::from(tol),
            "{what}: channel {i} of {actual:?} vs {expected:?}"
        );
    }
}

#[test]
fn center_crop_scenario_800x600_into_512_frame() {
    let photo = flat_photo(800, 600, [64, 128, 192, 255]);
    let frame = ring_frame(512, 64, [200, 16, 16, 255]);

    let out = compose(
        &photo,
        &frame,
        &ComposeMode::CenterCrop,
        &ComposeOptions::default(),
    )
    .unwrap();

    assert_eq!(
        image::guess_format(&out).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (512, 512));

    // ring pixels come from the frame, the window shows the photo
    assert_near(decoded.get_pixel(16, 16).0, [200, 16, 16], 8, "ring");
    assert_near(decoded.get_pixel(256, 256).0, [64, 128, 192], 8, "window");
}

#[test]
fn output_dimensions_always_match_the_frame() {
    let photo = flat_photo(31, 17, [9, 9, 9, 255]);
    for (fw, fh) in [(24, 10), (10, 24), (33, 33)] {
        let frame = png_bytes(&image::RgbaImage::new(fw, fh));
        for mode in [
            ComposeMode::CenterCrop,
            ComposeMode::Freeform(Transform::default()),
        ] {
            let out = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap();
            let decoded = image::load_from_memory(&out).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (fw, fh), "{mode:?}");
        }
    }
}

#[test]
fn compose_is_deterministic_for_identical_inputs() {
    let photo = flat_photo(50, 40, [120, 90, 30, 255]);
    let frame = ring_frame(32, 16, [0, 0, 0, 255]);
    let mode = ComposeMode::Freeform(Transform {
        scale: 1.2,
        rotation_degrees: 10.0,
        offset_x: 3,
        offset_y: -2,
    });

    let a = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap();
    let b = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn freeform_scenario_rotate_scale_offset() {
    let photo = flat_photo(200, 100, [90, 160, 40, 255]);
    let frame = ring_frame(400, 48, [10, 10, 120, 255]);
    let mode = ComposeMode::Freeform(Transform {
        scale: 1.5,
        rotation_degrees: 45.0,
        offset_x: 10,
        offset_y: -5,
    });

    let out = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap();
    let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (400, 400));

    // at 1.5x the rotated photo overflows the canvas, so the window center
    // is photo and the opaque ring still wins on top
    assert_near(decoded.get_pixel(200, 200).0, [90, 160, 40], 8, "window");
    assert_near(decoded.get_pixel(24, 24).0, [10, 10, 120], 8, "ring");
}

#[test]
fn freeform_scale_zero_fails_with_dimension_error() {
    let photo = flat_photo(16, 16, [1, 2, 3, 255]);
    let frame = png_bytes(&image::RgbaImage::new(16, 16));
    let mode = ComposeMode::Freeform(Transform {
        scale: 0.0,
        ..Transform::default()
    });

    let err = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap_err();
    assert!(matches!(err, EnframeError::Dimension(_)), "{err}");
}

#[test]
fn freeform_identity_transform_reveals_photo_through_transparent_frame() {
    let photo = flat_photo(48, 48, [210, 70, 70, 255]);
    let frame = png_bytes(&image::RgbaImage::new(64, 64));
    let mode = ComposeMode::Freeform(Transform::default());

    let out = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap();
    let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (64, 64));

    for (x, y) in [(8, 8), (32, 32), (56, 56)] {
        assert_near(decoded.get_pixel(x, y).0, [210, 70, 70], 8, "photo fill");
    }
}

#[test]
fn freeform_downscale_exposes_the_background() {
    let photo = flat_photo(64, 64, [40, 200, 80, 255]);
    let frame = png_bytes(&image::RgbaImage::new(64, 64));
    let mode = ComposeMode::Freeform(Transform {
        scale: 0.5,
        ..Transform::default()
    });
    let opts = ComposeOptions {
        background: [255, 255, 255],
        ..ComposeOptions::default()
    };

    let out = compose(&photo, &frame, &mode, &opts).unwrap();
    let decoded = image::load_from_memory(&out).unwrap().to_rgb8();

    // photo occupies the centered 32x32 block (16..48)
    assert_near(decoded.get_pixel(24, 24).0, [40, 200, 80], 8, "photo");
    assert_near(decoded.get_pixel(40, 40).0, [40, 200, 80], 8, "photo");
    assert_near(decoded.get_pixel(4, 4).0, [255, 255, 255], 8, "background");
    assert_near(decoded.get_pixel(60, 60).0, [255, 255, 255], 8, "background");
}

#[test]
fn freeform_extreme_upscale_is_clipped_not_rejected() {
    let photo = flat_photo(32, 32, [90, 60, 120, 255]);
    let frame = png_bytes(&image::RgbaImage::new(64, 2));
    let mode = ComposeMode::Freeform(Transform {
        scale: 260.0,
        ..Transform::default()
    });

    // the scaled photo is 16640x520, wider than any decodable input; only
    // the canvas window of it survives
    let out = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap();
    let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (64, 2));
    assert_near(decoded.get_pixel(32, 1).0, [90, 60, 120], 8, "clipped photo");
}

#[test]
fn opaque_frame_fully_replaces_the_photo() {
    let photo = flat_photo(40, 40, [250, 250, 250, 255]);
    let frame = png_bytes(&image::RgbaImage::from_pixel(
        32,
        32,
        image::Rgba([5, 5, 200, 255]),
    ));

    for mode in [
        ComposeMode::CenterCrop,
        ComposeMode::Freeform(Transform::default()),
    ] {
        let out = compose(&photo, &frame, &mode, &ComposeOptions::default()).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
        assert_near(decoded.get_pixel(8, 8).0, [5, 5, 200], 8, "frame");
        assert_near(decoded.get_pixel(16, 16).0, [5, 5, 200], 8, "frame");
    }
}

#[test]
fn decode_failures_name_the_failing_input() {
    let photo = flat_photo(8, 8, [1, 1, 1, 255]);
    let frame = png_bytes(&image::RgbaImage::new(8, 8));

    let err = compose(
        b"not an image",
        &frame,
        &ComposeMode::CenterCrop,
        &ComposeOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EnframeError::Decode(_)));
    assert!(err.to_string().contains("photo"));

    let err = compose(
        &photo,
        b"not an image",
        &ComposeMode::CenterCrop,
        &ComposeOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EnframeError::Decode(_)));
    assert!(err.to_string().contains("frame"));
}

#[test]
fn compose_runs_with_a_tracing_subscriber_installed() {
    // the instrumented entry points record their fields once a subscriber
    // exists; span output lands in the per-test capture
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let photo = flat_photo(8, 8, [5, 5, 5, 255]);
    let frame = png_bytes(&image::RgbaImage::new(8, 8));
    let out = compose(
        &photo,
        &frame,
        &ComposeMode::CenterCrop,
        &ComposeOptions::default(),
    )
    .unwrap();
    assert!(!out.is_empty());
}
