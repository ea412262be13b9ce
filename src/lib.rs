#![forbid(unsafe_code)]

pub mod compose;
pub mod composite_cpu;
pub mod decode;
pub mod encode;
pub mod error;
pub mod frames;
pub mod model;
pub mod results;
pub mod rotate_cpu;
pub mod studio;
pub mod svg_raster;

pub use compose::{ComposeOptions, center_crop_box, compose, compose_rgba, finish_jpeg};
pub use error::{EnframeError, EnframeResult, ErrorClass};
pub use frames::{FrameLibrary, sanitize_id};
pub use model::{ComposeMode, FrameEntry, FrameKind, Transform};
pub use results::{ResultId, ResultStore, fingerprint_bytes};
pub use studio::{Studio, Upload};
pub use svg_raster::{RasterOptions, rasterize_svg};
