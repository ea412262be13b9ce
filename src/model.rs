use crate::error::{EnframeError, EnframeResult};

/// User-controlled placement parameters for the freeform compose mode.
///
/// Applied in order: resize to the frame, rotate, scale, then displace from
/// the centered position by the offsets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Uniform scale factor. Must be finite and >= 0.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Rotation in degrees, clockwise for positive values.
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Horizontal displacement in pixels from the centered position.
    #[serde(default)]
    pub offset_x: i32,
    /// Vertical displacement in pixels from the centered position.
    #[serde(default)]
    pub offset_y: i32,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_degrees: 0.0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl Transform {
    pub fn validate(&self) -> EnframeResult<()> {
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(EnframeError::validation(
                "transform scale must be finite and >= 0",
            ));
        }
        if !self.rotation_degrees.is_finite() {
            return Err(EnframeError::validation(
                "transform rotation must be finite",
            ));
        }
        Ok(())
    }
}

/// Placement strategy for the photo beneath the frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ComposeMode {
    /// Center-crop the photo to a square, then stretch it to the frame.
    CenterCrop,
    /// Resize the photo to the frame, then apply the transform.
    Freeform(Transform),
}

impl ComposeMode {
    pub fn validate(&self) -> EnframeResult<()> {
        match self {
            Self::CenterCrop => Ok(()),
            Self::Freeform(t) => t.validate(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FrameKind {
    Raster,
    Vector,
}

impl FrameKind {
    /// Recognize a frame kind from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" => Some(Self::Raster),
            "svg" => Some(Self::Vector),
            _ => None,
        }
    }
}

/// One catalog entry of the frame library.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameEntry {
    pub id: String,
    pub kind: FrameKind,
}
