use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::RgbaImage;

use crate::{
    decode::decode_rgba8,
    error::{EnframeError, EnframeResult},
    model::{FrameEntry, FrameKind},
    svg_raster::{RasterOptions, rasterize_svg},
};

/// Directory-backed catalog of frame assets.
///
/// Raster frames (png/jpg/jpeg) are decoded as-is; vector frames (svg) are
/// rasterized on load so the compositing path only ever sees raster images.
#[derive(Debug)]
pub struct FrameLibrary {
    root: PathBuf,
    raster_opts: RasterOptions,
}

impl FrameLibrary {
    pub fn open(root: impl AsRef<Path>) -> EnframeResult<Self> {
        Self::with_raster_options(root, RasterOptions::default())
    }

    pub fn with_raster_options(
        root: impl AsRef<Path>,
        raster_opts: RasterOptions,
    ) -> EnframeResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(EnframeError::validation(format!(
                "frames directory '{}' does not exist",
                root.display()
            )));
        }
        raster_opts.validate()?;
        Ok(Self { root, raster_opts })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the catalog, sorted by id. Files with unrecognized extensions
    /// are ignored.
    pub fn list(&self) -> EnframeResult<Vec<FrameEntry>> {
        let dir = fs::read_dir(&self.root)
            .with_context(|| format!("read frames dir '{}'", self.root.display()))?;

        let mut entries = Vec::new();
        for entry in dir {
            let entry =
                entry.with_context(|| format!("read frames dir '{}'", self.root.display()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(kind) = kind_of(&path) else {
                continue;
            };
            entries.push(FrameEntry {
                id: id.to_string(),
                kind,
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    /// Load a frame by catalog id as straight-alpha RGBA.
    ///
    /// Unknown ids, ids naming unsupported file kinds, and ids that would
    /// escape the catalog directory are all not-found errors.
    pub fn load(&self, id: &str) -> EnframeResult<RgbaImage> {
        let safe = sanitize_id(id, "frame")?;
        let path = self.root.join(safe);

        let Some(kind) = kind_of(&path) else {
            return Err(EnframeError::not_found(format!(
                "frame '{id}' is not a supported frame kind"
            )));
        };
        if !path.is_file() {
            return Err(EnframeError::not_found(format!("frame '{id}' not found")));
        }

        let bytes =
            fs::read(&path).with_context(|| format!("read frame '{}'", path.display()))?;
        match kind {
            FrameKind::Raster => decode_rgba8(&bytes, "frame"),
            FrameKind::Vector => rasterize_svg(&bytes, &self.raster_opts),
        }
    }
}

fn kind_of(path: &Path) -> Option<FrameKind> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(FrameKind::from_extension)
}

/// Validate store identifiers before they touch the filesystem.
///
/// Identifiers name exactly one file inside a store directory; separators,
/// parent traversals, and empty names are rejected rather than resolved.
pub fn sanitize_id<'a>(id: &'a str, what: &str) -> EnframeResult<&'a str> {
    if id.is_empty() {
        return Err(EnframeError::not_found(format!(
            "{what} id must be non-empty"
        )));
    }
    if id.contains('/') || id.contains('\\') {
        return Err(EnframeError::not_found(format!(
            "{what} id must not contain path separators"
        )));
    }
    if id == "." || id == ".." {
        return Err(EnframeError::not_found(format!(
            "{what} id must name a file"
        )));
    }
    Ok(id)
}
