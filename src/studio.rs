use crate::{
    compose::{ComposeOptions, compose_rgba, finish_jpeg},
    decode::decode_rgba8,
    error::{EnframeError, EnframeResult},
    frames::FrameLibrary,
    model::{ComposeMode, Transform},
    results::{ResultId, ResultStore},
};

/// A file upload as a transport hands it over: the client-supplied name and
/// the raw bytes.
#[derive(Clone, Debug)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Boundary service tying the frame catalog, the compositor, and the result
/// store together. Transports validate nothing themselves; they pass uploads
/// through and translate the error kinds coming back.
#[derive(Debug)]
pub struct Studio {
    frames: FrameLibrary,
    results: ResultStore,
    opts: ComposeOptions,
}

impl Studio {
    pub fn new(frames: FrameLibrary, results: ResultStore) -> Self {
        Self {
            frames,
            results,
            opts: ComposeOptions::default(),
        }
    }

    pub fn with_options(
        frames: FrameLibrary,
        results: ResultStore,
        opts: ComposeOptions,
    ) -> EnframeResult<Self> {
        opts.validate()?;
        Ok(Self {
            frames,
            results,
            opts,
        })
    }

    pub fn frames(&self) -> &FrameLibrary {
        &self.frames
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Compose an uploaded photo with a cataloged frame and store the result.
    ///
    /// With no transform the photo is center-cropped to fit; with a transform
    /// the freeform mode applies it. Nothing is written to the store unless
    /// the whole pipeline succeeds.
    #[tracing::instrument(skip(self, photo))]
    pub fn compose_upload(
        &self,
        photo: Option<&Upload>,
        frame_id: Option<&str>,
        transform: Option<Transform>,
    ) -> EnframeResult<ResultId> {
        let photo = photo.ok_or_else(|| EnframeError::missing_input("no photo uploaded"))?;
        let frame_id =
            frame_id.ok_or_else(|| EnframeError::missing_input("no frame selected"))?;
        if photo.name.is_empty() || photo.bytes.is_empty() {
            return Err(EnframeError::empty_input(
                "uploaded photo has no name or content",
            ));
        }

        let frame = self.frames.load(frame_id)?;
        let photo_rgba = decode_rgba8(&photo.bytes, "photo")?;

        let mode = match transform {
            Some(t) => ComposeMode::Freeform(t),
            None => ComposeMode::CenterCrop,
        };
        let canvas = compose_rgba(&photo_rgba, &frame, &mode)?;
        let encoded = finish_jpeg(&canvas, &self.opts)?;
        self.results.put(&encoded)
    }
}
