pub type EnframeResult<T> = Result<T, EnframeError>;

#[derive(thiserror::Error, Debug)]
pub enum EnframeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("dimension error: {0}")]
    Dimension(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse response class a transport maps onto its own status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent an unusable request (missing/empty/invalid input).
    InvalidRequest,
    /// The referenced frame or result does not exist.
    NotFound,
    /// The request was well-formed but processing failed.
    Processing,
}

impl EnframeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) | Self::MissingInput(_) | Self::EmptyInput(_) => {
                ErrorClass::InvalidRequest
            }
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Decode(_) | Self::Dimension(_) | Self::Other(_) => ErrorClass::Processing,
        }
    }
}
