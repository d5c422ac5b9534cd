pub type StickerResult<T> = Result<T, StickerError>;

#[derive(thiserror::Error, Debug)]
pub enum StickerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StickerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StickerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

impl From<image::ImageError> for StickerError {
    fn from(e: image::ImageError) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}
