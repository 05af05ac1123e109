pub type VoxResult<T> = Result<T, VoxError>;

#[derive(thiserror::Error, Debug)]
pub enum VoxError {
    #[error("config error: {0}")]
    Config(String),

    #[error("voice error: {0}")]
    Voice(String),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VoxError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn voice(msg: impl Into<String>) -> Self {
        Self::Voice(msg.into())
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}
