use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShowcaseError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to load asset {url}: {reason}")]
    AssetLoad { url: String, reason: String },

    #[error("invalid selection: index {index} out of range for {count} slides")]
    InvalidSelection { index: usize, count: usize },
}

impl ShowcaseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn asset(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad { url: url.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ShowcaseError>;
