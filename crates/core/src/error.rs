#[derive(Debug, thiserror::Error)]
pub enum LensError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("value out of range: {0}")]
    Range(#[from] lens_types::RangeError),
}

pub type LensResult<T> = std::result::Result<T, LensError>;
