use thiserror::Error;

pub type VlabResult<T> = Result<T, VlabError>;

#[derive(Error, Debug)]
pub enum VlabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formula parse error: {0}")]
    Parse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dataset error: {0}")]
    Dataset(String),
}
