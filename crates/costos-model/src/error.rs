use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid row key: {0:?}")]
    InvalidRowKey(String),
}
