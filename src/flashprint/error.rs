use crate::model::CardId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("Layout config error: {0}")]
    LayoutConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, FlashError>;
