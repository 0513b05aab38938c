use thiserror::Error;

#[derive(Error, Debug)]
pub enum PocketbookError {
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid reserve goal: {0:?}")]
    InvalidGoal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, PocketbookError>;
