use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record cannot be encoded: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
