use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepopageError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("A page request is already in flight")]
    Busy,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RepopageError>;
