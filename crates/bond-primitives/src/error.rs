use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrimitivesError {
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),
    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Encoding error: {0}")]
    EncodingError(String),
    #[error("Decoding error: {0}")]
    DecodingError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Units conversion error: {0}")]
    UnitsError(String),
}

pub type Result<T> = core::result::Result<T, PrimitivesError>;
