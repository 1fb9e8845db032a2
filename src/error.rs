use std::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VttError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parser error: {0}")]
    Parser(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("pipeline error: {0}")]
    Pipeline(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("parse int error: {0}")]
    ParseInt(#[from] ParseIntError),
}

impl From<toml::de::Error> for VttError {
    fn from(e: toml::de::Error) -> Self {
        VttError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VttError>;
