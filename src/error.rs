//! Error types for the countries service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Country not found: {0}")]
    CountryNotFound(u64),

    #[error("Position {position} is out of range (1..={len})")]
    PositionOutOfRange { position: i64, len: usize },

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::CountryNotFound(_) | Error::PositionOutOfRange { .. }
        )
    }
}
