//! Countries - minimal in-memory HTTP API for country records

pub mod config;
pub mod error;
pub mod types;

pub mod store;
pub mod api;

pub use config::{Config, LookupMode};
pub use error::{Error, Result};
pub use types::*;
