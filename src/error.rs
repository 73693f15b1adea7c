//! Error Types
//!
//! Domain errors raised by the fetch, lookup and store layers. Application
//! code wraps these in `anyhow::Error` with context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvMapError {
    /// Upstream API answered with a non-success status
    #[error("{source_name} responded with HTTP {status} for {url}")]
    UpstreamStatus {
        source_name: &'static str,
        url: String,
        status: u16,
    },

    /// Request could not be sent or the body could not be decoded
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// A coordinate lookup file could not be read
    #[error("cannot read coordinate file {path}: {reason}")]
    CoordinateFile { path: String, reason: String },

    #[error("unknown station kind '{0}'")]
    UnknownKind(String),
}

impl EnvMapError {
    pub fn request(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Request {
            url: url.into(),
            reason: err.to_string(),
        }
    }
}

pub type EnvMapResult<T> = std::result::Result<T, EnvMapError>;
