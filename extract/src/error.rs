//! Error types for extraction and configuration.
//!
//! Only structural failures are errors. A field whose anchor is missing
//! resolves to the sentinel and never surfaces here.

use thiserror::Error;

/// Fatal structure errors: the document's defining anchor is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// No `域` table header line in the referrals dump.
    #[error("could not find table header '域' in raw text")]
    MissingTableHeader,

    /// The header was found but no domain-shaped line follows it.
    #[error("no domains found in the table (header at line {header_line})")]
    NoPrimaryRows { header_line: usize },
}

/// Errors loading or validating [`Thresholds`](crate::config::Thresholds).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A threshold is out of range.
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
