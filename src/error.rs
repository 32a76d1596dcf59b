//! Error types for adoc-highlight

use thiserror::Error;

/// Result type alias for adoc-highlight operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification engine error types
///
/// All variants are configuration-time failures: once a rule table has
/// been built, classification itself cannot fail. A rule finding no
/// further match in a region is a normal negative result, not an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
