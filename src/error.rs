//! Error types for vastu-match

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failures. Contract violations on the search API panic instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Grid buffer does not match its declared dimensions
    #[error("Invalid grid: {width}x{height} does not match buffer of {len} bytes")]
    InvalidGrid {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Actual buffer length
        len: usize,
    },

    /// Configuration or request value out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Parse error: {0}")]
    Parse(String),
}
