//! Error types for rgbmap operations.
//!
//! Every failure in the mapping pipeline falls into one of three groups:
//!
//! - **Configuration errors**: a caller supplied something unusable (bad hash
//!   size, unknown algorithm, malformed table, wrong buffer shape, bad channel
//!   order). Setters validate before committing, so the mapper is unchanged.
//! - **Internal-consistency errors**: a generated table came out with the wrong
//!   length. This indicates a bug in a generation loop.
//! - **Index errors**: a single-entry lookup outside `0..=255`.
//!
//! # Usage
//!
//! ```rust
//! use rgbmap_core::{Error, Result};
//!
//! fn check_size(size: usize) -> Result<()> {
//!     if size < 256 {
//!         return Err(Error::InvalidHashSize { size, min: 256, max: 1 << 20 });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_size(100).unwrap_err().is_configuration());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a mapper or mapping pixels.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested hash table size lies outside the permitted range.
    #[error("invalid hash size {size}: must be in {min}..={max}")]
    InvalidHashSize {
        /// Requested size
        size: usize,
        /// Smallest permitted size
        min: usize,
        /// Largest permitted size
        max: usize,
    },

    /// Distribution algorithm name is not one of the known set.
    #[error("invalid hash algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// A numeric parameter is unusable (non-finite, out of range).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A supplied table is malformed (wrong length, values out of range).
    #[error("invalid table: {0}")]
    InvalidTable(String),

    /// Channel order string contains unknown or repeated channels.
    #[error("invalid channel order '{order}': {reason}")]
    InvalidChannelOrder {
        /// The offending order string
        order: String,
        /// What is wrong with it
        reason: String,
    },

    /// Channel is not present in a buffer's channel order.
    #[error("channel '{channel}' not found in order '{order}'")]
    ChannelNotFound {
        /// Requested channel identifier
        channel: char,
        /// Order that was searched
        order: String,
    },

    /// Buffer shape does not match the expected `(rows, cols, depth)`.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected `(rows, cols, depth)`
        expected: (usize, usize, usize),
        /// Supplied `(rows, cols, depth)`
        got: (usize, usize, usize),
    },

    /// Single-entry lookup outside the color array.
    #[error("index {index} out of range 0..={max}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Largest valid index
        max: usize,
    },

    /// A generated table violated its length invariant.
    #[error("internal consistency error: {0}")]
    Internal(String),

    /// Device profile correction failed.
    #[error("profile correction failed: {0}")]
    Profile(String),
}

impl Error {
    /// Creates an [`Error::InvalidChannelOrder`] error.
    #[inline]
    pub fn invalid_order(order: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidChannelOrder {
            order: order.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Internal`] error for a table of the wrong length.
    #[inline]
    pub fn table_length(what: &str, expected: usize, got: usize) -> Self {
        Self::Internal(format!(
            "computed {what} length ({got}) != specified length ({expected})"
        ))
    }

    /// Returns `true` for errors caused by caller-supplied configuration.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidHashSize { .. }
                | Self::UnknownAlgorithm(_)
                | Self::InvalidParameter(_)
                | Self::InvalidTable(_)
                | Self::InvalidChannelOrder { .. }
                | Self::ShapeMismatch { .. }
        )
    }

    /// Returns `true` if a generated table broke its length invariant.
    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_size_message() {
        let err = Error::InvalidHashSize { size: 100, min: 256, max: 1024 };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("256..=1024"));
        assert!(err.is_configuration());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_table_length() {
        let err = Error::table_length("hash table", 65536, 65535);
        assert!(err.is_internal());
        assert!(err.to_string().contains("65535"));
    }

    #[test]
    fn test_classification() {
        assert!(Error::invalid_order("RGX", "unknown channel 'X'").is_configuration());
        assert!(!Error::ChannelNotFound { channel: 'A', order: "RGB".into() }.is_configuration());
        assert!(!Error::IndexOutOfRange { index: 300, max: 255 }.is_configuration());
    }
}
