//! Error types for the Galaxy3D render-target engine
//!
//! This module defines the error types used throughout the crate,
//! including attachment validation, device calls, and resource lookups.

use std::fmt;

/// Result type for Galaxy3D render-target operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D render-target errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested attachment set is inconsistent, or the device
    /// reported the framebuffer as incomplete
    InvalidSpecification(String),

    /// A storage was attached at a point whose aspect does not match
    /// the storage's pixel format
    InvalidAttachmentFormat(String),

    /// Backend-specific error (device call failed, lock poisoned, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, renderbuffer, framebuffer)
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSpecification(msg) => write!(f, "Invalid specification: {}", msg),
            Error::InvalidAttachmentFormat(msg) => write!(f, "Invalid attachment format: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an error, logging it at ERROR severity with file:line information
///
/// Without a leading variant the error is a `BackendError`.
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("galaxy3d::fbo::RenderTarget", "no texture at {:?}", point);
/// let err = engine_err!(InvalidSpecification, "galaxy3d::fbo::Validator", "mixed shapes");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return it from the current function
///
/// # Example
///
/// ```ignore
/// engine_bail!(InvalidSpecification, "galaxy3d::fbo::Validator",
///     "{} distinct sample counts", count);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($variant, $source, $($arg)*))
    };
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
