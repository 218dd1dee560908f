//! # Error Types
//!
//! This module defines error types used throughout the bonqr library.
//!
//! None of the component errors are fatal: a [`LoadError`] drops the
//! application into custom-only mode, a [`RenderError`] leaves the QR
//! display in its placeholder state, and a [`ClipboardError`] leaves the
//! copy label untouched. [`BonqrError`] is what the CLI and server
//! startup report.

use thiserror::Error;

/// Main error type for bonqr operations
#[derive(Debug, Error)]
pub enum BonqrError {
    /// Location source could not be loaded
    #[error("Location error: {0}")]
    Load(#[from] LoadError),

    /// QR rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Clipboard write failed
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Invalid user input or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to obtain the list of known locations.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Local file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote source unreachable
    #[error("cannot fetch {url}: {message}")]
    Unreachable { url: String, message: String },

    /// Remote source answered with a non-success status
    #[error("failed to load locations ({status})")]
    Status { status: u16 },

    /// Source was reachable but its contents are not a valid location list
    #[error("malformed location list: {0}")]
    Malformed(String),
}

/// Failure of the QR rendering collaborator.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Payload does not fit in a QR symbol
    #[error("QR encoding failed: {0}")]
    Encode(String),

    /// Image could not be produced
    #[error("image encoding failed: {0}")]
    Image(String),

    /// The render queue is gone (worker stopped)
    #[error("render queue closed")]
    Closed,
}

/// Failure of the clipboard service.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard command configured
    #[error("no clipboard command configured")]
    NotConfigured,

    /// Clipboard program could not be started or written to
    #[error("clipboard command '{program}' failed: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Clipboard program exited unsuccessfully
    #[error("clipboard command '{program}' exited with {status}")]
    Exit { program: String, status: String },
}
