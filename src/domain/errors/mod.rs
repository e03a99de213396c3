// Domain errors - Error types for the domain layer

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug)]
pub enum DomainError {
    /// Probing failed for a reason other than malformed input
    #[error("Failed to probe {}: {diagnostic}", path.display())]
    ProbeFailed { path: PathBuf, diagnostic: String },

    /// The file is not a media container the prober understands
    #[error("Not a media container: {}: {diagnostic}", path.display())]
    MalformedContainer { path: PathBuf, diagnostic: String },

    /// A frame extraction capability was requested but no strategy provides it
    #[error("Not implemented: {operation}")]
    NotImplemented { operation: &'static str },

    /// The file has no usable video stream
    #[error("No video stream in {}: {reason}", path.display())]
    NoVideoStream { path: PathBuf, reason: String },

    /// The input directory cannot be listed
    #[error("Cannot read input directory {}: {reason}", path.display())]
    InputDirectory { path: PathBuf, reason: String },

    /// Processing was requested before discovery ran
    #[error("Inputs have not been discovered; call setup() first")]
    NotSetUp,

    /// Decoding a stream failed
    #[error("Failed to decode {}: {reason}", path.display())]
    DecodeFailed { path: PathBuf, reason: String },

    /// Writing an extracted frame failed
    #[error("Failed to write frame {}: {reason}", path.display())]
    FrameWrite { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    /// Whether this error means "not a media file" rather than a real failure
    pub fn is_malformed_container(&self) -> bool {
        matches!(self, DomainError::MalformedContainer { .. })
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;
