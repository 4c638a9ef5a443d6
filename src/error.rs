//! Central error handling for the label engine.
//!
//! The per-frame pipeline never fails: projection misses, style mismatches
//! and short line segments all degrade to "drop this label for this frame".
//! The error type below covers the diagnostic surface (placement snapshots)
//! where I/O and serialization can genuinely go wrong.

/// Centralized error type for engine operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
