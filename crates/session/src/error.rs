/// Error types for session control
use thiserror::Error;

use crate::core::ReplayError;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The autoplay runtime could not be created
    #[error("failed to start autoplay runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// A recorded game could not be loaded
    #[error(transparent)]
    Replay(#[from] ReplayError),
}
