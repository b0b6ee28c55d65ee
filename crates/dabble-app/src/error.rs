//! Application errors.

use thiserror::Error;

/// Errors surfaced by the application shell.
#[derive(Debug, Error)]
pub enum AppError {
    /// The window, which is our drawing context, could not be created or
    /// refreshed.
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}
