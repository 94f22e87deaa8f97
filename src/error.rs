use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportError;

/// Everything that ends a session early. The display text doubles as the
/// message shown to the user.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Specified image path '{path}' is not valid.")]
    InvalidOutputPath {
        path: String,
        #[source]
        source: Option<io::Error>,
    },
    #[error("Specified directory '{}' doesn't exist.", .dir.display())]
    OutputDirectoryMissing { dir: PathBuf },
    #[error("another instance is already running")]
    InstanceAlreadyRunning,
    #[error("Capturing the screen failed: {0}")]
    CaptureFailed(String),
    #[error(transparent)]
    ExportWriteFailed(#[from] ExportError),
    #[error("overlay failed: {0}")]
    Window(String),
}

impl SessionError {
    /// Silent errors are logged but never shown in a dialog.
    pub fn is_silent(&self) -> bool {
        matches!(self, SessionError::InstanceAlreadyRunning)
    }
}
