use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),
    #[error("window '{0}' no longer exists")]
    WindowMissing(&'static str),
    #[error("window manager already started")]
    AlreadyStarted,
    #[error("unknown signal: {0}")]
    UnknownSignal(String),
    #[error("shell dispatcher has stopped")]
    DispatcherStopped,
    #[error("window '{0}' already exists")]
    WindowExists(&'static str),
}

impl ShellError {
    /// Stale handles are treated as already-satisfied by every caller.
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, Self::WindowMissing(_))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean (true/false, 1/0, yes/no), got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}
