//! Environment-driven shell configuration.
//!
//! Window geometry is fixed (see `windows::WindowSpec`); only ambient knobs
//! live here. Values come from the process environment after `.env` has been
//! loaded by `load_dotenv`.

use crate::error::ConfigError;

const LOG_VAR: &str = "CLARIIMEET_LOG";
const QUIT_VAR: &str = "CLARIIMEET_QUIT_ON_LAST_WINDOW";
const DEFAULT_LOG_FILTER: &str = "info";

/// What happens when the last window goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitPolicy {
    /// Terminate the process.
    QuitOnLastWindow,
    /// Keep the process alive without windows (macOS convention).
    StayResident,
}

/// Outcome of `on_exit_requested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Quit,
    StayResident,
}

impl QuitPolicy {
    pub fn for_platform() -> Self {
        if cfg!(target_os = "macos") {
            Self::StayResident
        } else {
            Self::QuitOnLastWindow
        }
    }

    pub fn decide(self) -> ExitDecision {
        match self {
            Self::QuitOnLastWindow => ExitDecision::Quit,
            Self::StayResident => ExitDecision::StayResident,
        }
    }
}

impl Default for QuitPolicy {
    fn default() -> Self {
        Self::for_platform()
    }
}

/// Decide an exit request from the run loop. An explicit exit code comes
/// from `AppHandle::exit` and always quits; without one the last window went
/// away and the policy applies.
pub fn on_exit_requested(code: Option<i32>, policy: QuitPolicy) -> ExitDecision {
    match code {
        Some(_) => ExitDecision::Quit,
        None => policy.decide(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub log_filter: String,
    pub quit_policy: QuitPolicy,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            quit_policy: QuitPolicy::for_platform(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(LOG_VAR) {
            if !filter.trim().is_empty() {
                config.log_filter = filter.trim().to_string();
            }
        }

        if let Some(raw) = lookup(QUIT_VAR) {
            if !raw.trim().is_empty() {
                config.quit_policy = if parse_bool(QUIT_VAR, &raw)? {
                    QuitPolicy::QuitOnLastWindow
                } else {
                    QuitPolicy::StayResident
                };
            }
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

/// Load `.env` from the working directory, falling back to the repo root
/// when launched from `src-tauri/` during development.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_filename("../.env");
    }
}
