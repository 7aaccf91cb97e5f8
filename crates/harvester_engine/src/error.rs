use thiserror::Error;

use crate::persist::PersistError;
use crate::settings::SettingsError;
use crate::types::DriverError;
use harvester_core::{LinkError, ParseCountError};

/// Everything a bot operation can fail with.
///
/// Transient driver misses never get this far from inside a harvest or the
/// like loop; they show up here only when a navigation step could not
/// complete.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("{app_id} is not installed on the device")]
    TargetNotInstalled { app_id: String },
    #[error("the session was logged out; log back in before running again")]
    SessionLoggedOut,
    #[error("rate limited (\"Try Again Later\"); stop and let the account cool down")]
    RateLimited,
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error("unreadable counter on screen: {0}")]
    Count(#[from] ParseCountError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("could not write diagnostics: {0}")]
    Persist(#[from] PersistError),
}

impl BotError {
    /// Fatal errors end the run; the rest only fail the current operation.
    pub fn is_fatal(&self) -> bool {
        match self {
            BotError::TargetNotInstalled { .. }
            | BotError::SessionLoggedOut
            | BotError::RateLimited => true,
            BotError::Driver(err) => !err.is_transient(),
            BotError::Link(_)
            | BotError::Count(_)
            | BotError::Settings(_)
            | BotError::Persist(_) => false,
        }
    }
}

/// Conditions worth telling the user about that do not stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWarning {
    VersionMismatch { expected: String, found: String },
}
