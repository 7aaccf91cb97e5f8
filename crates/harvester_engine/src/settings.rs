use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use harvester_core::{HarvestLimits, Pacing, DEFAULT_MAX_STALLS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_APP_ID: &str = "com.instagram.android";
/// App build the selectors were written against.
pub const DEFAULT_EXPECTED_VERSION: &str = "158.0.0.30.123";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(String),
    #[error("could not serialize settings: {0}")]
    Serialize(String),
}

/// Run configuration. Every field has a default, so a settings file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotSettings {
    pub app_id: String,
    /// A different installed version only logs a warning.
    pub expected_version: String,
    /// How long a click waits for its target.
    pub element_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// How long a harvest waits for the first row.
    pub startup_timeout_ms: u64,
    /// Consecutive polls without progress before a harvest gives up.
    pub max_stalls: u32,
    /// Fewer visible rows than this and there is nothing to scroll over.
    pub min_scroll_rows: usize,
    /// Generic settle pause after navigation.
    pub idle_pause: Pacing,
    /// Pause after each like.
    pub like_pause: Pacing,
    /// Pause before pressing "Retry" on a list that failed to load.
    pub retry_pause_ms: u64,
    /// How long to wait for a hashtag/location tab to show up.
    pub tab_timeout_ms: u64,
    /// Where fatal-error captures go; `None` disables them.
    pub diagnostics_dir: Option<PathBuf>,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            expected_version: DEFAULT_EXPECTED_VERSION.to_string(),
            element_timeout_ms: 10_000,
            poll_interval_ms: 1_000,
            startup_timeout_ms: 30_000,
            max_stalls: DEFAULT_MAX_STALLS,
            min_scroll_rows: 2,
            idle_pause: Pacing::new(1_000, 3_000),
            like_pause: Pacing::new(3_000, 5_000),
            retry_pause_ms: 10_000,
            tab_timeout_ms: 30_000,
            diagnostics_dir: None,
        }
    }
}

impl BotSettings {
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        ron::from_str(text).map_err(|err| SettingsError::Parse(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .map_err(|err| SettingsError::Serialize(err.to_string()))
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }

    pub fn tab_timeout(&self) -> Duration {
        Duration::from_millis(self.tab_timeout_ms)
    }

    /// Harvest limits for a list operation; `amount` of `None` means everything.
    pub fn harvest_limits(&self, amount: Option<usize>) -> HarvestLimits {
        HarvestLimits {
            amount,
            max_stalls: self.max_stalls.max(1),
            startup_timeout: Duration::from_millis(self.startup_timeout_ms),
            poll_interval: self.poll_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BotSettings, SettingsError};

    #[test]
    fn partial_file_keeps_defaults() {
        let settings =
            BotSettings::from_ron_str("(max_stalls: 5, like_pause: (min_ms: 5000, max_ms: 10000))")
                .unwrap();
        assert_eq!(settings.max_stalls, 5);
        assert_eq!(settings.like_pause.max_ms, 10_000);
        assert_eq!(settings.app_id, "com.instagram.android");
        assert_eq!(settings.diagnostics_dir, None);
    }

    #[test]
    fn round_trips_through_ron() {
        let settings = BotSettings {
            diagnostics_dir: Some("log".into()),
            ..BotSettings::default()
        };
        let text = settings.to_ron_string().unwrap();
        assert_eq!(BotSettings::from_ron_str(&text).unwrap(), settings);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            BotSettings::from_ron_str("(colour: 3)"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn serialize_failures_have_their_own_message() {
        let err = SettingsError::Serialize("bad float".to_string());
        assert_eq!(err.to_string(), "could not serialize settings: bad float");
    }
}
