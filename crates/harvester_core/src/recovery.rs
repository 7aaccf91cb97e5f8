use serde::{Deserialize, Serialize};

/// Title of the dialog shown once the app starts throttling actions.
pub const RATE_LIMIT_DIALOG_TITLE: &str = "Try Again Later";

/// What to do after an element could not be found mid-loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryVerdict {
    /// A transient miss; keep going.
    Ignore,
    /// A stray click opened another screen; go back once.
    NavigateBack,
    /// The rate limiter engaged; the run must end.
    Abort,
}

/// Markers read from the screen when a miss happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenProbe {
    pub dialog_title: Option<String>,
    pub profile_header: bool,
    pub camera_controls: bool,
    pub top_bar: bool,
    pub feed_container: bool,
}

impl ScreenProbe {
    pub fn shows_rate_limit(&self) -> bool {
        self.dialog_title.as_deref() == Some(RATE_LIMIT_DIALOG_TITLE)
    }

    fn is_off_course(&self) -> bool {
        self.profile_header || self.camera_controls || (self.top_bar && !self.feed_container)
    }
}

/// Classifies a miss. The rate-limit dialog wins over everything else.
pub fn classify(probe: &ScreenProbe) -> RecoveryVerdict {
    if probe.shows_rate_limit() {
        RecoveryVerdict::Abort
    } else if probe.is_off_course() {
        RecoveryVerdict::NavigateBack
    } else {
        RecoveryVerdict::Ignore
    }
}
