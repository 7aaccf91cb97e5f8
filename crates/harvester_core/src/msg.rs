use crate::RecoveryVerdict;

/// Observations fed into the interaction loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The loop is about to run.
    Started,
    /// The screen was scanned for actionable targets.
    Scanned { actionable: bool },
    /// One enact cycle finished. `units` may be zero, or negative to offset a
    /// sponsored item that was already counted.
    Enacted { units: i32 },
    /// A scroll finished.
    Scrolled,
    /// The driver could not find an element (or timed out waiting for one).
    ElementMissing,
    /// The recovery classifier decided.
    Classified(RecoveryVerdict),
    /// The rate-limit dialog is on screen.
    RateLimitDetected,
}
