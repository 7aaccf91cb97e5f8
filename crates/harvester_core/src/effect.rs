/// Work the interaction loop asks its runner to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Check the rate-limit dialog, then look for actionable targets.
    Scan,
    EnactOne,
    Scroll,
    /// Random pause between actions.
    Backoff,
    ClassifyFailure,
    NavigateBack,
    /// Stop the whole run; surfaced to the caller as a rate-limit error.
    Abort,
    Finish,
}
