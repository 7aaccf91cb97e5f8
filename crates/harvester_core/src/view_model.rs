use std::fmt;

use crate::LoopPhase;

/// Read-only snapshot of an interaction loop, also returned as the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopView {
    pub phase: LoopPhase,
    pub target: u32,
    /// Net count after sponsored offsets; can exceed `target` by the last batch.
    pub counted: i64,
    /// Enact cycles performed, including ones that were later offset.
    pub actions: u32,
    pub scrolls: u32,
    pub recoveries: u32,
}

impl LoopView {
    pub fn completed(&self) -> bool {
        self.phase == LoopPhase::Done
    }
}

impl fmt::Display for LoopView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.counted, self.target)
    }
}
