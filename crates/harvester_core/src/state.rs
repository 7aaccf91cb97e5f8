use serde::{Deserialize, Serialize};

use crate::view_model::LoopView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopPhase {
    #[default]
    Scanning,
    Acting,
    Scrolling,
    Recovering,
    Aborted,
    Done,
}

impl LoopPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopPhase::Aborted | LoopPhase::Done)
    }
}

/// Interaction loop bookkeeping. Only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoopState {
    phase: LoopPhase,
    target: u32,
    counted: i64,
    actions: u32,
    scrolls: u32,
    recoveries: u32,
    dirty: bool,
}

impl LoopState {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn counted(&self) -> i64 {
        self.counted
    }

    pub fn view(&self) -> LoopView {
        LoopView {
            phase: self.phase,
            target: self.target,
            counted: self.counted,
            actions: self.actions,
            scrolls: self.scrolls,
            recoveries: self.recoveries,
        }
    }

    /// Returns whether the counter moved since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn target_reached(&self) -> bool {
        self.counted >= i64::from(self.target)
    }

    pub(crate) fn set_phase(&mut self, phase: LoopPhase) {
        self.phase = phase;
    }

    pub(crate) fn record_enact(&mut self, units: i32) {
        self.actions += 1;
        self.counted += i64::from(units);
        self.dirty = true;
    }

    pub(crate) fn record_scroll(&mut self) {
        self.scrolls += 1;
    }

    pub(crate) fn record_recovery(&mut self) {
        self.recoveries += 1;
    }
}
