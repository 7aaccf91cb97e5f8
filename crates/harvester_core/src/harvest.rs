//! Pure accumulator behind every list harvest.
//!
//! The engine feeds one batch of rows per poll into [`HarvestState::observe`]
//! and does whatever [`Step`] it gets back. All termination rules live here so
//! they can be exercised without a device.

use std::time::Duration;

use engine_logging::engine_debug;
use serde::{Deserialize, Serialize};

use crate::identity::{Identity, ResultSet, Row};

pub const DEFAULT_MAX_STALLS: u32 = 3;

/// Why a harvest stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationSignal {
    /// The end-of-list marker row was visible.
    SentinelRowSeen,
    /// The last accumulated identity did not change for `max_stalls` polls.
    NoProgress,
    /// The requested amount was collected.
    CountThreshold,
    /// Like `NoProgress`, but the view stopped reporting rows altogether.
    SourceExhausted,
}

impl TerminationSignal {
    /// Stall endings mean the list may be incomplete.
    pub fn is_stall(self) -> bool {
        matches!(
            self,
            TerminationSignal::NoProgress | TerminationSignal::SourceExhausted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestLimits {
    /// `None` harvests everything the list offers.
    pub amount: Option<usize>,
    pub max_stalls: u32,
    /// How long to wait for the first row to show up.
    pub startup_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for HarvestLimits {
    fn default() -> Self {
        Self {
            amount: None,
            max_stalls: DEFAULT_MAX_STALLS,
            startup_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl HarvestLimits {
    pub fn with_amount(amount: usize) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }
}

/// What the runner should do after a batch was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Advance the view and poll again.
    Scroll,
    /// A sentinel was seen: read the view once more, then call [`HarvestState::recapture`].
    Recapture,
    Finish(TerminationSignal),
}

/// Result of one harvest: identities in first-seen order and the reason it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    pub items: Vec<Identity>,
    pub signal: TerminationSignal,
}

impl Harvest {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plain strings, for callers that do not care about the newtype.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Identity::as_str).collect()
    }
}

#[derive(Debug, Clone)]
pub struct HarvestState {
    limits: HarvestLimits,
    found: ResultSet,
    last: Option<Identity>,
    stalls: u32,
    polls: u32,
    finished: Option<TerminationSignal>,
}

impl HarvestState {
    pub fn new(limits: HarvestLimits) -> Self {
        Self {
            limits,
            found: ResultSet::new(),
            last: None,
            stalls: 0,
            polls: 0,
            finished: None,
        }
    }

    pub fn limits(&self) -> &HarvestLimits {
        &self.limits
    }

    pub fn found(&self) -> &ResultSet {
        &self.found
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn stalls(&self) -> u32 {
        self.stalls
    }

    pub fn finished(&self) -> Option<TerminationSignal> {
        self.finished
    }

    /// Absorbs one batch and decides the next step.
    ///
    /// Order of checks: count threshold, sentinel, progress. Once finished,
    /// further batches are ignored.
    pub fn observe(&mut self, batch: Vec<Row>) -> Step {
        if let Some(signal) = self.finished {
            return Step::Finish(signal);
        }
        self.polls += 1;

        let (item_rows, sentinel) = self.absorb(batch);

        if self.amount_reached() {
            return self.finish(TerminationSignal::CountThreshold);
        }
        if sentinel {
            return Step::Recapture;
        }

        let last = self.found.last().cloned();
        if last != self.last {
            self.last = last;
            self.stalls = 0;
            return Step::Scroll;
        }

        self.stalls += 1;
        engine_debug!(
            "harvest stalled ({}/{}) with {} identities",
            self.stalls,
            self.limits.max_stalls,
            self.found.len()
        );
        if self.stalls >= self.limits.max_stalls {
            let signal = if item_rows == 0 {
                TerminationSignal::SourceExhausted
            } else {
                TerminationSignal::NoProgress
            };
            return self.finish(signal);
        }
        Step::Scroll
    }

    /// Absorbs the batch read right after a sentinel sighting and finishes.
    pub fn recapture(&mut self, batch: Vec<Row>) -> TerminationSignal {
        if let Some(signal) = self.finished {
            return signal;
        }
        self.absorb(batch);
        let signal = if self.amount_reached() {
            TerminationSignal::CountThreshold
        } else {
            TerminationSignal::SentinelRowSeen
        };
        self.finished = Some(signal);
        signal
    }

    /// Ends the harvest from the outside, e.g. when the startup wait found nothing.
    pub fn abandon(&mut self, signal: TerminationSignal) {
        if self.finished.is_none() {
            self.finished = Some(signal);
        }
    }

    pub fn into_harvest(self) -> Harvest {
        let mut found = self.found;
        if let Some(amount) = self.limits.amount {
            found.truncate(amount);
        }
        Harvest {
            items: found.into_vec(),
            signal: self.finished.unwrap_or(TerminationSignal::NoProgress),
        }
    }

    fn absorb(&mut self, batch: Vec<Row>) -> (usize, bool) {
        let mut item_rows = 0;
        let mut sentinel = false;
        for row in batch {
            match row {
                Row::Item(identity) => {
                    item_rows += 1;
                    self.found.insert(identity);
                }
                Row::Sentinel => sentinel = true,
            }
        }
        (item_rows, sentinel)
    }

    fn amount_reached(&self) -> bool {
        self.limits
            .amount
            .is_some_and(|amount| self.found.len() >= amount)
    }

    fn finish(&mut self, signal: TerminationSignal) -> Step {
        self.finished = Some(signal);
        Step::Finish(signal)
    }
}
