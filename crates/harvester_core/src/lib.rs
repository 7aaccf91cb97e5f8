//! Harvester core: pure list-harvest accumulator, interaction-loop state
//! machine and the small helpers both share. No device access lives here.
pub mod count;
mod effect;
mod harvest;
mod identity;
pub mod link;
mod msg;
mod pacing;
mod recovery;
mod state;
mod update;
mod view_model;

pub use count::{parse_count, ParseCountError};
pub use effect::Effect;
pub use harvest::{
    Harvest, HarvestLimits, HarvestState, Step, TerminationSignal, DEFAULT_MAX_STALLS,
};
pub use identity::{Identity, ResultSet, Row};
pub use link::LinkError;
pub use msg::Msg;
pub use pacing::Pacing;
pub use recovery::{classify, RecoveryVerdict, ScreenProbe, RATE_LIMIT_DIALOG_TITLE};
pub use state::{LoopPhase, LoopState};
pub use update::update;
pub use view_model::LoopView;
