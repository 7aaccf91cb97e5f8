//! Harvester engine: drives the target app through a [`Device`] and runs the
//! list harvests and interaction loops decided in `harvester_core`.
mod actions;
mod bot;
pub mod catalog;
mod device;
pub mod diagnostics;
mod error;
mod harvest;
mod interact;
mod lists;
mod navigate;
mod pacer;
mod persist;
mod settings;
mod types;

pub use actions::MediaType;
pub use bot::Bot;
pub use device::{Device, ViewHandle};
pub use error::{BotError, SessionWarning};
pub use harvest::{harvest, Extract, ListSource, ScreenList};
pub use interact::{run_bounded, FeedLikes, Interaction};
pub use lists::ProfileCounts;
pub use navigate::FeedTab;
pub use pacer::{Pacer, ThreadPacer};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use settings::{BotSettings, SettingsError, DEFAULT_APP_ID, DEFAULT_EXPECTED_VERSION};
pub use types::{
    AppInfo, Bounds, DriverError, Element, Point, ScrollAxis, ScrollVector, Selector,
    SwipeDirection,
};
