//! Session Management: state machine, attempt log, statistics, and reveal
//!
//! # Components
//! - `state.rs`: Session state machine (idle → running → scored)
//! - `store.rs`: Attempt records and persisted history with retention
//! - `stats.rs`: derived accuracy and latency figures
//! - `reveal.rs`: timed reveal scheduler for the flash drill

pub mod reveal;
pub mod state;
pub mod stats;
pub mod store;

pub use reveal::RevealScheduler;
pub use state::{Feedback, Session};
pub use store::{AttemptLog, JsonFileStorage};

#[allow(unused_imports)]
pub use stats::SessionStats;
#[allow(unused_imports)]
pub use store::{Attempt, AttemptStorage, MemoryStorage};
