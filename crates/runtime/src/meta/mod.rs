//! Meta-progression: the profile that survives between runs.
//!
//! ```text
//! MetaStore::load → MetaProgress → Loadout::build → Run::start
//!                         ↑                              ↓
//!                 MetaProgress::record_run ← RunSummary ← Run::finish
//! ```
mod loadout;
mod progress;
mod store;

pub use loadout::Loadout;
pub use progress::{MetaProgress, ProgressGain};
pub use store::{JsonFileStore, MemoryStore, MetaStore};
