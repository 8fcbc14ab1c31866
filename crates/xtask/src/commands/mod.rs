//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check_content;
mod gen_dungeon;
mod read_profile;
mod simulate;

pub use check_content::CheckContent;
pub use gen_dungeon::GenDungeon;
pub use read_profile::ReadProfile;
pub use simulate::Simulate;
