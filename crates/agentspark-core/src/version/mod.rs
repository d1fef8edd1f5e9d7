//! Version history of generated teams.
//!
//! A [`VersionStore`] holds an ordered list of immutable [`Version`]
//! snapshots. Version 1 is always the origin (first generation or an
//! imported team); every later version carries a diff against its
//! predecessor.

pub mod diff;
pub mod model;
pub mod store;

pub use diff::{AgentDiff, agent_names, diff_agents};
pub use model::{TeamSnapshot, Version, VersionDiff};
pub use store::VersionStore;
