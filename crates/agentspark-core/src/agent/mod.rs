//! Generated agent records.

pub mod model;

pub use model::{Agent, AgentType, FileMap, agent_file_name, skill_file_name};
