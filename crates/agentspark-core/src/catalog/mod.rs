//! Model configurations and fallback chains.

pub mod chain;
pub mod model;

pub use chain::ModelCatalog;
pub use model::{ModelConfig, Provider};
