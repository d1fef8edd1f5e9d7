//! Application layer of AgentSpark.
//!
//! Drivers turn a session into prompts, run them through the fallback
//! orchestrator and fold the replies back into the session: the interview,
//! team generation, refinement and scoring. [`ProjectUseCase`] persists
//! sessions and handles share links and exports.

pub mod error;
pub mod generation;
pub mod interview;
pub mod project_usecase;
pub mod prompts;
pub mod refinement;
pub mod reply;
pub mod scoring;
pub mod services;
pub mod session;
pub mod team_files;

pub use error::{AppError, Result};
pub use generation::GenerationDriver;
pub use interview::{InterviewDriver, InterviewQuestion, InterviewStep};
pub use project_usecase::{ProjectUseCase, VersionComparison};
pub use refinement::{PendingRefinement, RefineAction, RefinementDriver};
pub use reply::AnswerOption;
pub use scoring::{ScoreMetric, ScoreReport, ScoringDriver};
pub use services::{SparkServices, build_orchestrator};
pub use session::SparkSession;
