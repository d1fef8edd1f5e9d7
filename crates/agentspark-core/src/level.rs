//! Project complexity levels.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How ambitious the planned application is. Drives interview length and
/// team size.
#[derive(
    Deserialize,
    Serialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Level {
    /// Simple MVP
    #[default]
    Iskra,
    /// Full-featured app
    Plomien,
    /// Complex system
    Pozar,
    /// Enterprise grade
    Inferno,
}

impl Level {
    pub fn display_name(&self) -> &'static str {
        match self {
            Level::Iskra => "Spark",
            Level::Plomien => "Flame",
            Level::Pozar => "Fire",
            Level::Inferno => "Inferno",
        }
    }

    /// Number of interview questions for this level.
    pub fn questions(&self) -> u32 {
        match self {
            Level::Iskra => 4,
            Level::Plomien => 5,
            Level::Pozar => 6,
            Level::Inferno => 7,
        }
    }

    /// Team size range, as shown to the model.
    pub fn agent_count(&self) -> &'static str {
        match self {
            Level::Iskra => "2-3",
            Level::Plomien => "3-4",
            Level::Pozar => "4-5",
            Level::Inferno => "5-6",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Level::Iskra => "core features, simplicity, ease of use",
            Level::Plomien => "features, integrations, user flows, basic tech stack",
            Level::Pozar => "architecture, scalability, security, APIs, data models",
            Level::Inferno => {
                "microservices, DevOps, security, compliance, scalability, multi-tenant architecture"
            }
        }
    }
}
