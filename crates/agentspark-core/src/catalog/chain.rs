//! Fallback chain table.

use super::model::ModelConfig;
use crate::error::{Result, SparkError};

/// Ordered fallback chains, keyed by chain tag.
///
/// Chains keep their declaration order; the first entry of a chain is its
/// default primary model.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    chains: Vec<(String, Vec<ModelConfig>)>,
}

impl ModelCatalog {
    /// Builds a catalog from a flat list, grouping by `chain_tag` in order of
    /// first appearance.
    pub fn from_models(models: impl IntoIterator<Item = ModelConfig>) -> Self {
        let mut catalog = Self::default();
        for model in models {
            match catalog
                .chains
                .iter_mut()
                .find(|(tag, _)| *tag == model.chain_tag)
            {
                Some((_, chain)) => chain.push(model),
                None => catalog.chains.push((model.chain_tag.clone(), vec![model])),
            }
        }
        catalog
    }

    /// The chain for `tag`, or an empty slice when unknown.
    pub fn chain(&self, tag: &str) -> &[ModelConfig] {
        self.chains
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, chain)| chain.as_slice())
            .unwrap_or(&[])
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.chains.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelConfig> {
        self.chains.iter().flat_map(|(_, chain)| chain.iter())
    }

    /// Finds a model by id across all chains.
    pub fn find(&self, model_id: &str) -> Option<&ModelConfig> {
        self.models().find(|m| m.model_id == model_id)
    }

    /// Resolves the primary model for a chain.
    ///
    /// With `model_id` the model must exist in that chain; without it the
    /// chain's first entry is used.
    pub fn primary_for(&self, tag: &str, model_id: Option<&str>) -> Result<ModelConfig> {
        let chain = self.chain(tag);
        if chain.is_empty() {
            return Err(SparkError::config(format!("Unknown model chain '{tag}'")));
        }
        match model_id {
            Some(id) => chain.iter().find(|m| m.model_id == id).cloned().ok_or_else(|| {
                SparkError::config(format!("Model '{id}' is not part of chain '{tag}'"))
            }),
            None => Ok(chain[0].clone()),
        }
    }

    /// Attempt order for one logical call: the primary first, then the rest
    /// of its chain without any entry repeating the primary's model id.
    pub fn attempts_for(&self, primary: &ModelConfig) -> Vec<ModelConfig> {
        let mut attempts = vec![primary.clone()];
        attempts.extend(
            self.chain(&primary.chain_tag)
                .iter()
                .filter(|m| m.model_id != primary.model_id)
                .cloned(),
        );
        attempts
    }
}
