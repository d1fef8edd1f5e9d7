//! Best-effort complexity score for an interview.

use crate::prompts::{self, SCORING_SYSTEM};
use crate::reply::parse_json_object;
use crate::session::SparkSession;
use agentspark_interaction::InferenceOrchestrator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreMetric {
    pub label: String,
    pub value: f64,
    pub color: Option<String>,
}

/// Score returned by the model. Every field is optional; models are loose
/// about the shape.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreReport {
    pub overall_score: Option<f64>,
    pub overall_label: Option<String>,
    pub metrics: Vec<ScoreMetric>,
    pub risks: Vec<Value>,
    pub level_match: Option<Value>,
    pub suggested_level: Option<String>,
}

impl ScoreReport {
    /// Risks as display text; objects contribute their `text` or `title`.
    pub fn risk_texts(&self) -> Vec<String> {
        self.risks
            .iter()
            .filter_map(|risk| match risk {
                Value::String(text) => Some(text.clone()),
                Value::Object(map) => map
                    .get("text")
                    .or_else(|| map.get("title"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

pub struct ScoringDriver {
    orchestrator: Arc<InferenceOrchestrator>,
}

impl ScoringDriver {
    pub fn new(orchestrator: Arc<InferenceOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Scores the session's interview. Any failure yields `None`.
    pub async fn score(&self, session: &SparkSession) -> Option<ScoreReport> {
        let message = match prompts::scoring_user(session) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("[ScoringDriver] Scoring failed: {}", e);
                return None;
            }
        };
        match self
            .orchestrator
            .run_inference_call(SCORING_SYSTEM, &message, Some("Scoring · Complexity analysis"))
            .await
        {
            Ok(raw) => {
                let report = parse_json_object::<ScoreReport>(&raw);
                if report.is_none() {
                    tracing::warn!("[ScoringDriver] Scoring reply was not JSON");
                }
                report
            }
            Err(e) => {
                tracing::warn!("[ScoringDriver] Scoring failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_report_shape() {
        let report: ScoreReport = serde_json::from_value(json!({
            "overallScore": 72,
            "overallLabel": "Complex",
            "metrics": [{ "label": "Integrations", "value": 80, "color": "#f00" }, { "label": "UI" }],
            "risks": ["Payment compliance", { "title": "Offline sync" }, 3],
            "levelMatch": true,
            "suggestedLevel": "pozar"
        }))
        .unwrap();
        assert_eq!(report.overall_score, Some(72.0));
        assert_eq!(report.metrics.len(), 2);
        assert_eq!(report.metrics[1].value, 0.0);
        assert_eq!(report.risk_texts(), vec!["Payment compliance", "Offline sync"]);
        assert_eq!(report.suggested_level.as_deref(), Some("pozar"));
    }
}
