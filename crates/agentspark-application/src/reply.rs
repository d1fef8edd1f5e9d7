//! Extraction of structured data from model replies.
//!
//! Models are asked for pure JSON but often wrap it in prose or code
//! fences, so every parser here looks for the outermost `{...}` block
//! instead of parsing the whole reply.

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const UPDATED_TEAM_MARKER: &str = "[UPDATED_TEAM]";
pub const INTERVIEW_COMPLETE_MARKER: &str = "[INTERVIEW_COMPLETE]";

/// Text from the first `{` to the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// First JSON object block in `text`, deserialized as `T`.
pub fn parse_json_object<T: for<'de> Deserialize<'de>>(text: &str) -> Option<T> {
    let block = extract_json_object(text)?;
    match serde_json::from_str(block) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("[ReplyParser] JSON block did not parse: {}", e);
            None
        }
    }
}

/// One multiple-choice answer offered by the interviewer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub impact: Option<String>,
}

impl AnswerOption {
    /// The answer as sent back to the interviewer: `A) <text>`.
    pub fn as_answer(&self) -> String {
        format!("{}) {}", self.label, self.text)
    }
}

/// Parses plain-text options of the form `A) text | IMPACT: consequence`.
///
/// An option runs until the next line that starts with `A)`..`D)` or the
/// end of the reply.
pub fn parse_legacy_options(text: &str) -> Vec<AnswerOption> {
    let (Ok(marker), Ok(next_line), Ok(impact)) = (
        Regex::new(r"([A-D])\)\s*"),
        Regex::new(r"\n[A-D]\)"),
        Regex::new(r"(?i)\s*\|\s*IMPACT:\s*"),
    ) else {
        return Vec::new();
    };

    let mut options = Vec::new();
    let mut cursor = 0;
    while let Some(found) = marker.captures_at(text, cursor) {
        let (Some(whole), Some(label)) = (found.get(0), found.get(1)) else {
            break;
        };
        let body_start = whole.end();
        let body_end = next_line
            .find_at(text, body_start)
            .map(|m| m.start())
            .unwrap_or(text.len());
        cursor = if body_end < text.len() { body_end + 1 } else { text.len() };

        let body = text[body_start..body_end].trim().replace('\n', " ");
        if body.is_empty() {
            continue;
        }
        let mut parts = impact.splitn(&body, 2);
        let option_text = parts.next().unwrap_or_default().trim().to_string();
        let option_impact = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        options.push(AnswerOption {
            label: label.as_str().to_string(),
            text: option_text,
            impact: option_impact,
        });
        if cursor >= text.len() {
            break;
        }
    }
    options
}

/// Text before the first legacy option, i.e. the question itself.
pub fn legacy_question(text: &str) -> String {
    let cut = Regex::new(r"(?m)^\s*[A-D]\)")
        .ok()
        .and_then(|re| re.find(text))
        .map(|m| m.start())
        .unwrap_or(text.len());
    text[..cut].replace(INTERVIEW_COMPLETE_MARKER, "").trim().to_string()
}

/// A refine reply split into its prose summary and its JSON part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineReplyParts<'a> {
    pub summary: String,
    pub json: &'a str,
}

/// Splits on [`UPDATED_TEAM_MARKER`], falling back to the first `{...}`
/// block that mentions `"agents"`.
pub fn split_refine_reply(text: &str) -> Option<RefineReplyParts<'_>> {
    if let Some(idx) = text.find(UPDATED_TEAM_MARKER) {
        let json = extract_json_object(&text[idx + UPDATED_TEAM_MARKER.len()..])?;
        return Some(RefineReplyParts {
            summary: text[..idx].trim().to_string(),
            json,
        });
    }

    let start = text.find('{')?;
    let json = extract_json_object(&text[start..])?;
    if !json.contains("\"agents\"") {
        return None;
    }
    let summary = text[..start].trim();
    Some(RefineReplyParts {
        summary: if summary.is_empty() {
            "Team updated.".to_string()
        } else {
            summary.to_string()
        },
        json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_extract_json_object_spans_first_to_last_brace() {
        let text = "Sure!\n```json\n{\"a\": {\"b\": 1}}\n```";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);

        let value: Value = parse_json_object(text).unwrap();
        assert_eq!(value["a"]["b"], 1);
        assert!(parse_json_object::<Value>("{ not json }").is_none());
    }

    #[test]
    fn test_parse_legacy_options() {
        let text = "Who will use the app?\nA) Bakers | IMPACT: Simple UI\nB) Bakery chains\nwith many shops | impact: Multi-tenant data\nC) Customers\nD)";
        let options = parse_legacy_options(text);
        assert_eq!(
            options,
            vec![
                AnswerOption {
                    label: "A".into(),
                    text: "Bakers".into(),
                    impact: Some("Simple UI".into()),
                },
                AnswerOption {
                    label: "B".into(),
                    text: "Bakery chains with many shops".into(),
                    impact: Some("Multi-tenant data".into()),
                },
                AnswerOption {
                    label: "C".into(),
                    text: "Customers".into(),
                    impact: None,
                },
            ]
        );
        assert_eq!(options[1].as_answer(), "B) Bakery chains with many shops");
        assert_eq!(legacy_question(text), "Who will use the app?");
    }

    #[test]
    fn test_parse_legacy_options_none() {
        assert!(parse_legacy_options("Tell me more about your idea.").is_empty());
        assert_eq!(
            legacy_question("All set. [INTERVIEW_COMPLETE]"),
            "All set."
        );
    }

    #[test]
    fn test_split_refine_reply_on_marker() {
        let text = "+QA Engineer joins the team.\n[UPDATED_TEAM]\n{\"agents\": []}";
        let parts = split_refine_reply(text).unwrap();
        assert_eq!(parts.summary, "+QA Engineer joins the team.");
        assert_eq!(parts.json, "{\"agents\": []}");
    }

    #[test]
    fn test_split_refine_reply_without_marker() {
        let parts = split_refine_reply("~PM tweaked {\"agents\": [], \"teamConfig\": \"x\"}").unwrap();
        assert_eq!(parts.summary, "~PM tweaked");

        let parts = split_refine_reply("{\"agents\": []}").unwrap();
        assert_eq!(parts.summary, "Team updated.");

        assert!(split_refine_reply("{\"team\": []}").is_none());
        assert!(split_refine_reply("I could not do that.").is_none());
    }
}
