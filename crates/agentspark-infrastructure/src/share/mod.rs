//! Share-link codec.
//!
//! A share link carries a whole team in its URL fragment:
//! `<base>#share=<base64url>`. Three payload shapes exist:
//!
//! | Shape | Bytes behind the base64url |
//! |-------|----------------------------|
//! | Open (v1/v3) | gzip(payload JSON) |
//! | Legacy password (v2) | gzip(`{"v":2,"pw":true,"data":<XOR-ed payload JSON>}`), or the whole text XOR-ed when `data` is absent |
//! | Password (v3) | gzip(`salt ‖ iv ‖ AES-256-GCM(payload JSON)`) |
//!
//! Decoding tries them in that order.

mod cipher;
mod compression;

pub use cipher::PBKDF2_ITERATIONS;

use agentspark_core::agent::{Agent, FileMap};
use agentspark_core::level::Level;
use agentspark_core::project::ProjectSnapshot;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

pub const SHARE_VERSION: u32 = 3;
const LEGACY_VERSION: u32 = 2;
const FRAGMENT_PREFIX: &str = "#share=";

/// Password scheme of a protected link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareScheme {
    /// v2 XOR obfuscation
    Legacy,
    /// v3 AES-256-GCM
    Strong,
}

impl std::fmt::Display for ShareScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareScheme::Legacy => write!(f, "legacy"),
            ShareScheme::Strong => write!(f, "AES-256-GCM"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// Nothing to import: empty fragment or a team without agents
    #[error("Share link contains no team")]
    Empty,

    #[error("Share link is malformed: {0}")]
    Malformed(String),

    #[error("This team is password protected ({scheme}); a password is required")]
    PasswordRequired { scheme: ShareScheme },

    #[error("Wrong password")]
    WrongPassword,

    #[error("Could not encode share link: {0}")]
    Encode(String),
}

/// Team carried by a share link.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SharePayload {
    #[serde(default)]
    pub v: u32,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub files: FileMap,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub ts: i64,
    /// Whether the link was password protected
    #[serde(default)]
    pub pw: bool,
}

fn default_lang() -> String {
    "en".to_string()
}

impl SharePayload {
    pub fn from_snapshot(snapshot: &ProjectSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            v: SHARE_VERSION,
            topic: snapshot.topic.clone(),
            level: snapshot.level,
            lang: snapshot.lang.clone(),
            agents: snapshot.agents.clone(),
            files: snapshot.files.clone(),
            ts: now.timestamp_millis(),
            pw: false,
        }
    }

    /// Topic to show for the imported team.
    pub fn display_topic(&self) -> &str {
        if self.topic.trim().is_empty() {
            "Shared Team"
        } else {
            &self.topic
        }
    }

    /// Creation time; `None` for links that carried no timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        (self.ts > 0)
            .then(|| DateTime::from_timestamp_millis(self.ts))
            .flatten()
    }
}

fn usable_password(password: Option<&str>) -> Option<&str> {
    password.map(str::trim).filter(|p| !p.is_empty())
}

fn to_json(value: &impl Serialize) -> Result<String, ShareError> {
    serde_json::to_string(value).map_err(|e| ShareError::Encode(e.to_string()))
}

fn gzip_base64(bytes: &[u8]) -> Result<String, ShareError> {
    let compressed = compression::gzip(bytes).map_err(|e| ShareError::Encode(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Encodes `payload` as the part after `#share=`.
///
/// With a non-blank password the payload is AES-GCM encrypted and marked
/// `pw: true`; otherwise it is only compressed.
pub fn encode(payload: &SharePayload, password: Option<&str>) -> Result<String, ShareError> {
    let password = usable_password(password);
    let payload = SharePayload {
        v: SHARE_VERSION,
        pw: password.is_some(),
        ..payload.clone()
    };
    let json = to_json(&payload)?;

    match password {
        Some(password) => gzip_base64(&cipher::seal(json.as_bytes(), password)?),
        None => gzip_base64(json.as_bytes()),
    }
}

/// Encodes in the v2 XOR format. Only used to produce links for older
/// readers and test fixtures.
pub fn encode_legacy(payload: &SharePayload, password: &str) -> Result<String, ShareError> {
    let inner = SharePayload {
        v: LEGACY_VERSION,
        pw: true,
        ..payload.clone()
    };
    let data = cipher::xor_obfuscate(&to_json(&inner)?, password)
        .ok_or_else(|| ShareError::Encode("payload cannot be obfuscated".to_string()))?;
    let envelope = json!({ "v": LEGACY_VERSION, "pw": true, "data": data });
    gzip_base64(to_json(&envelope)?.as_bytes())
}

/// Full share URL for `encoded`.
pub fn share_url(base: &str, encoded: &str) -> String {
    let base = base.split('#').next().unwrap_or(base);
    format!("{base}{FRAGMENT_PREFIX}{encoded}")
}

/// Accepts a full URL, a `#share=...` fragment or the bare encoded part.
fn encoded_part(input: &str) -> &str {
    let input = input.trim();
    match input.find(FRAGMENT_PREFIX) {
        Some(index) => &input[index + FRAGMENT_PREFIX.len()..],
        None => input,
    }
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, ShareError> {
    let normalized: String = encoded
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD
        .decode(normalized)
        .map_err(|e| ShareError::Malformed(format!("invalid base64: {e}")))
}

fn parse_payload(text: &str) -> Result<SharePayload, ShareError> {
    serde_json::from_str(text).map_err(|e| ShareError::Malformed(e.to_string()))
}

/// v2 links: the XOR-ed payload sits in the envelope's `data`. An envelope
/// without `data` is XOR-ed as a whole, the way the old web reader did.
fn decode_legacy(
    text: &str,
    envelope: &Value,
    password: Option<&str>,
) -> Result<SharePayload, ShareError> {
    let password = usable_password(password).ok_or(ShareError::PasswordRequired {
        scheme: ShareScheme::Legacy,
    })?;
    let hidden = envelope.get("data").and_then(Value::as_str).unwrap_or(text);

    cipher::xor_obfuscate(hidden, password)
        .and_then(|plain| serde_json::from_str(&plain).ok())
        .ok_or(ShareError::WrongPassword)
}

fn decode_strong(bytes: &[u8], password: Option<&str>) -> Result<SharePayload, ShareError> {
    let packed = compression::gunzip(bytes).unwrap_or_else(|_| bytes.to_vec());
    let password = usable_password(password).ok_or(ShareError::PasswordRequired {
        scheme: ShareScheme::Strong,
    })?;
    let plaintext = cipher::open(&packed, password)?;
    let text = String::from_utf8(plaintext)
        .map_err(|_| ShareError::Malformed("decrypted payload is not UTF-8".to_string()))?;
    parse_payload(&text)
}

/// Decodes a share link.
///
/// `password` is only consulted for protected links; a protected link
/// without one fails with [`ShareError::PasswordRequired`], so callers can
/// prompt and retry.
pub fn decode(input: &str, password: Option<&str>) -> Result<SharePayload, ShareError> {
    let encoded = encoded_part(input);
    if encoded.is_empty() {
        return Err(ShareError::Empty);
    }
    let bytes = decode_base64(encoded)?;

    let open_json = compression::gunzip(&bytes)
        .ok()
        .and_then(|raw| String::from_utf8(raw).ok())
        .and_then(|text| {
            serde_json::from_str::<Value>(&text)
                .ok()
                .filter(Value::is_object)
                .map(|value| (text, value))
        });

    let payload = match open_json {
        Some((text, value)) if value.get("pw").is_some_and(is_truthy) => {
            decode_legacy(&text, &value, password)?
        }
        Some((_, value)) => {
            serde_json::from_value(value).map_err(|e| ShareError::Malformed(e.to_string()))?
        }
        None => decode_strong(&bytes, password)?,
    };

    if payload.agents.is_empty() {
        return Err(ShareError::Empty);
    }
    Ok(payload)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
