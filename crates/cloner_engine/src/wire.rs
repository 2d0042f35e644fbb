//! JSON bodies exchanged with the cloning backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when a failed response carries no usable text.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

#[derive(Debug, Serialize)]
pub(crate) struct ScrapeRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScrapeResponse {
    pub raw_html: String,
    pub raw_html_path: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub raw_html_path: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub generated_html: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditRequest<'a> {
    pub html_content: &'a str,
    pub instruction: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EditResponse {
    pub edited_html: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatestScrapedResponse {
    #[serde(default)]
    pub latest_scraped_path: Option<String>,
}

/// Extracts the user-facing message from a failed response.
///
/// JSON bodies are searched for `detail`, `message`, then `error`; anything
/// else is returned verbatim.
pub fn error_message(content_type: Option<&str>, body: &str) -> String {
    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    if is_json {
        if let Some(message) = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(message_from_json)
        {
            return message;
        }
    }
    if body.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        body.to_string()
    }
}

fn message_from_json(value: &Value) -> Option<String> {
    for key in ["detail", "message", "error"] {
        match value.get(key) {
            Some(Value::String(text)) if !text.trim().is_empty() => return Some(text.clone()),
            // FastAPI validation errors: [{"loc": [...], "msg": "...", ...}]
            Some(Value::Array(items)) => {
                let parts: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str).or(item.as_str()))
                    .collect();
                if !parts.is_empty() {
                    return Some(parts.join("; "));
                }
            }
            Some(nested @ Value::Object(_)) => {
                if let Some(text) = message_from_json(nested) {
                    return Some(text);
                }
            }
            _ => {}
        }
    }
    None
}
