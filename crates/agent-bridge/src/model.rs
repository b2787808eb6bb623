use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What an agent reports back once a task is done.
///
/// This is also the on-disk / on-stdout transcript format:
/// `{"visited_urls": [...], "final_result": "..."}`. Unknown fields are kept
/// so they show up in the fallback rendering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(default)]
    pub visited_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_result: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunResult {
    pub fn new(visited_urls: Vec<String>, final_result: Option<String>) -> Self {
        Self {
            visited_urls,
            final_result,
            extra: Map::new(),
        }
    }

    pub fn visited_urls(&self) -> &[String] {
        &self.visited_urls
    }

    /// The agent's answer, or a rendering of the whole result when the agent
    /// produced no answer.
    pub fn final_text(&self) -> String {
        match self.final_result.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn final_text_prefers_explicit_answer() {
        let result = RunResult::new(vec![], Some("Paris.".into()));
        assert_eq!(result.final_text(), "Paris.");
    }

    #[test]
    fn final_text_falls_back_to_whole_result() {
        let result: RunResult = serde_json::from_value(json!({
            "visited_urls": ["https://example.com/"],
            "final_result": "  ",
            "steps": 4
        }))
        .unwrap();

        let text = result.final_text();
        assert!(text.contains("https://example.com/"));
        assert!(text.contains("\"steps\":4"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let result: RunResult = serde_json::from_str("{}").unwrap();
        assert!(result.visited_urls().is_empty());
        assert_eq!(result.final_result, None);
    }
}
