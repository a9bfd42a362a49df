use crate::models::domain::ResultItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of POST /search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Echo of how the backend interpreted the query (file vs. URL).
    #[serde(default)]
    pub query: Option<Value>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub items: Vec<ResultItem>,
}

/// Opaque backend status object from GET /health.
///
/// The shape is owned by the backend and rendered as-is; the accessors below
/// only pick out the fields used for the one-line startup indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus(pub Value);

impl HealthStatus {
    pub fn ok(&self) -> Option<bool> {
        self.0.get("ok").and_then(Value::as_bool)
    }

    pub fn indexed(&self) -> Option<u64> {
        self.0.get("indexed").and_then(Value::as_u64)
    }

    /// Short human-readable summary for the startup indicator.
    pub fn summary(&self) -> String {
        let state = match self.ok() {
            Some(true) => "ok",
            Some(false) => "degraded",
            None => "unknown",
        };
        match self.indexed() {
            Some(indexed) => format!("{} ({} products indexed)", state, indexed),
            None => state.to_string(),
        }
    }
}
