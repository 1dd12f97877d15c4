//! `search_attractions` — attraction search for a location.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::errors::ToolError;
use crate::traits::{HttpClient, Tool, ToolContext};
use crate::travel::BookingConfig;

const MAX_ATTRACTIONS: usize = 10;

/// Searches attractions in a named location.
pub struct AttractionSearchTool {
    http: Arc<dyn HttpClient>,
    config: BookingConfig,
}

impl AttractionSearchTool {
    /// Create the tool with an HTTP client and API config.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, config: BookingConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl Tool for AttractionSearchTool {
    fn name(&self) -> &str {
        "search_attractions"
    }

    fn description(&self) -> &str {
        "Search tourist attractions and activities in a location"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {"type": "string", "description": "City or location name"}
            },
            "required": ["location"]
        })
    }

    fn timeout_ms(&self) -> Option<u64> {
        Some(15_000)
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let location = params
            .get("location")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::validation("location must be a non-empty string"))?;

        let url = format!("{}/api/v1/attraction/searchLocation", self.config.base_url);
        let query = [
            ("query", location.to_owned()),
            ("languagecode", "en-us".to_owned()),
        ];
        let response = self.http.get(&url, &query, &self.config.headers()).await?;
        if response.status != 200 {
            return Err(ToolError::http(format!(
                "attraction search returned status {}",
                response.status
            )));
        }

        let body = response.json()?;
        let products = body
            .pointer("/data/products")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        debug!(count = products.len(), location, "attractions received");

        let titles: Vec<Value> = products
            .iter()
            .take(MAX_ATTRACTIONS)
            .filter_map(|p| p.get("title").cloned())
            .collect();

        let _ = ctx.set("trip.attractions", json!(titles.clone()))?;

        Ok(json!({
            "location": location,
            "resultCount": products.len(),
            "attractions": titles,
        }))
    }
}
