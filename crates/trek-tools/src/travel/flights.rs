//! `search_flights` — round-trip flight search.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::errors::ToolError;
use crate::traits::{HttpClient, Tool, ToolContext};
use crate::travel::BookingConfig;

const MAX_OFFERS: usize = 5;

/// Searches round-trip flights between two airports and records the
/// confirmed trip dates into shared state.
pub struct FlightSearchTool {
    http: Arc<dyn HttpClient>,
    config: BookingConfig,
}

impl FlightSearchTool {
    /// Create the tool with an HTTP client and API config.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, config: BookingConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl Tool for FlightSearchTool {
    fn name(&self) -> &str {
        "search_flights"
    }

    fn description(&self) -> &str {
        "Search round-trip flights between two airports with price and cabin information"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from_id": {"type": "string", "description": "Departure airport code, e.g. 'BLR.AIRPORT'"},
                "to_id": {"type": "string", "description": "Arrival airport code, e.g. 'SIN.AIRPORT'"},
                "depart_date": {"type": "string", "description": "Departure date, YYYY-MM-DD"},
                "return_date": {"type": "string", "description": "Return date, YYYY-MM-DD"},
                "adults": {"type": "integer", "description": "Adult passengers (default 1)"},
                "children": {"type": "string", "description": "Children ages, e.g. '0,17'"},
                "cabin_class": {"type": "string", "description": "ECONOMY, PREMIUM_ECONOMY, BUSINESS, or FIRST"},
                "sort": {"type": "string", "description": "'BEST', 'CHEAPEST', or 'FASTEST'"},
                "currency_code": {"type": "string", "description": "Currency for prices (default USD)"}
            },
            "required": ["from_id", "to_id", "depart_date", "return_date"]
        })
    }

    fn timeout_ms(&self) -> Option<u64> {
        Some(15_000)
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let from_id = required_str(&params, "from_id")?;
        let to_id = required_str(&params, "to_id")?;
        let depart_date = required_str(&params, "depart_date")?;
        let return_date = required_str(&params, "return_date")?;

        let adults = params.get("adults").and_then(Value::as_i64).unwrap_or(1);
        let children = params
            .get("children")
            .and_then(Value::as_str)
            .unwrap_or("0,17");
        let cabin_class = params
            .get("cabin_class")
            .and_then(Value::as_str)
            .unwrap_or("ECONOMY");
        let sort = params.get("sort").and_then(Value::as_str).unwrap_or("BEST");
        let currency = params
            .get("currency_code")
            .and_then(Value::as_str)
            .unwrap_or("USD");

        let url = format!("{}/api/v1/flights/searchFlights", self.config.base_url);
        let query = [
            ("fromId", from_id.to_owned()),
            ("toId", to_id.to_owned()),
            ("departDate", depart_date.to_owned()),
            ("returnDate", return_date.to_owned()),
            ("adults", adults.to_string()),
            ("children", children.to_owned()),
            ("cabinClass", cabin_class.to_owned()),
            ("sort", sort.to_owned()),
            ("currency_code", currency.to_owned()),
        ];

        let response = self
            .http
            .get(&url, &query, &self.config.headers())
            .await?;
        if response.status != 200 {
            return Err(ToolError::http(format!(
                "flight search returned status {}",
                response.status
            )));
        }

        let body = response.json()?;
        let offers = body
            .get("data")
            .and_then(|d| d.get("flightOffers"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        debug!(count = offers.len(), from_id, to_id, "flight offers received");

        let digest: Vec<Value> = offers
            .iter()
            .take(MAX_OFFERS)
            .map(|offer| {
                json!({
                    "price": offer.pointer("/priceBreakdown/total").cloned().unwrap_or(Value::Null),
                    "segments": offer
                        .get("segments")
                        .and_then(Value::as_array)
                        .map_or(0, Vec::len),
                })
            })
            .collect();

        // Confirmed trip facts for later agents to route on.
        let _ = ctx.set("trip.origin", json!(from_id))?;
        let _ = ctx.set("trip.departure_date", json!(depart_date))?;
        let _ = ctx.set("trip.return_date", json!(return_date))?;

        Ok(json!({
            "resultCount": offers.len(),
            "currency": currency,
            "cabinClass": cabin_class,
            "offers": digest,
        }))
    }
}

fn required_str<'a>(params: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    params
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::validation(format!("{name} must be a non-empty string")))
}
