//! `search_hotels` — two-step hotel search: location coordinates, then
//! hotels around those coordinates.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::errors::ToolError;
use crate::traits::{HttpClient, Tool, ToolContext};
use crate::travel::BookingConfig;

const MAX_HOTELS: usize = 10;

/// Searches hotels in a named location and records the confirmed
/// destination into shared state.
pub struct HotelSearchTool {
    http: Arc<dyn HttpClient>,
    config: BookingConfig,
}

impl HotelSearchTool {
    /// Create the tool with an HTTP client and API config.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, config: BookingConfig) -> Self {
        Self { http, config }
    }

    async fn coordinates(&self, location: &str) -> Result<Option<(f64, f64)>, ToolError> {
        let url = format!("{}/api/v1/hotels/searchDestination", self.config.base_url);
        let query = [("query", location.to_owned())];
        let response = self.http.get(&url, &query, &self.config.headers()).await?;
        if response.status != 200 {
            return Err(ToolError::http(format!(
                "location search returned status {}",
                response.status
            )));
        }

        let body = response.json()?;
        let Some(first) = body
            .get("data")
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
        else {
            return Ok(None);
        };

        let lat = first.pointer("/geometry/location/lat").and_then(Value::as_f64);
        let lng = first.pointer("/geometry/location/lng").and_then(Value::as_f64);
        Ok(lat.zip(lng))
    }
}

#[async_trait]
impl Tool for HotelSearchTool {
    fn name(&self) -> &str {
        "search_hotels"
    }

    fn description(&self) -> &str {
        "Search hotels in a location with price, rating, and distance-to-centre information"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {"type": "string", "description": "City or location name"},
                "adults": {"type": "integer", "description": "Number of adults (default 1)"},
                "children_age": {"type": "string", "description": "Ages of children, e.g. '0,17'"},
                "room_qty": {"type": "integer", "description": "Number of rooms (default 1)"},
                "currency_code": {"type": "string", "description": "Currency for prices (default EUR)"}
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

        let adults = params.get("adults").and_then(Value::as_i64).unwrap_or(1);
        let children_age = params
            .get("children_age")
            .and_then(Value::as_str)
            .unwrap_or("0,17");
        let room_qty = params.get("room_qty").and_then(Value::as_i64).unwrap_or(1);
        let currency = params
            .get("currency_code")
            .and_then(Value::as_str)
            .unwrap_or("EUR");

        let Some((latitude, longitude)) = self.coordinates(location).await? else {
            return Ok(json!({
                "location": location,
                "hotels": [],
                "message": format!("could not find coordinates for location: {location}"),
            }));
        };
        debug!(location, latitude, longitude, "location resolved");

        let url = format!(
            "{}/api/v1/hotels/searchHotelsByCoordinates",
            self.config.base_url
        );
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("adults", adults.to_string()),
            ("children_age", children_age.to_owned()),
            ("room_qty", room_qty.to_string()),
            ("currency_code", currency.to_owned()),
        ];
        let response = self.http.get(&url, &query, &self.config.headers()).await?;
        if response.status != 200 {
            return Err(ToolError::http(format!(
                "hotel search returned status {}",
                response.status
            )));
        }

        let body = response.json()?;
        let results = body
            .pointer("/data/result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        debug!(count = results.len(), location, "hotels received");

        let hotels: Vec<Value> = results
            .iter()
            .take(MAX_HOTELS)
            .map(|hotel| {
                json!({
                    "name": hotel.get("hotel_name").cloned().unwrap_or(Value::Null),
                    "reviewScore": hotel.get("review_score").cloned().unwrap_or(Value::Null),
                    "reviewWord": hotel.get("review_score_word").cloned().unwrap_or(Value::Null),
                    "price": hotel.get("min_total_price").cloned().unwrap_or(Value::Null),
                    "currency": currency,
                    "distanceToCentreKm": hotel.get("distance_to_cc").cloned().unwrap_or(Value::Null),
                    "address": hotel.get("address").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        // The searched location is the best destination fact we have.
        let _ = ctx.set("trip.destination", json!(location))?;

        Ok(json!({
            "location": location,
            "resultCount": results.len(),
            "hotels": hotels,
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use trek_core::{SessionId, ToolCallId};
    use trek_state::SharedState;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::providers::ReqwestHttpClient;

    fn make_tool(base_url: &str) -> HotelSearchTool {
        HotelSearchTool::new(
            Arc::new(ReqwestHttpClient::new()),
            BookingConfig::new("test-key").with_base_url(base_url),
        )
    }

    fn make_ctx(state: SharedState) -> ToolContext {
        ToolContext::new(
            ToolCallId::new(),
            SessionId::new(),
            Some("hotels".into()),
            state,
            CancellationToken::new(),
        )
    }

    async fn mount_location(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/hotels/searchDestination"))
            .and(query_param("query", "Singapore"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"geometry": {"location": {"lat": 1.29, "lng": 103.85}}}
                ]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn two_step_search_digests_top_hotels() {
        let server = MockServer::start().await;
        mount_location(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v1/hotels/searchHotelsByCoordinates"))
            .and(query_param("latitude", "1.29"))
            .and(query_param("longitude", "103.85"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "result": [
                        {
                            "hotel_name": "Marina Bay Sands",
                            "review_score": 9.1,
                            "review_score_word": "Superb",
                            "min_total_price": 450.0,
                            "distance_to_cc": 0.4,
                            "address": "10 Bayfront Avenue"
                        },
                        {
                            "hotel_name": "Raffles",
                            "review_score": 9.4,
                            "review_score_word": "Exceptional",
                            "min_total_price": 780.0,
                            "distance_to_cc": 1.1,
                            "address": "1 Beach Road"
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let tool = make_tool(&server.uri());
        let state = SharedState::new();
        let result = tool
            .execute(json!({"location": "Singapore"}), &make_ctx(state.clone()))
            .await
            .unwrap();

        assert_eq!(result["resultCount"], 2);
        assert_eq!(result["hotels"][0]["name"], "Marina Bay Sands");
        assert_eq!(result["hotels"][0]["reviewScore"], 9.1);
        assert_eq!(result["hotels"][1]["address"], "1 Beach Road");
        assert_eq!(state.get("trip.destination"), Some(json!("Singapore")));
    }

    #[tokio::test]
    async fn unknown_location_returns_empty_digest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/hotels/searchDestination"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let tool = make_tool(&server.uri());
        let state = SharedState::new();
        let result = tool
            .execute(json!({"location": "Atlantis"}), &make_ctx(state.clone()))
            .await
            .unwrap();

        assert_eq!(result["hotels"].as_array().unwrap().len(), 0);
        assert!(
            result["message"]
                .as_str()
                .unwrap()
                .contains("could not find coordinates")
        );
        // No destination fact recorded for a location we couldn't resolve.
        assert!(state.get("trip.destination").is_none());
    }

    #[tokio::test]
    async fn upstream_error_is_http_failure() {
        let server = MockServer::start().await;
        mount_location(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v1/hotels/searchHotelsByCoordinates"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tool = make_tool(&server.uri());
        let err = tool
            .execute(json!({"location": "Singapore"}), &make_ctx(SharedState::new()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn missing_location_rejected() {
        let tool = make_tool("http://127.0.0.1:1");
        let err = tool
            .execute(json!({}), &make_ctx(SharedState::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }
}
