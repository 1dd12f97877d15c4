//! Travel search tools backed by the booking.com RapidAPI.
//!
//! Three tools cover the trip-planning searches: flights, hotels (a
//! two-step location-then-coordinates search), and attractions. All
//! outbound requests go through the injected [`HttpClient`] so tests run
//! against a local mock server, and each tool records the trip facts it
//! confirms into the session's shared state for later agents to route on.

pub mod attractions;
pub mod flights;
pub mod hotels;

pub use attractions::AttractionSearchTool;
pub use flights::FlightSearchTool;
pub use hotels::HotelSearchTool;

use crate::traits::HttpClient;

/// Connection settings for the booking API.
#[derive(Clone, Debug)]
pub struct BookingConfig {
    /// Base URL of the API (overridden in tests to point at a mock server).
    pub base_url: String,
    /// RapidAPI key sent in the `x-rapidapi-key` header.
    pub api_key: String,
    /// Value of the `x-rapidapi-host` header.
    pub host: String,
}

impl BookingConfig {
    /// Production endpoint with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://booking-com15.p.rapidapi.com".into(),
            api_key: api_key.into(),
            host: "booking-com15.p.rapidapi.com".into(),
        }
    }

    /// Point the config at a different base URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn headers(&self) -> [(&'static str, &str); 2] {
        [
            ("x-rapidapi-host", self.host.as_str()),
            ("x-rapidapi-key", self.api_key.as_str()),
        ]
    }
}

/// Register all travel tools against `registry` with one shared client.
pub fn register_travel_tools(
    registry: &mut crate::registry::ToolRegistry,
    http: std::sync::Arc<dyn HttpClient>,
    config: &BookingConfig,
) {
    registry.register(std::sync::Arc::new(FlightSearchTool::new(
        http.clone(),
        config.clone(),
    )));
    registry.register(std::sync::Arc::new(HotelSearchTool::new(
        http.clone(),
        config.clone(),
    )));
    registry.register(std::sync::Arc::new(AttractionSearchTool::new(
        http,
        config.clone(),
    )));
}
