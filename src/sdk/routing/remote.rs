use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;

use super::error::{ApiErrorPayload, RoutingError};
use super::route::{Place, Route};
use super::service::RoutingProvider;
use super::types::{DirectionsResponse, GeocodeResponse};
use crate::sdk::geo::LngLat;
use crate::sdk::util::rate_limit::Limiter;

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";
const DRIVING_PROFILE: &str = "mapbox/driving";

pub struct RemoteProvider {
    client: Client,
    access_token: String,
    base_url: String,
    limiter: Arc<Limiter>,
}

impl RemoteProvider {
    pub fn new(access_token: String, limiter: Arc<Limiter>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap(),
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            limiter,
        }
    }

    /// Points the provider at a different host, e.g. a local stub in tests.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl RoutingProvider for RemoteProvider {
    fn forward_geocode(&self, query: &str) -> Result<Vec<Place>, RoutingError> {
        self.limiter.wait();
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json?access_token={}",
            self.base_url, query, self.access_token
        );
        log::debug!("[PROVIDER] Calling remote geocode for query: \"{}\"", query);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(api_error(&status, &text));
        }

        let resp: GeocodeResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse GeocodeResponse. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        Ok(resp
            .features
            .into_iter()
            .map(|f| Place {
                label: f.place_name,
                coord: LngLat::from_pair(f.geometry.coordinates),
            })
            .collect())
    }

    fn directions(&self, start: LngLat, end: LngLat) -> Result<Route, RoutingError> {
        self.limiter.wait();
        log::debug!(
            "[PROVIDER] Calling remote directions for {} -> {}",
            start,
            end
        );
        let url = format!(
            "{}/directions/v5/{}/{};{}?steps=true&geometries=geojson&access_token={}",
            self.base_url, DRIVING_PROFILE, start, end, self.access_token
        );

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(api_error(&status, &text));
        }

        let resp: DirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse DirectionsResponse. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        let body = resp
            .routes
            .into_iter()
            .next()
            .ok_or(RoutingError::NoRoute)?;
        Ok(Route::from(body))
    }
}

fn api_error(status: &reqwest::StatusCode, body: &str) -> RoutingError {
    // Try to parse the structured error first
    if let Ok(payload) = serde_json::from_str::<ApiErrorPayload>(body) {
        RoutingError::ApiError {
            code: payload.code.unwrap_or_else(|| status.as_u16().to_string()),
            message: payload.message,
        }
    } else {
        log::error!(
            "API returned non-success status: {}. Unparseable Body: {}",
            status,
            body
        );
        RoutingError::RawApiError(body.to_string())
    }
}
