use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    model::{Coordinates, WeatherSnapshot},
    resolver::FetchParams,
};

use super::WeatherLookup;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Bound on one lookup; expiry surfaces as a network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current-weather lookup against the OpenWeather API.
///
/// The API key is injected configuration, units are fixed to metric, and the
/// raw payload is validated before it becomes a [`WeatherSnapshot`]: a
/// response missing the temperature, the condition list, or the location
/// label is malformed, never a success with null fields.
#[derive(Debug, Clone)]
pub struct OpenWeatherLookup {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherLookup {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the lookup at a different endpoint. Tests use this to target a
    /// local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        // Construction-time only; the timeout bound must always hold.
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest client");

        Self { api_key, base_url, http }
    }

    fn query_pairs(&self, params: &FetchParams) -> Vec<(&'static str, String)> {
        let mut pairs = match params {
            FetchParams::Coordinates(Coordinates { latitude, longitude }) => vec![
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ],
            FetchParams::City(name) => vec![("q", name.clone())],
        };
        pairs.push(("appid", self.api_key.clone()));
        pairs.push(("units", "metric".to_string()));
        pairs
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherLookup {
    async fn fetch(&self, params: &FetchParams) -> Result<WeatherSnapshot, FetchError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&self.query_pairs(params))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenWeather request failed to send");
                FetchError::LookupNetworkError
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            warn!(error = %e, "Failed to read OpenWeather response body");
            FetchError::LookupNetworkError
        })?;

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "OpenWeather returned an error status");
            return Err(FetchError::LookupHttpError { status });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %truncate_body(&body), "Failed to parse OpenWeather JSON");
            FetchError::LookupMalformedPayload
        })?;

        let snapshot = parsed.into_snapshot()?;
        debug!(
            location = %snapshot.location_label,
            temperature_c = snapshot.temperature_c,
            "lookup succeeded"
        );

        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    /// The well-formedness check: temperature, a non-empty condition list and
    /// a location label must all be present.
    fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        let temperature_c = self
            .main
            .and_then(|m| m.temp)
            .ok_or(FetchError::LookupMalformedPayload)?;

        let condition = self
            .weather
            .into_iter()
            .next()
            .and_then(|w| w.description)
            .filter(|d| !d.is_empty())
            .ok_or(FetchError::LookupMalformedPayload)?;

        let location_label = self
            .name
            .filter(|n| !n.is_empty())
            .ok_or(FetchError::LookupMalformedPayload)?;

        let observation_time = self
            .dt
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        Ok(WeatherSnapshot { temperature_c, condition, location_label, observation_time })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Back off to a char boundary; a multibyte char may straddle MAX.
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}
