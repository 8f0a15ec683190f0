//! Place search against a Nominatim-compatible endpoint.

use geoscribe_geo::DecodeError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::ApiError;
use crate::config::GeocoderConfig;
use crate::error::ValidationError;

/// Search text that passed the minimum length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery(String);

impl GeocodeQuery {
    pub fn new(text: &str, min_len: usize) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.chars().count() < min_len {
            return Err(ValidationError::QueryTooShort { min: min_len });
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One search hit. Nominatim sends coordinates as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub display_name: String,
    pub lon: String,
    pub lat: String,
    #[serde(default)]
    pub place_id: u64,
}

impl GeocodeResult {
    /// `(lon, lat)` in degrees.
    pub fn coordinate(&self) -> Result<(f64, f64), DecodeError> {
        Ok((parse_degrees(&self.lon)?, parse_degrees(&self.lat)?))
    }
}

fn parse_degrees(text: &str) -> Result<f64, DecodeError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| DecodeError::invalid_number(text))?;
    if !value.is_finite() {
        return Err(DecodeError::non_finite(value));
    }
    Ok(value)
}

/// `{endpoint}?format=json&q=..&countrycodes=..&limit=..`
pub fn search_url(config: &GeocoderConfig, query: &GeocodeQuery) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&config.endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("format", "json");
        pairs.append_pair("q", query.as_str());
        if !config.country_codes.is_empty() {
            pairs.append_pair("countrycodes", &config.country_codes);
        }
        pairs.append_pair("limit", &config.limit.to_string());
    }
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    config: GeocoderConfig,
}

impl NominatimClient {
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Results in service order, at most `limit` of them.
    pub async fn search(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeResult>, ApiError> {
        let url = search_url(&self.config, query).map_err(ApiError::transport)?;
        log::debug!("🔎 Geocoding '{}'", query.as_str());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ApiError::transport)?;
        let results: Vec<GeocodeResult> = response.json().await.map_err(ApiError::transport)?;

        Ok(truncate(results, self.config.limit))
    }
}

pub fn truncate(mut results: Vec<GeocodeResult>, limit: usize) -> Vec<GeocodeResult> {
    results.truncate(limit);
    results
}
