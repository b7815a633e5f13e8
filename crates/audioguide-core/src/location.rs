//! Best-effort reverse geocoding.
//!
//! Enrichment never fails a request: every provider error collapses into
//! [`LocationContext::unavailable`] and the pipeline raises an advisory
//! instead.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(5);
const GEOCODER_USER_AGENT: &str = "AudioGuide/1.0 (audio-guide-app)";

/// Why a reverse lookup produced nothing. Only logged; never reaches a
/// caller of [`LocationProvider::reverse`].
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder returned status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Human-readable surroundings of a coordinate pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationContext {
    pub country: String,
    pub city: String,
    pub street: String,
    pub neighborhood: String,
    pub valid: bool,
}

impl LocationContext {
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Joins the known parts from most to least specific, or `None` when
    /// there is nothing worth putting in a prompt.
    pub fn describe(&self) -> Option<String> {
        if !self.valid {
            return None;
        }
        let parts: Vec<&str> = [
            self.street.as_str(),
            self.neighborhood.as_str(),
            self.city.as_str(),
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Never errors; failures come back as [`LocationContext::unavailable`].
    async fn reverse(&self, latitude: f64, longitude: f64) -> LocationContext;
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: ReverseAddress,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseAddress {
    country: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    road: Option<String>,
    street: Option<String>,
    suburb: Option<String>,
    neighbourhood: Option<String>,
}

fn first_present(candidates: &[&Option<String>]) -> String {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

impl From<ReverseAddress> for LocationContext {
    fn from(addr: ReverseAddress) -> Self {
        LocationContext {
            country: first_present(&[&addr.country]),
            city: first_present(&[&addr.city, &addr.town, &addr.village]),
            street: first_present(&[&addr.road, &addr.street]),
            neighborhood: first_present(&[&addr.suburb, &addr.neighbourhood]),
            valid: true,
        }
    }
}

/// Reverse geocoder speaking the Nominatim `/reverse` protocol.
#[derive(Debug, Clone)]
pub struct NominatimLocator {
    client: Client,
    base_url: String,
}

impl NominatimLocator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<LocationContext, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        debug!("Reverse geocoding ({latitude:.6}, {longitude:.6}) via {url}");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, GEOCODER_USER_AGENT)
            .query(&[
                ("lat", format!("{latitude:.6}")),
                ("lon", format!("{longitude:.6}")),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: ReverseResponse = serde_json::from_str(&body)?;
        Ok(parsed.address.into())
    }
}

#[async_trait]
impl LocationProvider for NominatimLocator {
    async fn reverse(&self, latitude: f64, longitude: f64) -> LocationContext {
        match self.fetch(latitude, longitude).await {
            Ok(context) => context,
            Err(reason) => {
                warn!("Location enrichment unavailable: {reason}");
                LocationContext::unavailable()
            }
        }
    }
}
