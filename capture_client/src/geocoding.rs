use async_trait::async_trait;
use location_tracker_lib::{Coordinates, NewLocation};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_LANGUAGE: &str = "pt-BR";
/// Place name used when the provider knows no road at the position.
pub const UNKNOWN_PLACE: &str = "Local desconhecido";

const USER_AGENT: &str = concat!("capture-client/", env!("CARGO_PKG_VERSION"));

/// Human-readable description of a position.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub country: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub place_name: String,
}

impl Enrichment {
    pub fn apply(self, location: &mut NewLocation) {
        location.country = self.country;
        location.city = self.city;
        location.address = self.address;
        location.place_name = Some(self.place_name);
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoder answered {0}")]
    Status(StatusCode),
    #[error("geocoder response has no address")]
    MissingAddress,
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coordinates: Coordinates) -> Result<Enrichment, GeocodeError>;
}

#[derive(Debug, Deserialize, Default)]
pub struct NominatimResponse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize, Default)]
pub struct NominatimAddress {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
}

impl TryFrom<NominatimResponse> for Enrichment {
    type Error = GeocodeError;

    fn try_from(response: NominatimResponse) -> Result<Self, Self::Error> {
        let address = response.address.ok_or(GeocodeError::MissingAddress)?;

        Ok(Enrichment {
            country: non_empty(address.country),
            city: non_empty(address.city)
                .or_else(|| non_empty(address.town))
                .or_else(|| non_empty(address.village)),
            address: non_empty(response.display_name),
            place_name: non_empty(address.road).unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Reverse geocoding through a Nominatim compatible `/reverse` endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Result<Self, GeocodeError> {
        // Nominatim's usage policy requires an identifying user agent.
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinates: Coordinates) -> Result<Enrichment, GeocodeError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let body: NominatimResponse = response.json().await?;
        Enrichment::try_from(body)
    }
}
