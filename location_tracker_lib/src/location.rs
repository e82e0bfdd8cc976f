use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted visitor location, as stored and as listed by the server.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub place_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LocationRecord {
    pub fn new(id: i64, location: NewLocation, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            latitude: location.latitude,
            longitude: location.longitude,
            country: location.country,
            city: location.city,
            address: location.address,
            place_name: location.place_name,
            device_info: location.device_info,
            timestamp,
        }
    }
}

/// Body of a save request. Every field may be missing, and unknown keys are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
}

impl NewLocation {
    /// A record carrying only coordinates, as produced when enrichment fails.
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            latitude: Some(coordinates.latitude),
            longitude: Some(coordinates.longitude),
            ..Default::default()
        }
    }

    /// The fixed record used by the admin "generate location" action.
    pub fn simulated() -> Self {
        Self {
            latitude: Some(40.7128),
            longitude: Some(-74.0060),
            country: Some("Estados Unidos".into()),
            city: Some("Nova York".into()),
            address: Some("Times Square, Nova York, NY, EUA".into()),
            place_name: Some("Times Square".into()),
            device_info: None,
        }
    }

    /// Coordinates that are present must be finite and in degree range.
    pub fn has_valid_coordinates(&self) -> bool {
        let latitude_ok = self.latitude.map_or(true, valid_latitude);
        let longitude_ok = self.longitude.map_or(true, valid_longitude);
        latitude_ok && longitude_ok
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        valid_latitude(self.latitude) && valid_longitude(self.longitude)
    }
}

pub fn valid_latitude(latitude: f64) -> bool {
    latitude.is_finite() && (-90.0..=90.0).contains(&latitude)
}

pub fn valid_longitude(longitude: f64) -> bool {
    longitude.is_finite() && (-180.0..=180.0).contains(&longitude)
}

/// `{ "message": ... }` body returned by every mutating endpoint and by errors.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
