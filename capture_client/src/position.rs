use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use async_trait::async_trait;
use location_tracker_lib::Coordinates;
use serde::Deserialize;
use thiserror::Error;

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Por favor, permita o acesso à localização para ver suas coordenadas.";
pub const UNSUPPORTED_MESSAGE: &str = "Geolocalização não é suportada por este dispositivo.";
pub const UNAVAILABLE_MESSAGE: &str = "Não foi possível obter a localização.";

pub const IP_API_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PositionError {
    #[error("permission to read the position was refused")]
    PermissionDenied,
    #[error("no positioning support on this device")]
    Unsupported,
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

impl PositionError {
    /// The fixed text shown to the visitor in place of coordinates.
    pub fn user_message(&self) -> &'static str {
        match self {
            PositionError::PermissionDenied => PERMISSION_DENIED_MESSAGE,
            PositionError::Unsupported => UNSUPPORTED_MESSAGE,
            PositionError::Unavailable(_) => UNAVAILABLE_MESSAGE,
        }
    }
}

/// Source of the device position. May wait indefinitely.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// Coordinates given by the operator.
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        if !self.0.is_valid() {
            return Err(PositionError::Unavailable(format!(
                "{}, {} is not a valid position",
                self.0.latitude, self.0.longitude
            )));
        }
        Ok(self.0)
    }
}

/// A device without any positioning capability.
pub struct NoPosition;

#[async_trait]
impl PositionProvider for NoPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Err(PositionError::Unsupported)
    }
}

/// Approximate position of the public IP address, from an ip-api.com compatible service.
pub struct IpPosition {
    client: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpPosition {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for IpPosition {
    fn default() -> Self {
        Self::new(IP_API_URL)
    }
}

#[async_trait]
impl PositionProvider for IpPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        tracing::debug!("Using IP-based geolocation from {}", self.url);

        let response: IpApiResponse = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| PositionError::Unavailable(err.to_string()))?
            .json()
            .await
            .map_err(|err| PositionError::Unavailable(err.to_string()))?;

        if response.status.as_deref() == Some("fail") {
            return Err(PositionError::Unavailable(
                response.message.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        match (response.lat, response.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(PositionError::Unavailable("response without coordinates".to_string())),
        }
    }
}

/// Asks for permission before the wrapped provider is used. The question runs on the
/// blocking pool, so it may read from a terminal.
pub struct ConsentGate<F> {
    inner: Box<dyn PositionProvider>,
    ask: Arc<F>,
}

impl<F> ConsentGate<F>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    pub fn new(inner: Box<dyn PositionProvider>, ask: F) -> Self {
        Self {
            inner,
            ask: Arc::new(ask),
        }
    }
}

#[async_trait]
impl<F> PositionProvider for ConsentGate<F>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        let ask = self.ask.clone();
        let granted = tokio::task::spawn_blocking(move || ask())
            .await
            .unwrap_or_else(|err| {
                tracing::warn!("Consent question failed: {err}");
                false
            });

        if !granted {
            return Err(PositionError::PermissionDenied);
        }
        self.inner.current_position().await
    }
}

/// Prompts on stderr and reads the answer from stdin. Anything but a yes is a refusal.
pub fn ask_on_terminal() -> bool {
    eprint!("Permitir acesso à sua localização? [s/N] ");
    let _ = io::stderr().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_consent(&answer),
        Err(err) => {
            tracing::warn!("Failed to read consent answer: {err}");
            false
        }
    }
}

pub fn is_consent(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}
