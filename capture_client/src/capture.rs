use std::sync::Arc;

use location_tracker_lib::NewLocation;

use crate::{
    geocoding::ReverseGeocoder,
    position::PositionProvider,
    store::{LocationStore, StoreError},
};

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Requesting,
    /// Coordinates were obtained. Descriptive fields are `None` when enrichment failed.
    Succeeded(NewLocation),
    /// Message for the visitor. Nothing was looked up or stored.
    Failed(String),
}

/// One capture flow: position, enrichment, submission.
pub struct Capture {
    position: Box<dyn PositionProvider>,
    geocoder: Box<dyn ReverseGeocoder>,
    store: Arc<dyn LocationStore>,
    device_info: Option<String>,
    state: CaptureState,
    submitted: bool,
}

impl Capture {
    pub fn new(
        position: Box<dyn PositionProvider>,
        geocoder: Box<dyn ReverseGeocoder>,
        store: Arc<dyn LocationStore>,
    ) -> Self {
        Self {
            position,
            geocoder,
            store,
            device_info: None,
            state: CaptureState::Idle,
            submitted: false,
        }
    }

    pub fn with_device_info(mut self, device_info: Option<String>) -> Self {
        self.device_info = device_info;
        self
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Whether the last successful capture reached the store.
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub async fn run(&mut self) -> &CaptureState {
        self.state = CaptureState::Requesting;
        self.submitted = false;

        let coordinates = match self.position.current_position().await {
            Ok(coordinates) => coordinates,
            Err(err) => {
                tracing::warn!("Could not obtain position: {err}");
                self.state = CaptureState::Failed(err.user_message().to_string());
                return &self.state;
            }
        };

        let mut location = NewLocation::at(coordinates);
        location.device_info = self.device_info.clone();

        match self.geocoder.reverse(coordinates).await {
            Ok(enrichment) => enrichment.apply(&mut location),
            Err(err) => tracing::warn!(
                "Failed to enrich {}, {}: {err}",
                coordinates.latitude,
                coordinates.longitude
            ),
        }

        self.state = CaptureState::Succeeded(location.clone());

        match self.store.save(location).await {
            Ok(()) => self.submitted = true,
            Err(err) => tracing::error!("Failed to save location: {err}"),
        }

        &self.state
    }
}

/// Stores the fixed Times Square record without any capture.
pub async fn save_simulated(store: &dyn LocationStore) -> Result<NewLocation, StoreError> {
    let location = NewLocation::simulated();
    store.save(location.clone()).await?;
    Ok(location)
}
