use std::sync::Arc;

use axum::{extract::State, Json};
use location_tracker_lib::{messages, LocationRecord, MessageResponse, NewLocation};

use crate::{error::AppError, server_state::ServerState};

pub async fn save_location(
    State(state): State<Arc<ServerState>>,
    Json(location): Json<NewLocation>,
) -> Result<Json<MessageResponse>, AppError> {
    if !location.has_valid_coordinates() {
        tracing::warn!(
            "Rejected location with coordinates {:?}, {:?}",
            location.latitude,
            location.longitude
        );
        return Err(AppError::InvalidCoordinates);
    }

    let record = state
        .data_manager
        .create_location(location)
        .await
        .map_err(|err| {
            tracing::error!("Failed to save location: {err}");
            AppError::SaveFailed
        })?;

    tracing::info!("Saved location {} at {}", record.id, record.timestamp);
    Ok(Json(MessageResponse::new(messages::SAVE_OK)))
}

pub async fn list_locations(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<LocationRecord>>, AppError> {
    state
        .data_manager
        .get_locations()
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!("Failed to list locations: {err}");
            AppError::ListFailed
        })
}

pub async fn clear_locations(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<MessageResponse>, AppError> {
    let removed = state
        .data_manager
        .clear_locations()
        .await
        .map_err(|err| {
            tracing::error!("Failed to clear locations: {err}");
            AppError::ClearFailed
        })?;

    tracing::info!("Cleared {removed} locations");
    Ok(Json(MessageResponse::new(messages::CLEAR_OK)))
}
