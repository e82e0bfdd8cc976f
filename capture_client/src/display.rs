use chrono::Local;
use location_tracker_lib::{LocationRecord, NewLocation};

use crate::capture::CaptureState;

pub const NO_CITY: &str = "Cidade não disponível";
pub const NO_COUNTRY: &str = "País não disponível";
pub const NO_ADDRESS: &str = "Endereço não disponível";
pub const NO_PLACE_NAME: &str = "Nome do lugar não disponível";
pub const NO_LATITUDE: &str = "Latitude não disponível";
pub const NO_LONGITUDE: &str = "Longitude não disponível";
pub const NO_RECORDS: &str = "Sem localizações salvas ainda.";
pub const REQUESTING: &str = "Obtendo localização...";

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value.as_deref().unwrap_or(placeholder)
}

fn degrees(value: Option<f64>, placeholder: &str) -> String {
    match value {
        Some(value) => format!("{value:.6}"),
        None => placeholder.to_string(),
    }
}

pub fn render_capture(state: &CaptureState) -> String {
    match state {
        CaptureState::Idle => String::new(),
        CaptureState::Requesting => REQUESTING.to_string(),
        CaptureState::Failed(message) => message.clone(),
        CaptureState::Succeeded(location) => render_location(location),
    }
}

fn render_location(location: &NewLocation) -> String {
    [
        format!("Latitude: {}°", degrees(location.latitude, NO_LATITUDE)),
        format!("Longitude: {}°", degrees(location.longitude, NO_LONGITUDE)),
        format!("País: {}", or_placeholder(&location.country, NO_COUNTRY)),
        format!("Cidade: {}", or_placeholder(&location.city, NO_CITY)),
        format!("Endereço: {}", or_placeholder(&location.address, NO_ADDRESS)),
        format!("Local: {}", or_placeholder(&location.place_name, NO_PLACE_NAME)),
    ]
    .join("\n")
}

pub fn render_record(record: &LocationRecord) -> String {
    let when = record.timestamp.with_timezone(&Local).format("%d/%m/%Y %H:%M:%S");

    [
        format!(
            "{}, {}",
            or_placeholder(&record.city, NO_CITY),
            or_placeholder(&record.country, NO_COUNTRY)
        ),
        or_placeholder(&record.address, NO_ADDRESS).to_string(),
        or_placeholder(&record.place_name, NO_PLACE_NAME).to_string(),
        format!(
            "{}°, {}°",
            degrees(record.latitude, NO_LATITUDE),
            degrees(record.longitude, NO_LONGITUDE)
        ),
        when.to_string(),
    ]
    .join("\n")
}

pub fn render_records(records: &[LocationRecord]) -> String {
    if records.is_empty() {
        return NO_RECORDS.to_string();
    }

    records
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}
