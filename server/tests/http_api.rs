use std::{net::SocketAddr, sync::Arc};

use location_tracker_data_management::{DataManager, StoreKind};
use location_tracker_lib::{messages, LocationRecord};
use reqwest::StatusCode;
use serde_json::{json, Value};
use server::{build_router, server_state::ServerState};
use tempfile::TempDir;

struct TestServer {
    base_url: String,
    data_manager: DataManager,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn start(admin_token: Option<&str>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_manager = DataManager::start(StoreKind::Database(dir.path().join("locations.db")))
            .await
            .expect("start data manager");

        let state = Arc::new(ServerState::new(data_manager.clone(), admin_token.map(str::to_owned)));
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .expect("serve app")
        });

        Self {
            base_url: format!("http://{addr}"),
            data_manager,
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    async fn save(&self, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}/save-location", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("send save");
        let status = response.status();
        (status, response.json().await.expect("save json"))
    }

    async fn list(&self) -> Vec<LocationRecord> {
        let response = self
            .client
            .get(format!("{}/locations", self.base_url))
            .send()
            .await
            .expect("send list");
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.expect("list json")
    }

    async fn clear(&self) -> (StatusCode, Value) {
        let response = self
            .client
            .delete(format!("{}/locations", self.base_url))
            .send()
            .await
            .expect("send clear");
        let status = response.status();
        (status, response.json().await.expect("clear json"))
    }
}

fn times_square() -> Value {
    json!({
        "latitude": 40.7128,
        "longitude": -74.0060,
        "country": "Estados Unidos",
        "city": "Nova York",
        "address": "Times Square, Nova York, NY, EUA",
        "placeName": "Times Square"
    })
}

#[tokio::test]
async fn saved_location_is_listed_first() {
    let server = TestServer::start(None).await;

    let (status, body) = server.save(json!({ "latitude": 55.6761, "longitude": 12.5683 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], messages::SAVE_OK);

    let (status, body) = server.save(times_square()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Localização salva com sucesso!" }));

    let locations = server.list().await;
    assert_eq!(locations.len(), 2);

    let newest = &locations[0];
    assert_eq!(newest.latitude, Some(40.7128));
    assert_eq!(newest.longitude, Some(-74.0060));
    assert_eq!(newest.country.as_deref(), Some("Estados Unidos"));
    assert_eq!(newest.city.as_deref(), Some("Nova York"));
    assert_eq!(newest.address.as_deref(), Some("Times Square, Nova York, NY, EUA"));
    assert_eq!(newest.place_name.as_deref(), Some("Times Square"));
    assert!(newest.timestamp > locations[1].timestamp);
}

#[tokio::test]
async fn list_exposes_id_and_timestamp() {
    let server = TestServer::start(None).await;
    server.save(times_square()).await;

    let raw: Value = server
        .client
        .get(format!("{}/locations", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let first = &raw[0];
    assert!(first["id"].is_i64());
    assert!(first["timestamp"].is_string());
    assert_eq!(first["placeName"], "Times Square");
}

#[tokio::test]
async fn clearing_removes_every_row() {
    let server = TestServer::start(None).await;

    for _ in 0..5 {
        let (status, _) = server.save(times_square()).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(server.list().await.len(), 5);

    let (status, body) = server.clear().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], messages::CLEAR_OK);
    assert!(server.list().await.is_empty());

    // Clearing again is fine.
    let (status, _) = server.clear().await;
    assert_eq!(status, StatusCode::OK);
    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn missing_descriptive_fields_are_stored_as_null() {
    let server = TestServer::start(None).await;

    let (status, _) = server
        .save(json!({
            "latitude": -22.9068,
            "longitude": -43.1729,
            "country": null,
            "city": null,
            "error": null,
            "loading": false
        }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server.save(json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let locations = server.list().await;
    assert_eq!(locations.len(), 2);

    let with_coordinates = &locations[1];
    assert_eq!(with_coordinates.latitude, Some(-22.9068));
    assert_eq!(with_coordinates.longitude, Some(-43.1729));
    assert_eq!(with_coordinates.country, None);
    assert_eq!(with_coordinates.city, None);
    assert_eq!(with_coordinates.address, None);
    assert_eq!(with_coordinates.place_name, None);

    assert_eq!(locations[0].latitude, None);
}

#[tokio::test]
async fn device_info_is_kept() {
    let server = TestServer::start(None).await;

    let mut body = times_square();
    body["deviceInfo"] = json!("capture-client/0.1 linux");
    server.save(body).await;

    let locations = server.list().await;
    assert_eq!(locations[0].device_info.as_deref(), Some("capture-client/0.1 linux"));
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
    let server = TestServer::start(None).await;

    let (status, body) = server.save(json!({ "latitude": 91.0, "longitude": 0.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], messages::INVALID_COORDINATES);

    let (status, _) = server.save(json!({ "latitude": 0.0, "longitude": -180.5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn storage_failure_is_a_generic_server_error() {
    let server = TestServer::start(None).await;
    server.data_manager.close().await;

    let (status, body) = server.save(times_square()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], messages::SAVE_FAILED);

    let response = server
        .client
        .get(format!("{}/locations", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], messages::LIST_FAILED);

    let (status, body) = server.clear().await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], messages::CLEAR_FAILED);
}

#[tokio::test]
async fn admin_token_guards_list_and_clear() {
    let server = TestServer::start(Some("s3cret")).await;

    // Visitors can still save.
    let (status, _) = server.save(times_square()).await;
    assert_eq!(status, StatusCode::OK);

    let url = format!("{}/locations", server.base_url);

    let response = server.client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], messages::UNAUTHORIZED);

    let response = server.client.delete(&url).bearer_auth("wrong").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server.client.get(&url).bearer_auth("s3cret").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let locations: Vec<LocationRecord> = response.json().await.unwrap();
    assert_eq!(locations.len(), 1);

    let response = server
        .client
        .get(&url)
        .header("authorization", "bearer s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.client.get(&url).header("authorization", "Basic s3cret").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server.client.delete(&url).bearer_auth("s3cret").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(server.data_manager.get_locations().await.unwrap().is_empty());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let server = TestServer::start(None).await;

    let response = server
        .client
        .request(reqwest::Method::OPTIONS, format!("{}/save-location", server.base_url))
        .header("Origin", "https://visitor.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}
