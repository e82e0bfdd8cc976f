use async_trait::async_trait;
use location_tracker_lib::{LocationRecord, MessageResponse, NewLocation};
use reqwest::{RequestBuilder, Response};

use crate::store::{LocationStore, StoreError};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Client of the location server's HTTP API.
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, admin_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.admin_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turns a non-success answer into an error carrying the server's message.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };

    Err(StoreError::Status { status, message })
}

#[async_trait]
impl LocationStore for RemoteStore {
    async fn save(&self, location: NewLocation) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.url("/save-location"))
            .json(&location)
            .send()
            .await?;

        let body: MessageResponse = check(response).await?.json().await?;
        tracing::info!("Location saved: {}", body.message);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LocationRecord>, StoreError> {
        let response = self
            .authorized(self.client.get(self.url("/locations")))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.delete(self.url("/locations")))
            .send()
            .await?;

        check(response).await.map(|_| ())
    }
}
