//! `reqwest`-backed implementation of [`FeatureApi`].

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, Envelope, FeatureApi, FeatureRecord, NewFeature};
use crate::config::AppConfig;
use crate::model::FeatureId;

/// HTTP client for `{base}/api/features`.
///
/// On native targets `reqwest` needs a running tokio reactor, so this type
/// is driven from the browser build; tests use an in-memory [`FeatureApi`].
#[derive(Debug, Clone)]
pub struct HttpFeatureApi {
    client: Client,
    collection: Url,
}

impl HttpFeatureApi {
    pub fn new(features_url: &str) -> Result<Self, ApiError> {
        let collection = Url::parse(features_url).map_err(ApiError::transport)?;
        if collection.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "{} cannot be used as a base URL",
                features_url
            )));
        }
        Ok(Self {
            client: Client::new(),
            collection,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.features_url())
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// `{collection}/{id}` with the id percent-encoded as one path segment.
    pub fn item_url(&self, id: &FeatureId) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    /// Send a request and parse the envelope from the body.
    ///
    /// Any body that parses as an envelope is honored, whatever the status,
    /// so a 4xx carrying `success: false` surfaces its domain message.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(ApiError::Transport(format!(
                "HTTP error! status: {}",
                status.as_u16()
            ))),
            Err(e) => Err(ApiError::Transport(format!("Invalid response body: {}", e))),
        }
    }
}

impl FeatureApi for HttpFeatureApi {
    async fn list(&self) -> Result<Vec<FeatureRecord>, ApiError> {
        let envelope: Envelope<Vec<FeatureRecord>> =
            self.send(self.client.get(self.collection.clone())).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    async fn create(&self, feature: &NewFeature) -> Result<FeatureRecord, ApiError> {
        let envelope: Envelope<FeatureRecord> = self
            .send(self.client.post(self.collection.clone()).json(feature))
            .await?;
        envelope
            .into_data()?
            .ok_or_else(|| ApiError::Transport("Response did not include the saved feature".to_string()))
    }

    async fn update(&self, record: &FeatureRecord) -> Result<FeatureRecord, ApiError> {
        let envelope: Envelope<FeatureRecord> = self
            .send(self.client.put(self.item_url(&record.id)).json(record))
            .await?;
        Ok(envelope.into_data()?.unwrap_or_else(|| record.clone()))
    }

    async fn delete(&self, id: &FeatureId) -> Result<(), ApiError> {
        let envelope: Envelope<serde_json::Value> =
            self.send(self.client.delete(self.item_url(id))).await?;
        envelope.into_data()?;
        Ok(())
    }
}
