//! HTTP client for the public JSON object store.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RemoteResult, RemoteSnapshot, RemoteStore, SnapshotData, SyncUnavailable};
use crate::util::{compact_text, is_http_url};

/// [`RemoteStore`] backed by `{base}/objects` endpoints.
#[derive(Clone, Debug)]
pub struct HttpObjectStore {
    objects_url: String,
    client: Client,
}

impl HttpObjectStore {
    pub fn new(base_url: impl AsRef<str>) -> RemoteResult<Self> {
        let base_url = base_url.as_ref().trim();
        if !is_http_url(base_url) {
            return Err(SyncUnavailable(format!(
                "object store URL must include http:// or https://, got '{base_url}'"
            )));
        }

        let client = Client::builder()
            .build()
            .map_err(|error| SyncUnavailable(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            objects_url: format!("{}/objects", base_url.trim_end_matches('/')),
            client,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> RemoteResult<T> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| SyncUnavailable(format!("{operation} request failed: {error}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            SyncUnavailable(format!("{operation} response could not be read: {error}"))
        })?;

        if !status.is_success() {
            return Err(SyncUnavailable(format!(
                "{operation} returned HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|error| SyncUnavailable(format!("{operation} returned malformed JSON: {error}")))
    }
}

#[derive(Debug, Serialize)]
struct ObjectWrite<'a> {
    name: &'a str,
    data: &'a SnapshotData,
}

/// Raw listing entry. Objects written by other applications may carry any
/// `data` shape, so it is only decoded once the name matches.
#[derive(Debug, Deserialize)]
struct ObjectEnvelope {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

impl ObjectEnvelope {
    fn internal_id(&self) -> RemoteResult<String> {
        match &self.id {
            Value::String(id) if !id.trim().is_empty() => Ok(id.clone()),
            Value::Number(id) => Ok(id.to_string()),
            other => Err(SyncUnavailable(format!(
                "object store returned an unusable object id: {other}"
            ))),
        }
    }

    fn into_snapshot(self, key: &str) -> RemoteResult<RemoteSnapshot> {
        let id = self.internal_id()?;
        let data = match self.data {
            None | Some(Value::Null) => SnapshotData::default(),
            Some(value) => serde_json::from_value(value).map_err(|error| {
                SyncUnavailable(format!("snapshot '{key}' has malformed data: {error}"))
            })?,
        };

        Ok(RemoteSnapshot {
            id,
            name: self.name.unwrap_or_else(|| key.to_string()),
            data,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpObjectStore {
    async fn fetch_snapshot(&self, key: &str) -> RemoteResult<Option<RemoteSnapshot>> {
        let objects: Vec<ObjectEnvelope> = self
            .send_json(
                "fetch",
                self.client.get(&self.objects_url).query(&[("id", key)]),
            )
            .await?;

        objects
            .into_iter()
            .find(|object| object.name.as_deref() == Some(key))
            .map(|object| object.into_snapshot(key))
            .transpose()
    }

    async fn create_snapshot(
        &self,
        key: &str,
        payload: &SnapshotData,
    ) -> RemoteResult<RemoteSnapshot> {
        let created: ObjectEnvelope = self
            .send_json(
                "create",
                self.client.post(&self.objects_url).json(&ObjectWrite {
                    name: key,
                    data: payload,
                }),
            )
            .await?;
        created.into_snapshot(key)
    }

    async fn replace_snapshot(
        &self,
        internal_id: &str,
        key: &str,
        payload: &SnapshotData,
    ) -> RemoteResult<RemoteSnapshot> {
        let url = format!("{}/{internal_id}", self.objects_url);
        let replaced: ObjectEnvelope = self
            .send_json(
                "replace",
                self.client.put(url).json(&ObjectWrite {
                    name: key,
                    data: payload,
                }),
            )
            .await?;
        replaced.into_snapshot(key)
    }
}
