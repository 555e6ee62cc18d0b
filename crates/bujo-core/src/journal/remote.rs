//! HTTP implementation of the remote journal store.

use serde_json::Value;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::{EntryId, JournalEntry};
use crate::session::SessionStore;

use super::normalize::{decode_entry, decode_entry_list, ServerRecord};
use super::RemoteJournal;

/// Remote journal backed by the REST API; availability tracks the session.
#[derive(Clone)]
pub struct HttpRemoteJournal<S: SessionStore> {
    api: ApiClient<S>,
}

impl<S: SessionStore> HttpRemoteJournal<S> {
    #[must_use]
    pub fn new(api: ApiClient<S>) -> Self {
        Self { api }
    }
}

impl<S: SessionStore> RemoteJournal for HttpRemoteJournal<S> {
    fn is_available(&self) -> bool {
        self.api.session().is_authenticated()
    }

    async fn fetch_all(&self) -> Result<Vec<JournalEntry>> {
        let response = self
            .api
            .send(|http, config| http.get(config.endpoint("journal/getAllEntries")))
            .await?;
        let payload: Value = response.json().await.map_err(Error::from_transport)?;
        decode_entry_list(payload)
    }

    async fn create(&self, entry: &JournalEntry) -> Result<ServerRecord> {
        let body = serde_json::to_value(entry)?;
        let response = self
            .api
            .send(move |http, config| http.post(config.endpoint("journal/entries")).json(&body))
            .await?;
        let payload: Value = response.json().await.map_err(Error::from_transport)?;
        decode_entry(payload)
    }

    async fn update(&self, id: &EntryId, entry: &JournalEntry) -> Result<ServerRecord> {
        let body = serde_json::to_value(entry)?;
        let path = format!("journal/updateEntries/{id}");
        let response = self
            .api
            .send(move |http, config| http.put(config.endpoint(&path)).json(&body))
            .await?;
        let payload: Value = response.json().await.map_err(Error::from_transport)?;
        decode_entry(payload)
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let path = format!("journal/deleteEntriesById/{id}");
        self.api
            .send(move |http, config| http.delete(config.endpoint(&path)))
            .await?;
        Ok(())
    }

    async fn toggle(&self, id: &EntryId) -> Result<ServerRecord> {
        let path = format!("journal/entries/{id}/toggle");
        let response = self
            .api
            .send(move |http, config| http.patch(config.endpoint(&path)))
            .await?;
        let payload: Value = response.json().await.map_err(Error::from_transport)?;
        decode_entry(payload)
    }
}
