//! Client for the TaskPaper/Markdown export endpoints.

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::session::SessionStore;

const TASKPAPER_FALLBACK: &str = "# Tasks\n\nNo tasks found.\n";
const MARKDOWN_FALLBACK: &str = "# Notes & Emotions\n\nNo notes or emotions found.\n";

/// The two export bodies, fetched independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedReport {
    pub taskpaper: String,
    pub markdown: String,
}

impl ConvertedReport {
    /// Both sections joined into a single printable document.
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.taskpaper.trim_end(), self.markdown)
    }
}

/// Export client over the authenticated API.
#[derive(Clone)]
pub struct ExportClient<S: SessionStore> {
    api: ApiClient<S>,
}

impl<S: SessionStore> ExportClient<S> {
    #[must_use]
    pub fn new(api: ApiClient<S>) -> Self {
        Self { api }
    }

    /// Fetch both export formats concurrently. Each stream independently
    /// falls back to a placeholder body on failure, so a report is always
    /// produced.
    pub async fn fetch_report(&self) -> ConvertedReport {
        let (taskpaper, markdown) = tokio::join!(
            self.fetch_plain_text("journal/export/taskpaper"),
            self.fetch_plain_text("journal/export/markdown"),
        );

        ConvertedReport {
            taskpaper: taskpaper.unwrap_or_else(|error| {
                tracing::warn!("taskpaper export failed: {error}");
                TASKPAPER_FALLBACK.to_string()
            }),
            markdown: markdown.unwrap_or_else(|error| {
                tracing::warn!("markdown export failed: {error}");
                MARKDOWN_FALLBACK.to_string()
            }),
        }
    }

    async fn fetch_plain_text(&self, path: &str) -> Result<String> {
        let response = self
            .api
            .send(|http, config| {
                http.get(config.endpoint(path))
                    .header(reqwest::header::ACCEPT, "text/plain")
            })
            .await?;
        response.text().await.map_err(Error::from_transport)
    }
}
