//! Client for the page-scan (OCR) endpoints.
//!
//! Scanning delegates entirely to the server; this module only uploads the
//! image and decodes whatever text the backend extracted. There is no local
//! fallback: failures surface to the caller.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::session::SessionStore;

/// A page image queued for scanning.
#[derive(Debug, Clone)]
pub struct ScanUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub page_number: u32,
    pub thread_id: Option<String>,
}

/// Server response to a scan upload, decoded permissively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Extracted text, when the backend produced any.
    pub text: Option<String>,
    /// Server-side id of the stored journal page.
    pub journal_page_id: Option<String>,
    /// Human-readable status message.
    pub message: Option<String>,
}

impl ScanResult {
    fn from_payload(payload: &Value) -> Self {
        Self {
            text: string_field(payload, "text"),
            journal_page_id: id_field(payload, "journalPageId"),
            message: string_field(payload, "message"),
        }
    }
}

/// OCR client over the authenticated API.
#[derive(Clone)]
pub struct OcrClient<S: SessionStore> {
    api: ApiClient<S>,
}

impl<S: SessionStore> OcrClient<S> {
    #[must_use]
    pub fn new(api: ApiClient<S>) -> Self {
        Self { api }
    }

    /// Upload a page image for server-side text extraction.
    pub async fn scan_page(&self, upload: &ScanUpload) -> Result<ScanResult> {
        let response = self
            .api
            .send(|http, config| {
                // The form is rebuilt per attempt; Part is not reusable.
                let image = Part::bytes(upload.bytes.clone())
                    .file_name(upload.file_name.clone())
                    .mime_str(&upload.mime_type)
                    .unwrap_or_else(|_| {
                        Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone())
                    });
                let mut form = Form::new()
                    .part("image", image)
                    .text("pageNumber", upload.page_number.to_string());
                if let Some(thread_id) = &upload.thread_id {
                    form = form.text("threadId", thread_id.clone());
                }
                http.post(config.endpoint("journal/scan")).multipart(form)
            })
            .await?;

        let payload: Value = response.json().await.map_err(Error::from_transport)?;
        Ok(ScanResult::from_payload(&payload))
    }

    /// Fetch previously extracted data, optionally filtered to one page.
    pub async fn extracted_data(&self, journal_page_id: Option<&str>) -> Result<Value> {
        let response = self
            .api
            .send(|http, config| {
                let mut request = http.get(config.endpoint("journal/extractedData"));
                if let Some(page_id) = journal_page_id {
                    request = request.query(&[("journalPageId", page_id)]);
                }
                request
            })
            .await?;
        response.json().await.map_err(Error::from_transport)
    }
}

fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}

// Page ids arrive as strings or numbers depending on the backend version.
fn id_field(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn scan_result_decodes_full_payload() {
        let result = ScanResult::from_payload(&json!({
            "text": "- Buy milk\n- Call Sam",
            "journalPageId": 17,
            "message": "Scanned 1 page"
        }));
        assert_eq!(result.text.as_deref(), Some("- Buy milk\n- Call Sam"));
        assert_eq!(result.journal_page_id.as_deref(), Some("17"));
        assert_eq!(result.message.as_deref(), Some("Scanned 1 page"));
    }

    #[test]
    fn scan_result_tolerates_sparse_payloads() {
        let result = ScanResult::from_payload(&json!({"text": "   "}));
        assert_eq!(
            result,
            ScanResult {
                text: None,
                journal_page_id: None,
                message: None,
            }
        );
    }
}
