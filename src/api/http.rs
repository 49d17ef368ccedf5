use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body};

use super::{BillingBackend, DownloadTarget};
use crate::config::ApiSettings;
use crate::error::{DownloadError, FetchError};
use crate::invoice::{BillingSummary, Invoice};

/// Upper bound on a downloaded document
const MAX_DOCUMENT_BYTES: u64 = 64 * 1024 * 1024;

/// [`BillingBackend`] over the client billing REST API.
pub struct HttpBillingClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpBillingClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        // Non-2xx responses are inspected, not turned into transport errors
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_settings(api: &ApiSettings) -> Self {
        Self::new(
            &api.base_url,
            api.token.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, url: &str, accept: &str) -> Result<Response<Body>, ureq::Error> {
        debug!("GET {url}");
        let mut request = self.agent.get(url).header("Accept", accept);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request.call()
    }

    fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);
        let transport = |e: ureq::Error| FetchError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        };

        let mut response = self.get(&url, "application/json").map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.body_mut().read_to_string().map_err(transport)?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

impl BillingBackend for HttpBillingClient {
    fn fetch_billing_summary(&self) -> Result<BillingSummary, FetchError> {
        self.fetch_json("/billing")
    }

    fn fetch_invoices(&self) -> Result<Vec<Invoice>, FetchError> {
        let records: Vec<serde_json::Value> = self.fetch_json("/invoices")?;
        Ok(decode_invoices(records))
    }

    fn download_document(&self, target: &DownloadTarget) -> Result<Vec<u8>, DownloadError> {
        let url = self.url(&target.path);
        let transport = |e: ureq::Error| DownloadError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        };

        let mut response = self.get(&url, "application/pdf, */*").map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            // The error body is optional; an unreadable one is the same as none
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_DOCUMENT_BYTES)
            .read_to_vec()
            .map_err(transport)?;

        if bytes.is_empty() {
            return Err(DownloadError::EmptyDocument);
        }
        Ok(bytes)
    }
}

/// Decode invoice records one by one; a malformed record is logged and
/// skipped instead of taking the rest of the list down with it.
fn decode_invoices(records: Vec<serde_json::Value>) -> Vec<Invoice> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let number = record
                .get("invoiceNumber")
                .and_then(|n| n.as_str())
                .map(str::to_string);
            match serde_json::from_value::<Invoice>(record) {
                Ok(invoice) => Some(invoice),
                Err(e) => {
                    let number = number.unwrap_or_else(|| format!("#{index}"));
                    warn!("Skipping invoice {number}: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Build the error for a failed download from a best-effort `{"message": ...}` body.
fn error_from_body(status: u16, body: &str) -> DownloadError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("message")?.as_str().map(str::to_string))
        .filter(|message| !message.trim().is_empty());

    match message {
        Some(message) => DownloadError::Http { status, message },
        None => DownloadError::http_status(status),
    }
}
