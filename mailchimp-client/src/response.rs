//! Response envelope and typed payloads for Mailchimp endpoints
//!
//! Every request returns a [`ResponseEnvelope`] carrying the parsed JSON
//! body plus the provider's error message, if the body encodes one. Error
//! detection never raises by itself; callers decide whether a provider
//! error is fatal for their operation.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::http::ApiVersion;

/// Response to a single API request
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
    error_detail: Option<String>,
}

impl ResponseEnvelope {
    /// Build an envelope from response parts, classifying provider errors
    /// per the API generation's error shape
    pub fn from_parts(
        version: ApiVersion,
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
    ) -> Self {
        let error_detail = classify_error(version, &body);
        if let Some(detail) = &error_detail {
            warn!("Provider reported an error ({status}): {detail}");
        }
        Self {
            status,
            headers,
            body,
            error_detail,
        }
    }

    /// Read and parse a transport response
    ///
    /// An empty body parses as `Null`; anything else must be valid JSON.
    pub(crate) async fn read(version: ApiVersion, response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                Error::invalid_response(format!("response body is not JSON: {e}"))
            })?
        };
        Ok(Self::from_parts(version, status, headers, body))
    }

    /// HTTP status of the response
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// HTTP status as a bare integer
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Canonical reason phrase for the status, empty if none is defined
    pub fn reason_phrase(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parsed JSON body
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Normalized provider error message, if the body encodes one
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// Whether the body encodes a provider-level error
    pub fn is_provider_error(&self) -> bool {
        self.error_detail.is_some()
    }

    /// Promote the provider error into a failure value, if present
    pub fn provider_error(&self) -> Option<Error> {
        self.error_detail
            .as_ref()
            .map(|message| Error::provider(message, self.status.as_u16()))
    }

    /// Deserialize the body into a typed payload
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| Error::invalid_response(format!("unexpected response shape: {e}")))
    }

    /// Snapshot of the response for diagnostic logging
    pub fn details(&self) -> ResponseDetails {
        ResponseDetails {
            status_code: self.status.as_u16(),
            reason_phrase: self.reason_phrase(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// Diagnostic snapshot of a completed request's response
#[derive(Debug, Clone)]
pub struct ResponseDetails {
    pub status_code: u16,
    pub reason_phrase: &'static str,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Extract the provider's error message from a response body, if any
///
/// Two shapes exist across API generations: the legacy generation marks
/// failures with a top-level `status == "error"` and an `error` message;
/// the current generation returns either a non-empty `errors` array (the
/// message in `error` or `message` per entry) or a problem document whose
/// `detail`/`title` describe the failure.
pub fn classify_error(version: ApiVersion, body: &Value) -> Option<String> {
    match version {
        ApiVersion::V2 => {
            if body.get("status").and_then(Value::as_str) == Some("error") {
                return Some(
                    message_text(body.get("error"))
                        .unwrap_or_else(|| "unspecified provider error".to_owned()),
                );
            }
            None
        }
        ApiVersion::V3 => {
            if let Some(first) = body
                .get("errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
            {
                return Some(
                    message_text(first.get("error"))
                        .or_else(|| message_text(first.get("message")))
                        .unwrap_or_else(|| first.to_string()),
                );
            }
            // Problem documents carry an HTTP status inside the body
            if body.get("status").and_then(Value::as_u64).is_some_and(|s| s >= 400) {
                return message_text(body.get("detail"))
                    .or_else(|| message_text(body.get("title")));
            }
            None
        }
    }
}

fn message_text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(ToOwned::to_owned)
}

/// Mailing list metadata, restricted to the fields this client reads
#[derive(Debug, Clone, Deserialize)]
pub struct ListInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub campaign_defaults: Option<CampaignDefaults>,
}

/// Per-list fallback values for campaign settings
///
/// The legacy generation reports these under `default_*` names; aliases
/// accept both spellings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignDefaults {
    #[serde(default, alias = "default_subject")]
    pub subject: String,
    #[serde(default, alias = "default_from_email")]
    pub from_email: String,
    #[serde(default, alias = "default_from_name")]
    pub from_name: String,
}

/// Campaign identifiers as reported by a campaign listing
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignSummary {
    pub id: String,
    pub web_id: u64,
}

/// One page of a filtered campaign listing
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignPage {
    #[serde(default)]
    pub campaigns: Vec<CampaignSummary>,
}
