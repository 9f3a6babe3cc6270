//! HTTP client for the Mailchimp API
//!
//! [`ApiClient`] owns the base-URL construction, credential placement and
//! request dispatch for both supported API generations. Responses come
//! back as [`ResponseEnvelope`]s; provider-level errors are classified
//! into the envelope and left for the caller to act on.

use std::fmt;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, trace};

use crate::datacenter::Datacenter;
use crate::error::{Error, Result};
use crate::response::ResponseEnvelope;

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider host; the datacenter and version segments are prepended and
/// appended per client configuration
const API_HOST: &str = "api.mailchimp.com";

/// Mailchimp API generation
///
/// The generation decides the base-URL version segment, where the
/// credential travels, and which error shape the response normalizer
/// looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Version 2.0: legacy generation, API key carried in each request
    /// body (or query string for bodyless requests)
    V2,
    /// Version 3.0: current generation, HTTP Basic credential installed
    /// on the transport
    V3,
}

impl ApiVersion {
    /// URL path segment for this generation
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::V2 => "2.0",
            Self::V3 => "3.0",
        }
    }
}

/// HTTP client for the Mailchimp API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    datacenter: Datacenter,
    version: ApiVersion,
    api_key: String,
    base_url: Option<String>,
}

impl ApiClient {
    /// Create a client for the current API generation
    ///
    /// The credential is installed on the transport as an HTTP Basic
    /// header, so individual requests stay credential-free.
    pub fn new(datacenter: Datacenter, api_key: impl Into<String>) -> Result<Self> {
        Self::with_version(datacenter, api_key, ApiVersion::V3)
    }

    /// Create a client for an explicit API generation
    pub fn with_version(
        datacenter: Datacenter,
        api_key: impl Into<String>,
        version: ApiVersion,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let mut builder = Client::builder().timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if version == ApiVersion::V3 {
            builder = builder.default_headers(basic_auth_headers(&api_key)?);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            datacenter,
            version,
            api_key,
            base_url: None,
        })
    }

    /// Create a client around a custom transport
    ///
    /// The injected client is used as-is; when targeting the current API
    /// generation the caller is responsible for installing credential
    /// headers on it.
    pub fn with_client(
        client: Client,
        datacenter: Datacenter,
        api_key: impl Into<String>,
        version: ApiVersion,
    ) -> Self {
        Self {
            client,
            datacenter,
            version,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Override the computed base URL
    ///
    /// Intended for tests and self-hosted gateways; by default the URL is
    /// derived from the datacenter and API generation.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Get the base URL for the current configuration
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!(
                "https://{}.{API_HOST}/{}",
                self.datacenter,
                self.version.path_segment()
            ),
        }
    }

    /// Get the configured datacenter
    pub fn datacenter(&self) -> &Datacenter {
        &self.datacenter
    }

    /// Get the configured API generation
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Execute a request against an endpoint path
    ///
    /// The body, when present, is serialized as JSON; query parameters are
    /// attached when non-empty. The legacy generation additionally carries
    /// the API key in-band. The returned envelope holds the parsed body
    /// and any classified provider error; only transport and JSON-parse
    /// failures are raised here.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> Result<ResponseEnvelope> {
        let url = self.endpoint_url(endpoint);
        debug!("Mailchimp API request: {method} {url}");

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }

        match (self.version, body) {
            (ApiVersion::V2, Some(value)) => {
                request = request.json(&with_api_key(value, &self.api_key));
            }
            (ApiVersion::V2, None) => {
                // Bodyless legacy requests carry the credential in the query
                request = request.query(&[("apikey", self.api_key.as_str())]);
            }
            (ApiVersion::V3, Some(value)) => {
                request = request.json(value);
            }
            (ApiVersion::V3, None) => {}
        }

        let response = request.send().await?;
        trace!("Response status: {}", response.status());
        ResponseEnvelope::read(self.version, response).await
    }

    /// Make a GET request
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<ResponseEnvelope> {
        self.request(Method::GET, endpoint, None, query).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<ResponseEnvelope> {
        self.request(Method::POST, endpoint, Some(body), &[]).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, endpoint: &str, body: &Value) -> Result<ResponseEnvelope> {
        self.request(Method::PUT, endpoint, Some(body), &[]).await
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url(), endpoint.trim_start_matches('/'))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("datacenter", &self.datacenter)
            .field("version", &self.version)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Basic credential header for the transport, marked sensitive so it is
/// excluded from transport-level logging
fn basic_auth_headers(api_key: &str) -> Result<HeaderMap> {
    let credential = STANDARD.encode(format!("anystring:{api_key}"));
    let mut value = HeaderValue::from_str(&format!("Basic {credential}"))
        .map_err(|_| Error::invalid_api_key("not encodable as a header value"))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Merge the API key into a legacy request body
fn with_api_key(body: &Value, api_key: &str) -> Value {
    let mut body = body.clone();
    if let Value::Object(fields) = &mut body {
        fields.insert("apikey".to_owned(), Value::String(api_key.to_owned()));
    }
    body
}
