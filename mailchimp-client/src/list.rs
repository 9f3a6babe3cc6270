//! Mailing list lookups

use crate::error::Result;
use crate::http::ApiClient;
use crate::response::{ListInfo, ResponseEnvelope};

/// Read access to a single mailing list's metadata
#[derive(Debug, Clone)]
pub struct MailingList<'a> {
    api: &'a ApiClient,
    id: String,
}

impl<'a> MailingList<'a> {
    /// Create a handle for the given list ID
    pub fn new(api: &'a ApiClient, id: impl Into<String>) -> Self {
        Self { api, id: id.into() }
    }

    /// List ID this handle reads
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fetch the list's metadata
    ///
    /// `fields` restricts the response to the named top-level fields,
    /// keeping the payload small. Nothing is cached; every call is a
    /// fresh request, and provider errors ride in the returned envelope.
    pub async fn get(&self, fields: Option<&[&str]>) -> Result<ResponseEnvelope> {
        let endpoint = format!("lists/{}", self.id);
        match fields {
            Some(fields) if !fields.is_empty() => {
                let restricted = fields.join(",");
                self.api
                    .get(&endpoint, &[("fields", restricted.as_str())])
                    .await
            }
            _ => self.api.get(&endpoint, &[]).await,
        }
    }

    /// Fetch the list's metadata as a typed payload
    ///
    /// Unlike [`get`](Self::get), a provider error in the response is
    /// promoted to a failure here.
    pub async fn info(&self, fields: Option<&[&str]>) -> Result<ListInfo> {
        let envelope = self.get(fields).await?;
        if let Some(error) = envelope.provider_error() {
            return Err(error);
        }
        envelope.json()
    }
}
