//! Error types for the Mailchimp client

use thiserror::Error;

use crate::campaign::CampaignState;

#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },

    // Provider-reported errors
    #[error("API error ({status}): {message}")]
    Provider { message: String, status: u16 },

    // Validation errors
    #[error("Missing required settings: {}", .missing.join(", "))]
    MissingSettings { missing: Vec<&'static str> },

    #[error("No unsent campaign with web_id {web_id} found{}", .list_name.as_deref().map(|name| format!(" in list \"{name}\"")).unwrap_or_default())]
    CampaignNotFound {
        web_id: u64,
        list_name: Option<String>,
    },

    // Data-integrity errors
    #[error("List {list_id} reported no campaign defaults")]
    MissingCampaignDefaults { list_id: String },

    #[error("Cannot {operation} a campaign in state {state}")]
    InvalidState {
        operation: &'static str,
        state: CampaignState,
    },

    // Configuration errors
    #[error("Invalid datacenter: {0}")]
    InvalidDatacenter(String),

    #[error("Invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
}

// Helper methods for common error construction
impl Error {
    /// Create an invalid response error
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Create a provider error from a normalized message and HTTP status
    pub fn provider(message: impl Into<String>, status: u16) -> Self {
        Self::Provider {
            message: message.into(),
            status,
        }
    }

    /// Create a missing settings error
    pub fn missing_settings(missing: impl Into<Vec<&'static str>>) -> Self {
        Self::MissingSettings {
            missing: missing.into(),
        }
    }

    /// Create a missing campaign defaults error
    pub fn missing_campaign_defaults(list_id: impl Into<String>) -> Self {
        Self::MissingCampaignDefaults {
            list_id: list_id.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(operation: &'static str, state: CampaignState) -> Self {
        Self::InvalidState { operation, state }
    }

    /// Create an invalid API key error
    pub fn invalid_api_key(reason: &'static str) -> Self {
        Self::InvalidApiKey { reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
