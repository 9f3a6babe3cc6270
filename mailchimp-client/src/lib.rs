//! Async client for the Mailchimp marketing API
//!
//! This crate wraps the provider's campaign and mailing-list endpoints:
//!
//! - Campaign creation from validated settings, with list-level defaults
//!   merged in for the fields the caller leaves unset
//! - Template content attachment and optional delivery scheduling
//! - Resolution of an existing unsent campaign by its web ID
//! - Mailing-list metadata lookups
//!
//! Authentication and error reporting changed between API generations;
//! one [`ApiClient`] covers both, selected by [`ApiVersion`] at
//! construction. Every call is a single request/response round trip:
//! no retries, no caching, no background work.
//!
//! # Example
//!
//! ```no_run
//! use mailchimp_client::{ApiClient, Campaign, CampaignSettings, Datacenter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api_key = "0123456789abcdef0123456789abcdef-us6";
//! let api = ApiClient::new(Datacenter::from_api_key(api_key)?, api_key)?;
//!
//! let settings = CampaignSettings::new("4ca5becb8d", "2000020")
//!     .with_title("March newsletter")
//!     .with_subject("Fresh this month")
//!     .with_section("body", "<p>Hello readers!</p>");
//!
//! let mut campaign = Campaign::new(&api, settings).await?;
//! campaign.create().await?;
//! campaign.add_content().await?;
//! # Ok(())
//! # }
//! ```

pub mod campaign;
pub mod datacenter;
pub mod error;
pub mod http;
pub mod list;
pub mod response;

pub use campaign::{
    Campaign, CampaignMode, CampaignSettings, CampaignState, CampaignType, ResolvedSettings,
};
pub use datacenter::Datacenter;
pub use error::{Error, Result};
pub use http::{ApiClient, ApiVersion};
pub use list::MailingList;
pub use response::{
    CampaignDefaults, CampaignPage, CampaignSummary, ListInfo, ResponseDetails, ResponseEnvelope,
    classify_error,
};
