//! Campaign creation and resolution
//!
//! A campaign is provisioned in steps against the provider: create the
//! campaign from resolved settings, then attach template content. When
//! the settings carry a `web_id`, an existing unsent campaign is adopted
//! instead and creation is skipped.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::list::MailingList;
use crate::response::{CampaignDefaults, CampaignPage, ListInfo};

/// Campaign type tag understood by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CampaignType {
    #[default]
    Regular,
    Plaintext,
    AbSplit,
    Rss,
    Variate,
}

impl CampaignType {
    /// Wire name of the type tag
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Plaintext => "plaintext",
            Self::AbSplit => "absplit",
            Self::Rss => "rss",
            Self::Variate => "variate",
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry path selected by the settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignMode {
    /// Full settings; the campaign is created remotely by [`Campaign::create`]
    Create,
    /// Adopt an existing unsent campaign matched by `web_id`
    Resolve,
}

/// Provisioning state of a [`Campaign`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignState {
    /// Settings validated, nothing created remotely yet
    Pending,
    /// Campaign exists remotely and has an ID
    Created,
    /// Template content attached; fully provisioned
    ContentAttached,
}

impl CampaignState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Created => "created",
            Self::ContentAttached => "content attached",
        }
    }
}

impl fmt::Display for CampaignState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied campaign settings
///
/// Which fields are required depends on the entry path; see
/// [`missing_for`](Self::missing_for). `subject`, `from_email` and
/// `from_name` fall back to the target list's campaign defaults when
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSettings {
    template_id: Option<String>,
    list_id: Option<String>,
    template_sections: BTreeMap<String, String>,
    title: Option<String>,
    subject: Option<String>,
    from_email: Option<String>,
    from_name: Option<String>,
    web_id: Option<u64>,
    campaign_type: CampaignType,
}

impl CampaignSettings {
    /// Settings targeting a list with a template
    pub fn new(list_id: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            list_id: Some(list_id.into()),
            template_id: Some(template_id.into()),
            ..Self::default()
        }
    }

    /// Set the target list ID
    pub fn with_list_id(mut self, list_id: impl Into<String>) -> Self {
        self.list_id = Some(list_id.into());
        self
    }

    /// Set the template ID
    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Bind content to a named template section
    pub fn with_section(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.template_sections.insert(name.into(), content.into());
        self
    }

    /// Set the internal campaign title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the subject line
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the sender address
    pub fn with_from_email(mut self, from_email: impl Into<String>) -> Self {
        self.from_email = Some(from_email.into());
        self
    }

    /// Set the sender display name
    pub fn with_from_name(mut self, from_name: impl Into<String>) -> Self {
        self.from_name = Some(from_name.into());
        self
    }

    /// Target an existing unsent campaign by its web ID
    pub fn with_web_id(mut self, web_id: u64) -> Self {
        self.web_id = Some(web_id);
        self
    }

    /// Set the campaign type tag
    pub fn with_campaign_type(mut self, campaign_type: CampaignType) -> Self {
        self.campaign_type = campaign_type;
        self
    }

    /// Entry path these settings select
    pub fn mode(&self) -> CampaignMode {
        if self.web_id.is_some() {
            CampaignMode::Resolve
        } else {
            CampaignMode::Create
        }
    }

    /// Web ID of the campaign to adopt, if resolving
    pub fn web_id(&self) -> Option<u64> {
        self.web_id
    }

    /// Configured campaign type tag
    pub fn campaign_type(&self) -> CampaignType {
        self.campaign_type
    }

    /// Template section bindings
    pub fn template_sections(&self) -> &BTreeMap<String, String> {
        &self.template_sections
    }

    /// Names of required settings absent for the given entry path
    ///
    /// Both paths need `template_id`, `list_id` and at least one template
    /// section; the create path additionally needs `title` and `subject`.
    pub fn missing_for(&self, mode: CampaignMode) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.template_id.is_none() {
            missing.push("template_id");
        }
        if self.list_id.is_none() {
            missing.push("list_id");
        }
        if mode == CampaignMode::Create {
            if self.title.is_none() {
                missing.push("title");
            }
            if self.subject.is_none() {
                missing.push("subject");
            }
        }
        if self.template_sections.is_empty() {
            missing.push("template_sections");
        }
        missing
    }

    fn validate(&self, mode: CampaignMode) -> Result<()> {
        let missing = self.missing_for(mode);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingSettings { missing })
        }
    }
}

/// Settings as submitted to campaign creation, after merging in list
/// defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSettings {
    pub title: String,
    pub subject_line: String,
    pub from_email: String,
    pub from_name: String,
    pub reply_to: String,
}

impl ResolvedSettings {
    /// Merge caller-supplied settings with a list's campaign defaults
    ///
    /// Caller values win field by field; `reply_to` always follows the
    /// resolved `from_email`.
    pub fn merged(settings: &CampaignSettings, defaults: &CampaignDefaults) -> Result<Self> {
        let title = require(&settings.title, "title")?.to_owned();
        let subject_line = settings
            .subject
            .clone()
            .unwrap_or_else(|| defaults.subject.clone());
        let from_email = settings
            .from_email
            .clone()
            .unwrap_or_else(|| defaults.from_email.clone());
        let from_name = settings
            .from_name
            .clone()
            .unwrap_or_else(|| defaults.from_name.clone());

        Ok(Self {
            reply_to: from_email.clone(),
            title,
            subject_line,
            from_email,
            from_name,
        })
    }
}

/// A single email-broadcast unit tracked by the provider
#[derive(Debug)]
pub struct Campaign<'a> {
    api: &'a ApiClient,
    settings: CampaignSettings,
    id: Option<String>,
    state: CampaignState,
}

impl<'a> Campaign<'a> {
    /// Validate settings and, when they carry a `web_id`, resolve the
    /// existing campaign they refer to
    ///
    /// The create path performs no network traffic here; the resolve path
    /// searches the target list's unsent campaigns, newest first, and
    /// adopts the matching campaign's ID. A `web_id` with no match fails
    /// construction, naming the list when its display name can be looked
    /// up.
    pub async fn new(api: &'a ApiClient, settings: CampaignSettings) -> Result<Campaign<'a>> {
        let mode = settings.mode();
        settings.validate(mode)?;

        let mut campaign = Campaign {
            api,
            settings,
            id: None,
            state: CampaignState::Pending,
        };
        if let Some(web_id) = campaign.settings.web_id {
            campaign.resolve_existing(web_id).await?;
        }
        Ok(campaign)
    }

    /// Campaign ID, once created or resolved
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current provisioning state
    pub fn state(&self) -> CampaignState {
        self.state
    }

    /// Settings this campaign was built from
    pub fn settings(&self) -> &CampaignSettings {
        &self.settings
    }

    /// Create the campaign remotely
    ///
    /// Resolves the final settings (fetching list defaults if needed),
    /// submits the creation request and adopts the assigned ID. Fails on
    /// any provider error without changing state.
    pub async fn create(&mut self) -> Result<&str> {
        if self.state != CampaignState::Pending {
            return Err(Error::invalid_state("create", self.state));
        }

        let settings = self.resolved_settings().await?;
        let list_id = require(&self.settings.list_id, "list_id")?;
        let body = json!({
            "type": self.settings.campaign_type.as_str(),
            "recipients": { "list_id": list_id },
            "settings": settings,
        });

        let envelope = self.api.post("campaigns", &body).await?;
        if let Some(error) = envelope.provider_error() {
            return Err(error);
        }
        let id = envelope
            .body()
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_response("campaign creation response carried no id"))?
            .to_owned();

        debug!("Created campaign {id}");
        self.state = CampaignState::Created;
        Ok(self.id.insert(id))
    }

    /// Attach template content to the created campaign
    ///
    /// Required before the campaign counts as fully provisioned.
    pub async fn add_content(&mut self) -> Result<()> {
        if self.state != CampaignState::Created {
            return Err(Error::invalid_state("add content to", self.state));
        }
        let Some(id) = self.id.as_deref() else {
            return Err(Error::invalid_state("add content to", self.state));
        };
        let template_id = require(&self.settings.template_id, "template_id")?;

        let body = json!({
            "template": {
                "id": template_id,
                "sections": &self.settings.template_sections,
            }
        });
        let envelope = self
            .api
            .put(&format!("campaigns/{id}/content"), &body)
            .await?;
        if let Some(error) = envelope.provider_error() {
            return Err(error);
        }

        debug!("Attached template content to campaign {id}");
        self.state = CampaignState::ContentAttached;
        Ok(())
    }

    /// Schedule the campaign for delivery
    pub async fn schedule(&self, when: DateTime<Utc>) -> Result<()> {
        let Some(id) = self.id.as_deref() else {
            return Err(Error::invalid_state("schedule", self.state));
        };

        let body = json!({
            "schedule_time": when.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        let envelope = self
            .api
            .post(&format!("campaigns/{id}/actions/schedule"), &body)
            .await?;
        if let Some(error) = envelope.provider_error() {
            return Err(error);
        }

        debug!("Scheduled campaign {id} for {when}");
        Ok(())
    }

    /// Final settings as they would be submitted to creation
    ///
    /// The target list is consulted only for fields the caller left
    /// unset; when subject, sender address and sender name are all
    /// supplied, no list request is made at all.
    pub async fn resolved_settings(&self) -> Result<ResolvedSettings> {
        if self.settings.subject.is_some()
            && self.settings.from_email.is_some()
            && self.settings.from_name.is_some()
        {
            return ResolvedSettings::merged(&self.settings, &CampaignDefaults::default());
        }

        let defaults = self.list_defaults().await?;
        ResolvedSettings::merged(&self.settings, &defaults)
    }

    /// Fetch the target list's campaign defaults
    ///
    /// A list without campaign defaults is a data-integrity failure: the
    /// full response is logged for diagnosis and the operation fails
    /// rather than continuing with partial settings.
    async fn list_defaults(&self) -> Result<CampaignDefaults> {
        let list_id = require(&self.settings.list_id, "list_id")?;
        let list = MailingList::new(self.api, list_id);
        let envelope = list.get(Some(&["name", "campaign_defaults"])).await?;
        if let Some(error) = envelope.provider_error() {
            return Err(error);
        }

        let info: ListInfo = envelope.json()?;
        match info.campaign_defaults {
            Some(defaults) => Ok(defaults),
            None => {
                error!(
                    "List {list_id} reported no campaign defaults; response: {:?}",
                    envelope.details()
                );
                Err(Error::missing_campaign_defaults(list_id))
            }
        }
    }

    /// Adopt the unsent campaign matching `web_id`, or fail construction
    async fn resolve_existing(&mut self, web_id: u64) -> Result<()> {
        let list_id = require(&self.settings.list_id, "list_id")?;
        let query = [
            ("list_id", list_id),
            ("status", "save"),
            ("sort_field", "create_time"),
            ("sort_dir", "DESC"),
        ];
        let envelope = self.api.get("campaigns", &query).await?;
        if let Some(error) = envelope.provider_error() {
            return Err(error);
        }

        let page: CampaignPage = envelope.json()?;
        if let Some(found) = page.campaigns.into_iter().find(|c| c.web_id == web_id) {
            debug!("Adopted existing campaign {} for web_id {web_id}", found.id);
            self.id = Some(found.id);
            self.state = CampaignState::Created;
            return Ok(());
        }

        // Best effort only; a failed name lookup must not mask the
        // original failure
        let list_name = match MailingList::new(self.api, list_id)
            .info(Some(&["name"]))
            .await
        {
            Ok(info) => Some(info.name),
            Err(lookup_error) => {
                debug!("List name lookup failed: {lookup_error}");
                None
            }
        };
        Err(Error::CampaignNotFound { web_id, list_name })
    }
}

/// Access a settings field that validation guarantees to be present
fn require<'s>(value: &'s Option<String>, name: &'static str) -> Result<&'s str> {
    value
        .as_deref()
        .ok_or_else(|| Error::missing_settings([name]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn full_settings() -> CampaignSettings {
        CampaignSettings::new("l1", "t1")
            .with_title("March newsletter")
            .with_subject("Fresh this month")
            .with_section("body", "<p>Hello</p>")
    }

    #[test]
    fn test_create_mode_requires_title_and_subject() {
        let settings = CampaignSettings::new("l1", "t1").with_section("body", "x");
        assert_eq!(
            settings.missing_for(CampaignMode::Create),
            vec!["title", "subject"]
        );
        assert!(settings.missing_for(CampaignMode::Resolve).is_empty());
    }

    #[test]
    fn test_missing_settings_listed_exactly() {
        let settings = CampaignSettings::default();
        assert_eq!(
            settings.missing_for(CampaignMode::Create),
            vec![
                "template_id",
                "list_id",
                "title",
                "subject",
                "template_sections"
            ]
        );
        assert_eq!(
            settings.missing_for(CampaignMode::Resolve),
            vec!["template_id", "list_id", "template_sections"]
        );
    }

    #[test]
    fn test_complete_settings_validate() {
        assert!(full_settings().missing_for(CampaignMode::Create).is_empty());
    }

    #[test]
    fn test_mode_follows_web_id() {
        assert_eq!(full_settings().mode(), CampaignMode::Create);
        assert_eq!(
            full_settings().with_web_id(42).mode(),
            CampaignMode::Resolve
        );
    }

    #[test]
    fn test_merged_prefers_caller_values() {
        let defaults = CampaignDefaults {
            subject: "Default".to_owned(),
            from_email: "a@x.com".to_owned(),
            from_name: "A".to_owned(),
        };
        let settings = full_settings()
            .with_from_email("me@mine.com")
            .with_from_name("Me");

        let resolved = ResolvedSettings::merged(&settings, &defaults).unwrap();
        assert_eq!(resolved.subject_line, "Fresh this month");
        assert_eq!(resolved.from_email, "me@mine.com");
        assert_eq!(resolved.from_name, "Me");
        assert_eq!(resolved.reply_to, "me@mine.com");
    }

    #[test]
    fn test_merged_fills_from_defaults() {
        let defaults = CampaignDefaults {
            subject: "Default".to_owned(),
            from_email: "a@x.com".to_owned(),
            from_name: "A".to_owned(),
        };
        let settings = CampaignSettings::new("l1", "t1")
            .with_title("Hi")
            .with_section("body", "Hello");

        let resolved = ResolvedSettings::merged(&settings, &defaults).unwrap();
        assert_eq!(resolved.subject_line, "Default");
        assert_eq!(resolved.from_email, "a@x.com");
        assert_eq!(resolved.from_name, "A");
        assert_eq!(resolved.reply_to, "a@x.com");
    }

    #[test]
    fn test_merged_requires_title() {
        let defaults = CampaignDefaults::default();
        let settings = CampaignSettings::new("l1", "t1").with_section("body", "x");
        match ResolvedSettings::merged(&settings, &defaults) {
            Err(Error::MissingSettings { missing }) => assert_eq!(missing, vec!["title"]),
            other => panic!("expected missing title, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_to_follows_resolved_from_email() {
        let defaults = CampaignDefaults {
            subject: String::new(),
            from_email: "list@x.com".to_owned(),
            from_name: String::new(),
        };
        let from_default =
            ResolvedSettings::merged(&full_settings(), &defaults).unwrap();
        assert_eq!(from_default.reply_to, "list@x.com");

        let from_caller = ResolvedSettings::merged(
            &full_settings().with_from_email("me@mine.com"),
            &defaults,
        )
        .unwrap();
        assert_eq!(from_caller.reply_to, "me@mine.com");
    }

    #[test]
    fn test_campaign_type_wire_names() {
        assert_eq!(CampaignType::default().as_str(), "regular");
        assert_eq!(CampaignType::AbSplit.as_str(), "absplit");
        assert_eq!(CampaignType::Variate.to_string(), "variate");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(CampaignState::Pending.to_string(), "pending");
        assert_eq!(CampaignState::ContentAttached.to_string(), "content attached");
    }
}
