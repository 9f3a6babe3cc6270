//! Tests for error construction and display formats

use mailchimp_client::{CampaignState, Error};

#[test]
fn test_error_constructors() {
    let err = Error::invalid_response("response body is not JSON");
    assert_eq!(
        err.to_string(),
        "Invalid API response: response body is not JSON"
    );

    let err = Error::provider("Invalid Resource", 400);
    assert_eq!(err.to_string(), "API error (400): Invalid Resource");

    let err = Error::missing_settings(["title", "subject"]);
    assert_eq!(err.to_string(), "Missing required settings: title, subject");

    let err = Error::missing_campaign_defaults("l1");
    assert_eq!(err.to_string(), "List l1 reported no campaign defaults");

    let err = Error::invalid_state("create", CampaignState::Created);
    assert_eq!(err.to_string(), "Cannot create a campaign in state created");

    let err = Error::invalid_api_key("no datacenter suffix");
    assert_eq!(err.to_string(), "Invalid API key: no datacenter suffix");
}

#[test]
fn test_campaign_not_found_names_list_when_known() {
    let err = Error::CampaignNotFound {
        web_id: 42,
        list_name: Some("Weekly digest".to_owned()),
    };
    assert_eq!(
        err.to_string(),
        "No unsent campaign with web_id 42 found in list \"Weekly digest\""
    );

    let err = Error::CampaignNotFound {
        web_id: 42,
        list_name: None,
    };
    assert_eq!(err.to_string(), "No unsent campaign with web_id 42 found");
}

#[test]
fn test_error_variants_display() {
    let errors = vec![
        Error::InvalidDatacenter("US 6".to_owned()),
        Error::invalid_api_key("no datacenter suffix"),
        Error::missing_settings(["template_id"]),
        Error::missing_campaign_defaults("l1"),
    ];

    for err in errors {
        assert!(!err.to_string().is_empty());
    }
}

#[test]
fn test_error_debug() {
    let err = Error::missing_settings(["title"]);
    let debug_str = format!("{err:?}");
    assert!(debug_str.contains("MissingSettings"));
    assert!(debug_str.contains("title"));
}
