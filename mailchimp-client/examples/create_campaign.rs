//! Example of creating a campaign and attaching template content

use mailchimp_client::{ApiClient, Campaign, CampaignSettings, Datacenter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("MAILCHIMP_API_KEY")?;
    let api = ApiClient::new(Datacenter::from_api_key(&api_key)?, api_key.as_str())?;
    println!("Base URL: {}", api.base_url());

    let settings = CampaignSettings::new("4ca5becb8d", "2000020")
        .with_title("March newsletter")
        .with_subject("Fresh this month")
        .with_section("body", "<p>Hello readers!</p>");

    // Sender fields are left unset here, so creation pulls them from the
    // list's campaign defaults
    let mut campaign = Campaign::new(&api, settings).await?;
    let id = campaign.create().await?.to_owned();
    println!("Created campaign {id}");

    campaign.add_content().await?;
    println!("Content attached; campaign state: {}", campaign.state());

    Ok(())
}
