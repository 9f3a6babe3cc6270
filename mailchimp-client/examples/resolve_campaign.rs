//! Example of adopting an existing unsent campaign by its web ID

use mailchimp_client::{ApiClient, Campaign, CampaignSettings, Datacenter, MailingList};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("MAILCHIMP_API_KEY")?;
    let api = ApiClient::new(Datacenter::from_api_key(&api_key)?, api_key.as_str())?;

    let list = MailingList::new(&api, "4ca5becb8d");
    let info = list.info(Some(&["name"])).await?;
    println!("Searching unsent campaigns in \"{}\"", info.name);

    // The web ID is the human-facing number shown in the provider UI; the
    // lookup maps it back to the primary campaign ID
    let settings = CampaignSettings::new("4ca5becb8d", "2000020")
        .with_web_id(1_234_567)
        .with_section("body", "<p>Hello again!</p>");

    let mut campaign = Campaign::new(&api, settings).await?;
    println!("Adopted campaign {:?}", campaign.id());

    campaign.add_content().await?;
    println!("Content refreshed; campaign state: {}", campaign.state());

    Ok(())
}
