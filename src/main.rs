use anyhow::Context;
use env_logger::Env;
use listing_walker::{
    configuration::get_configuration,
    services::{save_to_json, Droid, ListingWalker},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    log::info!("Starting scraper");

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let droid = Droid::new(&configuration.browser).await?;
    let start_url = configuration.listing.start_url.clone();
    let records = ListingWalker::new(droid, &configuration)
        .walk(start_url.as_str())
        .await;

    save_to_json(&records, &configuration.output.path)?;
    log::info!("Scraping complete");

    Ok(())
}
