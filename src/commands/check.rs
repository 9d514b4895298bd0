//! Validate the remote site-data document

use anyhow::Result;

use crate::remote::SiteDataClient;
use crate::Site;

/// Fetch the configured document and report whether it is usable
pub async fn run(site: &Site) -> Result<()> {
    let client = SiteDataClient::from_config(&site.config)?;
    let check = client.check().await;

    println!("{}", serde_json::to_string_pretty(&check)?);
    if !check.success {
        anyhow::bail!(
            "Site data check failed for {}: {}",
            check.url,
            check.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
