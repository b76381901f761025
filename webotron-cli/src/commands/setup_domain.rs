//! `webotron setup-domain`: alias a domain to a bucket website.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use webotron_aws::{BucketManager, DomainManager};
use webotron_core::{BucketName, DomainName};

use super::AppContext;

/// Arguments for `webotron setup-domain`.
#[derive(Args, Debug)]
pub struct SetupDomainArgs {
    /// Domain to point at the bucket, e.g. `www.example.com`.
    pub domain: DomainName,

    /// Website bucket serving the domain. Usually named after the domain.
    pub bucket: BucketName,
}

impl SetupDomainArgs {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let sdk = ctx.sdk_config().await;
        let endpoint = BucketManager::new(&sdk)
            .website_endpoint(&self.bucket)
            .await
            .with_context(|| format!("failed to locate website endpoint of '{}'", self.bucket))?;

        let domains = DomainManager::new(&sdk);
        let zone = domains
            .find_or_create_hosted_zone(&self.domain)
            .await
            .with_context(|| format!("failed to find or create a hosted zone for {}", self.domain))?;
        domains
            .upsert_alias_record(&zone, &self.domain, &endpoint)
            .await
            .with_context(|| format!("failed to upsert alias record for {}", self.domain))?;

        println!(
            "{} {} → {} (zone {})",
            "✓".green(),
            self.domain,
            endpoint.host,
            zone.name
        );
        println!("http://{}", self.domain);
        Ok(())
    }
}
