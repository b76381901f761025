//! `webotron find-cert`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use webotron_aws::CertificateManager;
use webotron_core::DomainName;

use super::AppContext;

/// Arguments for `webotron find-cert`.
#[derive(Args, Debug)]
pub struct FindCertArgs {
    /// Domain the certificate must cover.
    pub domain: DomainName,
}

impl FindCertArgs {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let sdk = ctx.sdk_config().await;
        let found = CertificateManager::new(&sdk)
            .find_certificate_for_domain(&self.domain)
            .await
            .with_context(|| format!("failed to search certificates for {}", self.domain))?;

        match found {
            Some(cert) => println!("{}", cert.arn),
            None => println!(
                "{} no issued certificate covers {}",
                "✗".yellow(),
                self.domain
            ),
        }
        Ok(())
    }
}
