//! ACM certificate lookup.

use aws_config::SdkConfig;
use aws_sdk_acm::config::Region;
use aws_sdk_acm::types::CertificateStatus;
use aws_sdk_acm::Client;
use webotron_core::DomainName;

use crate::error::{api_err, AwsError};

/// CloudFront only accepts certificates issued in this region.
pub const CERTIFICATE_REGION: &str = "us-east-1";

/// An issued certificate covering a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub arn: String,
    pub domain_name: Option<String>,
    pub subject_alternative_names: Vec<String>,
}

/// Whether any of `names` covers `domain`, exactly or by wildcard.
pub fn covers(names: &[String], domain: &DomainName) -> bool {
    names.iter().any(|name| domain.matches_certificate_name(name))
}

/// ACM operations, always against [`CERTIFICATE_REGION`].
#[derive(Clone)]
pub struct CertificateManager {
    client: Client,
}

impl CertificateManager {
    pub fn new(config: &SdkConfig) -> Self {
        let acm_config = aws_sdk_acm::config::Builder::from(config)
            .region(Region::new(CERTIFICATE_REGION))
            .build();
        Self {
            client: Client::from_conf(acm_config),
        }
    }

    /// The first issued certificate whose subject alternative names cover
    /// `domain`, scanning every page of the certificate list.
    pub async fn find_certificate_for_domain(
        &self,
        domain: &DomainName,
    ) -> Result<Option<Certificate>, AwsError> {
        let mut pages = self
            .client
            .list_certificates()
            .certificate_statuses(CertificateStatus::Issued)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(api_err("ListCertificates"))?;
            for summary in page.certificate_summary_list() {
                let Some(arn) = summary.certificate_arn() else { continue };
                let certificate = self.describe(arn).await?;
                if covers(&certificate.subject_alternative_names, domain) {
                    tracing::info!(domain = %domain, arn, "found matching certificate");
                    return Ok(Some(certificate));
                }
            }
        }
        tracing::info!(domain = %domain, "no issued certificate matches");
        Ok(None)
    }

    async fn describe(&self, arn: &str) -> Result<Certificate, AwsError> {
        let output = self
            .client
            .describe_certificate()
            .certificate_arn(arn)
            .send()
            .await
            .map_err(api_err("DescribeCertificate"))?;
        let detail = output.certificate().ok_or(AwsError::MissingField {
            operation: "DescribeCertificate",
            field: "Certificate",
        })?;
        Ok(Certificate {
            arn: arn.to_owned(),
            domain_name: detail.domain_name().map(str::to_owned),
            subject_alternative_names: detail.subject_alternative_names().to_vec(),
        })
    }
}
