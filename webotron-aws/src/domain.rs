//! Route 53 hosted zones and alias records.

use aws_config::SdkConfig;
use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, ResourceRecordSet, RrType,
};
use aws_sdk_route53::Client;
use webotron_core::DomainName;

use crate::endpoints::WebsiteEndpoint;
use crate::error::{api_err, AwsError};

pub const RECORD_COMMENT: &str = "Created by webotron";

/// A Route 53 hosted zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    /// As returned by Route 53, e.g. `/hostedzone/Z123`.
    pub id: String,
    /// Fully qualified, with the trailing dot.
    pub name: String,
}

impl From<&aws_sdk_route53::types::HostedZone> for HostedZone {
    fn from(zone: &aws_sdk_route53::types::HostedZone) -> Self {
        Self {
            id: zone.id().to_owned(),
            name: zone.name().to_owned(),
        }
    }
}

/// The most specific zone in `zones` that `domain` belongs to.
pub fn pick_zone<'a>(zones: &'a [HostedZone], domain: &DomainName) -> Option<&'a HostedZone> {
    zones
        .iter()
        .filter(|z| domain.is_within_zone(&z.name))
        .max_by_key(|z| z.name.len())
}

/// Route 53 operations.
#[derive(Clone)]
pub struct DomainManager {
    client: Client,
}

impl DomainManager {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Every hosted zone in the account, across all pages.
    pub async fn all_zones(&self) -> Result<Vec<HostedZone>, AwsError> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let output = self
                .client
                .list_hosted_zones()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(api_err("ListHostedZones"))?;
            zones.extend(output.hosted_zones().iter().map(HostedZone::from));
            if !output.is_truncated() {
                break;
            }
            match output.next_marker() {
                Some(next) => marker = Some(next.to_owned()),
                None => break,
            }
        }
        Ok(zones)
    }

    /// The existing zone `domain` belongs to, if any.
    pub async fn find_hosted_zone(
        &self,
        domain: &DomainName,
    ) -> Result<Option<HostedZone>, AwsError> {
        let zones = self.all_zones().await?;
        Ok(pick_zone(&zones, domain).cloned())
    }

    /// Create the zone for `domain`'s last two labels. Each call sends a fresh
    /// caller reference, so retries of the same call are not deduplicated.
    pub async fn create_hosted_zone(&self, domain: &DomainName) -> Result<HostedZone, AwsError> {
        let zone_name = domain.zone_name();
        let output = self
            .client
            .create_hosted_zone()
            .name(&zone_name)
            .caller_reference(uuid::Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(api_err("CreateHostedZone"))?;
        let zone = output
            .hosted_zone()
            .map(HostedZone::from)
            .ok_or(AwsError::MissingField {
                operation: "CreateHostedZone",
                field: "HostedZone",
            })?;
        tracing::info!(zone = %zone.name, id = %zone.id, "created hosted zone");
        Ok(zone)
    }

    pub async fn find_or_create_hosted_zone(
        &self,
        domain: &DomainName,
    ) -> Result<HostedZone, AwsError> {
        match self.find_hosted_zone(domain).await? {
            Some(zone) => {
                tracing::info!(zone = %zone.name, id = %zone.id, "using existing hosted zone");
                Ok(zone)
            }
            None => self.create_hosted_zone(domain).await,
        }
    }

    /// Upsert an alias A record `domain` → `target`.
    pub async fn upsert_alias_record(
        &self,
        zone: &HostedZone,
        domain: &DomainName,
        target: &WebsiteEndpoint,
    ) -> Result<(), AwsError> {
        let batch = alias_change_batch(domain, target)?;
        self.client
            .change_resource_record_sets()
            .hosted_zone_id(&zone.id)
            .change_batch(batch)
            .send()
            .await
            .map_err(api_err("ChangeResourceRecordSets"))?;
        tracing::info!(domain = %domain, target = target.host, "upserted alias record");
        Ok(())
    }
}

fn alias_change_batch(domain: &DomainName, target: &WebsiteEndpoint) -> Result<ChangeBatch, AwsError> {
    let build = api_err::<aws_sdk_route53::error::BuildError>;
    let alias = AliasTarget::builder()
        .hosted_zone_id(target.zone_id)
        .dns_name(target.host)
        .evaluate_target_health(false)
        .build()
        .map_err(build("ChangeResourceRecordSets"))?;
    let record = ResourceRecordSet::builder()
        .name(domain.as_str())
        .r#type(RrType::A)
        .alias_target(alias)
        .build()
        .map_err(build("ChangeResourceRecordSets"))?;
    let change = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record)
        .build()
        .map_err(build("ChangeResourceRecordSets"))?;
    ChangeBatch::builder()
        .comment(RECORD_COMMENT)
        .changes(change)
        .build()
        .map_err(build("ChangeResourceRecordSets"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::website_endpoint;

    fn zone(id: &str, name: &str) -> HostedZone {
        HostedZone {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn picks_most_specific_zone() {
        let zones = vec![
            zone("Z1", "example.com."),
            zone("Z2", "shop.example.com."),
            zone("Z3", "other.org."),
        ];
        let domain = DomainName::parse("www.shop.example.com").unwrap();
        assert_eq!(pick_zone(&zones, &domain).unwrap().id, "Z2");

        let apex = DomainName::parse("example.com").unwrap();
        assert_eq!(pick_zone(&zones, &apex).unwrap().id, "Z1");
    }

    #[test]
    fn no_zone_for_unrelated_domain() {
        let zones = vec![zone("Z1", "example.com.")];
        let domain = DomainName::parse("badexample.com").unwrap();
        assert!(pick_zone(&zones, &domain).is_none());
    }

    #[test]
    fn alias_batch_targets_website_endpoint() {
        let domain = DomainName::parse("www.example.com").unwrap();
        let endpoint = website_endpoint("us-east-1").unwrap();
        let batch = alias_change_batch(&domain, &endpoint).unwrap();

        assert_eq!(batch.comment(), Some(RECORD_COMMENT));
        let change = &batch.changes()[0];
        assert_eq!(change.action(), &ChangeAction::Upsert);
        let record = change.resource_record_set().unwrap();
        assert_eq!(record.name(), "www.example.com");
        assert_eq!(record.r#type(), &RrType::A);
        let alias = record.alias_target().unwrap();
        assert_eq!(alias.dns_name(), endpoint.host);
        assert_eq!(alias.hosted_zone_id(), endpoint.zone_id);
        assert!(!alias.evaluate_target_health());
    }
}
