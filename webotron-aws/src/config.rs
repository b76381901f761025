//! Shared SDK configuration.

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;

/// Used when neither the caller nor the environment names a region.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Load credentials and region once; every client in the process is built
/// from the returned handle.
///
/// `profile` selects a named profile from the shared AWS config files;
/// `region` overrides the SDK's region chain.
pub async fn load_sdk_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(region.map(|r| Region::new(r.to_owned())))
        .or_default_provider()
        .or_else(FALLBACK_REGION);

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    let config = loader.load().await;
    tracing::debug!(
        profile = profile.unwrap_or("default"),
        region = config.region().map(|r| r.as_ref()).unwrap_or(FALLBACK_REGION),
        "loaded AWS configuration"
    );
    config
}
