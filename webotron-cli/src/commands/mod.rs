pub mod config;
pub mod find_cert;
pub mod list_buckets;
pub mod list_objects;
pub mod setup_bucket;
pub mod setup_domain;
pub mod sync;

use webotron_aws::{load_sdk_config, SdkConfig};
use webotron_core::Settings;

/// Settings plus global flag overrides, shared by every AWS command.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Settings,
    profile: Option<String>,
    region: Option<String>,
}

impl AppContext {
    pub fn new(settings: Settings, profile: Option<String>, region: Option<String>) -> Self {
        Self {
            profile: profile.or_else(|| settings.profile.clone()),
            region: region.or_else(|| settings.region.clone()),
            settings,
        }
    }

    /// Load the AWS configuration. Every client of one command shares it.
    pub async fn sdk_config(&self) -> SdkConfig {
        load_sdk_config(self.profile.as_deref(), self.region.as_deref()).await
    }
}
