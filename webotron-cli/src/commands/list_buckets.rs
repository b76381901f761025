//! `webotron list-buckets`

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use webotron_aws::bucket::BucketSummary;
use webotron_aws::BucketManager;

use super::AppContext;

/// Arguments for `webotron list-buckets`.
#[derive(Args, Debug)]
pub struct ListBucketsArgs {
    /// Show a table with creation dates.
    #[arg(long, conflicts_with = "json")]
    pub long: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct BucketRow {
    #[tabled(rename = "bucket")]
    name: String,
    #[tabled(rename = "created", display_with = "display_created")]
    created: Option<String>,
}

fn display_created(created: &Option<String>) -> String {
    created.clone().unwrap_or_else(|| "-".to_string())
}

impl From<BucketSummary> for BucketRow {
    fn from(b: BucketSummary) -> Self {
        Self {
            name: b.name,
            created: b.created,
        }
    }
}

impl ListBucketsArgs {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let sdk = ctx.sdk_config().await;
        let buckets = BucketManager::new(&sdk)
            .all_buckets()
            .await
            .context("failed to list buckets")?;
        let rows: Vec<BucketRow> = buckets.into_iter().map(BucketRow::from).collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize buckets")?
            );
        } else if self.long {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        } else {
            for row in rows {
                println!("{}", row.name);
            }
        }
        Ok(())
    }
}
