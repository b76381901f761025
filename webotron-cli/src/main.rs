//! Webotron: deploy static websites to S3.
//!
//! # Usage
//!
//! ```text
//! webotron list-buckets [--long|--json]
//! webotron list-bucket-objects <bucket> [--long|--json]
//! webotron setup-bucket <bucket> [--index <path>]
//! webotron sync <pathname> <bucket> [--dry-run]
//! webotron setup-domain <domain> <bucket>
//! webotron find-cert <domain>
//! webotron config show|init
//! ```
//!
//! Global flags: `--profile <name>`, `--region <name>`, `-v`/`-vv`.

mod commands;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use webotron_core::settings;

use commands::{
    config::ConfigCommand, find_cert::FindCertArgs, list_buckets::ListBucketsArgs,
    list_objects::ListObjectsArgs, setup_bucket::SetupBucketArgs,
    setup_domain::SetupDomainArgs, sync::SyncArgs, AppContext,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "webotron",
    version,
    about = "Deploy static websites to S3",
    long_about = None,
)]
struct Cli {
    /// AWS profile to use (overrides `profile` in ~/.webotron/config.yaml).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// AWS region to use (overrides `region` in ~/.webotron/config.yaml).
    #[arg(long, global = true)]
    region: Option<String>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Aws(AwsCommand),

    /// Show or create ~/.webotron/config.yaml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Commands that talk to AWS and need the async runtime.
#[derive(Subcommand, Debug)]
enum AwsCommand {
    /// List every bucket in the account.
    ListBuckets(ListBucketsArgs),

    /// List every object key in a bucket.
    ListBucketObjects(ListObjectsArgs),

    /// Create a bucket and configure it as a public static website.
    SetupBucket(SetupBucketArgs),

    /// Upload new and changed files from a directory to a bucket.
    Sync(SyncArgs),

    /// Point a domain at a bucket's website endpoint through Route 53.
    SetupDomain(SetupDomainArgs),

    /// Find an issued ACM certificate covering a domain.
    FindCert(FindCertArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Config { command } => commands::config::run(command, cli.profile, cli.region),
        Commands::Aws(command) => run_aws(command, cli.profile, cli.region),
    }
}

fn run_aws(command: AwsCommand, profile: Option<String>, region: Option<String>) -> Result<()> {
    let settings = settings::load().context("failed to load ~/.webotron/config.yaml")?;
    let ctx = AppContext::new(settings, profile, region);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(async move {
        match command {
            AwsCommand::ListBuckets(args) => args.run(&ctx).await,
            AwsCommand::ListBucketObjects(args) => args.run(&ctx).await,
            AwsCommand::SetupBucket(args) => args.run(&ctx).await,
            AwsCommand::Sync(args) => args.run(&ctx).await,
            AwsCommand::SetupDomain(args) => args.run(&ctx).await,
            AwsCommand::FindCert(args) => args.run(&ctx).await,
        }
    })
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
