//! `webotron config show|init`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use webotron_core::settings::{self, Settings};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings and where they come from.
    Show,

    /// Write a settings file with defaults. `--profile`/`--region` are stored too.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(command: ConfigCommand, profile: Option<String>, region: Option<String>) -> Result<()> {
    let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
    let path = settings::settings_path_at(&home);

    match command {
        ConfigCommand::Show => {
            let settings = settings::load_at(&home)
                .with_context(|| format!("failed to load {}", path.display()))?;
            if path.exists() {
                println!("# {}", path.display());
            } else {
                println!("# {} (not found, showing defaults)", path.display());
            }
            print!(
                "{}",
                serde_yaml::to_string(&settings).context("failed to serialize settings")?
            );
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            let settings = Settings {
                profile,
                region,
                ..Settings::default()
            };
            let written = settings::save_at(&home, &settings)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} wrote {}", "✓".green(), written.display());
        }
    }
    Ok(())
}
