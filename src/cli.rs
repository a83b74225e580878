use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gcvm",
    version,
    about = "Guided virtual machine provisioning on Google Cloud via gcloud"
)]
pub struct Cli {
    /// Path to settings file (default: ~/.config/gcvm/gcvm.toml, optional)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// gcloud binary to run, by name or path (overrides settings)
    #[arg(long)]
    pub gcloud: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Walk through creating a VM (the default)
    Create,

    /// Verify gcloud is installed, configured and authenticated
    Check,
}
