use std::io::IsTerminal;

use clap::Parser;

use gcvm::bootstrap::{Bootstrap, CloudConfig};
use gcvm::cli::{Cli, Command};
use gcvm::config;
use gcvm::entropy::ThreadEntropy;
use gcvm::error::BotError;
use gcvm::gcloud::{self, GcloudCli};
use gcvm::logging;
use gcvm::paths;
use gcvm::terminal::ConsoleTerminal;
use gcvm::wizard::Wizard;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
        .inspect_err(|e| tracing::error!(error = %e, "run failed"))
        .map_err(Into::into)
}

fn run(cli: Cli) -> Result<(), BotError> {
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(binary) = cli.gcloud {
        settings.gcloud = binary;
    }

    let binary = gcloud::locate(&settings.gcloud)?;
    // The spinner would fight with log lines for the terminal.
    let spinner = !cli.verbose && std::io::stderr().is_terminal();
    let runner = GcloudCli::new(binary, spinner);
    let mut term = ConsoleTerminal::new();

    match cli.command.unwrap_or(Command::Create) {
        Command::Check => {
            let cloud = Bootstrap::new(&runner, &mut term, paths::gcloud_config_dir()).check()?;
            print_cloud_config(&cloud);
        }
        Command::Create => {
            let cloud = Bootstrap::new(&runner, &mut term, paths::gcloud_config_dir()).run()?;
            let mut entropy = ThreadEntropy;
            Wizard::new(&runner, &mut term, &mut entropy, &cloud, &settings).run()?;
        }
    }

    Ok(())
}

fn print_cloud_config(cloud: &CloudConfig) {
    let show = |v: &str| if v.is_empty() { "(unset)".to_string() } else { v.to_string() };
    println!("gcloud is ready.");
    println!("  Project: {}", show(&cloud.project));
    println!("  Zone:    {}", show(&cloud.zone));
    println!("  Region:  {}", show(&cloud.region));
}
