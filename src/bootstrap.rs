//! Startup checks run before the wizard: gcloud configuration, auth, billing.

use std::path::PathBuf;

use crate::error::BotError;
use crate::gcloud::GcloudRunner;
use crate::terminal::{self, Terminal};

const WELCOME: &str = ">>> Welcome to the Google Cloud Terminal Robot, press Enter to proceed";
const BILLING_DOCS: &str =
    "https://cloud.google.com/billing/docs/how-to/create-billing-account#create-new-billing-account";

/// Defaults read from gcloud's own configuration store. Read-only after startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudConfig {
    pub project: String,
    pub zone: String,
    pub region: String,
}

pub struct Bootstrap<'a> {
    gcloud: &'a dyn GcloudRunner,
    term: &'a mut dyn Terminal,
    config_dir: PathBuf,
}

impl<'a> Bootstrap<'a> {
    /// `config_dir` is gcloud's configuration directory, created if missing.
    pub fn new(gcloud: &'a dyn GcloudRunner, term: &'a mut dyn Terminal, config_dir: PathBuf) -> Self {
        Self {
            gcloud,
            term,
            config_dir,
        }
    }

    /// Full startup for the create flow, ending with the requirements prompt.
    pub fn run(mut self) -> Result<CloudConfig, BotError> {
        terminal::pause(&mut *self.term, WELCOME)?;
        let cloud = self.resolve_config()?;
        self.check_auth()?;
        self.check_billing(&cloud);
        self.confirm_requirements()?;
        Ok(cloud)
    }

    /// Non-interactive variant: same checks, no welcome or requirements prompt
    /// (unless the zone is missing and `gcloud init` has to run).
    pub fn check(mut self) -> Result<CloudConfig, BotError> {
        let cloud = self.resolve_config()?;
        self.check_auth()?;
        self.check_billing(&cloud);
        Ok(cloud)
    }

    /// Load the configuration, running `gcloud init` once if no zone is set.
    pub fn resolve_config(&mut self) -> Result<CloudConfig, BotError> {
        let cloud = self.load_config()?;
        if !cloud.zone.is_empty() {
            return Ok(cloud);
        }

        self.initialize()?;
        let cloud = self.load_config()?;
        if cloud.zone.is_empty() {
            return Err(BotError::ZoneUnset);
        }
        Ok(cloud)
    }

    pub fn load_config(&self) -> Result<CloudConfig, BotError> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir).map_err(|source| BotError::Io {
                context: format!("creating config directory {}", self.config_dir.display()),
                source,
            })?;
            tracing::info!(path = %self.config_dir.display(), "created gcloud config directory");
        }

        let cloud = CloudConfig {
            zone: self.get_value("compute/zone"),
            region: self.get_value("compute/region"),
            project: self.get_value("project"),
        };
        tracing::info!(
            zone = %cloud.zone,
            region = %cloud.region,
            project = %cloud.project,
            "loaded gcloud configuration"
        );
        Ok(cloud)
    }

    fn get_value(&self, key: &str) -> String {
        match self.gcloud.run(&["config", "get-value", key]) {
            Ok(output) => config_value(&output),
            Err(e) => {
                tracing::debug!(key, error = %e, "config get-value failed");
                String::new()
            }
        }
    }

    fn initialize(&mut self) -> Result<(), BotError> {
        self.term.say(
            "We cannot detect a Zone in your configuration, so let us help you with configuration.",
        );
        self.term.say(
            "Please remember to configure your zone as us-west1-[a,b,c], us-central1-[a,b,c], \
             or us-east1-[a,b,c] especially if you need the Google free VM",
        );
        terminal::pause(&mut *self.term, "Press Enter to proceed...")?;

        self.gcloud
            .run_interactive(&["init"])
            .map_err(|source| BotError::GcloudInit { source })
    }

    /// Fails unless gcloud reports at least one active account.
    pub fn check_auth(&self) -> Result<(), BotError> {
        match self.gcloud.run(&[
            "auth",
            "list",
            "--filter=status:ACTIVE",
            "--format=value(account)",
        ]) {
            Ok(output) if !output.trim().is_empty() => Ok(()),
            Ok(_) => Err(BotError::NotAuthenticated),
            Err(e) => {
                tracing::debug!(error = %e, "auth list failed");
                Err(BotError::NotAuthenticated)
            }
        }
    }

    /// Warn (without failing) when billing does not look enabled. Returns
    /// whether a warning was shown.
    pub fn check_billing(&mut self, cloud: &CloudConfig) -> bool {
        if cloud.project.is_empty() {
            return false;
        }

        let enabled = self
            .gcloud
            .run(&["beta", "billing", "projects", "describe", cloud.project.as_str()])
            .is_ok_and(|output| output.contains("billingEnabled: true"));
        if enabled {
            return false;
        }

        tracing::warn!(project = %cloud.project, "billing not detected");
        self.term
            .say("Warning: Billing might not be enabled for this project");
        true
    }

    pub fn confirm_requirements(&mut self) -> Result<(), BotError> {
        self.term.say("Requirement(s):");
        self.term
            .say("1) You must have attached billing to your project of choice.");
        self.term
            .say(&format!("For more information, visit: {BILLING_DOCS}"));

        if terminal::confirm(&mut *self.term, "Have you met the requirements above?")? {
            Ok(())
        } else {
            Err(BotError::RequirementsDeclined)
        }
    }
}

/// Extract the value from `gcloud config get-value` output.
///
/// stderr is mixed in, so skip gcloud's notices; `(unset)` means empty.
fn config_value(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("Your active configuration is"))
        .filter(|v| *v != "(unset)")
        .unwrap_or_default()
        .to_string()
}
