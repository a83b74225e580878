use miette::Diagnostic;
use thiserror::Error;

/// A `gcloud` invocation that could not be spawned or exited unsuccessfully.
///
/// Carries whatever the tool printed so callers can relay it to the user.
#[derive(Debug, Error, Diagnostic)]
#[error("`{command}` {reason}")]
pub struct CommandError {
    pub command: String,
    pub reason: String,
    pub output: String,
}

#[derive(Debug, Error, Diagnostic)]
pub enum BotError {
    #[error("failed to load settings from {path}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("gcloud CLI not found: {binary}")]
    #[diagnostic(help("install the Google Cloud SDK: https://cloud.google.com/sdk/docs/install"))]
    GcloudNotFound { binary: String },

    #[error("failed to initialize gcloud")]
    GcloudInit {
        #[source]
        source: CommandError,
    },

    #[error("zone is still not set after initialization")]
    #[diagnostic(help("run `gcloud config set compute/zone <zone>`"))]
    ZoneUnset,

    #[error("you are not authenticated with gcloud")]
    #[diagnostic(help("run `gcloud auth login` first"))]
    NotAuthenticated,

    #[error("requirements not met")]
    RequirementsDeclined,

    #[error("failed to get {what}")]
    Discovery {
        what: String,
        #[source]
        source: CommandError,
    },

    #[error("no zones are up in regions {regions}")]
    NoZones { regions: String },

    #[error("{machine_type} is not available in zone {zone}")]
    MachineTypeUnavailable { machine_type: String, zone: String },

    #[error("no machine types found with {ram_gb}GB RAM in zone {zone}")]
    NoMachineTypes { ram_gb: u32, zone: String },

    #[error("VM creation cancelled by user")]
    CreationCancelled,

    #[error("failed to create VM: {source}\nOutput: {output}")]
    CreateFailed {
        #[source]
        source: CommandError,
        output: String,
    },

    #[error("prompt cancelled")]
    Cancelled,

    #[error("input closed before an answer was given")]
    InputClosed,
}
