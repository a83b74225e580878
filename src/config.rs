use std::path::Path;

use facet::Facet;

use crate::error::BotError;
use crate::paths;

/// Regions that host the always-free e2-micro instance.
pub const FREE_TIER_REGIONS: [&str; 3] = ["us-west1", "us-east1", "us-central1"];

/// Optional user settings, read from `gcvm.toml`.
#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct Settings {
    /// Binary (name on PATH, or a path) used for every cloud operation.
    #[facet(default = "gcloud")]
    pub gcloud: String,
    /// Regions searched for a free-tier zone. Empty means [`FREE_TIER_REGIONS`].
    #[facet(default)]
    pub regions: Vec<String>,
    /// Name prefix for machine types offered by the custom path.
    #[facet(default = "e2")]
    pub machine_family: String,
    #[facet(default = 200)]
    pub custom_disk_gb: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gcloud: "gcloud".into(),
            regions: Vec::new(),
            machine_family: "e2".into(),
            custom_disk_gb: 200,
        }
    }
}

impl Settings {
    pub fn regions(&self) -> Vec<String> {
        if self.regions.is_empty() {
            FREE_TIER_REGIONS.iter().map(|r| r.to_string()).collect()
        } else {
            self.regions.clone()
        }
    }
}

// ── validation ────────────────────────────────────────────

fn validate_settings(settings: &Settings) -> Result<(), BotError> {
    if settings.gcloud.trim().is_empty() {
        return Err(BotError::Validation {
            message: "gcloud must not be empty".into(),
        });
    }
    if let Some(r) = settings.regions.iter().find(|r| r.trim().is_empty() || r.contains(' ')) {
        return Err(BotError::Validation {
            message: format!("invalid region '{r}'"),
        });
    }
    let family_ok = !settings.machine_family.is_empty()
        && settings
            .machine_family
            .chars()
            .all(|c| c.is_ascii_alphanumeric());
    if !family_ok {
        return Err(BotError::Validation {
            message: format!(
                "machine_family must be non-empty and alphanumeric (got '{}')",
                settings.machine_family
            ),
        });
    }
    if settings.custom_disk_gb < 10 {
        return Err(BotError::Validation {
            message: "custom_disk_gb must be at least 10".into(),
        });
    }
    Ok(())
}

// ── public API ────────────────────────────────────────────

/// Load settings from `path`, or from the default location when `None`.
///
/// An explicitly given file must exist; a missing default file yields defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, BotError> {
    match path {
        Some(p) => read_settings(p),
        None => {
            let default = paths::settings_path();
            if default.exists() {
                read_settings(&default)
            } else {
                Ok(Settings::default())
            }
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings, BotError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BotError::ConfigLoad {
        path: path.display().to_string(),
        source,
    })?;

    let settings: Settings =
        facet_toml::from_str(&contents).map_err(|e| BotError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    validate_settings(&settings)?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_settings(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("gcvm.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn default_regions_are_free_tier() {
        let settings = Settings::default();
        assert_eq!(
            settings.regions(),
            vec!["us-west1", "us-east1", "us-central1"]
        );
    }

    #[test]
    fn configured_regions_replace_defaults() {
        let settings = Settings {
            regions: vec!["europe-west1".into()],
            ..Settings::default()
        };
        assert_eq!(settings.regions(), vec!["europe-west1"]);
    }

    #[test]
    fn parse_full_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            &dir,
            r#"
gcloud = "/opt/google-cloud-sdk/bin/gcloud"
regions = ["us-west1"]
machine_family = "n2"
custom_disk_gb = 50
"#,
        );
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.gcloud, "/opt/google-cloud-sdk/bin/gcloud");
        assert_eq!(settings.regions, vec!["us-west1"]);
        assert_eq!(settings.machine_family, "n2");
        assert_eq!(settings.custom_disk_gb, 50);
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "machine_family = \"n2d\"\n");
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.gcloud, "gcloud");
        assert_eq!(settings.machine_family, "n2d");
        assert_eq!(settings.custom_disk_gb, 200);
        assert!(settings.regions.is_empty());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, BotError::ConfigLoad { .. }));
    }

    #[test]
    fn malformed_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "custom_disk_gb = \"lots\"\n");
        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, BotError::ConfigParse { .. }));
    }

    #[test]
    fn small_disk_rejected() {
        let settings = Settings {
            custom_disk_gb: 5,
            ..Settings::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn bad_machine_family_rejected() {
        for family in ["", "e2-", "n 2"] {
            let settings = Settings {
                machine_family: family.into(),
                ..Settings::default()
            };
            assert!(validate_settings(&settings).is_err(), "{family:?}");
        }
    }

    #[test]
    fn blank_region_rejected() {
        let settings = Settings {
            regions: vec!["us-west1".into(), " ".into()],
            ..Settings::default()
        };
        assert!(validate_settings(&settings).is_err());
    }
}
