//! The provisioning walk-through: prompts → [`VmConfig`] → one
//! `gcloud compute instances create` call.

use crate::bootstrap::CloudConfig;
use crate::config::Settings;
use crate::entropy::Entropy;
use crate::error::BotError;
use crate::gcloud::GcloudRunner;
use crate::terminal::{self, Terminal};

pub const FREE_TIER_MACHINE_TYPE: &str = "e2-micro";
pub const FREE_TIER_DISK_GB: u32 = 30;

/// RAM sizes (GB) offered for custom machines.
pub const RAM_SIZES_GB: [u32; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

const NAME_SUFFIX_BOUND: usize = 10_000;

/// Flags added to every instance for shielded boot.
const SHIELDED_FLAGS: [&str; 3] = [
    "--shielded-secure-boot",
    "--shielded-vtpm",
    "--shielded-integrity-monitoring",
];

// ── types ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsImage {
    pub family: &'static str,
    pub project: &'static str,
}

pub const DEBIAN: OsImage = OsImage {
    family: "debian-11",
    project: "debian-cloud",
};

pub const UBUNTU: OsImage = OsImage {
    family: "ubuntu-2204-lts",
    project: "ubuntu-os-cloud",
};

pub const ROCKY: OsImage = OsImage {
    family: "rocky-linux-9",
    project: "rocky-linux-cloud",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmClass {
    FreeTier,
    Custom,
}

/// Everything needed for the create command. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    pub name: String,
    pub zone: String,
    pub machine_type: String,
    pub image_family: String,
    pub image_project: String,
    pub disk_size_gb: u32,
    pub free_tier: bool,
}

impl VmConfig {
    /// Arguments for `gcloud compute instances create`.
    pub fn create_args(&self) -> Vec<String> {
        let mut args = vec![
            "compute".to_string(),
            "instances".to_string(),
            "create".to_string(),
            self.name.clone(),
            format!("--image-family={}", self.image_family),
            format!("--image-project={}", self.image_project),
            format!("--machine-type={}", self.machine_type),
            format!("--boot-disk-size={}GB", self.disk_size_gb),
            format!("--zone={}", self.zone),
        ];
        args.extend(SHIELDED_FLAGS.iter().map(|f| f.to_string()));
        if self.free_tier {
            args.push("--provisioning-model=STANDARD".to_string());
        }
        args
    }
}

// ── input rules ──────────────────────────────────────────

pub fn is_valid_ram(ram_gb: i64) -> bool {
    ram_size(ram_gb).is_some()
}

/// The whitelisted RAM size in GB, if `ram_gb` is one.
pub fn ram_size(ram_gb: i64) -> Option<u32> {
    u32::try_from(ram_gb)
        .ok()
        .filter(|r| RAM_SIZES_GB.contains(r))
}

/// Lowercase, spaces to hyphens, then a random `-<0..10000>` suffix.
/// The suffix makes collisions unlikely, not impossible.
pub fn sanitize_name(raw: &str, entropy: &mut dyn Entropy) -> String {
    let base = raw.replace(' ', "-").to_lowercase();
    format!("{base}-{}", entropy.below(NAME_SUFFIX_BOUND))
}

/// "2" → Ubuntu, "3" → Rocky Linux, anything else → Debian.
pub fn os_for_choice(choice: &str) -> OsImage {
    match choice {
        "2" => UBUNTU,
        "3" => ROCKY,
        _ => DEBIAN,
    }
}

fn parse_class(input: &str) -> Option<VmClass> {
    match input.parse::<u8>().ok()? {
        1 => Some(VmClass::FreeTier),
        2 => Some(VmClass::Custom),
        _ => None,
    }
}

/// The default zone when it is listed, otherwise a random listed zone.
/// `None` only for an empty list.
pub fn choose_zone(zones: &[String], default_zone: &str, entropy: &mut dyn Entropy) -> Option<String> {
    if !default_zone.is_empty() && zones.iter().any(|z| z == default_zone) {
        return Some(default_zone.to_string());
    }
    if zones.is_empty() {
        return None;
    }
    Some(zones[entropy.below(zones.len())].clone())
}

fn zone_filter(regions: &[String]) -> String {
    let clauses: Vec<String> = regions.iter().map(|r| format!("region:{r}")).collect();
    format!("--filter=({}) AND status=UP", clauses.join(" OR "))
}

fn machine_type_filter(zone: &str, memory_mb: u32, family: &str) -> String {
    format!("--filter=zone:{zone} AND memoryMb={memory_mb} AND name ~ ^{family}")
}

// ── wizard ───────────────────────────────────────────────

pub struct Wizard<'a> {
    gcloud: &'a dyn GcloudRunner,
    term: &'a mut dyn Terminal,
    entropy: &'a mut dyn Entropy,
    cloud: &'a CloudConfig,
    settings: &'a Settings,
}

impl<'a> Wizard<'a> {
    pub fn new(
        gcloud: &'a dyn GcloudRunner,
        term: &'a mut dyn Terminal,
        entropy: &'a mut dyn Entropy,
        cloud: &'a CloudConfig,
        settings: &'a Settings,
    ) -> Self {
        Self {
            gcloud,
            term,
            entropy,
            cloud,
            settings,
        }
    }

    /// Walk through every prompt and create the VM. Returns gcloud's output.
    pub fn run(&mut self) -> Result<String, BotError> {
        self.term
            .say(">>> This walk-through will help you easily setup a VM on Google Cloud");

        let name = self.prompt_name()?;
        let vm = match self.choose_class()? {
            VmClass::FreeTier => self.free_tier_config(name)?,
            VmClass::Custom => self.custom_config(name)?,
        };
        self.create(&vm)
    }

    pub fn prompt_name(&mut self) -> Result<String, BotError> {
        self.term.say(
            "\nFirstly, type the unique name you would like to call this machine (no spaces):",
        );
        let raw = self.term.ask("Machine name:")?;
        let name = sanitize_name(&raw, &mut *self.entropy);
        tracing::debug!(%raw, %name, "sanitized machine name");
        Ok(name)
    }

    pub fn choose_class(&mut self) -> Result<VmClass, BotError> {
        self.term.say("\nSecondly, what type of machine do you want?");
        self.term.say("1. The Free Instance VM (e2-micro)");
        self.term.say("2. To setup a custom machine");
        loop {
            let input = self.term.ask("Choice:")?;
            if let Some(class) = parse_class(&input) {
                return Ok(class);
            }
            self.term.say("Please enter either 1 or 2");
        }
    }

    pub fn free_tier_config(&mut self, name: String) -> Result<VmConfig, BotError> {
        let regions = self.settings.regions();
        let zones = self.list_zones(&regions)?;
        let zone = choose_zone(&zones, &self.cloud.zone, &mut *self.entropy).ok_or_else(|| {
            BotError::NoZones {
                regions: regions.join(", "),
            }
        })?;
        tracing::info!(%zone, "selected free-tier zone");

        if !self.machine_type_available(&zone, FREE_TIER_MACHINE_TYPE) {
            return Err(BotError::MachineTypeUnavailable {
                machine_type: FREE_TIER_MACHINE_TYPE.into(),
                zone,
            });
        }

        Ok(VmConfig {
            name,
            zone,
            machine_type: FREE_TIER_MACHINE_TYPE.into(),
            image_family: DEBIAN.family.into(),
            image_project: DEBIAN.project.into(),
            disk_size_gb: FREE_TIER_DISK_GB,
            free_tier: true,
        })
    }

    pub fn custom_config(&mut self, name: String) -> Result<VmConfig, BotError> {
        let os = self.choose_os()?;
        let ram_gb = self.choose_ram()?;
        let zone = self.cloud.zone.clone();
        let machine_type = self.choose_machine_type(&zone, ram_gb)?;

        Ok(VmConfig {
            name,
            zone,
            machine_type,
            image_family: os.family.into(),
            image_project: os.project.into(),
            disk_size_gb: self.settings.custom_disk_gb,
            free_tier: false,
        })
    }

    fn list_zones(&self, regions: &[String]) -> Result<Vec<String>, BotError> {
        let filter = zone_filter(regions);
        let output = self
            .gcloud
            .run(&["compute", "zones", "list", filter.as_str(), "--format=value(name)"])
            .map_err(|source| BotError::Discovery {
                what: "zones".into(),
                source,
            })?;
        Ok(output.split_whitespace().map(str::to_string).collect())
    }

    /// Empty output or a failed describe both count as unavailable.
    fn machine_type_available(&self, zone: &str, machine_type: &str) -> bool {
        self.gcloud
            .run(&[
                "compute",
                "machine-types",
                "describe",
                machine_type,
                "--zone",
                zone,
                "--format=value(name)",
            ])
            .is_ok_and(|output| !output.trim().is_empty())
    }

    pub fn choose_os(&mut self) -> Result<OsImage, BotError> {
        self.term.say("\nWhich Operating System do you want to use?");
        self.term.say("1. Debian 11 (default)");
        self.term.say("2. Ubuntu 22.04 LTS");
        self.term.say("3. Rocky Linux 9");
        let choice = self.term.ask("Choice:")?;
        Ok(os_for_choice(&choice))
    }

    pub fn choose_ram(&mut self) -> Result<u32, BotError> {
        self.term
            .say("\nHow many GB RAM do you need for your Machine?");
        self.term
            .say("Available options: 1GB, 2GB, 4GB, 8GB, 16GB, 32GB, 64GB, 128GB");
        loop {
            let input = self.term.ask("RAM (GB):")?;
            if let Some(ram) = input.parse::<i64>().ok().and_then(ram_size) {
                return Ok(ram);
            }
            self.term.say("Please enter a valid RAM size in GB");
        }
    }

    pub fn choose_machine_type(&mut self, zone: &str, ram_gb: u32) -> Result<String, BotError> {
        let filter = machine_type_filter(zone, ram_gb * 1024, &self.settings.machine_family);
        let output = self
            .gcloud
            .run(&[
                "compute",
                "machine-types",
                "list",
                filter.as_str(),
                "--format=value(name)",
                "--sort-by=name",
            ])
            .map_err(|source| BotError::Discovery {
                what: "machine types".into(),
                source,
            })?;
        let machines: Vec<&str> = output.split_whitespace().collect();
        if machines.is_empty() {
            return Err(BotError::NoMachineTypes {
                ram_gb,
                zone: zone.to_string(),
            });
        }

        self.term
            .say(&format!("\nAvailable machines with {ram_gb}GB RAM:"));
        for (i, machine) in machines.iter().enumerate() {
            self.term.say(&format!("{}: {machine}", i + 1));
        }

        loop {
            let input = self.term.ask("Machine:")?;
            match input.parse::<usize>() {
                Ok(idx) if (1..=machines.len()).contains(&idx) => {
                    let machine = machines[idx - 1].to_string();
                    tracing::info!(%machine, "selected machine type");
                    return Ok(machine);
                }
                _ => {}
            }
            self.term
                .say(&format!("Please enter a number between 1 and {}", machines.len()));
        }
    }

    /// Show the command, ask for confirmation, then run it.
    pub fn create(&mut self, vm: &VmConfig) -> Result<String, BotError> {
        let args = vm.create_args();
        self.term
            .say(&format!("\nCreating VM with command: gcloud {}", args.join(" ")));
        if !terminal::confirm(&mut *self.term, "Would you like to proceed?")? {
            return Err(BotError::CreationCancelled);
        }

        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        match self.gcloud.run(&argv) {
            Ok(output) => {
                tracing::info!(name = %vm.name, zone = %vm.zone, "VM created");
                self.term
                    .say(&format!("VM Created successfully!\n{output}"));
                Ok(output)
            }
            Err(source) => {
                let output = source.output.clone();
                Err(BotError::CreateFailed { source, output })
            }
        }
    }
}

// ── tests ────────────────────────────────────────────────
