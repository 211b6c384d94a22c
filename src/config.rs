//! TOML configuration: locations, exclusions and buffer bounds.
//!
//! Every field has a default matching the original deployment, so the tool
//! runs without a config file when the CSV exports sit in the working
//! directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::PrepError;
use crate::forecast::BufferRange;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "smart_prep.toml";

static DEFAULT_LOCATIONS: Lazy<Vec<Location>> = Lazy::new(|| {
    [
        ("Malibu", "malibu_data_aug_dec_2024.csv"),
        ("Grand Central Market", "gcm_data_aug_dec_2024.csv"),
        ("Huntington Beach", "hb_data_aug_dec_2024.csv"),
        ("Ghirardelli Square", "sf_data_aug_dec_2024.csv"),
        ("Santa Barbara", "sb_data_aug_dec_2024.csv"),
    ]
    .into_iter()
    .map(|(name, file)| Location { name: name.to_string(), file: PathBuf::from(file) })
    .collect()
});

/// Line items that are not prepped: drinks, merchandise, fees.
static DEFAULT_EXCLUSIONS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "N/A Beverage",
        "Draft Beer",
        "Beer",
        "BROAD STREET Hard Lemonade",
        "Wine by the Glass",
        "Wine by the glass",
        "Side Sourdough Toast",
        "OG Tote",
        "OG Malibu Tee",
        "OG Grand Central Market Tee",
        "Delivery Fee",
        "Wine By The Bottle",
        "Beanie",
        "Pro Hat",
        "BROAD STREET Spicy Marg",
        "BROAD STREET Bloody",
        "Party Wines",
        "Party Size",
        "Custom Amount",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub name: String,
    /// CSV export, relative to `data_dir` unless absolute.
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrepConfig {
    #[serde(default = "default_date")]
    pub default_date: NaiveDate,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_exclusions")]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub buffer: BufferRange,
    #[serde(default = "default_locations")]
    pub locations: Vec<Location>,
}

fn default_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap_or_default()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.to_vec()
}

fn default_locations() -> Vec<Location> {
    DEFAULT_LOCATIONS.to_vec()
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            default_date: default_date(),
            data_dir: default_data_dir(),
            exclusions: default_exclusions(),
            buffer: BufferRange::default(),
            locations: default_locations(),
        }
    }
}

impl PrepConfig {
    pub fn from_toml(s: &str, path: &Path) -> Result<Self, PrepError> {
        let config: PrepConfig = toml::from_str(s)
            .map_err(|source| PrepError::ConfigParse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else [`DEFAULT_CONFIG_FILE`]
    /// if present, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, PrepError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    debug!("no config file, using built-in defaults");
                    return Ok(Self::default());
                }
                p
            }
        };
        let s = std::fs::read_to_string(&path).map_err(|e| PrepError::io(&path, e))?;
        let config = Self::from_toml(&s, &path)?;
        info!(path = %path.display(), locations = config.locations.len(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PrepError> {
        let b = &self.buffer;
        if b.min > b.max {
            return Err(PrepError::InvalidConfig(format!(
                "buffer.min ({}) is greater than buffer.max ({})",
                b.min, b.max
            )));
        }
        if !(b.min..=b.max).contains(&b.default) {
            return Err(PrepError::InvalidConfig(format!(
                "buffer.default ({}) is outside {}..={}",
                b.default, b.min, b.max
            )));
        }
        if self.locations.is_empty() {
            return Err(PrepError::InvalidConfig("no locations configured".to_string()));
        }
        let mut seen = HashSet::new();
        for loc in &self.locations {
            if !seen.insert(loc.name.to_lowercase()) {
                return Err(PrepError::InvalidConfig(format!("duplicate location {:?}", loc.name)));
            }
        }
        Ok(())
    }

    pub fn exclusion_set(&self) -> HashSet<String> {
        self.exclusions.iter().cloned().collect()
    }

    /// Case-insensitive lookup by location name.
    pub fn location(&self, name: &str) -> Result<&Location, PrepError> {
        let wanted = name.trim().to_lowercase();
        self.locations
            .iter()
            .find(|l| l.name.to_lowercase() == wanted)
            .ok_or_else(|| PrepError::UnknownLocation {
                name: name.to_string(),
                known: self.locations.iter().map(|l| l.name.as_str()).collect::<Vec<_>>().join(", "),
            })
    }

    pub fn resolve(&self, loc: &Location) -> PathBuf {
        if loc.file.is_absolute() {
            loc.file.clone()
        } else {
            self.data_dir.join(&loc.file)
        }
    }
}
