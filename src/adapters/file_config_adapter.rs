//! INI file configuration adapter with environment overrides.
//!
//! Any key can be overridden by `STOCKBOARD_<SECTION>_<KEY>` (upper-cased),
//! e.g. `STOCKBOARD_PRICES_PROVIDER=csv`.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::collections::HashMap;
use std::path::Path;

pub const ENV_PREFIX: &str = "STOCKBOARD";

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
    overrides: HashMap<String, String>,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self {
            config,
            overrides: env_overrides(std::env::vars()),
        })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self {
            config,
            overrides: HashMap::new(),
        })
    }

    /// No file: defaults plus environment overrides.
    pub fn empty() -> Self {
        Self {
            config: Ini::new(),
            overrides: env_overrides(std::env::vars()),
        }
    }

    pub fn with_overrides(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.overrides.extend(env_overrides(vars));
        self
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Some(true),
            "false" | "no" | "0" | "off" => Some(false),
            _ => None,
        }
    }
}

fn override_key(section: &str, key: &str) -> String {
    format!("{}_{}_{}", ENV_PREFIX, section, key).to_uppercase()
}

fn env_overrides(vars: impl IntoIterator<Item = (String, String)>) -> HashMap<String, String> {
    let prefix = format!("{}_", ENV_PREFIX);
    vars.into_iter()
        .filter(|(name, _)| name.starts_with(&prefix))
        .collect()
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.overrides
            .get(&override_key(section, key))
            .cloned()
            .or_else(|| self.config.get(section, key))
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}
