use crate::command::{GIT_BINARY, LAGOON_BINARY};
use crate::error::{LagoonError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AssistConfig
// ---------------------------------------------------------------------------

/// Settings of this tool, stored in `~/.lagoon-assist/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistConfig {
    #[serde(default = "default_lagoon_binary")]
    pub lagoon_binary: String,
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
    /// Config file of the Lagoon CLI; defaults to `~/.lagoon.yml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lagoon_config: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_file_logging")]
    pub file_logging: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
}

fn default_lagoon_binary() -> String {
    LAGOON_BINARY.to_string()
}

fn default_git_binary() -> String {
    GIT_BINARY.to_string()
}

fn default_file_logging() -> bool {
    true
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            lagoon_binary: default_lagoon_binary(),
            git_binary: default_git_binary(),
            lagoon_config: None,
            log_dir: None,
            file_logging: default_file_logging(),
            default_instance: None,
            default_project: None,
        }
    }
}

impl AssistConfig {
    /// Missing file means defaults.
    pub fn load(home: &Path) -> Result<Self> {
        let path = paths::config_path(home);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::config_path(home), data.as_bytes())
    }

    pub fn lagoon_config_path(&self, home: &Path) -> PathBuf {
        self.lagoon_config
            .clone()
            .unwrap_or_else(|| paths::lagoon_config_path(home))
    }

    pub fn log_dir(&self, home: &Path) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| paths::logs_dir(home))
    }
}

// ---------------------------------------------------------------------------
// LagoonConfigFile
// ---------------------------------------------------------------------------

/// Connection settings of one Lagoon instance. Only the SSH key is
/// interpreted; every other key is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sshkey: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The Lagoon CLI's own config file (`~/.lagoon.yml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LagoonConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub lagoons: BTreeMap<String, InstanceSettings>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl LagoonConfigFile {
    /// Missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn instance_names(&self) -> Vec<&str> {
        self.lagoons.keys().map(String::as_str).collect()
    }

    pub fn ssh_key(&self, instance: &str) -> Result<Option<&str>> {
        self.lagoons
            .get(instance)
            .map(|s| s.sshkey.as_deref())
            .ok_or_else(|| LagoonError::InstanceNotFound(instance.to_string()))
    }

    pub fn set_ssh_key(&mut self, instance: &str, key_path: &Path) -> Result<()> {
        let settings = self
            .lagoons
            .get_mut(instance)
            .ok_or_else(|| LagoonError::InstanceNotFound(instance.to_string()))?;
        settings.sshkey = Some(key_path.display().to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
