//! Configuration file handling
//!
//! Profiles are stored as TOML:
//!
//! ```toml
//! default_profile = "prod"
//!
//! [profiles.prod]
//! url = "https://cp.example.com"
//! username = "admin@example.com"
//! api_key = "${ONAPP_PROD_KEY}"
//! timeout_secs = 60
//! ```

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use crate::client::Client;

/// Overrides the profile's control panel URL
pub const ENV_URL: &str = "ONAPP_URL";
/// Overrides the profile's login
pub const ENV_USERNAME: &str = "ONAPP_USERNAME";
/// Overrides the profile's API key
pub const ENV_API_KEY: &str = "ONAPP_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Connection settings for one control panel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    pub url: String,
    pub username: String,
    /// Plain key or `keyring:<name>` reference
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
    /// `per_page` used when looking up the transaction behind a delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_search_limit: Option<u32>,
}

/// A profile with environment overrides and keyring references applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub url: String,
    pub username: String,
    pub api_key: String,
    pub timeout: Option<Duration>,
    pub insecure: bool,
    pub transaction_search_limit: Option<u32>,
}

impl Profile {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            api_key: api_key.into(),
            timeout_secs: None,
            insecure: false,
            transaction_search_limit: None,
        }
    }

    /// A profile built only from `ONAPP_URL`, `ONAPP_USERNAME` and
    /// `ONAPP_API_KEY`, if all three are set
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(ENV_URL).ok()?;
        let username = std::env::var(ENV_USERNAME).ok()?;
        let api_key = std::env::var(ENV_API_KEY).ok()?;
        Some(Self::new(url, username, api_key))
    }

    /// Apply environment overrides and read keyring references
    pub fn resolve(&self) -> Result<ResolvedProfile> {
        self.resolve_with_env(true)
    }

    /// Resolve credentials, optionally ignoring the `ONAPP_*` overrides
    pub fn resolve_with_env(&self, use_env: bool) -> Result<ResolvedProfile> {
        let store = CredentialStore::new();
        let env = |var: &'static str| use_env.then_some(var);

        let url = store
            .get_credential(&self.url, env(ENV_URL))
            .map_err(|e| ConfigError::CredentialError(format!("Failed to resolve URL: {}", e)))?;
        let username = store
            .get_credential(&self.username, env(ENV_USERNAME))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve username: {}", e))
            })?;
        let api_key = store
            .get_credential(&self.api_key, env(ENV_API_KEY))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve API key: {}", e))
            })?;

        Ok(ResolvedProfile {
            url,
            username,
            api_key,
            timeout: self.timeout_secs.map(Duration::from_secs),
            insecure: self.insecure,
            transaction_search_limit: self.transaction_search_limit,
        })
    }

    /// Build a client for this profile
    pub fn client(&self) -> crate::error::Result<Client> {
        self.resolve()?.client()
    }
}

impl ResolvedProfile {
    pub fn client(&self) -> crate::error::Result<Client> {
        let mut builder = Client::builder(&self.url)
            .credentials(&self.username, &self.api_key)
            .insecure(self.insecure);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(limit) = self.transaction_search_limit {
            builder = builder.transaction_search_limit(limit);
        }
        builder.build()
    }
}

impl Config {
    /// Pick the profile to use
    ///
    /// Resolution order:
    /// 1. `explicit_profile`
    /// 2. `default_profile`
    /// 3. the first profile by name
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(name) = explicit_profile {
            return Ok(name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        self.list_profiles()
            .first()
            .map(|(name, _)| (*name).clone())
            .ok_or_else(|| ConfigError::NoProfiles {
                suggestion: "Use 'onappctl profile set' to create a profile.".to_string(),
            })
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from `config_path`; a missing file is an empty config
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile, clearing the default if it pointed at it
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// All profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Path to the configuration file
    ///
    /// On Linux: ~/.config/onappctl/config.toml
    /// On macOS: ~/.config/onappctl/config.toml when that directory exists,
    /// otherwise ~/Library/Application Support/com.onapp.onappctl/config.toml
    /// On Windows: %APPDATA%\onapp\onappctl\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_dir = base_dirs.home_dir().join(".config").join("onappctl");
                if linux_style_dir.exists() {
                    return Ok(linux_style_dir.join("config.toml"));
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("com", "onapp", "onappctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}`; unknown variables stay as written
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok()).to_string()
    }
}
