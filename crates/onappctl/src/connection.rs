//! Connection management for OnApp control panel clients

use std::path::PathBuf;

use anyhow::Context;
use onapp_core::{Client, Config, Profile};
use tracing::{debug, info, trace};

use crate::error::Result as CliResult;

/// Builds authenticated clients from configuration
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            self.config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            self.config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Path of the configuration file in use
    pub fn config_file_path(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Create a client from profile credentials with environment variable override support
    ///
    /// When --config-file is explicitly specified, environment variables are ignored so the
    /// file alone decides the connection.
    pub fn create_client(&self, profile_name: Option<&str>) -> CliResult<Client> {
        debug!("Creating OnApp client");
        trace!("Profile name: {:?}", profile_name);

        let use_env_vars = self.config_path.is_none();
        if !use_env_vars {
            info!("--config-file specified explicitly, ignoring environment variables");
        }

        if use_env_vars
            && profile_name.is_none()
            && let Some(profile) = Profile::from_env()
        {
            info!("Using OnApp credentials from environment variables");
            return Ok(profile.client()?);
        }

        let resolved_profile_name = self.config.resolve_profile(profile_name)?;
        info!("Using OnApp profile: {}", resolved_profile_name);

        let profile = self.config.profile(&resolved_profile_name)?;
        let resolved = profile.resolve_with_env(use_env_vars)?;
        debug!("Connecting to {} as {}", resolved.url, resolved.username);

        Ok(resolved.client()?)
    }
}
