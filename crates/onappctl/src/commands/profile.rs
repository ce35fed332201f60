//! Profile management command implementations

use colored::Colorize;
use onapp_core::Profile;
use onapp_core::config::CredentialStore;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::cli::{OutputFormat, ProfileCommands};
use crate::connection::ConnectionManager;
use crate::error::{OnAppCtlError, Result as CliResult};
use crate::output::{self, print_rows};

/// Profile as shown to the user; the API key never leaves the config file
#[derive(Debug, Serialize)]
struct ProfileView<'a> {
    name: &'a str,
    url: &'a str,
    username: &'a str,
    api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_search_limit: Option<u32>,
    is_default: bool,
}

impl<'a> ProfileView<'a> {
    fn new(name: &'a str, profile: &'a Profile, conn_mgr: &ConnectionManager) -> Self {
        Self {
            name,
            url: &profile.url,
            username: &profile.username,
            api_key: mask_api_key(&profile.api_key),
            timeout_secs: profile.timeout_secs,
            insecure: profile.insecure,
            transaction_search_limit: profile.transaction_search_limit,
            is_default: conn_mgr.config.default_profile.as_deref() == Some(name),
        }
    }
}

/// Keep keyring references readable, hide everything else
fn mask_api_key(api_key: &str) -> String {
    if CredentialStore::is_keyring_reference(api_key) {
        return api_key.to_string();
    }
    let visible: String = api_key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if api_key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{}", visible)
    }
}

fn structured(output_format: OutputFormat) -> Option<output::OutputFormat> {
    match output_format {
        OutputFormat::Json => Some(output::OutputFormat::Json),
        OutputFormat::Yaml => Some(output::OutputFormat::Yaml),
        OutputFormat::Auto | OutputFormat::Table => None,
    }
}

/// Handle profile management commands
pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr, output_format),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            url,
            username,
            api_key,
            timeout,
            insecure,
            transaction_search_limit,
            #[cfg(feature = "secure-storage")]
            use_keyring,
        } => {
            let mut profile = Profile::new(url.as_str(), username.as_str(), read_api_key(api_key)?);
            profile.timeout_secs = *timeout;
            profile.insecure = *insecure;
            profile.transaction_search_limit = *transaction_search_limit;

            #[cfg(feature = "secure-storage")]
            if *use_keyring {
                profile.api_key = CredentialStore::new()
                    .store_credential(&format!("{}-api-key", name), &profile.api_key)?;
            }

            handle_set(conn_mgr, name, profile)
        }
        Remove { name } => handle_remove(conn_mgr, name),
        Default { name } => handle_default(conn_mgr, name),
    }
}

fn read_api_key(api_key: &Option<String>) -> CliResult<String> {
    if let Some(key) = api_key {
        return Ok(key.clone());
    }

    let key = rpassword::prompt_password("API key: ")?;
    if key.trim().is_empty() {
        return Err(OnAppCtlError::InvalidInput {
            message: "API key must not be empty".to_string(),
        });
    }
    Ok(key.trim().to_string())
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();
    trace!("Found {} profiles", profiles.len());

    let views: Vec<ProfileView> = profiles
        .iter()
        .map(|(name, profile)| ProfileView::new(name.as_str(), profile, conn_mgr))
        .collect();

    if let Some(fmt) = structured(output_format) {
        output::print_output(&views, fmt, None)?;
        return Ok(());
    }

    if views.is_empty() {
        println!("No profiles configured.");
        println!("Create one with: onappctl profile set <name> --url <url> --username <user>");
        return Ok(());
    }

    print_rows(
        &["NAME", "URL", "USERNAME", "DEFAULT"],
        views
            .iter()
            .map(|v| {
                vec![
                    v.name.to_string(),
                    v.url.to_string(),
                    v.username.to_string(),
                    if v.is_default { "*".to_string() } else { String::new() },
                ]
            })
            .collect(),
    );
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config_path = conn_mgr.config_file_path()?;

    match structured(output_format) {
        Some(fmt) => {
            let data = serde_json::json!({ "config_path": config_path.display().to_string() });
            output::print_output(&data, fmt, None)?;
        }
        None => println!("{}", config_path.display()),
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr.config.profile(name)?;
    let view = ProfileView::new(name, profile, conn_mgr);

    if let Some(fmt) = structured(output_format) {
        output::print_output(&view, fmt, None)?;
        return Ok(());
    }

    println!("{}: {}", "Profile".bold(), view.name);
    println!("URL: {}", view.url);
    println!("Username: {}", view.username);
    println!("API key: {}", view.api_key);
    if let Some(timeout) = view.timeout_secs {
        println!("Timeout: {}s", timeout);
    }
    if view.insecure {
        println!("Insecure: {}", "true".yellow());
    }
    if let Some(limit) = view.transaction_search_limit {
        println!("Transaction search limit: {}", limit);
    }
    if view.is_default {
        println!("Default: yes");
    }
    Ok(())
}

fn handle_set(conn_mgr: &ConnectionManager, name: &str, profile: Profile) -> CliResult<()> {
    debug!("Setting profile: {}", name);

    let existed = conn_mgr.config.profiles.contains_key(name);
    let mut updated = conn_mgr.clone();
    updated.config.set_profile(name.to_string(), profile);
    updated.save_config()?;

    let verb = if existed { "updated" } else { "saved" };
    println!("Profile '{}' {} in:", name, verb);
    println!("  {}", updated.config_file_path()?.display());

    if updated.config.default_profile.is_none() && updated.config.profiles.len() > 1 {
        println!();
        println!("Tip: Set as default with:");
        println!("  onappctl profile default {}", name);
    }
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    debug!("Removing profile: {}", name);

    let mut updated = conn_mgr.clone();
    let was_default = updated.config.default_profile.as_deref() == Some(name);
    let removed = updated
        .config
        .remove_profile(name)
        .ok_or_else(|| OnAppCtlError::ProfileNotFound {
            name: name.to_string(),
        })?;
    updated.save_config()?;

    if let Some(key) = CredentialStore::keyring_key(&removed.api_key)
        && let Err(e) = CredentialStore::new().delete_credential(key)
    {
        warn!("Could not remove keyring entry '{}': {}", key, e);
    }

    println!("Profile '{}' removed.", name);
    if was_default {
        println!("Default profile cleared.");
    }
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    debug!("Setting default profile: {}", name);

    conn_mgr.config.profile(name)?;

    let mut updated = conn_mgr.clone();
    updated.config.default_profile = Some(name.to_string());
    updated.save_config()?;

    println!("Default profile set to '{}'.", name);
    Ok(())
}
