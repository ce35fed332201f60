//! Profiles and credentials for OnApp control panels
//!
// Nested config module mirrors the file layout on purpose

#![allow(clippy::module_inception)]
//!
//! - Multiple named profiles, one per control panel
//! - `${VAR}` and `${VAR:-default}` expansion in the config file
//! - `ONAPP_URL`, `ONAPP_USERNAME` and `ONAPP_API_KEY` environment overrides
//! - API keys kept in the OS keyring (with the `secure-storage` feature)

pub mod config;
pub mod credential;
pub mod error;

pub use config::{Config, ENV_API_KEY, ENV_URL, ENV_USERNAME, Profile, ResolvedProfile};
pub use credential::{CredentialStorage, CredentialStore};
pub use error::{ConfigError, Result};
