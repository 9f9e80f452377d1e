use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::client::ClientOptions;
use crate::transport::{TransportConfig, DEFAULT_ENDPOINT};

/// Credentials for one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// AWS access key ID
    pub access_key: String,

    /// AWS secret access key
    pub secret_key: String,

    /// Overrides `transport.endpoint` for this profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Client behaviour switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Trace every request and reply on stderr
    #[serde(default)]
    pub debug: bool,

    /// Fail calls whose reply carries a SOAP fault
    #[serde(default)]
    pub raise_error: bool,
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSettings {
    /// SOAP endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    300
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Named credential profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Profile used when none is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default)]
    pub client: ClientSettings,

    #[serde(default)]
    pub transport: TransportSettings,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a profile by name, or the default profile if not specified
    pub fn get_profile(&self, name: Option<&str>) -> Option<&Profile> {
        if let Some(name) = name {
            self.profiles.get(name)
        } else if let Some(default) = &self.default_profile {
            self.profiles.get(default)
        } else {
            self.profiles.values().next()
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            debug: self.client.debug,
            raise_error: self.client.raise_error,
        }
    }

    /// Transport settings with the profile's endpoint override applied
    pub fn transport_config(&self, profile: &Profile) -> TransportConfig {
        TransportConfig {
            endpoint: profile
                .endpoint
                .clone()
                .unwrap_or_else(|| self.transport.endpoint.clone()),
            timeout: Duration::from_secs(self.transport.timeout),
            insecure: self.transport.insecure,
        }
    }
}

/// Load configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .context(format!("Failed to read config file: {:?}", path.as_ref()))?;

    let config: Config = serde_yaml::from_str(&content)
        .context("Failed to parse YAML configuration")?;

    Ok(config)
}

/// Load configuration from environment variables
///
/// Supports both AWS standard variables and the short form:
/// - AWS_ACCESS_KEY_ID / S3_KEY
/// - AWS_SECRET_ACCESS_KEY / S3_SECRET
/// - S3_SOAP_ENDPOINT (optional)
/// - S3_SOAP_TIMEOUT (optional, seconds)
/// - S3_SOAP_DEBUG, S3_SOAP_RAISE_ERROR (optional, `true`/`1`)
pub fn load_from_env() -> Result<Config> {
    // Try to load .env file if it exists (don't fail if it doesn't)
    let _ = dotenvy::dotenv();

    let mut config = Config::new();

    let access_key = std::env::var("AWS_ACCESS_KEY_ID")
        .or_else(|_| std::env::var("S3_KEY"))
        .context("Neither AWS_ACCESS_KEY_ID nor S3_KEY environment variable is set")?;

    let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
        .or_else(|_| std::env::var("S3_SECRET"))
        .context("Neither AWS_SECRET_ACCESS_KEY nor S3_SECRET environment variable is set")?;

    let profile = Profile {
        access_key,
        secret_key,
        endpoint: None,
    };

    config.profiles.insert("default".to_string(), profile);
    config.default_profile = Some("default".to_string());

    if let Ok(endpoint) = std::env::var("S3_SOAP_ENDPOINT") {
        config.transport.endpoint = endpoint;
    }

    if let Ok(timeout) = std::env::var("S3_SOAP_TIMEOUT") {
        if let Ok(val) = timeout.parse() {
            config.transport.timeout = val;
        }
    }

    config.client.debug = env_flag("S3_SOAP_DEBUG");
    config.client.raise_error = env_flag("S3_SOAP_RAISE_ERROR");

    Ok(config)
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Load configuration from file or environment
///
/// # Arguments
/// * `config_path` - Optional path to YAML config file
/// * `profile_name` - Optional profile name to make the default
pub fn load_config(config_path: Option<&str>, profile_name: Option<&str>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_from_yaml(path)?,
        None => load_from_env()?,
    };

    if let Some(name) = profile_name {
        if !config.profiles.contains_key(name) {
            anyhow::bail!("Profile '{}' not found in configuration", name);
        }
        config.default_profile = Some(name.to_string());
    }

    Ok(config)
}
