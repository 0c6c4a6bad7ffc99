// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client configuration and the storage port it is persisted through.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Key under which [`ClientConfig`] is persisted.
pub const CLIENT_CONFIG_KEY: &str = "client";

/// Environment variable overriding [`ClientConfig::address`].
pub const ENV_ADDRESS: &str = "LATTICE_ADDRESS";
/// Environment variable overriding [`ClientConfig::default_branch`].
pub const ENV_BRANCH: &str = "LATTICE_BRANCH";
/// Environment variable overriding [`ClientConfig::api_token`].
pub const ENV_API_TOKEN: &str = "LATTICE_API_TOKEN";

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A loaded value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Connection settings for the platform's GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address of the server (scheme + host + optional port).
    pub address: String,
    /// Branch used when the caller does not pick one.
    pub default_branch: String,
    /// Optional API token sent as a bearer credential.
    pub api_token: Option<String>,
    /// Request timeout; `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:8000".to_string(),
            default_branch: "main".to_string(),
            api_token: None,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Reject configs that cannot produce a usable endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.address.starts_with("http://") || self.address.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "address must start with http:// or https://, got {:?}",
                self.address
            )));
        }
        if self.default_branch.trim().is_empty() {
            return Err(ConfigError::Invalid("default branch is empty".into()));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("timeout must be positive".into()));
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup (usually `std::env::var`).
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// wipe a stored setting.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(address) = non_empty(ENV_ADDRESS) {
            self.address = address;
        }
        if let Some(branch) = non_empty(ENV_BRANCH) {
            self.default_branch = branch;
        }
        if let Some(token) = non_empty(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
    }

    /// Address with any trailing slash removed.
    pub fn base_address(&self) -> &str {
        self.address.trim_end_matches('/')
    }
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Load the stored client config (or defaults), apply overrides, validate.
    pub fn load_client_config<F>(&self, lookup: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self
            .load::<ClientConfig>(CLIENT_CONFIG_KEY)?
            .unwrap_or_default();
        config.apply_overrides(lookup);
        config.validate()?;
        tracing::debug!(address = %config.address, branch = %config.default_branch, "client config loaded");
        Ok(config)
    }
}
