//! Configuration for the bug service client
//!
//! Values come from layered providers: command-line overrides, then
//! `BUGTRIAGE_*` environment variables, then built-in defaults.
//! Recognized keys are `api_url`, `timeout_seconds` and `user_agent`.

use std::collections::HashMap;
use std::env;
use std::fmt::{Debug, Display};
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ServiceError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Prefix for environment variables read by the default provider
pub const ENV_PREFIX: &str = "BUGTRIAGE";

/// A source of raw configuration strings
pub trait ConfigProvider: Send + Sync {
    /// The value for `key`, or `None` when this provider does not set it
    fn lookup(&self, key: &str) -> Option<String>;

    /// Where `key` would be read from, for error messages
    fn describe(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Typed access on top of `lookup`
pub trait ConfigProviderExt: ConfigProvider {
    fn require(&self, key: &str) -> Result<String> {
        self.lookup(key)
            .ok_or_else(|| ServiceError::configuration(format!("{} is not set", self.describe(key))))
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse `key` if present; a present but malformed value is an error
    fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.lookup(key)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|e| {
                    ServiceError::configuration(format!("Invalid {}={:?}: {}", self.describe(key), raw, e))
                })
            })
            .transpose()
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

impl ConfigProvider for Box<dyn ConfigProvider> {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }

    fn describe(&self, key: &str) -> String {
        (**self).describe(key)
    }
}

/// Reads `PREFIX_KEY` environment variables; empty values count as unset
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    prefix: Option<String>,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// `timeout-seconds` with prefix `BUGTRIAGE` becomes `BUGTRIAGE_TIMEOUT_SECONDS`
    pub(crate) fn var_name(&self, key: &str) -> String {
        let key: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();

        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key,
        }
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var(self.var_name(key)).ok().filter(|v| !v.trim().is_empty())
    }

    fn describe(&self, key: &str) -> String {
        self.var_name(key)
    }
}

/// Fixed values, used for command-line overrides and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Layers of providers; the first one that sets a key wins
#[derive(Default)]
pub struct CompositeConfigProvider {
    layers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_provider(&mut self, provider: impl ConfigProvider + 'static) {
        self.layers.push(Box::new(provider));
    }

    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(provider);
        self
    }
}

impl ConfigProvider for CompositeConfigProvider {
    fn lookup(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.lookup(key))
    }

    fn describe(&self, key: &str) -> String {
        self.layers
            .iter()
            .find(|layer| layer.lookup(key).is_some())
            .map_or_else(|| key.to_string(), |layer| layer.describe(key))
    }
}

/// `BUGTRIAGE_*` environment provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new().with_prefix(ENV_PREFIX)));

/// Configuration that can check itself before a client is built
pub trait ServiceConfig: Debug + Send + Sync {
    fn validate(&self) -> Result<()>;

    fn service_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugServiceConfig {
    /// Without a trailing slash
    pub base_url: String,

    pub timeout_seconds: u64,

    /// Overrides the default `bug-triage/<version>` user agent
    pub user_agent: Option<String>,
}

impl Default for BugServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
        }
    }
}

impl BugServiceConfig {
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let timeout_seconds = match provider.lookup("timeout_seconds") {
            Some(raw) => crate::util::parse_timeout_seconds(&raw).ok_or_else(|| {
                ServiceError::configuration(format!(
                    "Invalid {}={:?}: expected seconds, e.g. 10 or 10s",
                    provider.describe("timeout_seconds"),
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        let config = Self {
            base_url: provider
                .get_or("api_url", DEFAULT_BASE_URL)
                .trim()
                .trim_end_matches('/')
                .to_string(),
            timeout_seconds,
            user_agent: provider.lookup("user_agent"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Read `BUGTRIAGE_API_URL`, `BUGTRIAGE_TIMEOUT_SECONDS` and `BUGTRIAGE_USER_AGENT`
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }
}

impl ServiceConfig for BugServiceConfig {
    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ServiceError::configuration(format!("Invalid base URL {:?}: {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ServiceError::configuration(format!(
                "Base URL must use http or https, got {:?}",
                self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ServiceError::configuration("Timeout must be at least one second"));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        crate::services::bugs::SERVICE_NAME
    }
}
