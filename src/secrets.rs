//! Secret lookup.
//!
//! The workflow needs three secrets: the profile page URL, the HTML-encoded
//! profile urn, and the session cookies (a JSON object of name → value).
//! Where they come from is behind the [`SecretStore`] trait so the rest of the
//! crate never knows whether they were read from the environment or a file.
//!
//! Secret values are never included in error messages or log lines; only
//! secret *names* are.

use crate::config::{SecretBackendKind, SecretsConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    #[error("secret '{0}' is missing or empty")]
    Missing(String),
    #[error("failed to read secrets file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("secrets file {path} is not a flat table of strings: {reason}")]
    InvalidFile { path: PathBuf, reason: String },
    #[error("secret '{name}' is not a JSON object of string values: {reason}")]
    InvalidCookies { name: String, reason: String },
}

/// Key-value secret lookup.
pub trait SecretStore {
    /// Fetch a named secret. Absent and blank values are both [`SecretError::Missing`].
    fn get(&self, name: &str) -> Result<String, SecretError>;
}

/// Reads secrets from process environment variables.
///
/// The name is tried verbatim first, then upper-cased, so both
/// `linkedGAN_cookies` and `LINKEDGAN_COOKIES` work.
#[derive(Debug, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Result<String, SecretError> {
        [name.to_string(), name.to_uppercase()]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty())
            .ok_or_else(|| SecretError::Missing(name.to_string()))
    }
}

/// Reads secrets from a flat TOML table of `name = "value"` strings.
#[derive(Debug)]
pub struct FileSecretStore {
    values: BTreeMap<String, String>,
}

impl FileSecretStore {
    pub fn open(path: &Path) -> Result<Self, SecretError> {
        let content = std::fs::read_to_string(path).map_err(|source| SecretError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let values: BTreeMap<String, String> =
            toml::from_str(&content).map_err(|e| SecretError::InvalidFile {
                path: path.to_path_buf(),
                reason: e.message().to_string(),
            })?;
        Ok(Self { values })
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, name: &str) -> Result<String, SecretError> {
        self.values
            .get(name)
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .ok_or_else(|| SecretError::Missing(name.to_string()))
    }
}

/// Build the store selected by the `[secrets]` config section.
pub fn open_store(config: &SecretsConfig) -> Result<Box<dyn SecretStore>, SecretError> {
    match config.backend {
        SecretBackendKind::Env => Ok(Box::new(EnvSecretStore)),
        SecretBackendKind::File => {
            let path = config
                .file
                .as_deref()
                .ok_or_else(|| SecretError::Missing("secrets.file".to_string()))?;
            Ok(Box::new(FileSecretStore::open(path)?))
        }
    }
}

/// The three secrets the workflow runs on. Loaded once, never mutated.
#[derive(Clone)]
pub struct Secrets {
    pub profile_page: String,
    pub profile_urn: String,
    pub cookies: BTreeMap<String, String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("profile_page", &self.profile_page)
            .field("profile_urn", &self.profile_urn)
            .field("cookies", &self.cookies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Secrets {
    /// Fetch and parse the secrets named in `names`.
    pub fn load(store: &dyn SecretStore, names: &SecretsConfig) -> Result<Self, SecretError> {
        let profile_page = store.get(&names.profile_page)?;
        let profile_urn = store.get(&names.profile_urn)?;
        let raw_cookies = store.get(&names.cookies)?;
        let cookies = parse_cookies(&names.cookies, &raw_cookies)?;
        Ok(Self {
            profile_page,
            profile_urn,
            cookies,
        })
    }
}

fn parse_cookies(name: &str, raw: &str) -> Result<BTreeMap<String, String>, SecretError> {
    // Only the serde error category is reported: the message could echo a cookie value.
    serde_json::from_str(raw).map_err(|e| SecretError::InvalidCookies {
        name: name.to_string(),
        reason: format!("{:?} error at line {}", e.classify(), e.line()),
    })
}
