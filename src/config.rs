//! Application configuration module.
//!
//! Handles loading, validating, and merging `linkedgan.toml`. Stock defaults
//! point at the real services; a user file only needs the values it wants to
//! override (endpoints for a staging host, a different overlay, a file-based
//! secret store, ...).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [endpoints]
//! image_url = "https://thispersondoesnotexist.com/image"
//! metadata_url = "https://www.linkedin.com/voyager/api/voyagerMediaUploadMetadata"
//! profile_url = "https://www.linkedin.com/voyager/api/identity/dash/profiles"
//! version_tag = "418268983"
//!
//! [http]
//! timeout_secs = 5          # Applied to every outbound call
//! user_agent = "Mozilla/5.0 ..."
//! accept_language = "en-GB,en;q=0.9"
//! host = "www.linkedin.com"
//! restli_protocol_version = "2.0.0"
//!
//! [image]
//! overlay = "assets/overlay.png"
//! size = 400                # Square canvas edge in pixels
//! quality = 90              # JPEG quality (1-100)
//!
//! [secrets]
//! backend = "env"           # "env" or "file"
//! file = "secrets.toml"     # Used by the file backend
//! profile_page = "linkedGAN_linkedin_profile_page"
//! profile_urn = "linkedGAN_encoded_profile_urn"
//! cookies = "linkedGAN_cookies"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "linkedgan.toml";

/// Application configuration loaded from `linkedgan.toml`.
///
/// Built once at startup and passed by reference into every collaborator.
/// Nothing mutates it after [`load_config`] returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Remote service locations.
    pub endpoints: EndpointsConfig,
    /// Outbound request settings shared by every call.
    pub http: HttpConfig,
    /// Image transform settings.
    pub image: ImageConfig,
    /// Where and under which names the secrets live.
    pub secrets: SecretsConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("endpoints.image_url", &self.endpoints.image_url),
            ("endpoints.metadata_url", &self.endpoints.metadata_url),
            ("endpoints.profile_url", &self.endpoints.profile_url),
        ] {
            validate_http_url(key, value)?;
        }
        if self.endpoints.version_tag.trim().is_empty() {
            return Err(ConfigError::Validation(
                "endpoints.version_tag must not be empty".into(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be non-zero".into(),
            ));
        }
        if self.image.size == 0 {
            return Err(ConfigError::Validation("image.size must be non-zero".into()));
        }
        if !(1..=100).contains(&self.image.quality) {
            return Err(ConfigError::Validation(
                "image.quality must be 1-100".into(),
            ));
        }
        if self.secrets.backend == SecretBackendKind::File && self.secrets.file.is_none() {
            return Err(ConfigError::Validation(
                "secrets.file is required when secrets.backend = \"file\"".into(),
            ));
        }
        Ok(())
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{key} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "{key} must be an http(s) URL, got scheme '{other}'"
        ))),
    }
}

/// Remote endpoints used by the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointsConfig {
    /// Unauthenticated GAN face generator returning raw image bytes.
    pub image_url: String,
    /// Upload-metadata registration endpoint.
    pub metadata_url: String,
    /// Profile collection; the encoded profile id is appended as a path segment.
    pub profile_url: String,
    /// Fixed `versionTag` query value sent with the profile patch.
    pub version_tag: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            image_url: "https://thispersondoesnotexist.com/image".into(),
            metadata_url: "https://www.linkedin.com/voyager/api/voyagerMediaUploadMetadata".into(),
            profile_url: "https://www.linkedin.com/voyager/api/identity/dash/profiles".into(),
            version_tag: "418268983".into(),
        }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-call timeout in seconds, identical for every call.
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// Value of the `Host` header sent to the private API.
    pub host: String,
    pub restli_protocol_version: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/92.0.4515.131 Safari/537.36"
                .into(),
            accept_language: "en-GB,en;q=0.9".into(),
            host: "www.linkedin.com".into(),
            restli_protocol_version: "2.0.0".into(),
        }
    }
}

/// Image transform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Overlay with an alpha channel, composited at (0,0).
    pub overlay: PathBuf,
    /// Edge of the square output canvas in pixels.
    pub size: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            overlay: PathBuf::from("assets/overlay.png"),
            size: 400,
            quality: 90,
        }
    }
}

/// Which [`SecretStore`](crate::secrets::SecretStore) implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackendKind {
    #[default]
    Env,
    File,
}

/// Secret store selection and the names of the three secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    pub backend: SecretBackendKind,
    /// TOML file of `name = "value"` pairs, read by the file backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Name of the secret holding the profile page URL (sent as `Referer`).
    pub profile_page: String,
    /// Name of the secret holding the HTML-encoded profile urn.
    pub profile_urn: String,
    /// Name of the secret holding the JSON object of session cookies.
    pub cookies: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            backend: SecretBackendKind::Env,
            file: None,
            profile_page: "linkedGAN_linkedin_profile_page".into(),
            profile_urn: "linkedGAN_encoded_profile_urn".into(),
            cookies: "linkedGAN_cookies".into(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `linkedgan.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# linkedgan configuration
# =======================
# Every key is optional. Values below are the stock defaults.

[endpoints]
# GAN face generator. Must return a square image.
image_url = "https://thispersondoesnotexist.com/image"
# Upload-metadata registration endpoint (called with ?action=upload).
metadata_url = "https://www.linkedin.com/voyager/api/voyagerMediaUploadMetadata"
# Profile collection. The encoded profile urn is appended as a path segment.
profile_url = "https://www.linkedin.com/voyager/api/identity/dash/profiles"
# versionTag query parameter sent with the profile patch.
version_tag = "418268983"

[http]
# Timeout for every outbound call, in seconds.
timeout_secs = 5
user_agent = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.131 Safari/537.36"
accept_language = "en-GB,en;q=0.9"
host = "www.linkedin.com"
restli_protocol_version = "2.0.0"

[image]
# PNG with an alpha channel, pasted at the top-left corner.
overlay = "assets/overlay.png"
# The source is resized (not cropped) to a size x size square.
size = 400
# JPEG quality, 1-100.
quality = 90

[secrets]
# "env": read each name from the environment (exact, then UPPER-CASED).
# "file": read a flat TOML table of name = "value" pairs from `file`.
backend = "env"
# file = "secrets.toml"
profile_page = "linkedGAN_linkedin_profile_page"
profile_urn = "linkedGAN_encoded_profile_urn"
# JSON object of cookie name -> value. Must include a quoted JSESSIONID.
cookies = "linkedGAN_cookies"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn default_timeout_is_five_seconds() {
        assert_eq!(AppConfig::default().http.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn default_image_settings() {
        let config = AppConfig::default();
        assert_eq!(config.image.size, 400);
        assert_eq!(config.image.quality, 90);
        assert_eq!(config.image.overlay, PathBuf::from("assets/overlay.png"));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.toml")).unwrap();
        assert_eq!(config.endpoints.version_tag, "418268983");
        assert_eq!(config.secrets.backend, SecretBackendKind::Env);
    }

    #[test]
    fn load_config_partial_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("linkedgan.toml");
        fs::write(
            &path,
            r#"
[endpoints]
image_url = "http://127.0.0.1:9000/face"

[image]
quality = 75
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.endpoints.image_url, "http://127.0.0.1:9000/face");
        assert_eq!(config.image.quality, 75);
        // Untouched keys keep their defaults
        assert_eq!(config.image.size, 400);
        assert_eq!(
            config.endpoints.metadata_url,
            EndpointsConfig::default().metadata_url
        );
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("linkedgan.toml");
        fs::write(&path, "this is not [valid toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("[http]\nretries = 3\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(result.is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let overlay: toml::Value = toml::from_str("[http]\ntimeout_secs = 0\n").unwrap();
        let err = resolve_config(stock_defaults_value(), Some(overlay)).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn quality_out_of_range_rejected() {
        for q in [0, 101] {
            let overlay: toml::Value = toml::from_str(&format!("[image]\nquality = {q}\n")).unwrap();
            assert!(resolve_config(stock_defaults_value(), Some(overlay)).is_err());
        }
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let overlay: toml::Value =
            toml::from_str("[endpoints]\nimage_url = \"ftp://example.com/face\"\n").unwrap();
        let err = resolve_config(stock_defaults_value(), Some(overlay)).unwrap_err();
        assert!(err.to_string().contains("endpoints.image_url"));
    }

    #[test]
    fn file_backend_requires_path() {
        let overlay: toml::Value = toml::from_str("[secrets]\nbackend = \"file\"\n").unwrap();
        let err = resolve_config(stock_defaults_value(), Some(overlay)).unwrap_err();
        assert!(err.to_string().contains("secrets.file"));
    }

    #[test]
    fn file_backend_with_path_accepted() {
        let overlay: toml::Value =
            toml::from_str("[secrets]\nbackend = \"file\"\nfile = \"secrets.toml\"\n").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.secrets.backend, SecretBackendKind::File);
        assert_eq!(config.secrets.file, Some(PathBuf::from("secrets.toml")));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str("[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 5\nz = 6").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(5));
        assert_eq!(merged["t"]["z"].as_integer(), Some(6));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(value)).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.endpoints.image_url, defaults.endpoints.image_url);
        assert_eq!(config.endpoints.profile_url, defaults.endpoints.profile_url);
        assert_eq!(config.http.user_agent, defaults.http.user_agent);
        assert_eq!(config.image.overlay, defaults.image.overlay);
        assert_eq!(config.secrets.cookies, defaults.secrets.cookies);
    }
}
