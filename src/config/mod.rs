//! Site configuration loading and validation.
//!
//! The config file is optional: [`resolve`] uses an explicit path,
//! otherwise auto-detects `launchpad.{yaml,yml,json,toml}` in the
//! working directory, otherwise falls back to built-in defaults.
//! Submodules provide the data model and validation logic.

pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::LaunchpadError;
use model::SiteConfig;
use validation::validate;

const CANDIDATES: [&str; 4] = [
    "launchpad.yaml",
    "launchpad.yml",
    "launchpad.json",
    "launchpad.toml",
];

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    /// SHA-256 of the file contents.
    Hash(String),
    Builtin,
}

impl ConfigVersion {
    /// Short form for display: the first 8 hex digits, or `builtin`.
    #[must_use]
    pub fn short(&self) -> &str {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h),
            Self::Builtin => "builtin",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Arc<SiteConfig>,
    pub version: ConfigVersion,
    pub source_name: String,
}

impl LoadedConfig {
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_config(SiteConfig::default())
    }

    /// Wrap an in-memory config (used for defaults and tests).
    #[must_use]
    pub fn from_config(config: SiteConfig) -> Self {
        Self {
            config: Arc::new(config),
            version: ConfigVersion::Builtin,
            source_name: "builtin".into(),
        }
    }
}

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<SiteConfig, LaunchpadError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| LaunchpadError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| LaunchpadError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| LaunchpadError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(LaunchpadError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Read, parse, validate and fingerprint a config file.
pub async fn load_file(path: &Path) -> Result<LoadedConfig, LaunchpadError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LaunchpadError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LaunchpadError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validate(&config) {
        return Err(LaunchpadError::ConfigValidation { errors });
    }

    Ok(LoadedConfig {
        config: Arc::new(config),
        version: ConfigVersion::Hash(sha256_hex(content.as_bytes())),
        source_name: path.display().to_string(),
    })
}

/// Load the explicit config file, else an auto-detected one, else defaults.
pub async fn resolve(explicit: Option<&Path>) -> Result<LoadedConfig, LaunchpadError> {
    if let Some(path) = explicit {
        return load_file(path).await;
    }

    for name in &CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return load_file(&path).await;
        }
    }

    tracing::info!("no config file found, using built-in site defaults");
    Ok(LoadedConfig::builtin())
}
