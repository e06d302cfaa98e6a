//! Configuration for the TAP Help menu, optionally read from a TOML file.
//!
//! The config file is optional. A missing file yields `Config::default()`,
//! which reproduces the stock trustedanalytics menu. Unknown keys are accepted
//! by serde but logged as warnings so typos do not go unnoticed.
//!
//! A loaded `Config` is immutable and handed by reference to the catalog,
//! merger, renderer and feed; nothing reads configuration from globals.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::util::{validate_index_url, LinkError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid package index URL: {0}")]
    IndexUrl(#[from] LinkError),

    #[error("Invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// HTTP verb used for the package index query.
///
/// Only the response contract matters to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

/// Where release metadata comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// JSON endpoint returning `{"releases": {...}}`.
    pub url: String,
    pub method: RequestMethod,
    /// Upper bound for the single index request, in seconds.
    pub timeout_secs: u64,
    /// Human name used in release tooltips ("Uploaded to <name> on ...").
    pub display_name: String,
    /// When false no request is issued and the install menu lists no releases.
    pub enabled: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: "https://pypi.python.org/pypi/trustedanalytics/json".to_string(),
            method: RequestMethod::Get,
            timeout_secs: 30,
            display_name: "pypi.python.org".to_string(),
            enabled: true,
        }
    }
}

impl IndexConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A plain external link shown in the top-level menu.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkConfig {
    pub name: String,
    pub title: String,
    pub url: String,
}

impl LinkConfig {
    fn new(name: &str, title: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

/// Top-level dropdown appended to the host toolbar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Toggle label of the dropdown.
    pub title: String,
    /// Element id given to the dropdown's item list.
    pub id: String,
    /// Reference links listed below the first separator.
    pub links: Vec<LinkConfig>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            title: "TAP Help".to_string(),
            id: "tap_help".to_string(),
            links: vec![
                LinkConfig::new(
                    "ATK Documentation",
                    "Trusted Analytics Python Client Documentation",
                    "http://trustedanalytics.github.io/atk/",
                ),
                LinkConfig::new(
                    "ATK Git Repo",
                    "ATK Github Repository",
                    "https://github.com/trustedanalytics/atk",
                ),
                LinkConfig::new(
                    "TAP Jira",
                    "File bugs",
                    "https://trustedanalytics.atlassian.net",
                ),
                LinkConfig::new(
                    "TAP Home Page",
                    "Trusted Analytics Platform Home Page",
                    "http://trustedanalytics.org/",
                ),
                LinkConfig::new(
                    "TAP Community",
                    "Trusted Analytics Platform Community",
                    "https://community.trustedanalytics.org/",
                ),
            ],
        }
    }
}

/// The install submenu: how releases are classified and which fixed entries
/// surround them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstallBranchConfig {
    /// Id of the submenu whose children are replaced after the fetch.
    pub id: String,
    pub name: String,
    pub title: String,
    /// Entries kept per channel, newest first.
    pub max_per_channel: usize,
    /// Substring marking a pre-release (weekly) build.
    pub weekly_marker: String,
    /// Substring marking a post-release (production) build.
    pub production_marker: String,
    /// Install command for one release; `{version}` is substituted.
    pub release_snippet: String,
    pub central_name: String,
    pub central_title: String,
    /// Package page on the central index.
    pub central_url: String,
    pub server_name: String,
    pub server_title: String,
    /// Snippet for installing from a running server; carries a placeholder
    /// the user edits by hand.
    pub server_snippet: String,
}

impl Default for InstallBranchConfig {
    fn default() -> Self {
        Self {
            id: "install-atk".to_string(),
            name: "Install ATK Client".to_string(),
            title: "Install ATK Client".to_string(),
            max_per_channel: 5,
            weekly_marker: "dev".to_string(),
            production_marker: "post".to_string(),
            release_snippet: "#This will install version {version} of the ATK client\n\
                              !pip install trustedanalytics=={version}"
                .to_string(),
            central_name: "From PyPi central".to_string(),
            central_title: "Install the client from PyPi central.".to_string(),
            central_url: "https://pypi.python.org/pypi/trustedanalytics".to_string(),
            server_name: "From ATK Server".to_string(),
            server_title: "Install the client directly from an ATK server instance."
                .to_string(),
            server_snippet: "#Replace YOUR_ATK_SERVER_URL with the URL to your ATK server instance. \n\n\
                             !pip install YOUR_ATK_SERVER_URL/client\n\n"
                .to_string(),
        }
    }
}

impl InstallBranchConfig {
    /// Install snippet for one concrete version.
    pub fn snippet_for(&self, version: &str) -> String {
        self.release_snippet.replace("{version}", version)
    }
}

/// Top-level configuration.
///
/// All sections use `#[serde(default)]` so any subset of keys can be given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub menu: MenuConfig,
    pub install: InstallBranchConfig,
}

const KNOWN_SECTIONS: &[(&str, &[&str])] = &[
    ("index", &["url", "method", "timeout_secs", "display_name", "enabled"]),
    ("menu", &["title", "id", "links"]),
    (
        "install",
        &[
            "id",
            "name",
            "title",
            "max_per_channel",
            "weekly_marker",
            "production_marker",
            "release_snippet",
            "central_name",
            "central_title",
            "central_url",
            "server_name",
            "server_title",
            "server_snippet",
        ],
    ),
];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Semantically invalid values → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            index = %config.index.url,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw);
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the menu unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_index_url(&self.index.url)?;

        if self.index.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "index.timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.install.max_per_channel == 0 {
            return Err(ConfigError::Invalid {
                key: "install.max_per_channel",
                reason: "must keep at least one release per channel".to_string(),
            });
        }
        let required = [
            ("install.id", &self.install.id),
            ("install.name", &self.install.name),
            ("install.weekly_marker", &self.install.weekly_marker),
            ("install.production_marker", &self.install.production_marker),
            ("install.release_snippet", &self.install.release_snippet),
            ("install.central_name", &self.install.central_name),
            ("install.central_url", &self.install.central_url),
            ("install.server_name", &self.install.server_name),
            ("install.server_snippet", &self.install.server_snippet),
            ("menu.title", &self.menu.title),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must not be empty".to_string(),
                });
            }
        }

        for (i, link) in self.menu.links.iter().enumerate() {
            if link.name.trim().is_empty() || link.url.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: "menu.links",
                    reason: format!("entry {} needs a name and a url", i + 1),
                });
            }
        }
        Ok(())
    }
}

fn warn_unknown_keys(raw: &toml::Table) {
    for (key, value) in raw {
        let Some((_, fields)) = KNOWN_SECTIONS.iter().find(|(name, _)| name == key) else {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
            continue;
        };
        if let Some(table) = value.as_table() {
            for field in table.keys() {
                if !fields.contains(&field.as_str()) {
                    tracing::warn!(section = %key, key = %field, "Unknown key in config file, ignoring");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
