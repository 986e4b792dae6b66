//! Site configuration.
//!
//! Configuration is TOML, loaded once at process start and frozen: every
//! core component borrows it immutably and nothing mutates it mid-request.
//! Omitted sections fall back to built-in defaults, so an empty (or absent)
//! file yields a fully working demo site.
//!
//! ```toml
//! [site]
//! base_url = "https://example.com"
//! name = "Example Consulting"
//!
//! [content]
//! min_words = 500
//! max_words = 900
//! scale_margin = 50
//!
//! [[services]]
//! slug = "ai-consulting"
//! name = "AI Consulting"
//! blurb = "hands-on AI adoption roadmaps"
//!
//! [[localities]]
//! slug = "dallas-tx"
//! name = "Dallas"
//! state = "Texas"
//! landmark = "Reunion Tower"
//! metro = "Dallas-Fort Worth"
//! industries = ["logistics", "healthcare"]
//!
//! [[pools]]
//! section = "cta"
//! fragments = ["Call us today and ask for the scoping checklist."]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pool::PoolExtension;
use crate::registry::{Locality, Registry, Service};
use crate::{Error, Result};

/// Root configuration for one site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity.
    pub site: SiteConfig,
    /// Word-count band and pool-sizing margin.
    pub content: ContentConfig,
    /// Service table; empty means use the built-in registry.
    pub services: Vec<Service>,
    /// Locality table; empty means use the built-in registry.
    pub localities: Vec<Locality>,
    /// Extra fragments appended to built-in token pools.
    pub pools: Vec<PoolExtension>,
}

/// Base-URL and site-identity values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Declared scheme+host every canonical identity is fixed to.
    pub base_url: String,
    /// Site display name, used by the structured-data layer.
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.com".to_string(),
            name: "Example Consulting".to_string(),
        }
    }
}

/// Content-length band and collision-margin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Minimum free-text words per page; filler extends up to this.
    pub min_words: usize,
    /// Maximum free-text words per page; exceeding it is a warning.
    pub max_words: usize,
    /// Required ratio of pool combination capacity to deployed
    /// service × locality count.
    pub scale_margin: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_words: 500,
            max_words: 900,
            scale_margin: 50,
        }
    }
}

impl Config {
    /// Load configuration from the default location or fall back to
    /// defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined, the
    /// file exists but cannot be read or parsed, or validation fails.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check load-time invariants. Violations here are the only fatal
    /// error class in the crate, and they fire before any request is
    /// served.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.trim().is_empty() {
            return Err(Error::Config("site.base_url must not be empty".to_string()));
        }
        if self.content.min_words == 0 || self.content.min_words >= self.content.max_words {
            return Err(Error::Config(format!(
                "word-count band [{}, {}] is invalid: minimum must be positive and below maximum",
                self.content.min_words, self.content.max_words
            )));
        }
        Ok(())
    }

    /// Build the service/locality registry this configuration describes:
    /// the built-in tables unless the config supplies its own.
    #[must_use]
    pub fn registry(&self) -> Registry {
        if self.services.is_empty() && self.localities.is_empty() {
            return Registry::builtin();
        }
        let builtin = Registry::builtin();
        let services = if self.services.is_empty() {
            builtin.services().to_vec()
        } else {
            self.services.clone()
        };
        let localities = if self.localities.is_empty() {
            builtin.localities().to_vec()
        } else {
            self.localities.clone()
        };
        Registry::from_parts(services, localities)
    }

    /// Default configuration file path in the platform config directory.
    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "pagegen", "pagegen")
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
