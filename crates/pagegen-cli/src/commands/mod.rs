//! Command implementations.

pub mod audit;
pub mod page;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use pagegen_core::{Composer, Config, Normalizer, PoolRegistry, Registry};

/// Everything a command needs, loaded once and frozen.
pub struct Site {
    /// Site configuration.
    pub config: Config,
    /// Service/locality facts.
    pub registry: Registry,
    /// Token pools.
    pub pools: PoolRegistry,
    /// Path normalizer bound to the configured base URL.
    pub normalizer: Normalizer,
}

impl Site {
    /// Load the site from an explicit config path or the default location.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::load().context("loading default config")?,
        };
        let registry = config.registry();
        let pools =
            PoolRegistry::with_extensions(&config.pools).context("building token pools")?;
        pools.check_scale(registry.combination_count(), config.content.scale_margin);
        let normalizer = Normalizer::new(&config.site.base_url);
        Ok(Self {
            config,
            registry,
            pools,
            normalizer,
        })
    }

    /// A composer borrowing this site's frozen configuration.
    #[must_use]
    pub fn composer(&self) -> Composer<'_> {
        Composer::new(&self.registry, &self.pools, &self.config.content)
    }
}
