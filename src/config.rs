use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Where the provider/procedure catalog comes from.
/// No path means the built-in demo catalog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Smallest accepted search radius, in miles
    pub min_radius_miles: u32,
    /// Largest accepted search radius, in miles
    pub max_radius_miles: u32,
    /// Ratings must be strictly greater than this when a rating toggle is set
    pub rating_threshold: f32,
    /// Complementary services are offered only above this co-occurrence frequency
    pub addon_frequency_threshold: u8,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_radius_miles: 1,
            max_radius_miles: 50,
            rating_threshold: 4.0,
            addon_frequency_threshold: 6,
        }
    }
}

/// External map surface the UI can delegate result rendering to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    pub enabled: bool,
    pub url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(config::Environment::with_prefix("CARE_COMPARE").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be non-zero");
    }

    if cfg.query.min_radius_miles == 0 {
        anyhow::bail!("Minimum radius must be at least 1 mile");
    }

    if cfg.query.min_radius_miles > cfg.query.max_radius_miles {
        anyhow::bail!(
            "Minimum radius ({}) cannot exceed maximum radius ({})",
            cfg.query.min_radius_miles,
            cfg.query.max_radius_miles
        );
    }

    if !(0.0..=5.0).contains(&cfg.query.rating_threshold) {
        anyhow::bail!(
            "Rating threshold must be between 0 and 5, got {}",
            cfg.query.rating_threshold
        );
    }

    if cfg.query.addon_frequency_threshold > 10 {
        anyhow::bail!(
            "Add-on frequency threshold must be between 0 and 10, got {}",
            cfg.query.addon_frequency_threshold
        );
    }

    if cfg.map.enabled && cfg.map.url.is_empty() {
        anyhow::bail!("Map display is enabled but no map URL is configured");
    }

    Ok(())
}
