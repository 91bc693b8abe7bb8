use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the catalog database inside its directory.
pub const DATABASE_FILE: &str = "cafeteria_db.sqlite";

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: PathBuf,
    /// Port to listen on
    pub port: u16,
    /// Directory holding `buscador.html`
    pub static_dir: PathBuf,
    /// Populate empty collections with the reference menu at startup
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cafeteria")
                .join(DATABASE_FILE),
            port: 8080,
            static_dir: PathBuf::from("."),
            seed_sample_data: true,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("CAFETERIA_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Read(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::Parse(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("CAFETERIA_DATABASE_PATH") {
            config.database_path = PathBuf::from(db_path);
        }
        if let Ok(port) = std::env::var("CAFETERIA_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("CAFETERIA_PORT", port))?;
        }
        if let Ok(static_dir) = std::env::var("CAFETERIA_STATIC_DIR") {
            config.static_dir = PathBuf::from(static_dir);
        }
        if let Ok(seed) = std::env::var("CAFETERIA_SEED") {
            config.seed_sample_data = parse_bool(&seed)
                .ok_or(ConfigError::InvalidEnv("CAFETERIA_SEED", seed))?;
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/cafeteria/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cafeteria")
            .join("config.yaml")
    }

    pub fn search_page(&self) -> PathBuf {
        self.static_dir.join("buscador.html")
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {1}", .0.display())]
    Read(PathBuf, std::io::Error),
    #[error("Failed to parse config file '{}': {1}", .0.display())]
    Parse(PathBuf, serde_yaml::Error),
    #[error("Invalid value for {0}: '{1}'")]
    InvalidEnv(&'static str, String),
}
