use crate::core::{Database, FacadeError, Result};
use crate::core::db::ConnectionInfo;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

/// Which driver the facade opens sessions with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Mysql,
    Sqlite,
}

/// Connection settings.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub driver: Backend,
    #[serde(default = "default_host")]
    pub host: String,
    pub port: Option<u16>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Database name, or the file path for sqlite
    pub name: String,
    #[serde(default)]
    pub debug: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl DatabaseConfig {
    pub fn connection_info(&self) -> ConnectionInfo {
        let info = ConnectionInfo::new(&self.host, &self.user, &self.password, &self.name);
        match self.port {
            Some(port) => info.with_port(port),
            None => info,
        }
    }
}

impl Database {
    /// Builds a facade for the configured driver, applies the debug flag
    /// and connects.
    pub fn from_config(config: &DatabaseConfig) -> Result<Database> {
        let db = match config.driver {
            #[cfg(feature = "mysql")]
            Backend::Mysql => Database::mysql(),
            #[cfg(not(feature = "mysql"))]
            Backend::Mysql => {
                return Err(FacadeError::Config(
                    "mysql driver requested but the `mysql` feature is disabled".to_string(),
                ))
            }
            Backend::Sqlite => Database::sqlite(),
        };
        db.set_debug(config.debug)?;
        db.connect_to(config.connection_info())?;
        Ok(db)
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = dbfacade::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| FacadeError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| FacadeError::Config(format!("{}: {}", path.display(), e)))
}

/// `<config dir>/dbfacade/config.toml`, where the binary looks when no
/// `--config` is given
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dbfacade").join("config.toml"))
}
