//! Service configuration
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. optional TOML file (`--config` / `STARTLAB_CONFIG`)
//! 3. environment variables, including `.env` files loaded by [`load_dotenv`]
//!
//! Database connection: `DATABASE_URL`, or the complete `POSTGRES_*` set,
//! or the complete `DB_*` set, in that order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::media::DEFAULT_MEDIA_BASE_URL;

/// Environment variable pointing at a TOML config file
pub const CONFIG_PATH_ENV: &str = "STARTLAB_CONFIG";

const POSTGRES_VARS: [&str; 5] = [
    "POSTGRES_HOST",
    "POSTGRES_PORT",
    "POSTGRES_DB",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
];
const DB_VARS: [&str; 5] = ["DB_HOST", "DB_PORT", "DB_NAME", "DB_USER", "DB_PASSWORD"];

/// Load environment variables from .env files
///
/// Current directory first, then `~/.startlab/.env`. Variables already set
/// are never overwritten.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path.display().to_string());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => loaded_from.push(env_file.display().to_string()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.startlab)");
    } else {
        info!("Loaded environment from: {}", loaded_from.join(", "));
    }
}

/// `~/.startlab`
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".startlab"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "StartLab".to_owned(),
            description: "Application intake API".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            allowed_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Individual connection parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseParts {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

/// Where the pool connects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Url(String),
    Parts(DatabaseParts),
}

impl DatabaseTarget {
    /// Safe to log: never includes the password.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => match url.rsplit_once('@') {
                Some((_, host)) => format!("postgres://***@{host}"),
                None => url.clone(),
            },
            Self::Parts(p) => format!("{}@{}:{}/{}", p.user, p.host, p.port, p.database),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub parts: Option<DatabaseParts>,
    pub pool_size: u32,
    /// Names of variables a partially configured `POSTGRES_*` set lacks.
    #[serde(skip)]
    missing: Vec<&'static str>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            parts: None,
            pool_size: 5,
            missing: POSTGRES_VARS.to_vec(),
        }
    }
}

impl DatabaseConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Resolve the connection target, or explain what is missing.
    pub fn target(&self) -> Result<DatabaseTarget> {
        if let Some(url) = &self.url {
            return Ok(DatabaseTarget::Url(url.clone()));
        }
        if let Some(parts) = &self.parts {
            return Ok(DatabaseTarget::Parts(parts.clone()));
        }
        Err(CoreError::config(format!(
            "database not configured: set DATABASE_URL or the full POSTGRES_* or DB_* set (missing: {})",
            self.missing.join(", ")
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub base_url: String,
    pub dir: PathBuf,
    pub position_document: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MEDIA_BASE_URL.to_owned(),
            dir: PathBuf::from("media"),
            position_document: PathBuf::from("положение_сл.pdf"),
        }
    }
}

/// Full service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartlabConfig {
    pub project: ProjectConfig,
    pub environment: String,
    pub debug: bool,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
}

impl Default for StartlabConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            environment: "development".to_owned(),
            debug: false,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_number<T: std::str::FromStr>(var: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::config(format!("{var} must be a number, got '{value}'")))
}

/// Comma-separated list, blanks dropped.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

impl StartlabConfig {
    /// Defaults, then `path` (or `STARTLAB_CONFIG`), then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let path = path.map(Path::to_path_buf).or(env_path);
        Self::from_sources(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Same as [`Self::load`] with an injectable environment.
    pub fn from_sources<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text).map_err(|source| CoreError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        if config.database.url.is_some() || config.database.parts.is_some() {
            config.database.missing.clear();
        }
        debug!("Loaded config file {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PROJECT_NAME") {
            self.project.name = v;
        }
        if let Some(v) = get("PROJECT_DESCRIPTION") {
            self.project.description = v;
        }
        if let Some(v) = get("PROJECT_VERSION") {
            self.project.version = v;
        }
        if let Some(v) = get("ENVIRONMENT") {
            self.environment = v;
        }
        if let Some(v) = get("DEBUG") {
            self.debug = parse_bool(&v);
        }
        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parse_number("PORT", &v)?;
        }
        if let Some(v) = get("ALLOWED_ORIGINS") {
            self.server.allowed_origins = parse_list(&v);
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = parse_number("REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("MEDIA_BASE_URL") {
            self.media.base_url = v;
        }
        if let Some(v) = get("MEDIA_DIR") {
            self.media.dir = PathBuf::from(v);
        }
        if let Some(v) = get("POSITION_DOCUMENT") {
            self.media.position_document = PathBuf::from(v);
        }
        if let Some(v) = get("DB_POOL_SIZE") {
            let size: u32 = parse_number("DB_POOL_SIZE", &v)?;
            if size == 0 {
                return Err(CoreError::config("DB_POOL_SIZE must be a positive integer"));
            }
            self.database.pool_size = size;
        }

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = Some(url);
            self.database.missing.clear();
            return Ok(());
        }

        for set in [POSTGRES_VARS, DB_VARS] {
            let values: Vec<Option<String>> = set.iter().map(|key| get(*key)).collect();
            if let [Some(host), Some(port), Some(database), Some(user), Some(password)] =
                values.as_slice()
            {
                self.database.parts = Some(DatabaseParts {
                    host: host.clone(),
                    port: parse_number(set[1], port)?,
                    database: database.clone(),
                    user: user.clone(),
                    password: password.clone(),
                });
                self.database.missing.clear();
                return Ok(());
            }
        }

        if self.database.url.is_none() && self.database.parts.is_none() {
            self.database.missing = POSTGRES_VARS
                .iter()
                .copied()
                .filter(|key| get(*key).is_none())
                .collect();
        }
        Ok(())
    }

    /// The subset shown by `GET /config` in debug mode.
    pub fn public_view(&self) -> serde_json::Value {
        serde_json::json!({
            "project": {
                "name": self.project.name,
                "description": self.project.description,
                "version": self.project.version,
            },
            "server": {
                "host": self.server.host,
                "port": self.server.port,
                "debug": self.debug,
            },
            "cors": {
                "allowed_origins": self.server.allowed_origins,
            },
            "environment": self.environment,
        })
    }
}
