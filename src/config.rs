use std::str::FromStr;

use derive_more::Display;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5900";
pub const DEVELOPMENT_API_URL: &str = "http://localhost:5900";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "https://cicd-todo-app-89c3b.web.app",
    "https://cicd-todo-app-89c3b.firebaseapp.com",
];

lazy_static::lazy_static! {
    /// Base url of the todo api used by the cli and the terminal ui
    pub static ref API_URL: String = client_base_url(|key| std::env::var(key).ok());
}

#[derive(Debug, Display)]
pub enum ConfigError {
    #[display(fmt = "{} must be set", _0)]
    Missing(&'static str),

    #[display(fmt = "Invalid value {:?} for {}", value, key)]
    Invalid { key: &'static str, value: String },
}

impl std::error::Error for ConfigError {}

/// Which `TodoStore` the server runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "array" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            _ => Err(()),
        }
    }
}

/// Server settings, read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub db_pool_size: u32,
    pub cors_origins: Vec<String>,
    pub seed_samples: bool,
    pub workers: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: String::from(DEFAULT_BIND_ADDR),
            storage: StorageBackend::Memory,
            database_url: None,
            db_pool_size: DEFAULT_DB_POOL_SIZE,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            seed_samples: false,
            workers: None,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup, `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(addr) = lookup("TODO_BIND_ADDR") {
            settings.bind_addr = addr;
        }

        if let Some(port) = lookup("PORT") {
            let port: u16 = parse_var("PORT", port)?;
            let host = settings
                .bind_addr
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| settings.bind_addr.clone());

            settings.bind_addr = format!("{}:{}", host, port);
        }

        if let Some(storage) = lookup("TODO_STORAGE") {
            settings.storage = storage
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    key: "TODO_STORAGE",
                    value: storage.clone(),
                })?;
        }

        settings.database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if settings.storage == StorageBackend::Postgres && settings.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        if let Some(size) = lookup("TODO_DB_POOL_SIZE") {
            settings.db_pool_size = parse_var("TODO_DB_POOL_SIZE", size)?;
        }

        if let Some(origins) = lookup("TODO_CORS_ORIGINS") {
            settings.cors_origins = origins
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect();

            // only explicit origins, credentials are always allowed
            if settings.cors_origins.iter().any(|origin| origin == "*") {
                return Err(ConfigError::Invalid {
                    key: "TODO_CORS_ORIGINS",
                    value: origins,
                });
            }
        }

        if let Some(seed) = lookup("TODO_SEED_SAMPLES") {
            settings.seed_samples = parse_bool("TODO_SEED_SAMPLES", seed)?;
        }

        if let Some(workers) = lookup("TODO_WORKERS") {
            settings.workers = Some(parse_var("TODO_WORKERS", workers)?);
        }

        Ok(settings)
    }
}

/// Resolves the api base url for the client side
///
/// `TODO_API_URL` wins, otherwise `TODO_ENV` picks between the local server
/// and `TODO_PRODUCTION_API_URL`.
pub fn client_base_url<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("TODO_API_URL").filter(|url| !url.trim().is_empty()) {
        return url.trim().trim_end_matches('/').to_string();
    }

    let env = lookup("TODO_ENV").unwrap_or_else(|| String::from("development"));

    if env.trim().eq_ignore_ascii_case("production") {
        match lookup("TODO_PRODUCTION_API_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => return url.trim().trim_end_matches('/').to_string(),
            None => log::warn!("TODO_PRODUCTION_API_URL is not set, using the local server"),
        }
    }

    String::from(DEVELOPMENT_API_URL)
}
