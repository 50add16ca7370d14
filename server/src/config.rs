//! Server configuration parsed from environment variables.
//!
//! Required:
//! - `DATABASE_URL`
//! - `BLOB_READ_WRITE_TOKEN`
//!
//! Optional:
//! - `PORT`: default 3000
//! - `DB_MAX_CONNECTIONS`: default 5
//! - `BLOB_API_URL`: default `https://blob.vercel-storage.com`
//! - `BLOB_PUBLIC_HOST`: default `public.blob.vercel-storage.com`
//! - `BLOB_TIMEOUT_SECS`: default 30
//! - `EXPOSE_ERROR_DETAILS`: default false

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";
pub const DEFAULT_BLOB_PUBLIC_HOST: &str = "public.blob.vercel-storage.com";
pub const DEFAULT_BLOB_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobConfig {
    pub api_url: String,
    pub token: String,
    /// Host suffix of URLs the store serves; only those are ever deleted.
    pub public_host: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub blob: BlobConfig,
    pub expose_error_details: bool,
}

impl ServerConfig {
    /// Build typed server config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            get(var).filter(|v| !v.trim().is_empty()).ok_or(ConfigError::Missing(var))
        };

        let database_url = required("DATABASE_URL")?;
        let token = required("BLOB_READ_WRITE_TOKEN")?;
        let port = env_parse(&get, "PORT", DEFAULT_PORT)?;
        let db_max_connections = env_parse(&get, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let timeout_secs = env_parse(&get, "BLOB_TIMEOUT_SECS", DEFAULT_BLOB_TIMEOUT_SECS)?;
        let expose_error_details = env_flag(&get, "EXPOSE_ERROR_DETAILS")?;

        let api_url = get("BLOB_API_URL")
            .unwrap_or_else(|| DEFAULT_BLOB_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let public_host = get("BLOB_PUBLIC_HOST").unwrap_or_else(|| DEFAULT_BLOB_PUBLIC_HOST.to_owned());

        Ok(Self {
            database_url,
            port,
            db_max_connections,
            blob: BlobConfig { api_url, token, public_host, timeout_secs },
            expose_error_details,
        })
    }
}

fn env_parse<F, T>(get: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn env_flag<F>(get: &F, var: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(var).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { var, value: raw.to_owned() }),
        },
    }
}
