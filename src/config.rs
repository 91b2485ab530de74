//! Configuration management for the RAX file server
//!
//! Built once at startup from defaults, an optional TOML file and
//! `FILE_SERVER_*` environment overrides, then shared read-only.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "FILE_SERVER";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORAGE_PATH: &str = "./uploads";
const DEFAULT_JWT_SECRET: &str = "change-me";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;
const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 100;

/// One year
const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;
/// 1 TiB
const MAX_UPLOAD_SIZE_MB: u64 = 1024 * 1024;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "rax-file-server", about = "Single-tenant HTTP file server")]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    /// Environment: FILE_SERVER_LISTEN_ADDR
    pub listen_addr: String,

    /// Directory all served content lives under
    /// Environment: FILE_SERVER_STORAGE_PATH
    pub storage_path: String,

    /// HMAC secret for bearer tokens
    pub jwt_secret: String,

    pub admin_username: String,
    pub admin_password: String,

    /// Lifetime of issued tokens
    pub token_ttl_hours: u64,

    /// Request body limit for uploads
    pub max_upload_size_mb: u64,

    /// Optional frontend bundle served for non-API paths
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            max_upload_size_mb: DEFAULT_MAX_UPLOAD_SIZE_MB,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration with environment overrides.
    ///
    /// An explicit `path` must exist; otherwise `config.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let mut builder = Config::builder()
            .set_default("listen_addr", defaults.listen_addr)?
            .set_default("storage_path", defaults.storage_path)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("admin_username", defaults.admin_username)?
            .set_default("admin_password", defaults.admin_password)?
            .set_default("token_ttl_hours", defaults.token_ttl_hours)?
            .set_default("max_upload_size_mb", defaults.max_upload_size_mb)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;

        if config.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("jwt_secret is the built-in default; set FILE_SERVER_JWT_SECRET");
        }

        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.trim().is_empty() {
            return Err(ConfigError::Message("listen_addr cannot be empty".into()));
        }

        if self.storage_path.trim().is_empty() {
            return Err(ConfigError::Message("storage_path cannot be empty".into()));
        }

        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Message("jwt_secret cannot be empty".into()));
        }

        if self.admin_username.trim().is_empty() || self.admin_password.is_empty() {
            return Err(ConfigError::Message(
                "admin_username and admin_password are required".into(),
            ));
        }

        if self.token_ttl_hours == 0 {
            return Err(ConfigError::Message(
                "token_ttl_hours must be greater than 0".into(),
            ));
        }

        if self.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Message(format!(
                "token_ttl_hours cannot exceed {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }

        if self.max_upload_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        if self.max_upload_size_mb > MAX_UPLOAD_SIZE_MB {
            return Err(ConfigError::Message(format!(
                "max_upload_size_mb cannot exceed {}",
                MAX_UPLOAD_SIZE_MB
            )));
        }

        Ok(())
    }

    /// Get storage path as PathBuf
    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_path)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_hours.saturating_mul(60 * 60))
    }

    /// Get maximum upload size in bytes
    pub fn max_upload_size_bytes(&self) -> usize {
        let bytes = self.max_upload_size_mb.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.token_ttl(), Duration::from_secs(24 * 3600));
        assert_eq!(config.max_upload_size_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            ServerConfig {
                storage_path: "".into(),
                ..ServerConfig::default()
            },
            ServerConfig {
                jwt_secret: "".into(),
                ..ServerConfig::default()
            },
            ServerConfig {
                admin_password: "".into(),
                ..ServerConfig::default()
            },
            ServerConfig {
                token_ttl_hours: 0,
                ..ServerConfig::default()
            },
            ServerConfig {
                max_upload_size_mb: 0,
                ..ServerConfig::default()
            },
            ServerConfig {
                max_upload_size_mb: MAX_UPLOAD_SIZE_MB + 1,
                ..ServerConfig::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn test_size_helpers_saturate() {
        let config = ServerConfig {
            max_upload_size_mb: u64::MAX,
            token_ttl_hours: u64::MAX,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.max_upload_size_bytes(), usize::MAX);
        assert_eq!(config.token_ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("server.toml");
        std::fs::write(
            &file,
            r#"
listen_addr = "127.0.0.1:9090"
storage_path = "/srv/files"
jwt_secret = "s3cret"
token_ttl_hours = 12
static_dir = "dist"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(Some(&file)).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9090");
        assert_eq!(config.storage_path, "/srv/files");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl_hours, 12);
        assert_eq!(config.static_dir.as_deref(), Some("dist"));
        // untouched keys keep their defaults
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.max_upload_size_mb, 100);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ServerConfig::load(Some(&missing)).is_err());
    }
}
