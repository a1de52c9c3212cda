//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use feed_infra::{DatabaseConfig, JwtConfig};

/// Route segment (and public path prefix) for uploaded images.
pub const IMAGE_ROUTE: &str = "images";

/// Image upload settings.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub dir: PathBuf,
    pub max_upload_bytes: usize,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub images: ImageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS").unwrap_or(20),
                min_connections: parsed(&lookup, "DB_MIN_CONNECTIONS").unwrap_or(2),
                connect_timeout: Duration::from_secs(
                    parsed(&lookup, "DB_CONNECT_TIMEOUT_SECS").unwrap_or(10),
                ),
            });

        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").unwrap_or(jwt_defaults.secret),
            expiration_minutes: parsed(&lookup, "JWT_EXPIRATION_MINUTES")
                .unwrap_or(jwt_defaults.expiration_minutes),
            issuer: lookup("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        let images = ImageConfig {
            dir: lookup("IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(IMAGE_ROUTE)),
            max_upload_bytes: parsed(&lookup, "MAX_UPLOAD_BYTES").unwrap_or(5 * 1024 * 1024),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(8080),
            database,
            jwt,
            images,
        }
    }
}

/// Parse a variable, treating unparsable values as unset.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.parse().ok())
}
