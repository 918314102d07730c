/// Configuration management for the API server
///
/// Configuration is loaded from environment variables (with `.env` support
/// for development). Missing required values and undersized JWT secrets fail
/// startup, so a misconfigured secret never makes it to the first request.
///
/// # Environment Variables
///
/// - `API_HOST`, `API_PORT`: bind address (default 0.0.0.0:8080)
/// - `API_CORS_ORIGINS`: comma-separated origins, or `*` (default `*`)
/// - `API_PRODUCTION`: `true` enables Secure/SameSite=Strict cookies + HSTS
/// - `DATABASE_URL` (required), `DATABASE_MAX_CONNECTIONS` (default 10)
/// - `JWT_ACCESS_SECRET`, `JWT_REFRESH_SECRET` (required, >= 32 bytes)
/// - `JWT_ACCESS_TTL_SECS` (default 900), `JWT_REFRESH_TTL_SECS`
///   (default 604800)
/// - `S3_BUCKET`, `S3_REGION`, `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY`,
///   `S3_ENDPOINT` (optional)

use prepstack_shared::auth::tokens::JwtConfig;
use prepstack_shared::storage::presign::S3Config;
use std::env;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT signing configuration
    pub jwt: JwtConfig,

    /// Object storage configuration
    pub s3: S3Config,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive (development)
    pub cors_origins: Vec<String>,

    /// Production hardening: Secure cookies, SameSite=Strict, HSTS
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

fn require(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{} environment variable is required", name))
}

fn require_secret(name: &str) -> anyhow::Result<String> {
    let value = require(name)?;
    if value.len() < 32 {
        anyhow::bail!("{} must be at least 32 characters long", name);
    }
    Ok(value)
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing, unparsable, or if
    /// either JWT secret is shorter than 32 bytes.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("API_CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let production = env::var("API_PRODUCTION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let database_url = require("DATABASE_URL")?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let access_secret = require_secret("JWT_ACCESS_SECRET")?;
        let refresh_secret = require_secret("JWT_REFRESH_SECRET")?;

        let access_ttl_secs = env::var("JWT_ACCESS_TTL_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse::<i64>()?;
        let refresh_ttl_secs = env::var("JWT_REFRESH_TTL_SECS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<i64>()?;

        let s3 = S3Config {
            bucket: require("S3_BUCKET")?,
            region: require("S3_REGION")?,
            access_key_id: require("S3_ACCESS_KEY_ID")?,
            secret_access_key: require("S3_SECRET_ACCESS_KEY")?,
            endpoint: env::var("S3_ENDPOINT").ok(),
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_ttl_secs,
                refresh_ttl_secs,
            },
            s3,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                access_secret: "access-secret-at-least-32-bytes-long!".to_string(),
                refresh_secret: "refresh-secret-at-least-32-bytes-lng!".to_string(),
                ..Default::default()
            },
            s3: S3Config {
                bucket: "bucket".to_string(),
                region: "us-east-1".to_string(),
                access_key_id: "key".to_string(),
                secret_access_key: "secret".to_string(),
                endpoint: None,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_jwt_defaults_match_token_lifetimes() {
        let config = test_config();
        assert_eq!(config.jwt.access_ttl_secs, 900);
        assert_eq!(config.jwt.refresh_ttl_secs, 604_800);
    }
}
