use std::env;

use anyhow::bail;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allow_origin: String,
}

pub const API_KEY_VAR: &str = "ONESTEPGPS_API_KEY";

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var(API_KEY_VAR).unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("{} environment variable not set", API_KEY_VAR);
        }

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: var("SERVER_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8081),
                environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
                max_body_bytes: var("MAX_BODY_BYTES")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5 * 1024 * 1024),
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").unwrap_or_else(|| "sqlite://preferences.db".to_string()),
                max_connections: var("DB_MAX_CONNS")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5),
            },
            telemetry: TelemetryConfig {
                api_key,
                base_url: var("ONESTEPGPS_BASE_URL").unwrap_or_else(|| {
                    "https://track.onestepgps.com/v3/api/public".to_string()
                }),
            },
            cors: CorsConfig {
                allow_origin: var("CORS_ALLOW_ORIGIN")
                    .unwrap_or_else(|| "http://localhost:8080".to_string()),
            },
        })
    }
}
