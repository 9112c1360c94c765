use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub siskeudes: SiskeudesConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Connection settings for the SISKEUDES data provider
#[derive(Debug, Clone)]
pub struct SiskeudesConfig {
    /// Endpoint returning output details for one regency
    pub api_url: String,
    /// Bearer token, sent only when set
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Pause after every successfully stored region
    pub request_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            database: DatabaseConfig::from_env()?,
            siskeudes: SiskeudesConfig::from_env()?,
            sync: SyncConfig::from_env()?,
        })
    }
}

impl DatabaseConfig {
    // A sequential job never needs more than a couple of connections
    const DEFAULT_MAX_CONNECTIONS: u32 = 2;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SiskeudesConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 120;
    const DEFAULT_USER_AGENT: &'static str = "SiskeudesSync/0.1 (output-detail-sync)";

    pub fn from_env() -> Result<Self, String> {
        let api_url = env::var("SISKEUDES_API_URL")
            .map_err(|_| "SISKEUDES_API_URL environment variable is required".to_string())?;

        let api_token = env::var("SISKEUDES_API_TOKEN")
            .ok()
            .filter(|s| !s.is_empty());

        let timeout_secs = env::var("SISKEUDES_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SISKEUDES_TIMEOUT_SECS must be a valid number".to_string())?;

        let user_agent = env::var("SISKEUDES_USER_AGENT")
            .unwrap_or_else(|_| Self::DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            api_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }
}

impl SyncConfig {
    const DEFAULT_REQUEST_DELAY_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let request_delay_secs = env::var("SYNC_REQUEST_DELAY_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_DELAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SYNC_REQUEST_DELAY_SECS must be a valid number".to_string())?;

        Ok(Self {
            request_delay: Duration::from_secs(request_delay_secs),
        })
    }
}
