use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (e.g. sqlite://alumnet.db, postgres://...)
    pub database_url: String,

    /// Signing secret for access tokens.
    pub access_token_secret: String,

    /// Signing secret for refresh tokens. Must differ from the access
    /// secret so a leaked refresh key cannot mint access tokens.
    pub refresh_token_secret: String,

    /// Access token expiry in hours (default: 24)
    pub access_token_expiry_hours: u64,

    /// Refresh token expiry in days (default: 7)
    pub refresh_token_expiry_days: u64,

    /// bcrypt work factor (default: 10)
    pub bcrypt_cost: u32,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// Redis URL for caching (optional, e.g. redis://127.0.0.1:6379)
    pub redis_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        let config = Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://alumnet.db?mode=rwc".to_string()),
            access_token_secret: std::env::var("ACCESS_TOKEN_SECRET")
                .unwrap_or_else(|_| "secure_secret_key".to_string()),
            refresh_token_secret: std::env::var("REFRESH_TOKEN_SECRET")
                .unwrap_or_else(|_| "secure_refresh_secret_key".to_string()),
            access_token_expiry_hours: std::env::var("ACCESS_TOKEN_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            refresh_token_expiry_days: std::env::var("REFRESH_TOKEN_EXPIRY_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            redis_url: std::env::var("REDIS_URL").ok(),
        };

        if config.access_token_secret == config.refresh_token_secret {
            return Err("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ".into());
        }

        Ok(config)
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
