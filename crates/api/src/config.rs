use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Minimum accepted password length (default: `8`).
    pub min_password_length: usize,
    /// Token signing secret and per-scope lifetimes.
    pub jwt: JwtConfig,
    /// Quota for the public `/auth` endpoints.
    pub rate_limit: RateLimitConfig,
}

/// Global request quota for unauthenticated auth endpoints.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests allowed per period (burst size).
    pub requests: u32,
    pub period_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `MIN_PASSWORD_LENGTH`     | `8`                        |
    /// | `RATE_LIMIT_ENABLED`      | `true`                     |
    /// | `RATE_LIMIT_REQUESTS`     | `20`                       |
    /// | `RATE_LIMIT_PERIOD_SECS`  | `60`                       |
    ///
    /// See [`JwtConfig::from_env`] for the token settings.
    ///
    /// # Panics
    ///
    /// Panics on any unparsable value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let jwt = JwtConfig::from_env();
        let rate_limit = RateLimitConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            min_password_length,
            jwt,
            rate_limit,
        }
    }
}

impl RateLimitConfig {
    fn from_env() -> Self {
        let enabled = std::env::var("RATE_LIMIT_ENABLED")
            .map(|v| !matches!(v.trim(), "false" | "0" | "no"))
            .unwrap_or(true);

        let requests: u32 = std::env::var("RATE_LIMIT_REQUESTS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("RATE_LIMIT_REQUESTS must be a valid u32");
        assert!(requests > 0, "RATE_LIMIT_REQUESTS must be non-zero");

        let period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("RATE_LIMIT_PERIOD_SECS must be a valid u64");
        assert!(period_secs > 0, "RATE_LIMIT_PERIOD_SECS must be non-zero");

        Self {
            enabled,
            requests,
            period_secs,
        }
    }
}
