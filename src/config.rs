use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub upstream: UpstreamConfig,

    #[command(flatten)]
    pub cookies: CookieConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "BOXOFFICE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "BOXOFFICE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management (health probe) listener
    #[arg(long, env = "BOXOFFICE_MGMT_PORT", default_value_t = 3001)]
    pub mgmt_port: u16,
}

#[derive(Clone, Debug, Args)]
pub struct UpstreamConfig {
    /// Base URL of the upstream ticketing backend
    #[arg(long, env = "BOXOFFICE_UPSTREAM_URL")]
    pub base_url: String,

    /// Fixed timeout applied to every outbound request, in seconds
    #[arg(long, env = "BOXOFFICE_UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Timeout for the readiness probe ping, in milliseconds
    #[arg(long, env = "BOXOFFICE_UPSTREAM_HEALTH_TIMEOUT_MS", default_value_t = 2000)]
    pub health_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct CookieConfig {
    /// Set the Secure attribute on session cookies (enable in production)
    #[arg(long, env = "BOXOFFICE_SECURE_COOKIES", default_value_t = false)]
    pub secure: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed for standard endpoints
    #[arg(long, env = "BOXOFFICE_RATE_LIMIT_PER_SECOND", default_value_t = 10)]
    pub per_second: u32,

    /// Burst allowance for standard endpoints
    #[arg(long, env = "BOXOFFICE_RATE_LIMIT_BURST", default_value_t = 20)]
    pub burst: u32,

    /// Stricter rate limit for the auth endpoints (login/OTP/refresh)
    #[arg(long, env = "BOXOFFICE_AUTH_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub auth_per_second: u32,

    /// Burst allowance for the auth endpoints
    #[arg(long, env = "BOXOFFICE_AUTH_RATE_LIMIT_BURST", default_value_t = 5)]
    pub auth_burst: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP endpoint for trace and metric export; disabled when unset
    #[arg(long, env = "BOXOFFICE_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "BOXOFFICE_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }
}
