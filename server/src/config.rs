//! Runtime configuration from command-line flags, falling back to environment variables.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "music-crm-server")]
#[command(about = "CRM backend for a music-training business")]
#[command(version)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, default_value = "127.0.0.1:3000", env = "CRM_BIND")]
    pub bind: SocketAddr,

    /// SQLx database URL; the file is created if missing
    #[arg(long, default_value = "sqlite:music_crm.db", env = "CRM_DATABASE_URL")]
    pub database_url: String,

    /// Origin allowed to call the API from a browser
    #[arg(long, default_value = "http://localhost:8080", env = "CRM_CORS_ORIGIN")]
    pub cors_origin: String,

    /// How long a computed pipeline report is served from cache
    #[arg(long, default_value_t = 300, env = "CRM_REPORT_CACHE_TTL_SECS")]
    pub report_cache_ttl_secs: u64,
}

impl Config {
    pub fn report_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.report_cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["music-crm-server"]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.database_url, "sqlite:music_crm.db");
        assert_eq!(config.report_cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "music-crm-server",
            "--bind",
            "0.0.0.0:8000",
            "--report-cache-ttl-secs",
            "0",
        ])
        .unwrap();
        assert_eq!(config.bind.port(), 8000);
        assert_eq!(config.report_cache_ttl(), Duration::ZERO);
    }
}
