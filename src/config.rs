//! Server configuration: command-line flags with environment fallbacks.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Origins allowed to call the API from a browser. "null" covers pages
/// opened straight from the filesystem.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "null",
    "http://localhost",
    "http://localhost:8080",
    "https://elyxhackathon.netlify.app/",
];

#[derive(Debug, Clone, Parser)]
#[command(name = "elyx-journey-server", version, about = "Elyx member journey HTTP API")]
pub struct ServerConfig {
    /// Journey log (JSON array of messages)
    #[arg(long = "data", env = "ELYX_DATA", default_value = "journey_data.json")]
    pub data_path: PathBuf,

    /// Address to listen on
    #[arg(long, env = "ELYX_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Allowed CORS origin; repeat the flag or comma-separate for several
    #[arg(
        long = "allow-origin",
        env = "ELYX_ALLOW_ORIGINS",
        value_delimiter = ',',
        default_values = DEFAULT_ALLOWED_ORIGINS
    )]
    pub allowed_origins: Vec<String>,

    /// Replacement narratives document (episodes, fallback, weekly report)
    #[arg(long, env = "ELYX_NARRATIVES")]
    pub narratives: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, env = "ELYX_LOG_JSON")]
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["elyx-journey-server"]).unwrap();
        assert_eq!(config.data_path, PathBuf::from("journey_data.json"));
        assert_eq!(config.bind, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.allowed_origins, DEFAULT_ALLOWED_ORIGINS);
        assert!(config.narratives.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "elyx-journey-server",
            "--data", "/srv/elyx/journey.json",
            "--bind", "127.0.0.1:9000",
            "--allow-origin", "https://a.example,https://b.example",
            "--allow-origin", "null",
            "--narratives", "/srv/elyx/narratives.json",
            "--log-json",
        ]).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/elyx/journey.json"));
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example", "null"]);
        assert_eq!(config.narratives, Some(PathBuf::from("/srv/elyx/narratives.json")));
        assert!(config.log_json);
    }

    #[test]
    fn test_invalid_bind_rejected() {
        assert!(ServerConfig::try_parse_from(["elyx-journey-server", "--bind", "localhost"]).is_err());
    }
}
