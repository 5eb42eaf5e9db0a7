use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;
use langrec_app::state::AppConfig;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "LANGREC_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "LANGREC_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "LANGREC_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db or sqlite::memory:, default is sqlite://[data-dir]/langrec.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "LANGREC_DATA_DIR",
        help = "Data directory for default database location, default is system default like ~/.local/share/langrec",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "LANGREC_DB_MAX_CONNECTIONS",
        default_value = "50",
        help = "Maximum number of connections in database pool"
    )]
    pub db_max_connections: u32,

    #[arg(
        long,
        env = "LANGREC_DEFAULT_PAGE_SIZE",
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(1..=1000),
        help = "Page size used when request does not specify one"
    )]
    pub default_page_size: u32,

    #[arg(long, env = "LANGREC_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,

    #[arg(
        long,
        env = "LANGREC_NO_SEED",
        help = "Do not insert initial languages into empty database"
    )]
    pub no_seed: bool,

    #[arg(
        long,
        env = "LANGREC_IN_MEMORY",
        help = "Keep records only in process memory, database options are ignored"
    )]
    pub in_memory: bool,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("langrec"))
        .unwrap_or_else(|| PathBuf::from("langrec"))
        .to_string_lossy()
        .to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// true if database is placed in data directory
    pub fn uses_default_database(&self) -> bool {
        self.database_url.is_none()
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/langrec.db", self.data_dir))
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            default_page_size: config.default_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::try_parse_from(["langrec-server", "--data-dir", "/tmp/langrec-test"])
                .unwrap();
        assert_eq!(3000, config.port);
        assert_eq!("127.0.0.1", config.listen_address);
        assert_eq!(10, config.default_page_size);
        assert!(config.uses_default_database());
        assert_eq!(
            "sqlite:///tmp/langrec-test/langrec.db",
            config.database_url()
        );
        assert!(!config.no_seed && !config.no_cors && !config.in_memory);
    }

    #[test]
    fn test_page_size_range() {
        let res =
            ServerConfig::try_parse_from(["langrec-server", "--default-page-size", "0"]);
        assert!(res.is_err());
        let config = ServerConfig::try_parse_from([
            "langrec-server",
            "--database-url",
            "sqlite::memory:",
            "--default-page-size",
            "25",
        ])
        .unwrap();
        assert_eq!("sqlite::memory:", config.database_url());
        let app_config: AppConfig = (&config).into();
        assert_eq!(25, app_config.default_page_size);
    }
}
