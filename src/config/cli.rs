use crate::config::toml_config::TomlConfig;
use crate::config::{AppConfig, StorageBackend};
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "course-catalog")]
#[command(about = "Course catalog web service")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Storage backend for the catalog
    #[arg(long, value_enum)]
    pub backend: Option<StorageBackend>,

    /// Directory holding the catalog JSON file (implies the file backend)
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory for JSON log files
    #[arg(long)]
    pub log_dir: Option<String>,

    #[arg(long, help = "Emit console logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 先讀 TOML，再以命令列參數覆蓋
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_app_config(),
            None => AppConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.backend = StorageBackend::File;
            config.storage.path = data_dir.clone();
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(log_dir) = &self.log_dir {
            config.logging.log_dir = Some(log_dir.clone());
        }
        config.logging.json |= self.json_logs;
        config.logging.verbose |= self.verbose;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"0.0.0.0\"\nport = 8080\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from(["course-catalog", "--config", path.as_str(), "--port", "9000"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_data_dir_selects_file_backend() {
        let cli = CliConfig::parse_from(["course-catalog", "--data-dir", "./data", "-v"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, "./data");
        assert!(config.logging.verbose);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = CliConfig::parse_from(["course-catalog", "--config", "/nonexistent/catalog.toml"]);
        assert!(cli.resolve().is_err());
    }
}
