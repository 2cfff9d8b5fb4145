use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{DATASET_FILE, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_STATIC_DIR};

/// Server settings, layered: built-in defaults, then an optional config
/// file, then `EMISSIONS_*` environment variables. CLI flags override on top
/// of the loaded values.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    pub data_file: PathBuf,

    pub static_dir: PathBuf,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("data_file", DATASET_FILE)?
            .set_default("static_dir", DEFAULT_STATIC_DIR)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("EMISSIONS"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.data_file, PathBuf::from(DATASET_FILE));
        assert_eq!(settings.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 8080").unwrap();
        writeln!(file, "data_file = \"readings.xlsx\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.data_file, PathBuf::from("readings.xlsx"));
        assert_eq!(settings.host, DEFAULT_HOST);
    }

    #[test]
    fn test_zero_port_is_rejected() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 0").unwrap();

        assert!(Settings::load(Some(file.path())).is_err());
    }
}
