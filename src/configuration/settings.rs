use config::{Config, Environment, File};
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};

use crate::configuration::constants::common::ENV_PREFIX;
use crate::error::{Error, Result};
use crate::parsers::junit;

/// Options shared by every command. Values come from the optional config file,
/// then `RES_*` environment variables; command line flags win over both.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub output: Option<PathBuf>,
    pub log_output_file: Option<PathBuf>,
    /// Document `type` written by the JUnit converter.
    pub framework: Option<String>,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = Config::new();
        if let Some(path) = file {
            if !path.exists() {
                return Err(Error::MissingConfig(path.to_path_buf()));
            }
            config.merge(File::from(path.to_path_buf()))?;
        }
        config.merge(Environment::with_prefix(ENV_PREFIX))?;
        Ok(config.try_into()?)
    }

    pub fn framework(&self) -> &str {
        self.framework.as_deref().unwrap_or(junit::DOCUMENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loading_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("res.yaml");
        fs::write(&path, "output: results/junit.res\nframework: Surefire\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.output, Some(PathBuf::from("results/junit.res")));
        assert_eq!(settings.framework(), "Surefire");
    }

    #[test]
    fn test_missing_config_file() {
        let result = Settings::load(Some(Path::new("./no/such/res.yaml")));
        assert!(matches!(result, Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_framework_default() {
        assert_eq!(Settings::default().framework(), "Junit");
    }
}
