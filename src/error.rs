use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Couldn't find input file '{}'", .0.display())]
    MissingInput(PathBuf),
    #[error("Invalid xunit XML format. Error: {0}")]
    Parse(String),
    #[error("Couldn't find config file '{}'", .0.display())]
    MissingConfig(PathBuf),
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
