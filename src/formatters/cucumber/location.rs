use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("no location reported")]
    Missing,
    #[error("location '{0}' has no line separator")]
    NoSeparator(String),
    #[error("location '{0}' has an invalid line number")]
    InvalidLine(String),
}

/// A `file:line` source location split at its last colon.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub urn: String,
}

impl Location {
    pub fn parse(uri: &str) -> Result<Self, LocationError> {
        let (file, line) = uri
            .rsplit_once(':')
            .ok_or_else(|| LocationError::NoSeparator(uri.to_owned()))?;
        let line = line
            .trim()
            .parse::<u32>()
            .map_err(|_| LocationError::InvalidLine(uri.to_owned()))?;
        Ok(Self {
            file: file.to_owned(),
            line,
            urn: uri.to_owned(),
        })
    }

    pub fn resolve(uri: Option<&str>) -> Result<Self, LocationError> {
        uri.ok_or(LocationError::Missing).and_then(Self::parse)
    }
}
