use core::str::FromStr;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single IR node.
///
/// Deserializes through the same runner vocabulary as `FromStr`; words it
/// does not know become `Unknown` instead of failing the whole document.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Status {
    Passed,
    Failed,
    NotRun,
    Unknown,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Passed,
        Status::Failed,
        Status::NotRun,
        Status::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::NotRun => "notrun",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passed" => Ok(Status::Passed),
            "failed" | "error" => Ok(Status::Failed),
            "notrun" | "skipped" => Ok(Status::NotRun),
            "unknown" | "pending" | "undefined" => Ok(Status::Unknown),
            _ => Err(format!("Status '{}' not supported", s)),
        }
    }
}

impl From<String> for Status {
    fn from(word: String) -> Self {
        word.parse().unwrap_or_else(|e| {
            debug!("{}, using unknown", e);
            Status::Unknown
        })
    }
}
