use chrono::{DateTime, Local};
use serde_derive::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::node::Node;
use crate::error::{Error, Result};

/// A whole normalized run: producer tag, run timing and the root nodes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Document {
    r#type: String,
    #[serde(default, with = "crate::ir::serialize::timestamp")]
    pub started: Option<DateTime<Local>>,
    #[serde(default, with = "crate::ir::serialize::timestamp")]
    pub finished: Option<DateTime<Local>>,
    #[serde(default)]
    pub results: Vec<Node>,
}

impl Document {
    pub fn new<T: Into<String>>(
        r#type: T,
        started: Option<DateTime<Local>>,
        finished: Option<DateTime<Local>>,
        results: Vec<Node>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            started,
            finished,
            results,
        }
    }

    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    /// Single-line canonical form.
    pub fn json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        writeln!(file, "{}", self.json()?)?;
        file.flush()?;
        debug!("Wrote {} results into {}", self.results.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::status::Status;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> Document {
        let started = Local.timestamp_opt(1_600_000_000, 0).unwrap();
        let finished = Local.timestamp_opt(1_600_000_042, 500).unwrap();

        let mut step = Node::new("Cucumber::Step");
        step.name = Some("Given a calculator".to_owned());
        step.status = Some(Status::Passed);

        let mut scenario = Node::new("Cucumber::Scenario");
        scenario.name = Some("Addition".to_owned());
        scenario.status = Some(Status::Passed);
        scenario.started = Some(started);
        scenario.values = Some(json!({ "cpu": [1, 2, 3] }));
        scenario.push_child(step);

        let mut feature = Node::new("Cucumber::Feature");
        feature.name = Some("Calculator".to_owned());
        feature.tags = Some(vec!["smoke".to_owned()]);
        feature.push_child(scenario);

        Document::new("Cucumber", Some(started), Some(finished), vec![feature])
    }

    #[test]
    fn test_round_trip_keeps_field_presence() {
        let document = sample();
        let text = document.json().unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains("null"));

        let parsed = Document::from_json(&text).unwrap();
        assert_eq!(parsed, document);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), text);
    }

    #[test]
    fn test_missing_start_is_empty_string() {
        let document = Document::new("Junit", None, None, vec![]);
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({ "type": "Junit", "started": "", "finished": "", "results": [] })
        );
        assert_eq!(Document::from_json(&document.json().unwrap()).unwrap(), document);
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cucumber.res");
        let document = sample();

        document.write_to(&path).unwrap();
        assert_eq!(Document::load(&path).unwrap(), document);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Document::load(Path::new("./does/not/exist.res"));
        assert!(matches!(result, Err(Error::MissingInput(_))));
    }
}
