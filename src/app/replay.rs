use serde_derive::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::formatters::cucumber::{Event, Outcome, TreeBuilder};
use crate::metrics::MetricsQueue;

/// One line of a recorded session: either a formatter event or a performance
/// payload produced while the run was going.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Record {
    Metrics { metrics: Value },
    Event(Event),
}

pub fn replay_file(path: &Path) -> Result<Outcome> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    replay(&fs::read_to_string(path)?)
}

/// Feeds every line into a fresh builder; blank lines are skipped.
pub fn replay(lines: &str) -> Result<Outcome> {
    let metrics = MetricsQueue::new();
    let mut builder = TreeBuilder::new(metrics.clone());
    for (index, line) in lines.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line).map_err(|e| {
            error!("Cannot read event on line {}: {}", index + 1, e);
            e
        })?;
        match record {
            Record::Metrics { metrics: values } => metrics.push(values),
            Record::Event(event) => builder.handle_event(event),
        }
    }
    Ok(builder.into_outcome())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Status;
    use serde_json::json;

    const SESSION: &str = r#"
{"event": "before_features"}
{"event": "before_feature", "location": "features/calc.feature:1"}
{"event": "feature_name", "keyword": "Feature", "name": "Calculator"}
{"event": "before_feature_element", "location": "features/calc.feature:3"}
{"event": "scenario_name", "keyword": "Scenario", "name": "Adding"}
{"event": "before_step"}
{"event": "step_name", "keyword": "Given ", "step_match": {"text": "a calculator"}, "status": "passed"}
{"event": "after_step"}
{"metrics": {"duration_ms": 12}}
{"event": "after_feature_element", "status": "passed"}
{"event": "after_feature"}
"#;

    #[test]
    fn test_replay_finished_session() {
        let text = format!("{}{}\n", SESSION, r#"{"event": "after_features"}"#);
        let outcome = replay(&text).unwrap();
        assert!(outcome.is_finished());

        let document = outcome.document();
        assert_eq!(document.count(Status::Passed), 1);
        let scenario = &document.results[0].children()[0];
        assert_eq!(scenario.values, Some(json!({ "duration_ms": 12 })));
        assert_eq!(scenario.children()[0].name.as_deref(), Some("Given a calculator"));
    }

    #[test]
    fn test_replay_without_finish_is_aborted() {
        let outcome = replay(SESSION).unwrap();
        assert!(!outcome.is_finished());
        assert_eq!(outcome.document().finished, None);
        assert_eq!(outcome.document().results.len(), 1);
    }

    #[test]
    fn test_replay_maps_runner_statuses() {
        let text = r#"
{"event": "before_features"}
{"event": "before_feature", "location": "features/calc.feature:1"}
{"event": "feature_name", "keyword": "Feature", "name": "Calculator"}
{"event": "before_feature_element", "location": "features/calc.feature:3"}
{"event": "scenario_name", "keyword": "Scenario", "name": "Dividing"}
{"event": "before_step"}
{"event": "step_name", "keyword": "Given ", "step_match": {"text": "a calculator"}, "status": "skipped"}
{"event": "after_step"}
{"event": "after_feature_element", "status": "skipped"}
{"event": "before_feature_element", "location": "features/calc.feature:8"}
{"event": "scenario_name", "keyword": "Scenario", "name": "Overflowing"}
{"event": "after_feature_element", "status": "error"}
{"event": "after_feature"}
{"event": "after_features"}
"#;
        let document = replay(text).unwrap().into_document();
        let scenarios = document.results[0].children();
        assert_eq!(scenarios[0].status, Some(Status::NotRun));
        assert_eq!(scenarios[0].children()[0].status, Some(Status::NotRun));
        assert_eq!(scenarios[1].status, Some(Status::Failed));
        assert_eq!(document.count(Status::NotRun), 1);
        assert_eq!(document.count(Status::Failed), 1);
        assert_eq!(document.count(Status::Unknown), 0);
    }

    #[test]
    fn test_replay_rejects_unknown_events() {
        let result = replay(r#"{"event": "before_everything"}"#);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
