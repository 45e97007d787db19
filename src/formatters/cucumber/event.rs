//! Lifecycle callbacks emitted by a running Cucumber session, in the order the
//! runner reports them.

use serde_derive::Deserialize;

use crate::ir::Status;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    BeforeFeatures,
    AfterFeatures,
    BeforeFeature {
        #[serde(default)]
        location: Option<String>,
    },
    FeatureName {
        keyword: String,
        name: String,
    },
    AfterFeature,
    CommentLine {
        text: String,
    },
    TagName {
        name: String,
    },
    BeforeFeatureElement {
        #[serde(default)]
        location: Option<String>,
    },
    ScenarioName {
        keyword: String,
        #[serde(default)]
        name: Option<String>,
    },
    AfterFeatureElement {
        #[serde(default)]
        status: Option<Status>,
    },
    BeforeBackground,
    AfterBackground,
    BeforeStep,
    StepName {
        keyword: String,
        step_match: StepMatch,
        status: Status,
    },
    AfterStep,
    Exception {
        message: String,
    },
    AfterMultilineArg {
        text: String,
    },
    BeforeOutlineTable,
    AfterOutlineTable,
    BeforeTableRow,
    AfterTableRow {
        row: TableRow,
    },
    TableCellValue {
        value: String,
        status: Status,
    },
}

/// A step's text together with the byte ranges its definition captured.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StepMatch {
    pub text: String,
    #[serde(default)]
    pub args: Vec<Argument>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Argument {
    pub offset: usize,
    pub value: String,
}

impl StepMatch {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg<T: Into<String>>(mut self, offset: usize, value: T) -> Self {
        self.args.push(Argument {
            offset,
            value: value.into(),
        });
        self
    }

    /// Renders the step text with every captured argument passed through
    /// `format`. Arguments that do not line up with the text are left as is.
    pub fn format_args<F>(&self, format: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let mut rendered = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for arg in &self.args {
            let end = arg.offset + arg.value.len();
            if arg.offset < cursor
                || end > self.text.len()
                || !self.text.is_char_boundary(arg.offset)
                || !self.text.is_char_boundary(end)
                || self.text[arg.offset..end] != arg.value
            {
                continue;
            }
            rendered.push_str(&self.text[cursor..arg.offset]);
            rendered.push_str(&format(&arg.value));
            cursor = end;
        }
        rendered.push_str(&self.text[cursor..]);
        rendered
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// A row of an outline's examples table, the heading row included.
    Example,
    /// Any other table row, e.g. a step's data table.
    Other,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TableRow {
    pub kind: RowKind,
    pub name: String,
    #[serde(default)]
    pub exception: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    pub line: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_args_wraps_captured_values() {
        let step = StepMatch::new("I have 42 cukes in my belly")
            .with_arg(7, "42")
            .with_arg(22, "belly");
        assert_eq!(step.format_args(|arg| format!("<{}>", arg)), "I have <42> cukes in my <belly>");
        assert_eq!(step.format_args(str::to_owned), "I have 42 cukes in my belly");
    }

    #[test]
    fn test_format_args_skips_misaligned_arguments() {
        let step = StepMatch::new("I wait 5 seconds")
            .with_arg(7, "6")
            .with_arg(40, "x");
        assert_eq!(step.format_args(|arg| format!("[{}]", arg)), "I wait 5 seconds");
    }

    #[test]
    fn test_events_from_json() {
        let event: Event = serde_json::from_value(json!({
            "event": "step_name",
            "keyword": "Given ",
            "step_match": { "text": "a calculator" },
            "status": "passed"
        }))
        .unwrap();
        assert_eq!(
            event,
            Event::StepName {
                keyword: "Given ".to_owned(),
                step_match: StepMatch::new("a calculator"),
                status: Status::Passed,
            }
        );

        let event: Event = serde_json::from_value(json!({
            "event": "after_table_row",
            "row": { "kind": "example", "name": "| 1 | 2 |", "line": 14, "status": "failed" }
        }))
        .unwrap();
        match event {
            Event::AfterTableRow { row } => {
                assert_eq!(row.kind, RowKind::Example);
                assert_eq!(row.status, Some(Status::Failed));
                assert_eq!(row.exception, None);
            }
            other => panic!("unexpected event {:?}", other),
        }

        let event: Event = serde_json::from_value(json!({ "event": "before_features" })).unwrap();
        assert_eq!(event, Event::BeforeFeatures);
    }
}
