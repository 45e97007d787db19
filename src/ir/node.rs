use chrono::{DateTime, Local};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use super::status::Status;

/// Node types counted as tests by the query operations.
pub const TESTABLE_TYPES: [&str; 2] = ["Cucumber::Scenario", "Cucumber::ScenarioOutline"];

/// One element of a normalized test run: a suite, feature, scenario, step,
/// example row or parameter.
///
/// Which optional fields are present depends on the producer, so absent fields
/// are never written out.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Node {
    r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
}

impl Node {
    pub fn new<T: Into<String>>(r#type: T) -> Self {
        Self {
            r#type: r#type.into(),
            ..Self::default()
        }
    }

    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    pub fn set_type<T: Into<String>>(&mut self, r#type: T) {
        self.r#type = r#type.into();
    }

    pub fn is_test(&self) -> bool {
        TESTABLE_TYPES.contains(&self.r#type.as_str())
    }

    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Appends a child, creating the children list on first use.
    pub fn push_child(&mut self, child: Node) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    pub fn push_comment(&mut self, comment: String) {
        self.comments.get_or_insert_with(Vec::new).push(comment);
    }

    pub fn push_tag(&mut self, tag: String) {
        self.tags.get_or_insert_with(Vec::new).push(tag);
    }

    /// Assigns `classname` only while it is still unset.
    pub fn set_classname_once(&mut self, classname: Option<&str>) {
        if self.classname.is_none() {
            self.classname = classname.map(str::to_owned);
        }
    }

    /// Copy of this node with its nesting removed.
    pub fn without_children(&self) -> Node {
        Node {
            children: None,
            ..self.clone()
        }
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }
}
