use chrono::Local;
use std::fs;
use std::path::Path;

use super::xml::Element;
use crate::error::{Error, Result};
use crate::ir::{Document, Node, Status};

pub const DOCUMENT_TYPE: &str = "Junit";
pub const NAMESPACE: &str = "JUnit";

const TESTCASE: &str = "testcase";

/// Reads a JUnit/xUnit XML report and converts it into an IR document.
pub fn load(path: &Path, document_type: &str) -> Result<Document> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let xml = fs::read_to_string(path)?;
    let results = parse(&xml)?;
    info!(
        "Converted {} root elements from {}",
        results.len(),
        path.display()
    );
    Ok(Document::new(
        document_type,
        None,
        Some(Local::now()),
        results,
    ))
}

/// Parses the whole report before converting anything, so malformed XML never
/// yields a partial tree.
pub fn parse(xml: &str) -> Result<Vec<Node>> {
    let document = roxmltree::Document::parse(xml).map_err(|e| Error::Parse(e.to_string()))?;
    Ok(attach_suite(&document.root()))
}

/// Converts every child element of `component`, in document order.
pub fn attach_suite<E: Element>(component: &E) -> Vec<Node> {
    component
        .children()
        .iter()
        .map(|node| {
            if node.name() == TESTCASE {
                attach_case(node)
            } else {
                let mut suite = Node::new(format!("{}::{}", NAMESPACE, node.name()));
                suite.name = node.attribute("name").map(str::to_owned);
                suite.set_classname_once(node.attribute("classname"));
                suite.children = Some(attach_suite(node));
                suite
            }
        })
        .collect()
}

pub fn attach_case<E: Element>(node: &E) -> Node {
    let mut testcase = Node::new(format!("{}::{}", NAMESPACE, node.name()));
    testcase.name = node.attribute("name").map(str::to_owned);
    testcase.set_classname_once(node.attribute("classname"));
    testcase.duration = node.attribute("time").and_then(|time| parse_duration(time, node));
    testcase.status = Some(case_status(node.children().first()));
    testcase
}

/// Only the first child element decides the outcome.
fn case_status<E: Element>(first: Option<&E>) -> Status {
    match first.map(Element::name) {
        Some("failure") | Some("error") => Status::Failed,
        Some("skipped") => Status::NotRun,
        _ => Status::Passed,
    }
}

/// Commas group thousands when a `.` decimal point is present, or when there
/// are several of them. A single comma on its own is the decimal separator.
fn normalize_seconds(time: &str) -> String {
    let time = time.trim();
    if time.contains('.') || time.matches(',').count() > 1 {
        time.replace(',', "")
    } else {
        time.replace(',', ".")
    }
}

fn parse_duration<E: Element>(time: &str, node: &E) -> Option<f64> {
    match normalize_seconds(time).parse::<f64>() {
        Ok(seconds) => Some(seconds),
        Err(e) => {
            warn!(
                "Ignoring time '{}' of testcase {:?}: {}",
                time,
                node.attribute("name"),
                e
            );
            None
        }
    }
}
