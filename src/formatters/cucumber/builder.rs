use chrono::{DateTime, Local};
use derivative::Derivative;
use lazy_static::*;
use regex::Regex;
use std::mem;

use super::event::{Event, RowKind, StepMatch, TableRow};
use super::location::Location;
use super::{EXAMPLE_ROW, FRAMEWORK, PARAMETER, STEP, UNKNOWN_FILE};
use crate::ir::{Document, Node, Status};
use crate::metrics::MetricsQueue;
use crate::time::{Clock, SystemClock};

lazy_static! {
    static ref COLOR_ESCAPE: Regex = Regex::new(r"\x1b\[(\d+)m").expect("Regex compilation error");
}

/// What a session produced once the caller stops feeding it events.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Finished(Document),
    /// The run-finish event never arrived. Holds everything built so far, with
    /// an empty `finished` time.
    Aborted(Document),
}

impl Outcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished(_))
    }

    pub fn document(&self) -> &Document {
        match self {
            Outcome::Finished(document) | Outcome::Aborted(document) => document,
        }
    }

    pub fn into_document(self) -> Document {
        match self {
            Outcome::Finished(document) | Outcome::Aborted(document) => document,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Container,
    Item,
    Step,
    Row,
}

#[derive(Debug)]
struct Outline {
    headers: Vec<Node>,
    rows: Vec<Node>,
}

/// An accumulator that has been opened and not yet closed.
#[derive(Debug)]
struct Frame {
    kind: Kind,
    node: Node,
    outline: Option<Outline>,
    /// Opened without a valid parent; dropped instead of attached on close.
    detached: bool,
}

impl Frame {
    fn new(kind: Kind, node: Node) -> Self {
        Self {
            kind,
            node,
            outline: None,
            detached: false,
        }
    }

    fn detached(kind: Kind, node: Node) -> Self {
        Self {
            detached: true,
            ..Self::new(kind, node)
        }
    }
}

/// Assembles the IR tree of one Cucumber session from its lifecycle events.
///
/// Open accumulators live on a stack: opening events push, closing events pop
/// and attach the finished node to whatever is below it (or to the run's
/// results). Annotations always go to the top of the stack. Events that have no
/// valid parent are recorded on a detached frame and discarded with it.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct TreeBuilder {
    #[derivative(Debug = "ignore")]
    clock: Box<dyn Clock>,
    metrics: MetricsQueue,
    state: State,
    started: Option<DateTime<Local>>,
    results: Vec<Node>,
    stack: Vec<Frame>,
    document: Option<Document>,
}

impl TreeBuilder {
    pub fn new(metrics: MetricsQueue) -> Self {
        Self::with_clock(metrics, Box::new(SystemClock))
    }

    pub fn with_clock(metrics: MetricsQueue, clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            metrics,
            state: State::Idle,
            started: None,
            results: Vec::new(),
            stack: Vec::new(),
            document: None,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        if self.state == State::Finished {
            warn!("Ignoring {:?} received after the run finished", event);
            return;
        }
        trace!("Handling {:?}", event);
        match event {
            Event::BeforeFeatures => self.before_features(),
            Event::AfterFeatures => self.after_features(),
            Event::BeforeFeature { location } => self.before_feature(location.as_deref()),
            Event::FeatureName { keyword, name } => self.feature_name(&keyword, &name),
            Event::AfterFeature => self.after_feature(),
            Event::CommentLine { text } => self.comment_line(text),
            Event::TagName { name } => self.tag_name(&name),
            Event::BeforeFeatureElement { location } => {
                self.before_feature_element(location.as_deref())
            }
            Event::ScenarioName { keyword, name } => self.scenario_name(&keyword, name),
            Event::AfterFeatureElement { status } => self.after_feature_element(status),
            Event::BeforeBackground | Event::AfterBackground => {}
            Event::BeforeStep => self.before_step(),
            Event::StepName {
                keyword,
                step_match,
                status,
            } => self.step_name(&keyword, &step_match, status),
            Event::AfterStep => self.after_step(),
            Event::Exception { message } => self.exception(message),
            Event::AfterMultilineArg { text } => self.after_multiline_arg(&text),
            Event::BeforeOutlineTable => self.before_outline_table(),
            Event::AfterOutlineTable => self.after_outline_table(),
            Event::BeforeTableRow => self.before_table_row(),
            Event::AfterTableRow { row } => self.after_table_row(row),
            Event::TableCellValue { value, status } => self.table_cell_value(value, status),
        }
    }

    /// The finished document, once the run-finish event has been handled.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn into_outcome(mut self) -> Outcome {
        if let Some(document) = self.document.take() {
            return Outcome::Finished(document);
        }
        if !self.stack.is_empty() {
            warn!(
                "Run ended without finishing, closing {} open nodes",
                self.stack.len()
            );
        }
        self.close_all();
        Outcome::Aborted(Document::new(FRAMEWORK, self.started, None, self.results))
    }

    pub fn before_features(&mut self) {
        self.state = State::Running;
        self.started = Some(self.clock.now());
        self.results = Vec::new();
        self.stack.clear();
    }

    pub fn after_features(&mut self) {
        if self.state == State::Finished {
            warn!("Run already finished");
            return;
        }
        self.close_all();
        let document = Document::new(
            FRAMEWORK,
            self.started,
            Some(self.clock.now()),
            mem::take(&mut self.results),
        );
        info!("Run finished with {} features", document.results.len());
        self.document = Some(document);
        self.state = State::Finished;
    }

    pub fn before_feature(&mut self, location: Option<&str>) {
        self.close_all();
        let mut feature = Node::new(format!("{}::Feature", FRAMEWORK));
        feature.started = Some(self.clock.now());
        match Location::resolve(location) {
            Ok(location) => set_location(&mut feature, location),
            Err(e) => {
                warn!("Cannot resolve feature location: {}", e);
                feature.file = Some(UNKNOWN_FILE.to_owned());
            }
        }
        self.stack.push(Frame::new(Kind::Container, feature));
    }

    /// `name` holds the title on its first line and the description below it.
    pub fn feature_name(&mut self, keyword: &str, name: &str) {
        let (title, description) = split_name(name);
        match self.innermost(Kind::Container) {
            Some(feature) => {
                feature.set_type(namespaced(keyword));
                feature.name = title;
                feature.description = Some(description);
            }
            None => debug!("Feature name '{}' without an open feature", name),
        }
    }

    pub fn after_feature(&mut self) {
        if !self.unwind_to(Kind::Container) {
            debug!("No open feature to close");
            return;
        }
        if let Some(mut frame) = self.stack.pop() {
            frame.node.finished = Some(self.clock.now());
            self.close(frame);
        }
    }

    pub fn comment_line(&mut self, comment: String) {
        match self.current() {
            Some(node) => node.push_comment(comment),
            None => debug!("Comment '{}' without an open node", comment),
        }
    }

    pub fn tag_name(&mut self, tag: &str) {
        let tag = tag.strip_prefix('@').unwrap_or(tag).to_owned();
        match self.current() {
            Some(node) => node.push_tag(tag),
            None => debug!("Tag '{}' without an open node", tag),
        }
    }

    pub fn before_feature_element(&mut self, location: Option<&str>) {
        let attachable = self.unwind_to(Kind::Container);
        if !attachable {
            self.close_all();
        }
        let mut scenario = Node::new(format!("{}::Scenario", FRAMEWORK));
        scenario.started = Some(self.clock.now());
        match Location::resolve(location) {
            Ok(location) => set_location(&mut scenario, location),
            Err(e) => {
                warn!("Cannot resolve scenario location: {}", e);
                scenario.error = Some(e.to_string());
                scenario.file = Some(UNKNOWN_FILE.to_owned());
            }
        }
        if attachable {
            self.stack.push(Frame::new(Kind::Item, scenario));
        } else {
            debug!("Scenario outside of a feature is not recorded");
            self.stack.push(Frame::detached(Kind::Item, scenario));
        }
    }

    pub fn scenario_name(&mut self, keyword: &str, name: Option<String>) {
        match self.innermost(Kind::Item) {
            Some(scenario) => {
                scenario.set_type(namespaced(keyword));
                scenario.name = Some(name.unwrap_or_default());
            }
            None => debug!("Scenario name {:?} without an open scenario", name),
        }
    }

    /// Closes the open scenario and hands it the newest pending metrics payload.
    pub fn after_feature_element(&mut self, status: Option<Status>) {
        if !self.unwind_to(Kind::Item) {
            debug!("No open scenario to close");
            return;
        }
        if let Some(mut frame) = self.stack.pop() {
            if status.is_some() {
                frame.node.status = status;
            }
            frame.node.finished = Some(self.clock.now());
            if !frame.detached {
                frame.node.values = self.metrics.pop();
            }
            self.close(frame);
        }
    }

    /// Steps only attach to a scenario that is still open; background steps
    /// and stragglers after the scenario closed are discarded.
    pub fn before_step(&mut self) {
        self.unwind_steps();
        let step = Node::new(STEP);
        if self.top_kind() == Some(Kind::Item) {
            self.stack.push(Frame::new(Kind::Step, step));
        } else {
            debug!("Step outside of an open scenario is not recorded");
            self.stack.push(Frame::detached(Kind::Step, step));
        }
    }

    pub fn step_name(&mut self, keyword: &str, step_match: &StepMatch, status: Status) {
        match self.stack.last_mut() {
            Some(frame) if frame.kind == Kind::Step => {
                frame.node.name = Some(format!(
                    "{}{}",
                    keyword,
                    step_match.format_args(str::to_owned)
                ));
                frame.node.status = Some(status);
            }
            _ => debug!("Step name '{}' without an open step", step_match.text),
        }
    }

    pub fn after_step(&mut self) {
        if self.top_kind() == Some(Kind::Step) {
            self.close_top();
        } else {
            debug!("No open step to close");
        }
    }

    pub fn exception(&mut self, message: String) {
        match self.current() {
            Some(node) => node.message = Some(message),
            None => debug!("Exception '{}' without an open node", message),
        }
    }

    pub fn after_multiline_arg(&mut self, text: &str) {
        let args = COLOR_ESCAPE.replace_all(text, "").into_owned();
        match self.current() {
            Some(node) => node.args = Some(args),
            None => debug!("Multiline argument without an open node"),
        }
    }

    /// Remembers the outline's steps and starts collecting example rows.
    pub fn before_outline_table(&mut self) {
        self.unwind_steps();
        match self.stack.last_mut() {
            Some(frame) if frame.kind == Kind::Item => {
                frame.outline = Some(Outline {
                    headers: frame.node.children().to_vec(),
                    rows: Vec::new(),
                });
            }
            _ => debug!("Outline table without an open scenario outline"),
        }
    }

    /// Replaces the outline's children with the collected example rows. The
    /// first row is the table heading and only survives in the description.
    pub fn after_outline_table(&mut self) {
        if !self.unwind_to(Kind::Item) {
            debug!("Outline table closed without an open scenario outline");
            return;
        }
        if let Some(frame) = self.stack.last_mut() {
            match frame.outline.take() {
                Some(outline) => apply_outline(&mut frame.node, outline),
                None => debug!("Outline table closed without being opened"),
            }
        }
    }

    pub fn before_table_row(&mut self) {
        self.stack.push(Frame::new(Kind::Row, Node::new(EXAMPLE_ROW)));
    }

    pub fn after_table_row(&mut self, row: TableRow) {
        if self.top_kind() != Some(Kind::Row) {
            debug!("Table row closed without being opened");
            return;
        }
        let mut example = match self.stack.pop() {
            Some(frame) => frame.node,
            None => return,
        };
        if row.kind != RowKind::Example {
            return;
        }
        let scenario = match self.stack.last_mut() {
            Some(frame) if frame.kind == Kind::Item => frame,
            _ => {
                debug!("Example row '{}' outside of a scenario outline", row.name);
                return;
            }
        };
        let file = scenario
            .node
            .file
            .clone()
            .unwrap_or_else(|| UNKNOWN_FILE.to_owned());
        let outline = match scenario.outline.as_mut() {
            Some(outline) => outline,
            None => {
                debug!("Example row '{}' outside of an outline table", row.name);
                return;
            }
        };
        example.name = Some(row.name);
        if let Some(exception) = row.exception {
            example.message = Some(exception);
        }
        if let Some(status) = row.status {
            example.status = Some(status);
        }
        example.line = Some(row.line);
        example.urn = Some(format!("{}:{}", file, row.line));
        outline.rows.push(example);
    }

    pub fn table_cell_value(&mut self, value: String, status: Status) {
        match self.stack.last_mut() {
            Some(frame) if frame.kind == Kind::Row => {
                let mut parameter = Node::new(PARAMETER);
                parameter.name = Some(value);
                parameter.status = Some(status);
                frame.node.push_child(parameter);
            }
            _ => debug!("Table cell '{}' without an open table row", value),
        }
    }

    fn top_kind(&self) -> Option<Kind> {
        self.stack.last().map(|frame| frame.kind)
    }

    fn current(&mut self) -> Option<&mut Node> {
        self.stack.last_mut().map(|frame| &mut frame.node)
    }

    fn innermost(&mut self, kind: Kind) -> Option<&mut Node> {
        self.stack
            .iter_mut()
            .rev()
            .find(|frame| frame.kind == kind)
            .map(|frame| &mut frame.node)
    }

    /// Closes frames above the innermost `kind` frame. Returns `false`, closing
    /// nothing, when no such frame is open.
    fn unwind_to(&mut self, kind: Kind) -> bool {
        if !self.stack.iter().any(|frame| frame.kind == kind) {
            return false;
        }
        while self.stack.last().map_or(false, |frame| frame.kind != kind) {
            self.close_top();
        }
        true
    }

    fn unwind_steps(&mut self) {
        while self.stack.last().map_or(false, |frame| frame.kind == Kind::Step) {
            self.close_top();
        }
    }

    fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.close(frame);
        }
    }

    fn close(&mut self, frame: Frame) {
        let Frame {
            kind,
            mut node,
            outline,
            detached,
        } = frame;
        if detached {
            debug!("Discarding detached {:?} '{}'", kind, node.r#type());
            return;
        }
        if kind == Kind::Row {
            debug!("Discarding table row left open");
            return;
        }
        if let Some(outline) = outline {
            apply_outline(&mut node, outline);
        }
        match self.stack.last_mut() {
            Some(parent) => parent.node.push_child(node),
            None => self.results.push(node),
        }
    }
}

fn namespaced(keyword: &str) -> String {
    format!(
        "{}::{}",
        FRAMEWORK,
        keyword.split_whitespace().collect::<String>()
    )
}

fn split_name(text: &str) -> (Option<String>, String) {
    let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
    while lines.last() == Some(&"") {
        lines.pop();
    }
    if lines.is_empty() {
        return (None, String::new());
    }
    (Some(lines[0].to_owned()), lines[1..].join("\n"))
}

fn set_location(node: &mut Node, location: Location) {
    node.file = Some(location.file);
    node.line = Some(location.line);
    node.urn = Some(location.urn);
}

fn apply_outline(scenario: &mut Node, outline: Outline) {
    let Outline { headers, mut rows } = outline;
    let mut description: Vec<String> = headers
        .into_iter()
        .map(|header| header.name.unwrap_or_default())
        .collect();
    if !rows.is_empty() {
        let heading = rows.remove(0);
        description.push(heading.name.unwrap_or_default());
    }
    scenario.description = Some(description.join("\n"));
    scenario.children = Some(rows);
}
