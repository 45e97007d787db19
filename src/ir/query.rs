use super::document::Document;
use super::node::Node;
use super::status::Status;

/// Pre-order, depth-first walk over a forest of nodes.
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Walk<'a> {
    pub fn new(roots: &'a [Node]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

impl Document {
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.results)
    }

    /// Scenario and scenario outline nodes at any depth, in document order.
    pub fn tests(&self) -> impl Iterator<Item = &Node> + '_ {
        self.walk().filter(|node| node.is_test())
    }

    /// Tests carrying exactly `status`; tests without a status are never counted.
    pub fn count(&self, status: Status) -> usize {
        self.tests()
            .filter(|node| node.status == Some(status))
            .count()
    }

    pub fn flat_format(&self) -> Vec<Node> {
        self.walk().map(Node::without_children).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(r#type: &str, name: &str, status: Option<Status>) -> Node {
        let mut node = Node::new(r#type);
        node.name = Some(name.to_owned());
        node.status = status;
        node
    }

    fn run() -> Document {
        let mut outline = leaf("Cucumber::ScenarioOutline", "Eating", Some(Status::Failed));
        outline.push_child(leaf("Cucumber::ScenarioOutline::Example", "| 12 | 5 |", Some(Status::Passed)));
        outline.push_child(leaf("Cucumber::ScenarioOutline::Example", "| 20 | 5 |", Some(Status::Failed)));

        let mut passing = leaf("Cucumber::Scenario", "Adding", Some(Status::Passed));
        passing.push_child(leaf("Cucumber::Step", "Given a calculator", Some(Status::Passed)));

        let mut first = Node::new("Cucumber::Feature");
        first.push_child(passing);
        first.push_child(outline);
        first.push_child(leaf("Cucumber::Scenario", "Pending", None));

        let mut second = Node::new("Cucumber::Feature");
        second.status = Some(Status::Failed);
        second.push_child(leaf("Cucumber::Scenario", "Skipped", Some(Status::NotRun)));

        Document::new("Cucumber", None, None, vec![first, second])
    }

    #[test]
    fn test_tests_are_scenarios_in_pre_order() {
        let document = run();
        let names: Vec<_> = document
            .tests()
            .map(|node| node.name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["Adding", "Eating", "Pending", "Skipped"]);
        assert_eq!(document.tests().count(), document.tests().count());
    }

    #[test]
    fn test_count_by_status() {
        let document = run();
        assert_eq!(document.count(Status::Passed), 1);
        assert_eq!(document.count(Status::Failed), 1);
        assert_eq!(document.count(Status::NotRun), 1);
        assert_eq!(document.count(Status::Unknown), 0);

        let counted: usize = Status::ALL.iter().map(|s| document.count(*s)).sum();
        assert!(counted <= document.tests().count());
    }

    #[test]
    fn test_flat_format_lists_every_node() {
        let document = run();
        let flat = document.flat_format();
        let total: usize = document.results.iter().map(Node::size).sum();

        assert_eq!(flat.len(), total);
        assert_eq!(flat.len(), 9);
        assert!(flat.iter().all(|node| node.children.is_none()));
        assert_eq!(flat[0].r#type(), "Cucumber::Feature");
        assert_eq!(flat[2].name.as_deref(), Some("Given a calculator"));
        assert_eq!(flat[4].name.as_deref(), Some("| 12 | 5 |"));
    }

    #[test]
    fn test_empty_document() {
        let document = Document::new("Cucumber", None, None, vec![]);
        assert_eq!(document.tests().count(), 0);
        assert!(document.flat_format().is_empty());
    }
}
