/// Read-only view of a parsed XML element, as consumed by the structural
/// converters.
pub trait Element: Sized {
    fn name(&self) -> &str;
    fn attribute(&self, key: &str) -> Option<&str>;
    /// Child elements in document order; text and comments are skipped.
    fn children(&self) -> Vec<Self>;
}

impl<'a, 'input> Element for roxmltree::Node<'a, 'input> {
    fn name(&self) -> &str {
        self.tag_name().name()
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        roxmltree::Node::attribute(self, key)
    }

    fn children(&self) -> Vec<Self> {
        roxmltree::Node::children(self)
            .filter(|node| node.is_element())
            .collect()
    }
}
