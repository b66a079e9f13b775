//! Owned arena tree for parsed markup fragments.
//!
//! Nodes live in a flat `Vec` and refer to each other by index, so the
//! sanitizer can splice child lists without fighting shared ownership.

use std::collections::HashMap;

use scraper::{Html, Node};

/// Index of a node in a `FragmentTree`.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic container for the fragment's top-level nodes.
    Root,
    Element {
        /// Lowercase local tag name.
        name: String,
        /// Attributes as reported by the parser.
        attrs: Vec<(String, String)>,
    },
    Text(String),
    /// Comments, doctypes and processing instructions.
    Other,
}

#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
}

/// A detached, owned markup tree.
#[derive(Debug, Clone)]
pub struct FragmentTree {
    nodes: Vec<ArenaNode>,
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

impl FragmentTree {
    pub const ROOT: NodeId = 0;

    /// Parse markup as an HTML body fragment.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_fragment(markup);
        let mut tree = Self {
            nodes: vec![ArenaNode {
                kind: NodeKind::Root,
                children: Vec::new(),
            }],
        };

        // The fragment's nodes sit under a synthetic <html> element, which
        // maps onto our root. Pre-order traversal sees every parent before
        // its children, and siblings in document order.
        let root_element = html.root_element();
        let container = &*root_element;
        let mut index = HashMap::new();
        index.insert(container.id(), Self::ROOT);
        for source in container.descendants().skip(1) {
            let Some(parent) = source.parent().and_then(|p| index.get(&p.id()).copied()) else {
                continue;
            };
            let kind = match source.value() {
                Node::Element(element) => NodeKind::Element {
                    name: element.name().to_ascii_lowercase(),
                    attrs: element
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                },
                Node::Text(text) => {
                    let text: &str = text;
                    NodeKind::Text(text.to_string())
                }
                _ => NodeKind::Other,
            };
            let id = tree.push(kind);
            tree.nodes[parent].children.push(id);
            index.insert(source.id(), id);
        }
        tree
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(ArenaNode {
            kind,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &ArenaNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ArenaNode {
        &mut self.nodes[id]
    }

    /// Serialize the children of the root back to markup.
    pub fn to_html(&self) -> String {
        enum Step<'a> {
            Open(NodeId),
            Close(&'a str),
        }

        let mut out = String::new();
        let mut stack: Vec<Step<'_>> = self.nodes[Self::ROOT]
            .children
            .iter()
            .rev()
            .map(|&child| Step::Open(child))
            .collect();

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(name) => {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                    continue;
                }
            };
            let node = &self.nodes[id];
            match &node.kind {
                NodeKind::Root => {
                    stack.extend(node.children.iter().rev().map(|&c| Step::Open(c)));
                }
                NodeKind::Element { name, attrs } => {
                    write_open_tag(name, attrs, &mut out);
                    if is_void_element(name) {
                        continue;
                    }
                    stack.push(Step::Close(name));
                    stack.extend(node.children.iter().rev().map(|&c| Step::Open(c)));
                }
                NodeKind::Text(text) => escape_text_into(text, &mut out),
                NodeKind::Other => {}
            }
        }
        out
    }
}

fn write_open_tag(name: &str, attrs: &[(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(name);
    let mut sorted: Vec<_> = attrs.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    for (attr, value) in sorted {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        escape_attr_into(value, out);
        out.push('"');
    }
    out.push('>');
}

/// Escape text content for inclusion in markup.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_text_into(text, &mut out);
    out
}

/// Escape an attribute value for inclusion in a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_attr_into(value, &mut out);
    out
}

fn escape_text_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attr_into(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_arena() {
        let tree = FragmentTree::parse("<p>a<b>b</b></p>text");
        let root = tree.node(FragmentTree::ROOT);
        assert_eq!(root.children.len(), 2);

        let p = tree.node(root.children[0]);
        assert!(matches!(&p.kind, NodeKind::Element { name, .. } if name == "p"));
        assert_eq!(p.children.len(), 2);

        let text = tree.node(root.children[1]);
        assert_eq!(text.kind, NodeKind::Text("text".into()));
    }

    #[test]
    fn test_serialize_void_and_escapes() {
        let tree = FragmentTree::parse(r#"<p title="a&quot;b">1 &lt; 2<br>x</p>"#);
        assert_eq!(tree.to_html(), r#"<p title="a&quot;b">1 &lt; 2<br>x</p>"#);
    }

    #[test]
    fn test_attributes_serialized_in_name_order() {
        let tree = FragmentTree::parse(r#"<a title="t" href="/x">x</a>"#);
        assert_eq!(tree.to_html(), r#"<a href="/x" title="t">x</a>"#);
    }

    #[test]
    fn test_escape_helpers() {
        assert_eq!(escape_text("<b>&"), "&lt;b&gt;&amp;");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }
}
