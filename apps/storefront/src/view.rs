//! # View Tree
//!
//! Pages and components render into a [`View`]: a tree of elements and text.
//! Creating a view is separate from mounting it; the router decides where a
//! page view goes.
//!
//! ## Usage
//! ```rust,ignore
//! let view = el("nav")
//!     .attr("class", "site-nav")
//!     .child(el("a").attr("href", "/catalog").child(text("Catalog")));
//!
//! assert_eq!(view.find("a").unwrap().attr_value("href"), Some("/catalog"));
//! println!("{}", view.render());
//! ```

use std::fmt::Write as _;

/// A node in a rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Element(Node),
    Text(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<View>,
}

/// Creates an empty element.
pub fn el(tag: impl Into<String>) -> View {
    View::Element(Node {
        tag: tag.into(),
        attrs: Vec::new(),
        children: Vec::new(),
    })
}

/// Creates a text node.
pub fn text(value: impl Into<String>) -> View {
    View::Text(value.into())
}

impl View {
    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    /// Sets an attribute, replacing an existing value. No-op on text nodes.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let View::Element(node) = &mut self {
            let name = name.into();
            let value = value.into();
            match node.attrs.iter_mut().find(|(n, _)| *n == name) {
                Some(existing) => existing.1 = value,
                None => node.attrs.push((name, value)),
            }
        }
        self
    }

    pub fn child(mut self, child: View) -> Self {
        if let View::Element(node) = &mut self {
            node.children.push(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = View>) -> Self {
        if let View::Element(node) = &mut self {
            node.children.extend(children);
        }
        self
    }

    /// Appends a text child.
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(text(value))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn tag(&self) -> Option<&str> {
        match self {
            View::Element(node) => Some(&node.tag),
            View::Text(_) => None,
        }
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        match self {
            View::Element(node) => node
                .attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            View::Text(_) => None,
        }
    }

    pub fn child_views(&self) -> &[View] {
        match self {
            View::Element(node) => &node.children,
            View::Text(_) => &[],
        }
    }

    /// First element with the given tag, depth-first, including `self`.
    pub fn find(&self, tag: &str) -> Option<&View> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        self.child_views().iter().find_map(|c| c.find(tag))
    }

    /// All elements with the given tag, depth-first.
    pub fn find_all(&self, tag: &str) -> Vec<&View> {
        let mut found = Vec::new();
        self.collect_matching(&mut |v| v.tag() == Some(tag), &mut found);
        found
    }

    /// First element whose attribute `name` equals `value`.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&View> {
        if self.attr_value(name) == Some(value) {
            return Some(self);
        }
        self.child_views()
            .iter()
            .find_map(|c| c.find_by_attr(name, value))
    }

    fn collect_matching<'a>(&'a self, pred: &mut dyn FnMut(&View) -> bool, out: &mut Vec<&'a View>) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_views() {
            child.collect_matching(pred, out);
        }
    }

    /// Concatenated text of the subtree, text nodes separated by one space.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.gather_text(&mut parts);
        parts.join(" ")
    }

    fn gather_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match self {
            View::Text(t) => {
                if !t.trim().is_empty() {
                    parts.push(t.trim());
                }
            }
            View::Element(node) => {
                for child in &node.children {
                    child.gather_text(parts);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Renders the tree as indented markup.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            View::Text(t) => {
                let _ = writeln!(out, "{}{}", indent, t);
            }
            View::Element(node) => {
                let mut open = format!("<{}", node.tag);
                for (name, value) in &node.attrs {
                    let _ = write!(open, " {}=\"{}\"", name, value);
                }
                open.push('>');

                let inline = node.children.iter().all(|c| matches!(c, View::Text(_)));
                if inline {
                    let body: Vec<&str> = node
                        .children
                        .iter()
                        .filter_map(|c| match c {
                            View::Text(t) => Some(t.as_str()),
                            View::Element(_) => None,
                        })
                        .collect();
                    let _ = writeln!(out, "{}{}{}</{}>", indent, open, body.join(" "), node.tag);
                } else {
                    let _ = writeln!(out, "{}{}", indent, open);
                    for child in &node.children {
                        child.render_into(out, depth + 1);
                    }
                    let _ = writeln!(out, "{}</{}>", indent, node.tag);
                }
            }
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
