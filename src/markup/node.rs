//! Typed HTML nodes and their serialiser

use super::escape::escape_html;
use std::fmt::{self, Write};

/// Attribute value and how it is written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Escaped on output
    Escaped(String),
    /// Written verbatim. Only for first-party URLs and handlers built from them.
    Trusted(String),
    /// Boolean attribute, written as a bare name
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, AttrValue)>,
    pub children: Vec<Node>,
    /// Void elements (`img`, `br`, ...) have no closing tag
    pub void: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Fragment(Vec<Node>),
}

const VOID_TAGS: [&str; 6] = ["img", "br", "hr", "input", "meta", "source"];

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            void: VOID_TAGS.contains(&tag),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, AttrValue::Escaped(value.into())));
        self
    }

    pub fn trusted_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, AttrValue::Trusted(value.into())));
        self
    }

    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push((name, AttrValue::Flag));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Value of an attribute, whichever way it is written
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| match v {
            AttrValue::Escaped(s) | AttrValue::Trusted(s) => s.as_str(),
            AttrValue::Flag => "",
        })
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let Some(i) = self.attrs.iter().position(|(n, _)| *n == "class") else {
            self.attrs.push(("class", AttrValue::Escaped(class.to_string())));
            return;
        };
        match &mut self.attrs[i].1 {
            AttrValue::Escaped(v) if !v.is_empty() => {
                v.push(' ');
                v.push_str(class);
            }
            value => *value = AttrValue::Escaped(class.to_string()),
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        for (name, value) in self.attrs.iter_mut() {
            if *name != "class" {
                continue;
            }
            if let AttrValue::Escaped(v) = value {
                *v = v
                    .split_whitespace()
                    .filter(|c| *c != class)
                    .collect::<Vec<_>>()
                    .join(" ");
            }
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Serialise to markup
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) -> fmt::Result {
        match self {
            Node::Text(t) => out.write_str(&escape_html(t)),
            Node::Fragment(nodes) => {
                for n in nodes {
                    n.write_html(out)?;
                }
                Ok(())
            }
            Node::Element(el) => {
                write!(out, "<{}", el.tag)?;
                for (name, value) in &el.attrs {
                    match value {
                        AttrValue::Escaped(v) => write!(out, " {}=\"{}\"", name, escape_html(v))?,
                        AttrValue::Trusted(v) => write!(out, " {}=\"{}\"", name, v)?,
                        AttrValue::Flag => write!(out, " {}", name)?,
                    }
                }
                out.write_char('>')?;
                if el.void {
                    return Ok(());
                }
                for child in &el.children {
                    child.write_html(out)?;
                }
                write!(out, "</{}>", el.tag)
            }
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.collect_text(out)),
            Node::Element(el) => el.children.iter().for_each(|n| n.collect_text(out)),
        }
    }

    /// Depth-first search for elements matching a predicate
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(pred, &mut found);
        found
    }

    fn walk<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        match self {
            Node::Text(_) => {}
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.walk(pred, found)),
            Node::Element(el) => {
                if pred(el) {
                    found.push(el);
                }
                el.children.iter().for_each(|n| n.walk(pred, found));
            }
        }
    }

    /// Elements with the given tag name
    pub fn find_tag(&self, tag: &str) -> Vec<&Element> {
        self.find_all(&|el| el.tag == tag)
    }

    /// Elements carrying the given class
    pub fn find_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(&|el| el.has_class(class))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_serialisation() {
        let node: Node = Element::new("div")
            .class("card")
            .child(Element::new("span").text("a < b"))
            .into();
        assert_eq!(
            node.to_html(),
            r#"<div class="card"><span>a &lt; b</span></div>"#
        );
    }

    #[test]
    fn test_void_and_flag_attrs() {
        let node: Node = Element::new("video")
            .flag("muted")
            .child(Element::new("source").attr("src", "x.mp4"))
            .into();
        assert_eq!(node.to_html(), r#"<video muted><source src="x.mp4"></video>"#);
    }

    #[test]
    fn test_escaped_attr_vs_trusted_attr() {
        let node: Node = Element::new("a")
            .attr("title", r#"say "hi""#)
            .trusted_attr("href", "https://x/?a=1&b=2")
            .into();
        assert_eq!(
            node.to_html(),
            r#"<a title="say &quot;hi&quot;" href="https://x/?a=1&b=2"></a>"#
        );
    }

    #[test]
    fn test_add_and_remove_class() {
        let mut el = Element::new("article").class("work-item");
        el.add_class("hidden-item");
        el.add_class("hidden-item");
        assert_eq!(el.get_attr("class"), Some("work-item hidden-item"));
        el.remove_class("hidden-item");
        assert_eq!(el.get_attr("class"), Some("work-item"));

        let mut bare = Element::new("div");
        bare.add_class("x");
        assert!(bare.has_class("x"));
    }

    #[test]
    fn test_find_class_and_text_content() {
        let node: Node = Element::new("div")
            .child(Element::new("p").class("one two").text("Hello "))
            .child(Element::new("p").class("two").text("world"))
            .into();
        assert_eq!(node.find_class("two").len(), 2);
        assert_eq!(node.find_class("one").len(), 1);
        assert_eq!(node.text_content(), "Hello world");
    }
}
