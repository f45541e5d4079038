//! Resolved text trees.
//!
//! Processed text is a small DOM: a node either carries plain text or a tag
//! with attributes and children. Renderers walk this tree; the link checker
//! looks for link nodes whose `href` carries the `dox:` scheme.

use std::fmt::Write as _;

/// The closed set of node tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTag {
    /// Plain text leaf; only `text` is meaningful.
    Text,
    /// Generic container (entry bodies, briefs, sees).
    Div,
    Paragraph,
    /// `@section` renders as level 2, `@subsection` as level 3.
    Heading(u8),
    Link,
    /// Verbatim code from `@code`, `@include`, or `@snippet`.
    Code,
    /// Raw HTML tag carried through from annotation text.
    Html(String),
}

impl NodeTag {
    pub fn name(&self) -> String {
        match self {
            NodeTag::Text => String::new(),
            NodeTag::Div => "div".to_string(),
            NodeTag::Paragraph => "p".to_string(),
            NodeTag::Heading(level) => format!("h{}", level),
            NodeTag::Link => "a".to_string(),
            NodeTag::Code => "code".to_string(),
            NodeTag::Html(name) => name.clone(),
        }
    }
}

/// One node of processed text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub tag: NodeTag,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<TextNode>,
    pub text: String,
    pub raw_html: bool,
}

impl TextNode {
    /// A plain text leaf; angle brackets are escaped.
    pub fn text(text: &str) -> TextNode {
        TextNode {
            tag: NodeTag::Text,
            attrs: Vec::new(),
            children: Vec::new(),
            text: text.replace('<', "&lt;").replace('>', "&gt;"),
            raw_html: false,
        }
    }

    /// A text leaf kept byte for byte (code, html-only blocks).
    pub fn verbatim(text: &str) -> TextNode {
        TextNode {
            tag: NodeTag::Text,
            attrs: Vec::new(),
            children: Vec::new(),
            text: text.to_string(),
            raw_html: false,
        }
    }

    /// An element node with the given tag and no content yet.
    pub fn elem(tag: NodeTag) -> TextNode {
        TextNode {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            text: String::new(),
            raw_html: false,
        }
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> TextNode {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: TextNode) -> TextNode {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing an existing value for the same key.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((key.to_string(), value.to_string()));
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn add_child(&mut self, child: TextNode) {
        self.children.push(child);
    }

    pub fn is_text(&self) -> bool {
        self.tag == NodeTag::Text
    }

    /// Whether the node renders nothing.
    pub fn is_empty_node(&self) -> bool {
        if self.is_text() {
            self.text.is_empty()
        } else {
            self.children.is_empty() && self.attrs.is_empty()
        }
    }

    /// Concatenated text of the whole subtree, tags dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| {
            if node.is_text() {
                out.push_str(&node.text);
            }
        });
        out
    }

    /// Depth-first visit of the subtree, including `self`.
    pub fn walk(&self, visit: &mut impl FnMut(&TextNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// HTML-like rendering for debugging and tests.
    pub fn to_html_like(&self) -> String {
        if self.is_text() {
            return self.text.clone();
        }
        let mut out = String::new();
        out.push('<');
        out.push_str(&self.tag.name());
        for (key, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", key, value);
        }
        if self.children.is_empty() {
            out.push_str(" />");
            return out;
        }
        out.push('>');
        for child in &self.children {
            out.push_str(&child.to_html_like());
        }
        let _ = write!(out, "</{}>", self.tag.name());
        out
    }
}

impl Default for TextNode {
    fn default() -> TextNode {
        TextNode::elem(NodeTag::Div)
    }
}
