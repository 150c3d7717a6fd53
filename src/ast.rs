/// Element tree produced by the tree builder
use crate::lexer::{TagToken, parse_attributes};
use std::cell::OnceCell;
use std::collections::HashMap;

/// One ordered child of an element: a literal run of text, or a nested tag
/// that closed with correct nesting.
#[derive(Debug)]
pub enum Child {
    Text(String),
    Element(Element),
}

/// The synthetic document root, or one successfully opened tag instance.
/// Elements live only for the duration of a single render call; `content`,
/// `source` and the attribute map are computed at most once and cached.
#[derive(Debug)]
pub struct Element {
    /// Tag name as written in the input. Empty for the root.
    pub name: String,
    /// Case-folded name, used for matching and handler lookup.
    pub key: String,
    pub option: Option<String>,
    /// Original `[tag...]` text, replayed verbatim if the tag is broken.
    pub raw_open: String,
    /// Original `[/tag]` text, set when the tag closes normally.
    pub raw_close: Option<String>,
    pub children: Vec<Child>,
    raw_attributes: String,
    attributes: OnceCell<HashMap<String, String>>,
    content: OnceCell<String>,
    source: OnceCell<String>,
}

impl Element {
    /// The document root: no name, no handler, never broken.
    pub fn root() -> Self {
        Element {
            name: String::new(),
            key: String::new(),
            option: None,
            raw_open: String::new(),
            raw_close: None,
            children: Vec::new(),
            raw_attributes: String::new(),
            attributes: OnceCell::new(),
            content: OnceCell::new(),
            source: OnceCell::new(),
        }
    }

    /// An element freshly opened from a tag token.
    pub fn open(token: TagToken, key: String) -> Self {
        Element {
            name: token.name,
            key,
            option: token.option,
            raw_open: token.raw,
            raw_close: None,
            children: Vec::new(),
            raw_attributes: token.attributes,
            attributes: OnceCell::new(),
            content: OnceCell::new(),
            source: OnceCell::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    pub fn option(&self) -> Option<&str> {
        self.option.as_deref()
    }

    /// The attribute map, parsed from the raw attribute text on first use.
    pub fn attributes(&self) -> &HashMap<String, String> {
        self.attributes
            .get_or_init(|| parse_attributes(&self.raw_attributes))
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes().get(key).map(String::as_str)
    }

    /// Rendered children, concatenated. Rendering depends on the configured
    /// handlers, so the caller supplies the computation; the result is
    /// cached after the first call.
    pub(crate) fn content_with(&self, render: impl FnOnce() -> String) -> &str {
        self.content.get_or_init(render)
    }

    /// The original inner text of this element: children concatenated with
    /// nested tags included verbatim, never rendered.
    pub fn source(&self) -> &str {
        self.source.get_or_init(|| {
            self.children
                .iter()
                .map(|child| match child {
                    Child::Text(text) => text.clone(),
                    Child::Element(element) => element.outer_source(),
                })
                .collect()
        })
    }

    /// The element's full original text: open tag, inner source, close tag.
    pub fn outer_source(&self) -> String {
        let mut out = String::with_capacity(self.raw_open.len() + self.source().len());
        out.push_str(&self.raw_open);
        out.push_str(self.source());
        if let Some(close) = &self.raw_close {
            out.push_str(close);
        }
        out
    }
}
