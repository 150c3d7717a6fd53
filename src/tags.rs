/// Tag handler configuration
use crate::renderer::TagRef;
use std::collections::HashMap;
use std::fmt;
use unicode_casefold::UnicodeCaseFold;

/// Case-fold a tag name into the form used for lookup and matching.
pub fn fold_name(name: &str) -> String {
    name.chars().case_fold().collect()
}

/// The renderer bound to a tag name: a template string with `{...}`
/// placeholders, or a callback invoked with a [`TagRef`] accessor.
pub enum Handler {
    Template(String),
    Callback(Box<dyn Fn(&TagRef<'_>) -> String + Send + Sync>),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Handler::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Per-tag configuration: the handler plus the optional behavior flags.
#[derive(Debug)]
pub struct TagDef {
    pub handler: Handler,
    /// The tag renders immediately on open and never consumes a body.
    pub self_closing: bool,
    /// The tag's inner span is taken verbatim, without tag interpretation.
    pub no_code: bool,
}

impl TagDef {
    pub fn template(template: impl Into<String>) -> Self {
        TagDef {
            handler: Handler::Template(template.into()),
            self_closing: false,
            no_code: false,
        }
    }

    pub fn callback(f: impl Fn(&TagRef<'_>) -> String + Send + Sync + 'static) -> Self {
        TagDef {
            handler: Handler::Callback(Box::new(f)),
            self_closing: false,
            no_code: false,
        }
    }

    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    pub fn no_code(mut self) -> Self {
        self.no_code = true;
        self
    }
}

impl From<&str> for TagDef {
    fn from(template: &str) -> Self {
        TagDef::template(template)
    }
}

impl From<String> for TagDef {
    fn from(template: String) -> Self {
        TagDef::template(template)
    }
}

/// The set of recognized tags, keyed by case-folded name. Immutable once
/// handed to a processor; safe to share across threads.
#[derive(Debug, Default)]
pub struct TagSet {
    tags: HashMap<String, TagDef>,
}

impl TagSet {
    pub fn new() -> Self {
        TagSet {
            tags: HashMap::new(),
        }
    }

    /// Builder-style insert. Accepts a template (`&str`/`String`) or a
    /// full [`TagDef`].
    pub fn with(mut self, name: &str, def: impl Into<TagDef>) -> Self {
        self.insert(name, def.into());
        self
    }

    pub fn insert(&mut self, name: &str, def: TagDef) {
        self.tags.insert(fold_name(name), def);
    }

    /// Look up a tag by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&TagDef> {
        self.tags.get(&fold_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(&fold_name(name))
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}
