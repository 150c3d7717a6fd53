/// Tree renderer: template expansion and callback dispatch
use crate::ast::{Child, Element};
use crate::tags::{Handler, TagSet};

/// Walks a built tree and produces the output string. Pure: the only inputs
/// are the tree and the tag configuration it borrows.
pub struct Renderer<'a> {
    tags: &'a TagSet,
}

/// Accessor handed to callback handlers: one tag instance plus enough of
/// the renderer to compute its content on demand.
pub struct TagRef<'a> {
    renderer: &'a Renderer<'a>,
    element: &'a Element,
}

impl<'a> Renderer<'a> {
    pub fn new(tags: &'a TagSet) -> Self {
        Renderer { tags }
    }

    /// Render the root: string children verbatim, element children through
    /// their handlers.
    pub fn render(&self, root: &Element) -> String {
        self.content(root).to_string()
    }

    /// Rendered and concatenated children of an element, memoized on the
    /// element so repeated lookups do the work once.
    fn content<'e>(&self, element: &'e Element) -> &'e str {
        element.content_with(|| {
            element
                .children
                .iter()
                .map(|child| match child {
                    Child::Text(text) => text.clone(),
                    Child::Element(element) => self.render_element(element),
                })
                .collect()
        })
    }

    fn render_element(&self, element: &Element) -> String {
        match self.tags.get(&element.key).map(|def| &def.handler) {
            Some(Handler::Template(template)) => self.expand(template, element),
            Some(Handler::Callback(callback)) => callback(&TagRef {
                renderer: self,
                element,
            }),
            // The root has no handler; its content passes through.
            None => self.content(element).to_string(),
        }
    }

    /// Expand `{...}` placeholders in a template. Recognized forms are
    /// `{content}`, `{source}`, `{name}`, `{option}` and `{attribute.KEY}`;
    /// `{{word}}` escapes to a literal `{word}`. Any other `{word}` expands
    /// to nothing, and brace text that matches no form at all is kept
    /// verbatim.
    fn expand(&self, template: &str, element: &Element) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(idx) = rest.find('{') {
            out.push_str(&rest[..idx]);
            rest = &rest[idx..];
            match self.expand_placeholder(rest, element, &mut out) {
                Some(len) => rest = &rest[len..],
                None => {
                    out.push('{');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Try to expand one placeholder at the start of `rest` (which begins
    /// with `{`), appending its value to `out` and returning the matched
    /// length.
    fn expand_placeholder(&self, rest: &str, element: &Element, out: &mut String) -> Option<usize> {
        let bytes = rest.as_bytes();
        if bytes.get(1) == Some(&b'{') {
            // {{word}} emits {word} unexpanded.
            let word = word_run(rest, 2);
            if word.is_empty() || !rest[2 + word.len()..].starts_with("}}") {
                return None;
            }
            out.push('{');
            out.push_str(word);
            out.push('}');
            return Some(word.len() + 4);
        }
        if let Some(after) = rest.strip_prefix("{attribute.") {
            let word = word_run(after, 0);
            if word.is_empty() || !after[word.len()..].starts_with('}') {
                return None;
            }
            out.push_str(element.attribute(word).unwrap_or(""));
            return Some("{attribute.".len() + word.len() + 1);
        }
        let word = word_run(rest, 1);
        if word.is_empty() || !rest[1 + word.len()..].starts_with('}') {
            return None;
        }
        match word {
            "content" => out.push_str(self.content(element)),
            "source" => out.push_str(element.source()),
            "name" => out.push_str(&element.name),
            "option" => out.push_str(element.option().unwrap_or("")),
            // Unrecognized placeholders expand to nothing.
            _ => {}
        }
        Some(word.len() + 2)
    }
}

impl TagRef<'_> {
    /// Rendered inner content, computed at most once.
    pub fn content(&self) -> &str {
        self.renderer.content(self.element)
    }

    /// Original inner text, tags included, never rendered.
    pub fn source(&self) -> &str {
        self.element.source()
    }

    /// The tag name as written in the input.
    pub fn name(&self) -> &str {
        &self.element.name
    }

    pub fn option(&self) -> Option<&str> {
        self.element.option()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.element.attribute(key)
    }
}

/// The longest run of word characters in `s` starting at byte offset `at`.
fn word_run(s: &str, at: usize) -> &str {
    let bytes = s.as_bytes();
    let mut end = at;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }
    &s[at..end]
}
