/// A BBCode-style markup renderer with deterministic recovery from
/// malformed, overlapping, and unmatched tags
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod renderer;
pub mod tags;

pub use renderer::TagRef;
pub use tags::{Handler, TagDef, TagSet};

/// A configured processor: an immutable tag-name-to-handler mapping plus the
/// tokenize/build/render pipeline. Construction happens once; `render` may
/// then be called any number of times, from any thread.
pub struct BbCode {
    tags: TagSet,
}

impl BbCode {
    pub fn new(tags: TagSet) -> Self {
        BbCode { tags }
    }

    /// Convert markup to output text. Never fails: malformed markup degrades
    /// to literal text. A panicking callback handler propagates.
    pub fn render(&self, input: &str) -> String {
        let tokens = lexer::tokenize(input, &self.tags);
        let root = parser::build(tokens, &self.tags);
        renderer::Renderer::new(&self.tags).render(&root)
    }
}
