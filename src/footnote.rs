//! Footnote resolution.
//!
//! The law portal links footnotes to their owning article through an id
//! convention: the container for article `<id>` carries the id `<id>_FNS`.
//! Its `div.jnhtml` child holds the footnote text.
//!
//! Only one container per article is resolved. The suffix convention could
//! in principle address several, but the source documents never do, so the
//! single-container behavior is kept rather than silently generalized.

use crate::document::Statute;
use crate::dom;
use crate::render::{self, RenderConfig};

/// One resolved footnote definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteDefinition {
    /// 1-based index, matching the `[^N]` reference in the article body.
    pub index: usize,
    /// Definition text, collapsed to a single line.
    pub text: String,
}

impl FootnoteDefinition {
    /// The `[^N]: text` definition line.
    pub fn definition_line(&self) -> String {
        format!("[^{}]: {}", self.index, self.text)
    }
}

/// Resolve the footnote definitions for one article.
///
/// Absence of a container is not an error; the article simply proceeds with
/// no footnotes.
pub fn resolve(statute: &Statute, article_id: &str, config: &RenderConfig) -> Vec<FootnoteDefinition> {
    let Some(container) = statute.article_footnotes(article_id) else {
        return Vec::new();
    };
    let Some(content) = dom::select_class(&container, "div", "jnhtml") else {
        return Vec::new();
    };

    let text = single_line(&render_footnote_content(&content, config));
    if text.is_empty() {
        return Vec::new();
    }

    vec![FootnoteDefinition { index: 1, text }]
}

/// Render the document-level footnote container, if present.
///
/// Feeds the global footnote block at the tail of the flowing-text document.
pub fn document_footnotes(statute: &Statute, config: &RenderConfig) -> Option<String> {
    let container = statute.document_footnotes()?;
    let content = dom::select_class(&container, "div", "jnhtml")?;
    let markdown = render_footnote_content(&content, config);
    (!markdown.is_empty()).then_some(markdown)
}

/// Footnote content renders without block markers or reference links; it is
/// destined for a definition line, not an article body.
fn render_footnote_content(content: &markup5ever_rcdom::Handle, config: &RenderConfig) -> String {
    let footnote_config = config
        .clone()
        .with_block_markers(false)
        .with_reference_links(false);
    render::render(content, &footnote_config, &[]).markdown
}

fn single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out.trim().to_string()
}
