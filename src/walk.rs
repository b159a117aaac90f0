//! Document-structure walk.
//!
//! [`walk`] makes a single forward pass over the statute's structural nodes
//! in document order. Hierarchy headers update a [`Hierarchy`] context value;
//! article nodes are rendered and emitted as [`Article`] records carrying the
//! context that was current when they were reached. No backtracking.

use log::debug;
use markup5ever_rcdom::Handle;

use crate::assemble::sanitize_filename;
use crate::document::{self, NormKind, Statute};
use crate::dom;
use crate::footnote::{self, FootnoteDefinition};
use crate::render::{self, RenderConfig};

/// The four nesting levels of the law-portal hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Teil,
    Kapitel,
    Abschnitt,
    Unterabschnitt,
}

impl Level {
    /// Classify a hierarchy label by its keyword prefix.
    ///
    /// The keywords are the source convention's German level names; labels
    /// with any other prefix leave the context unchanged.
    pub fn classify(label: &str) -> Option<Level> {
        if label.starts_with("Unterabschnitt") {
            Some(Level::Unterabschnitt)
        } else if label.starts_with("Abschnitt") {
            Some(Level::Abschnitt)
        } else if label.starts_with("Kapitel") {
            Some(Level::Kapitel)
        } else if label.starts_with("Teil") {
            Some(Level::Teil)
        } else {
            None
        }
    }
}

/// Immutable hierarchy context.
///
/// Setting a level produces a new value with all deeper levels cleared: a new
/// chapter invalidates any previously active section or subsection. Labels
/// are stored as sanitized path components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    pub teil: Option<String>,
    pub kapitel: Option<String>,
    pub abschnitt: Option<String>,
    pub unterabschnitt: Option<String>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new context with `level` set and all deeper levels cleared.
    pub fn with(&self, level: Level, label: impl Into<String>) -> Hierarchy {
        let label = Some(label.into());
        match level {
            Level::Teil => Hierarchy {
                teil: label,
                ..Default::default()
            },
            Level::Kapitel => Hierarchy {
                teil: self.teil.clone(),
                kapitel: label,
                ..Default::default()
            },
            Level::Abschnitt => Hierarchy {
                teil: self.teil.clone(),
                kapitel: self.kapitel.clone(),
                abschnitt: label,
                unterabschnitt: None,
            },
            Level::Unterabschnitt => Hierarchy {
                unterabschnitt: label,
                ..self.clone()
            },
        }
    }

    /// Path components from outermost to innermost, unset levels skipped.
    pub fn components(&self) -> Vec<&str> {
        [
            &self.teil,
            &self.kapitel,
            &self.abschnitt,
            &self.unterabschnitt,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect()
    }
}

/// One rendered article, immutable after creation.
#[derive(Debug, Clone)]
pub struct Article {
    /// The source element's id, used for footnote resolution.
    pub id: Option<String>,
    /// Designator, e.g. `§ 5` or `Art 3`.
    pub number: String,
    /// Title text, possibly empty.
    pub title: String,
    /// Hierarchy context at the article's position.
    pub hierarchy: Hierarchy,
    /// Rendered body, including the link-reference definition block when any
    /// external links were collected.
    pub body: String,
    /// Resolved footnote definitions.
    pub footnotes: Vec<FootnoteDefinition>,
}

/// Walk the statute and produce its articles in document order.
pub fn walk(statute: &Statute, config: &RenderConfig) -> Vec<Article> {
    let mut articles = Vec::new();
    let mut hierarchy = Hierarchy::new();

    for node in statute.norm_nodes() {
        match node.kind {
            NormKind::Hierarchy => {
                if let Some((level, label)) = classify_header(&node.handle) {
                    hierarchy = hierarchy.with(level, label);
                }
            }
            NormKind::Article => {
                if let Some(article) = emit_article(statute, &node.handle, &hierarchy, config) {
                    articles.push(article);
                }
            }
        }
    }

    debug!("walked {} articles", articles.len());
    articles
}

/// Extract the level and combined label from a hierarchy-header node.
///
/// The header's first `h2` carries a span pair: the level label (`Teil 1`)
/// and an optional subtitle.
fn classify_header(handle: &Handle) -> Option<(Level, String)> {
    let h2 = dom::find_first_element(handle, "h2")?;
    let spans = dom::find_elements_by_name(&h2, "span");
    let main = spans
        .first()
        .map(|span| dom::text_content(span).trim().to_string())?;
    let level = Level::classify(&main)?;
    let sub = spans
        .get(1)
        .map(|span| dom::text_content(span).trim().to_string())
        .unwrap_or_default();
    Some((level, sanitize_filename(&format!("{main} {sub}"))))
}

fn emit_article(
    statute: &Statute,
    handle: &Handle,
    hierarchy: &Hierarchy,
    config: &RenderConfig,
) -> Option<Article> {
    let designator = document::article_designator(handle)?;
    if !document::is_article_designator(&designator) {
        return None;
    }
    let body_node = dom::select_class(handle, "div", "jnhtml")?;
    let id = dom::get_attribute(handle, "id");

    // Footnotes first, so the renderer knows the valid indices.
    let footnotes = id
        .as_deref()
        .map(|id| footnote::resolve(statute, id, config))
        .unwrap_or_default();
    let known: Vec<usize> = footnotes.iter().map(|f| f.index).collect();

    let rendered = render::render(&body_node, config, &known);
    if rendered.markdown.trim().is_empty() {
        debug!("skipping article {designator} with empty body");
        return None;
    }

    let mut body = rendered.markdown;
    if !rendered.link_refs.is_empty() {
        body.push_str("\n\n");
        body.push_str(&rendered.link_refs.definitions());
    }

    Some(Article {
        id,
        number: designator,
        title: document::article_title(handle),
        hierarchy: hierarchy.clone(),
        body,
        footnotes,
    })
}
