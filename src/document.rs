//! The parsed statute document and its structural conventions.
//!
//! Documents from gesetze-im-internet.de mark every structural unit with a
//! `div.jnnorm` container whose `title` attribute classifies it:
//!
//! - `"Gliederung"`: a hierarchy header (Teil/Kapitel/Abschnitt/Unterabschnitt)
//! - `"Einzelnorm"`: one article (a `§` or `Art` provision)
//! - `"Fussnoten"`: a footnote container
//!
//! [`Statute`] wraps the parsed DOM and exposes these conventions as queries.
//! The tree is read-only input; nothing in this crate mutates it.

use std::borrow::Cow;

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom;

/// `title` attribute value marking a hierarchy header.
const TITLE_HIERARCHY: &str = "Gliederung";
/// `title` attribute value marking an article.
const TITLE_ARTICLE: &str = "Einzelnorm";
/// `title` attribute value marking a footnote container.
const TITLE_FOOTNOTES: &str = "Fussnoten";

/// Id suffix linking a footnote container to its owning article.
pub const FOOTNOTE_ID_SUFFIX: &str = "_FNS";

/// Fallback used when the document carries no usable title or abbreviation.
pub const DEFAULT_LAW_NAME: &str = "Gesetz";

/// Decode raw document bytes to a string.
///
/// Tries strict UTF-8 first, then falls back to Windows-1252 (the encoding
/// the law portal serves its exports in).
pub fn decode_bytes(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Classification of a structural node in the statute body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormKind {
    /// A hierarchy header establishing nesting context.
    Hierarchy,
    /// An article carrying a designator and body content.
    Article,
}

/// One structural node, in document order.
#[derive(Debug, Clone)]
pub struct NormNode {
    pub kind: NormKind,
    pub handle: Handle,
}

/// A parsed statute document.
pub struct Statute {
    dom: RcDom,
}

impl Statute {
    /// Parse a statute from an HTML string.
    pub fn parse(html: &str) -> Self {
        Self {
            dom: dom::parse_html(html),
        }
    }

    /// Decode raw bytes (UTF-8 with Windows-1252 fallback) and parse.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&decode_bytes(bytes))
    }

    /// Root handle of the document tree.
    pub fn root(&self) -> Handle {
        self.dom.document.clone()
    }

    /// The statute's full name, from `h1 span.jnlangue`.
    pub fn title(&self) -> Option<String> {
        let h1 = dom::find_first_element(&self.dom.document, "h1")?;
        let span = dom::select_class(&h1, "span", "jnlangue")?;
        let text = dom::text_content(&span).trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    /// The statute's official abbreviation, from `h1 span.jnamtabk` with the
    /// surrounding parentheses stripped.
    pub fn abbreviation(&self) -> Option<String> {
        let h1 = dom::find_first_element(&self.dom.document, "h1")?;
        let span = dom::select_class(&h1, "span", "jnamtabk")?;
        let text: String = dom::text_content(&span)
            .chars()
            .filter(|c| *c != '(' && *c != ')')
            .collect();
        let text = text.trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    /// All hierarchy-header and article nodes, in document order.
    ///
    /// Nodes whose `title` attribute matches neither convention are skipped.
    /// Matched containers are not descended into.
    pub fn norm_nodes(&self) -> Vec<NormNode> {
        let mut nodes = Vec::new();
        collect_norms(&self.dom.document, &mut nodes);
        nodes
    }

    /// The footnote container owned by the given article, if any.
    pub fn article_footnotes(&self, article_id: &str) -> Option<Handle> {
        let id = format!("{article_id}{FOOTNOTE_ID_SUFFIX}");
        dom::find_element_by_attr(&self.dom.document, "id", &id)
    }

    /// The document-level footnote container, if any.
    ///
    /// Per-article containers carry the `_FNS` id suffix; the document-level
    /// block is the first `"Fussnoten"` node without one.
    pub fn document_footnotes(&self) -> Option<Handle> {
        let mut result = None;
        find_document_footnotes(&self.dom.document, &mut result);
        result
    }

    /// Analyze the document without converting it.
    pub fn summary(&self) -> Summary {
        let title = self.title();
        let mut article_count = 0;
        let mut heading_count = 0;

        for node in self.norm_nodes() {
            match node.kind {
                NormKind::Hierarchy => heading_count += 1,
                NormKind::Article => {
                    if let Some(designator) = article_designator(&node.handle)
                        && is_article_designator(&designator)
                    {
                        article_count += 1;
                    }
                }
            }
        }

        let convertible = title.is_some() && article_count > 0;
        Summary {
            title,
            abbreviation: self.abbreviation(),
            article_count,
            heading_count,
            convertible,
        }
    }
}

/// Structural analysis of a statute document.
///
/// Used by the CLI's `--info` mode to report whether a file looks like a
/// convertible law-portal export before a run is attempted.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Summary {
    pub title: Option<String>,
    pub abbreviation: Option<String>,
    pub article_count: usize,
    pub heading_count: usize,
    pub convertible: bool,
}

/// Read an article node's designator (`§ 5`, `Art 3`) from `h3 span.jnenbez`.
pub fn article_designator(handle: &Handle) -> Option<String> {
    let h3 = dom::find_first_element(handle, "h3")?;
    let span = dom::select_class(&h3, "span", "jnenbez")?;
    let text = dom::text_content(&span).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Read an article node's title from `h3 span.jnentitel`.
pub fn article_title(handle: &Handle) -> String {
    dom::find_first_element(handle, "h3")
        .and_then(|h3| dom::select_class(&h3, "span", "jnentitel"))
        .map(|span| dom::text_content(&span).trim().to_string())
        .unwrap_or_default()
}

/// Check whether a designator marks a convertible article.
pub fn is_article_designator(designator: &str) -> bool {
    designator.starts_with('§') || designator.starts_with("Art")
}

fn collect_norms(handle: &Handle, nodes: &mut Vec<NormNode>) {
    if let NodeData::Element { .. } = handle.data {
        let kind = match dom::get_attribute(handle, "title").as_deref() {
            Some(TITLE_HIERARCHY) => Some(NormKind::Hierarchy),
            Some(TITLE_ARTICLE) => Some(NormKind::Article),
            _ => None,
        };
        if let Some(kind) = kind {
            nodes.push(NormNode {
                kind,
                handle: handle.clone(),
            });
            return;
        }
    }

    for child in handle.children.borrow().iter() {
        collect_norms(child, nodes);
    }
}

fn find_document_footnotes(handle: &Handle, result: &mut Option<Handle>) {
    if result.is_some() {
        return;
    }

    if let NodeData::Element { .. } = handle.data
        && dom::get_attribute(handle, "title").as_deref() == Some(TITLE_FOOTNOTES)
        && !dom::get_attribute(handle, "id")
            .is_some_and(|id| id.ends_with(FOOTNOTE_ID_SUFFIX))
    {
        *result = Some(handle.clone());
        return;
    }

    for child in handle.children.borrow().iter() {
        find_document_footnotes(child, result);
    }
}
