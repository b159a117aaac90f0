//! Recursive DOM → Markdown rendering.
//!
//! [`render`] walks an article body's subtree and emits Markdown under the
//! rules of a [`RenderConfig`]. Dispatch is a closed match over [`NodeKind`];
//! tags outside the law-portal vocabulary fall into [`NodeKind::Transparent`]
//! and render their children with no markup added.

use markup5ever_rcdom::{Handle, NodeData};

use crate::dom;

use super::config::{FootnoteMode, ImageMode, RenderConfig};

/// Class marking one numbered subsection block within an article body.
const MARKER_CLASS: &str = "jurAbsatz";

/// Result of rendering one subtree.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The rendered Markdown content.
    pub markdown: String,
    /// External URLs collected for reference-style links.
    pub link_refs: LinkReferenceTable,
}

/// Per-render mapping from external URL to reference id.
///
/// The first occurrence of a URL gets the next sequential id (`ref1`,
/// `ref2`, ...); repeats reuse the existing id. Scoped to a single render
/// pass, never shared across articles.
#[derive(Debug, Clone, Default)]
pub struct LinkReferenceTable {
    entries: Vec<(String, String)>,
}

impl LinkReferenceTable {
    /// Get the reference id for a URL, assigning the next `refN` on first sight.
    pub fn reference(&mut self, url: &str) -> String {
        if let Some((id, _)) = self.entries.iter().find(|(_, existing)| existing == url) {
            return id.clone();
        }
        let id = format!("ref{}", self.entries.len() + 1);
        self.entries.push((id.clone(), url.to_string()));
        id
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The `[refN]: url` definition block, one line per URL in id order.
    pub fn definitions(&self) -> String {
        self.entries
            .iter()
            .map(|(id, url)| format!("[{id}]: {url}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, url)| (id.as_str(), url.as_str()))
    }
}

/// Node kinds recognized by this document family.
///
/// Anything else is [`NodeKind::Transparent`]: unknown tags pass their
/// children through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Heading(u8),
    Superscript,
    Image,
    Link,
    DefinitionList,
    Table,
    MarkerBlock,
    Transparent,
}

fn classify(tag: &str, handle: &Handle) -> NodeKind {
    if let Some(level) = heading_level(tag) {
        return NodeKind::Heading(level);
    }
    match tag {
        "sup" => NodeKind::Superscript,
        "img" => NodeKind::Image,
        "a" => NodeKind::Link,
        "dl" => NodeKind::DefinitionList,
        "table" => NodeKind::Table,
        "div" | "p" if dom::has_class(handle, MARKER_CLASS) => NodeKind::MarkerBlock,
        _ => NodeKind::Transparent,
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Render a subtree to Markdown.
///
/// `known_footnotes` holds the footnote indices that exist for the article
/// being rendered; a `<sup>` whose numeric text matches one becomes an
/// Obsidian footnote reference `[^N]`.
///
/// If the subtree contains paragraph-marker blocks, each block is rendered
/// independently, empty results are dropped, and the remainder is joined
/// with horizontal rules. Otherwise the whole subtree renders as one block.
pub fn render(handle: &Handle, config: &RenderConfig, known_footnotes: &[usize]) -> Rendered {
    let mut renderer = Renderer {
        config,
        known_footnotes,
        links: LinkReferenceTable::default(),
        marker_counter: 0,
    };
    let markdown = renderer.render_root(handle);
    Rendered {
        markdown,
        link_refs: renderer.links,
    }
}

/// State for one render pass (counters and link table, nothing global).
struct Renderer<'a> {
    config: &'a RenderConfig,
    known_footnotes: &'a [usize],
    links: LinkReferenceTable,
    marker_counter: usize,
}

impl Renderer<'_> {
    fn render_root(&mut self, handle: &Handle) -> String {
        let blocks = marker_blocks(handle);
        let raw = if blocks.is_empty() {
            self.render_children(handle)
        } else {
            let mut parts = Vec::new();
            for block in &blocks {
                let part = self.render_marker_block(block);
                if !part.is_empty() {
                    parts.push(part);
                }
            }
            parts.join("\n\n---\n\n")
        };
        collapse_blank_lines(&raw).trim().to_string()
    }

    fn render_node(&mut self, handle: &Handle) -> String {
        match &handle.data {
            NodeData::Text { contents } => collapse_whitespace(&contents.borrow()),
            NodeData::Element { name, .. } => {
                let tag = name.local.as_ref();
                if self.config.strip_tags.contains(tag) {
                    return String::new();
                }
                match classify(tag, handle) {
                    NodeKind::Heading(level) => self.render_heading(level, handle),
                    NodeKind::Superscript => self.render_superscript(handle),
                    NodeKind::Image => self.render_image(handle),
                    NodeKind::Link => self.render_link(handle),
                    NodeKind::DefinitionList => self.render_definition_list(handle),
                    NodeKind::Table => render_table(handle),
                    NodeKind::MarkerBlock => self.render_marker_block(handle),
                    NodeKind::Transparent => self.render_children(handle),
                }
            }
            NodeData::Document => self.render_children(handle),
            _ => String::new(),
        }
    }

    fn render_children(&mut self, handle: &Handle) -> String {
        let mut out = String::new();
        for child in handle.children.borrow().iter() {
            out.push_str(&self.render_node(child));
        }
        out
    }

    fn render_heading(&mut self, level: u8, handle: &Handle) -> String {
        let depth = (level as i32 + self.config.heading_offset).clamp(1, 6) as usize;
        let content = self.render_children(handle);
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n{} {}\n\n", "#".repeat(depth), content)
    }

    fn render_superscript(&mut self, handle: &Handle) -> String {
        let text = collapse_whitespace(&dom::text_content(handle));
        let text = text.trim();

        if let Ok(index) = text.parse::<usize>()
            && self.known_footnotes.contains(&index)
        {
            return format!("[^{index}]");
        }

        match self.config.footnotes {
            FootnoteMode::Strip => String::new(),
            FootnoteMode::Inline => format!("<sup>{text}</sup>"),
        }
    }

    fn render_image(&mut self, handle: &Handle) -> String {
        match self.config.images {
            ImageMode::Remove => String::new(),
            ImageMode::Keep => {
                let alt = dom::get_attribute(handle, "alt").unwrap_or_default();
                let src = dom::get_attribute(handle, "src").unwrap_or_default();
                format!("![{alt}]({src})")
            }
        }
    }

    fn render_link(&mut self, handle: &Handle) -> String {
        // Children first, so nested formatting inside the link text survives.
        let text = self.render_children(handle);
        let text = text.trim();

        let href = dom::get_attribute(handle, "href").filter(|h| !h.trim().is_empty());
        let Some(href) = href else {
            return text.to_string();
        };

        if self.config.reference_links && is_external(&href) {
            let id = self.links.reference(&href);
            format!("[{text}][{id}]")
        } else {
            format!("[{text}]({href})")
        }
    }

    fn render_definition_list(&mut self, handle: &Handle) -> String {
        let mut out = String::new();
        let mut term = String::new();

        // Each dd pairs with the most recent dt. A trailing dt without a dd
        // is dropped.
        for child in dom::child_elements(handle) {
            match dom::element_name(&child).as_deref() {
                Some("dt") => {
                    term = collapse_whitespace(&dom::text_content(&child))
                        .trim()
                        .to_string();
                }
                Some("dd") => {
                    let definition = self.render_children(&child);
                    out.push_str(&format!("\n- {} {}", term, definition.trim()));
                }
                _ => {}
            }
        }

        out
    }

    fn render_marker_block(&mut self, handle: &Handle) -> String {
        let content = self.render_children(handle);
        let mut content = content.trim().to_string();
        if self.config.add_block_markers && !content.is_empty() {
            self.marker_counter += 1;
            content.push_str(&format!(" ^abs{}", self.marker_counter));
        }
        content
    }
}

fn render_table(handle: &Handle) -> String {
    let mut out = String::from("\n");

    for (row_index, row) in dom::find_elements_by_name(handle, "tr").iter().enumerate() {
        let cells = table_cells(row);
        let texts: Vec<String> = cells
            .iter()
            .map(|cell| {
                collapse_whitespace(&dom::text_content(cell))
                    .trim()
                    .replace('|', "\\|")
            })
            .collect();
        out.push_str(&format!("| {} |\n", texts.join(" | ")));

        // The separator row mirrors the first row's cell count, whether that
        // row used th or td cells.
        if row_index == 0 {
            out.push('|');
            out.push_str(&" --- |".repeat(cells.len()));
            out.push('\n');
        }
    }

    out.push('\n');
    out
}

fn table_cells(row: &Handle) -> Vec<Handle> {
    let mut cells = Vec::new();
    collect_cells(row, &mut cells);
    cells
}

fn collect_cells(handle: &Handle, cells: &mut Vec<Handle>) {
    if dom::is_element(handle, "th") || dom::is_element(handle, "td") {
        cells.push(handle.clone());
        return;
    }
    for child in handle.children.borrow().iter() {
        collect_cells(child, cells);
    }
}

/// Collect the outermost paragraph-marker blocks under a subtree.
fn marker_blocks(handle: &Handle) -> Vec<Handle> {
    let mut blocks = Vec::new();
    collect_marker_blocks(handle, &mut blocks);
    blocks
}

fn collect_marker_blocks(handle: &Handle, blocks: &mut Vec<Handle>) {
    if is_marker_block(handle) {
        blocks.push(handle.clone());
        return;
    }
    for child in handle.children.borrow().iter() {
        collect_marker_blocks(child, blocks);
    }
}

fn is_marker_block(handle: &Handle) -> bool {
    matches!(
        dom::element_name(handle).as_deref(),
        Some("div") | Some("p")
    ) && dom::has_class(handle, MARKER_CLASS)
}

fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// Collapse whitespace runs (including NBSP) to a single space.
fn collapse_whitespace(text: &str) -> String {
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
    out
}

/// Collapse runs of blank lines to exactly one blank line, normalizing
/// whitespace at line edges.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        out.push_str(line);
        blank_run = 0;
    }
    out
}
