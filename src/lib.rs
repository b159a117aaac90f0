//! # lawvault
//!
//! Convert a statute HTML export from gesetze-im-internet.de into a
//! hierarchical collection of Markdown notes for an Obsidian-style vault,
//! packaged as a zip archive.
//!
//! ## Pipeline
//!
//! - [`Statute`] parses the document and exposes its structural conventions
//! - [`walk`] drives a single pass over the structure, rendering each
//!   article's HTML body to Markdown under a [`RenderConfig`]
//! - [`assemble`] builds the deterministic file tree: per-article notes with
//!   front matter, a sorted table of contents, and a flowing-text document
//! - [`write_vault_zip`] packages the tree
//!
//! ## Quick Start
//!
//! ```no_run
//! use lawvault::{convert_bytes, write_vault_zip, ConvertOptions};
//!
//! let html = std::fs::read("stgb.html").unwrap();
//! let vault = convert_bytes(&html, &ConvertOptions::default()).unwrap();
//! write_vault_zip(&vault, "StGB.zip").unwrap();
//! ```
//!
//! ## Configuration
//!
//! Rendering and output selection are immutable snapshots per run:
//!
//! ```
//! use lawvault::{ConvertOptions, FootnoteMode, RenderConfig};
//!
//! let options = ConvertOptions::default()
//!     .with_vault_name("StGB")
//!     .with_link_prefix("Recht")
//!     .with_render(
//!         RenderConfig::new()
//!             .with_heading_offset(1)
//!             .with_footnotes(FootnoteMode::Strip),
//!     );
//! ```

pub mod archive;
pub mod assemble;
pub mod document;
pub mod dom;
pub mod error;
pub mod footnote;
pub mod render;
pub mod walk;

pub use archive::{write_vault_zip, write_vault_zip_to_writer};
pub use assemble::{assemble, AssembleOptions, Vault, VaultFile};
pub use document::{Statute, Summary};
pub use error::{Error, Result};
pub use footnote::FootnoteDefinition;
pub use render::{FootnoteMode, ImageMode, RenderConfig};
pub use walk::{walk, Article, Hierarchy, Level};

use document::DEFAULT_LAW_NAME;
use log::info;

/// Options for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Vault folder name; defaults to the sanitized abbreviation.
    pub vault_name: Option<String>,
    /// Law title override for the synthetic documents.
    pub law_name: Option<String>,
    /// Link prefix prepended to wiki links.
    pub link_prefix: String,
    /// Emit the table-of-contents document.
    pub toc: bool,
    /// Emit the flowing-text document.
    pub flowing_text: bool,
    /// Rendering rule set.
    pub render: RenderConfig,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            vault_name: None,
            law_name: None,
            link_prefix: String::new(),
            toc: true,
            flowing_text: true,
            render: RenderConfig::default(),
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vault_name(mut self, name: impl Into<String>) -> Self {
        self.vault_name = Some(name.into());
        self
    }

    pub fn with_law_name(mut self, name: impl Into<String>) -> Self {
        self.law_name = Some(name.into());
        self
    }

    pub fn with_link_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.link_prefix = prefix.into();
        self
    }

    pub fn with_toc(mut self, enabled: bool) -> Self {
        self.toc = enabled;
        self
    }

    pub fn with_flowing_text(mut self, enabled: bool) -> Self {
        self.flowing_text = enabled;
        self
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}

/// Convert a parsed statute into a [`Vault`].
///
/// Per-field anomalies (missing title, abbreviation, or article titles) are
/// absorbed with fallbacks. A document yielding no convertible article at
/// all is a run-level failure: no partial output is produced.
pub fn convert(statute: &Statute, options: &ConvertOptions) -> Result<Vault> {
    let abbreviation = statute
        .abbreviation()
        .unwrap_or_else(|| DEFAULT_LAW_NAME.to_string());
    let law_title = options
        .law_name
        .clone()
        .or_else(|| statute.title())
        .unwrap_or_else(|| DEFAULT_LAW_NAME.to_string());
    let vault_name = assemble::sanitize_filename(
        options.vault_name.as_deref().unwrap_or(&abbreviation),
    );

    info!("converting {law_title} ({abbreviation})");

    let articles = walk::walk(statute, &options.render);
    if articles.is_empty() {
        return Err(Error::InvalidDocument(
            "no convertible articles found".to_string(),
        ));
    }

    let global_footnotes = footnote::document_footnotes(statute, &options.render);

    let assemble_options = AssembleOptions::new(vault_name, law_title, abbreviation)
        .with_link_prefix(options.link_prefix.clone())
        .with_toc(options.toc)
        .with_flowing_text(options.flowing_text);
    let vault = assemble::assemble(&articles, global_footnotes.as_deref(), &assemble_options);

    info!(
        "assembled {} files into vault {}",
        vault.files.len(),
        vault.name
    );
    Ok(vault)
}

/// Decode raw document bytes, parse, and convert in one step.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<Vault> {
    let statute = Statute::from_bytes(bytes);
    convert(&statute, options)
}
