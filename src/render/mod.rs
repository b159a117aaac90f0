//! Pure HTML → Markdown rendering.
//!
//! This module turns an article's HTML body into Obsidian-flavored Markdown.
//! The design separates the configuration snapshot from the rendering
//! algorithm:
//!
//! - [`config`]: the immutable [`RenderConfig`] consumed by one render pass
//! - [`markdown`]: recursive descent over the DOM, dispatching on a closed
//!   set of node kinds
//!
//! ## Design Notes
//!
//! - **Closed dispatch**: only the tag vocabulary of the law-portal document
//!   family is recognized; unknown tags render their children transparently.
//! - **Per-render state**: footnote indices, block-marker counters, and the
//!   link-reference table live inside one render invocation and are returned
//!   with the result. Nothing is shared across articles.
//! - **Block markers**: each `jurAbsatz` block (one numbered subsection of an
//!   article) gets a `^absN` suffix so notes can deep-link into a specific
//!   statutory paragraph.

pub mod config;
pub mod markdown;

pub use config::{FootnoteMode, ImageMode, RenderConfig};
pub use markdown::{render, LinkReferenceTable, Rendered};
