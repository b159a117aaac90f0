//! Vault assembly.
//!
//! [`assemble`] turns the ordered article stream into the final file set:
//! one Markdown file per article with YAML front matter, plus two synthetic
//! documents, a sorted table of contents and a "flowing text" document
//! embedding every article.
//!
//! Article files keep document order in [`Vault::files`]; only the synthetic
//! documents use the designator sort. Assembly is pure string work and
//! deterministic: the same input produces byte-identical output.

use log::debug;

use crate::footnote::FootnoteDefinition;
use crate::walk::Article;

/// Fallback name for titles that sanitize to nothing.
pub const DEFAULT_FILE_NAME: &str = "Unbenannt";

/// File name of the table-of-contents document.
pub const TOC_FILE_NAME: &str = "Inhaltsübersicht.md";

/// File name of the flowing-text document.
pub const FLOW_FILE_NAME: &str = "Gesetz im Fließtext.md";

/// One output file, path relative to the vault root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    pub path: String,
    pub content: String,
}

/// The assembled output tree, handed whole to the archive writer.
#[derive(Debug, Clone)]
pub struct Vault {
    pub name: String,
    pub files: Vec<VaultFile>,
}

impl Vault {
    /// Look up a file by its vault-relative path.
    pub fn file(&self, path: &str) -> Option<&VaultFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Options for one assembly run.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    pub vault_name: String,
    pub law_title: String,
    pub abbreviation: String,
    /// User link prefix, prepended to the vault name in wiki links.
    pub link_prefix: String,
    pub toc: bool,
    pub flowing_text: bool,
}

impl AssembleOptions {
    pub fn new(
        vault_name: impl Into<String>,
        law_title: impl Into<String>,
        abbreviation: impl Into<String>,
    ) -> Self {
        Self {
            vault_name: vault_name.into(),
            law_title: law_title.into(),
            abbreviation: abbreviation.into(),
            link_prefix: String::new(),
            toc: true,
            flowing_text: true,
        }
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
}

/// Assemble the output tree from the ordered article stream.
pub fn assemble(
    articles: &[Article],
    global_footnotes: Option<&str>,
    options: &AssembleOptions,
) -> Vault {
    let prefix = full_prefix(&options.link_prefix, &options.vault_name);
    let mut files = Vec::with_capacity(articles.len() + 2);
    let mut links: Vec<((u64, String), String)> = Vec::with_capacity(articles.len());

    for article in articles {
        let path = article_path(article);
        let target = format!(
            "{prefix}{}",
            path.strip_suffix(".md").unwrap_or(&path)
        );
        links.push((designator_sort_key(&article.number), target));
        files.push(VaultFile {
            path,
            content: article_content(article, &options.abbreviation),
        });
    }

    debug!("assembled {} article files", files.len());

    // Stable sort: equal designators keep document order.
    links.sort_by(|a, b| a.0.cmp(&b.0));

    if options.toc {
        let mut content = format!("# {} - Inhaltsübersicht\n", options.law_title);
        for (_, target) in &links {
            content.push_str(&format!("\n- [[{target}]]"));
        }
        files.push(VaultFile {
            path: TOC_FILE_NAME.to_string(),
            content,
        });
    }

    if options.flowing_text {
        let mut content = format!("# {} im Fließtext\n\n", options.law_title);
        if options.toc {
            content.push_str(&format!("![[{prefix}Inhaltsübersicht]]"));
        }
        content.push_str("\n\n---\n\n");
        let embeds: Vec<String> = links
            .iter()
            .map(|(_, target)| format!("![[{target}]]"))
            .collect();
        content.push_str(&embeds.join("\n\n---\n\n"));
        if let Some(footnotes) = global_footnotes {
            content.push_str("\n\n---\n\n");
            content.push_str(footnotes);
        }
        files.push(VaultFile {
            path: FLOW_FILE_NAME.to_string(),
            content,
        });
    }

    Vault {
        name: options.vault_name.clone(),
        files,
    }
}

/// The vault-relative path of an article's file.
pub fn article_path(article: &Article) -> String {
    let mut path = String::new();
    for component in article.hierarchy.components() {
        path.push_str(&sanitize_filename(component));
        path.push('/');
    }
    path.push_str(&sanitize_filename(&format!(
        "{} {}",
        article.number, article.title
    )));
    path.push_str(".md");
    path
}

fn article_content(article: &Article, abbreviation: &str) -> String {
    let mut content = front_matter(article, abbreviation);
    content.push_str(article.body.trim());
    if !article.footnotes.is_empty() {
        content.push_str("\n\n");
        content.push_str(
            &article
                .footnotes
                .iter()
                .map(FootnoteDefinition::definition_line)
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    content
}

fn front_matter(article: &Article, abbreviation: &str) -> String {
    let full_title = if article.title.is_empty() {
        article.number.clone()
    } else {
        format!("{} {}", article.number, article.title)
    };

    let mut out = String::from("---\n");
    out.push_str(&format!("title: \"{}\"\n", escape_value(&full_title)));
    out.push_str(&format!("aliases: [\"{}\"]\n", escape_value(&article.number)));
    out.push_str(&format!("gesetz: \"{}\"\n", escape_value(abbreviation)));
    // Hierarchy keys only when set; unterabschnitt is not surfaced, matching
    // the source document family's front matter.
    for (key, value) in [
        ("teil", &article.hierarchy.teil),
        ("kapitel", &article.hierarchy.kapitel),
        ("abschnitt", &article.hierarchy.abschnitt),
    ] {
        if let Some(component) = value {
            out.push_str(&format!(
                "{key}: \"{}\"\n",
                escape_value(&component.replace('-', " "))
            ));
        }
    }
    out.push_str(&format!(
        "tags: [gesetz, {}]\n",
        abbreviation.to_lowercase()
    ));
    out.push_str("---\n\n");
    out
}

fn escape_value(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Replace filesystem-unsafe characters, collapse whitespace to single
/// hyphens, and fall back to a fixed name for empty results.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' => '-',
            c => c,
        })
        .collect();
    let cleaned = replaced.split_whitespace().collect::<Vec<_>>().join("-");
    if cleaned.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

/// Sort key for a designator: leading integer, then the alphabetic suffix
/// lowercased for case-insensitive comparison.
///
/// `§ 2` < `§ 2a` < `§ 10`; designators without a number sort first, stably.
pub fn designator_sort_key(designator: &str) -> (u64, String) {
    let stripped = designator
        .trim_start_matches('§')
        .trim_start_matches("Art")
        .trim();
    let digits: String = stripped
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let number = digits.parse().unwrap_or(0);
    let suffix: String = stripped
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    (number, suffix)
}

fn full_prefix(user_prefix: &str, vault_name: &str) -> String {
    let user_prefix = user_prefix.trim();
    if user_prefix.is_empty() {
        format!("{vault_name}/")
    } else if user_prefix.ends_with('/') {
        format!("{user_prefix}{vault_name}/")
    } else {
        format!("{user_prefix}/{vault_name}/")
    }
}
