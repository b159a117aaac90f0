//! lawvault - statute HTML to Markdown vault converter

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use lawvault::{
    convert_bytes, write_vault_zip, ConvertOptions, FootnoteMode, ImageMode, RenderConfig, Statute,
};

#[derive(Parser)]
#[command(name = "lawvault")]
#[command(version, about = "Convert statute HTML into a Markdown note vault", long_about = None)]
#[command(after_help = "EXAMPLES:
    lawvault stgb.html StGB.zip     Convert a statute export
    lawvault -i stgb.html           Show document structure
    lawvault -i --json stgb.html    Structure as JSON")]
struct Cli {
    /// Input file (HTML export from gesetze-im-internet.de)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output zip archive (defaults to <vault name>.zip)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Show document structure without converting
    #[arg(short, long)]
    info: bool,

    /// Print the structure summary as JSON
    #[arg(long, requires = "info")]
    json: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Vault folder name (defaults to the statute's abbreviation)
    #[arg(long, value_name = "NAME")]
    vault_name: Option<String>,

    /// Law title override for the generated documents
    #[arg(long, value_name = "NAME")]
    law_name: Option<String>,

    /// Link prefix for wiki links, e.g. a vault subfolder
    #[arg(long, value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Skip the table-of-contents document
    #[arg(long)]
    no_toc: bool,

    /// Skip the flowing-text document
    #[arg(long)]
    no_flow: bool,

    /// Offset added to heading levels (result clamped to 1..=6)
    #[arg(long, value_name = "N", default_value_t = 0, allow_hyphen_values = true)]
    heading_offset: i32,

    /// Drop superscripts that resolve to no footnote
    #[arg(long)]
    strip_footnotes: bool,

    /// Drop images instead of emitting image references
    #[arg(long)]
    no_images: bool,

    /// Emit external links inline instead of reference-style
    #[arg(long)]
    inline_links: bool,

    /// Drop this tag's entire subtree (repeatable)
    #[arg(long, value_name = "TAG")]
    strip_tag: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        })
        .init();

    let result = if cli.info {
        show_info(&cli)
    } else {
        convert(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn show_info(cli: &Cli) -> Result<(), String> {
    let bytes = std::fs::read(&cli.input).map_err(|e| e.to_string())?;
    let statute = Statute::from_bytes(&bytes);
    let summary = statute.summary();

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    println!("File: {}", cli.input);
    println!("Title: {}", summary.title.as_deref().unwrap_or("unknown"));
    println!(
        "Abbreviation: {}",
        summary.abbreviation.as_deref().unwrap_or("unknown")
    );
    println!("Articles: {}", summary.article_count);
    println!("Hierarchy headings: {}", summary.heading_count);
    println!(
        "Convertible: {}",
        if summary.convertible { "yes" } else { "no" }
    );

    Ok(())
}

fn convert(cli: &Cli) -> Result<(), String> {
    let bytes = std::fs::read(&cli.input).map_err(|e| e.to_string())?;

    let mut render = RenderConfig::new().with_heading_offset(cli.heading_offset);
    if cli.strip_footnotes {
        render = render.with_footnotes(FootnoteMode::Strip);
    }
    if cli.no_images {
        render = render.with_images(ImageMode::Remove);
    }
    if cli.inline_links {
        render = render.with_reference_links(false);
    }
    for tag in &cli.strip_tag {
        render = render.with_stripped_tag(tag.clone());
    }

    let mut options = ConvertOptions::new()
        .with_link_prefix(cli.prefix.clone())
        .with_toc(!cli.no_toc)
        .with_flowing_text(!cli.no_flow)
        .with_render(render);
    if let Some(name) = &cli.vault_name {
        options = options.with_vault_name(name.clone());
    }
    if let Some(name) = &cli.law_name {
        options = options.with_law_name(name.clone());
    }

    let vault = convert_bytes(&bytes, &options).map_err(|e| e.to_string())?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| format!("{}.zip", vault.name));
    write_vault_zip(&vault, &output).map_err(|e| e.to_string())?;

    if !cli.quiet {
        println!("{} files -> {output}", vault.files.len());
    }

    Ok(())
}
