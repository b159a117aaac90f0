//! Benchmarks for the statute conversion pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write as _;
use std::io::Cursor;

use criterion::{Criterion, criterion_group, criterion_main};

use lawvault::{convert, write_vault_zip_to_writer, ConvertOptions, RenderConfig, Statute};

/// Build a synthetic statute document with the given number of articles.
///
/// Shape matches a gesetze-im-internet export: hierarchy headers every ten
/// articles, paragraph-marker blocks, footnote containers, and the odd table
/// and external link.
fn sample_statute(articles: usize) -> String {
    let mut html = String::from(
        r#"<html><head><title>Testgesetz</title></head><body>
        <h1><span class="jnlangue">Testgesetz</span> <span class="jnamtabk">(TestG)</span></h1>"#,
    );

    for n in 1..=articles {
        if n % 10 == 1 {
            write!(
                html,
                r#"<div class="jnnorm" title="Gliederung"><h2><span>Abschnitt {}</span> <span>Gegenstand</span></h2></div>"#,
                n / 10 + 1
            )
            .unwrap();
        }
        write!(
            html,
            r#"<div class="jnnorm" title="Einzelnorm" id="n{n}">
                <h3><span class="jnenbez">§ {n}</span> <span class="jnentitel">Regelung {n}</span></h3>
                <div class="jnhtml">
                    <div class="jurAbsatz">(1) Wer gegen diese Vorschrift verstößt<sup>1</sup>,
                        handelt ordnungswidrig im Sinne des
                        <a href="https://www.gesetze-im-internet.de/owig">OWiG</a>.</div>
                    <div class="jurAbsatz">(2) Die zuständige Behörde kann Ausnahmen zulassen.
                        <table><tr><th>Fall</th><th>Frist</th></tr>
                        <tr><td>Regelfall</td><td>zwei Wochen</td></tr></table></div>
                </div>
            </div>
            <div class="jnnorm" title="Fussnoten" id="n{n}_FNS">
                <div class="jnhtml"><div class="jurAbsatz">Geändert durch Art. 3 G v. 1.1.2024</div></div>
            </div>"#
        )
        .unwrap();
    }

    html.push_str("</body></html>");
    html
}

// ============================================================================
// Parsing Benchmarks
// ============================================================================

fn bench_parse_statute(c: &mut Criterion) {
    let html = sample_statute(100);

    c.bench_function("parse_statute", |b| {
        b.iter(|| Statute::parse(&html));
    });
}

fn bench_decode_and_parse(c: &mut Criterion) {
    let bytes = sample_statute(100).into_bytes();

    c.bench_function("decode_and_parse", |b| {
        b.iter(|| Statute::from_bytes(&bytes));
    });
}

// ============================================================================
// Conversion Benchmarks
// ============================================================================

fn bench_convert(c: &mut Criterion) {
    let statute = Statute::parse(&sample_statute(100));
    let options = ConvertOptions::default();

    c.bench_function("convert", |b| {
        b.iter(|| convert(&statute, &options).unwrap());
    });
}

fn bench_convert_stripped(c: &mut Criterion) {
    let statute = Statute::parse(&sample_statute(100));
    let options = ConvertOptions::default().with_render(
        RenderConfig::new()
            .with_block_markers(false)
            .with_reference_links(false),
    );

    c.bench_function("convert_stripped", |b| {
        b.iter(|| convert(&statute, &options).unwrap());
    });
}

// ============================================================================
// Archive Benchmarks
// ============================================================================

fn bench_write_zip(c: &mut Criterion) {
    let statute = Statute::parse(&sample_statute(100));
    let vault = convert(&statute, &ConvertOptions::default()).unwrap();

    c.bench_function("write_zip", |b| {
        b.iter(|| {
            let mut output = Cursor::new(Vec::new());
            write_vault_zip_to_writer(&vault, &mut output).unwrap();
        });
    });
}

criterion_group!(
    benches,
    // Parsing
    bench_parse_statute,
    bench_decode_and_parse,
    // Conversion
    bench_convert,
    bench_convert_stripped,
    // Archive
    bench_write_zip,
);
criterion_main!(benches);
