use lawvault::{convert, ConvertOptions, Error, RenderConfig, Statute};

fn hierarchy(main: &str, sub: &str) -> String {
    format!(
        r#"<div class="jnnorm" title="Gliederung"><h2><span>{main}</span> <span>{sub}</span></h2></div>"#
    )
}

fn article(id: &str, designator: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div class="jnnorm" title="Einzelnorm" id="{id}">
            <h3><span class="jnenbez">{designator}</span> <span class="jnentitel">{title}</span></h3>
            <div class="jnhtml">{body}</div>
        </div>"#
    )
}

fn statute(norms: &str) -> Statute {
    Statute::parse(&format!(
        r#"<html><head><title>Test</title></head><body>
        <h1><span class="jnlangue">Testgesetz</span> <span class="jnamtabk">(TestG)</span></h1>
        {norms}
        </body></html>"#
    ))
}

#[test]
fn test_hierarchy_path_and_front_matter() {
    // One hierarchy header followed by one article lands the file under the
    // header's folder with the header in the front matter.
    let doc = statute(&format!(
        "{}{}",
        hierarchy("Teil 1", ""),
        article("n1", "§ 1", "Zweck", r#"<div class="jurAbsatz">Hello</div>"#)
    ));
    let vault = convert(&doc, &ConvertOptions::default()).expect("conversion failed");

    assert_eq!(vault.name, "TestG");
    let file = vault.file("Teil-1/§-1-Zweck.md").expect("article file missing");
    assert!(file.content.contains("title: \"§ 1 Zweck\""));
    assert!(file.content.contains("aliases: [\"§ 1\"]"));
    assert!(file.content.contains("gesetz: \"TestG\""));
    assert!(file.content.contains("teil: \"Teil 1\""));
    assert!(file.content.contains("tags: [gesetz, testg]"));
    assert!(file.content.contains("Hello"));
}

#[test]
fn test_repeated_external_links_share_one_reference() {
    let body = r#"<div class="jurAbsatz">
        <a href="https://example.org/norm">erste</a> und
        <a href="https://example.org/norm">zweite</a>
    </div>"#;
    let doc = statute(&article("n1", "§ 1", "Links", body));
    let vault = convert(&doc, &ConvertOptions::default()).unwrap();

    let file = vault.file("§-1-Links.md").unwrap();
    assert!(file.content.contains("[erste][ref1]"));
    assert!(file.content.contains("[zweite][ref1]"));
    assert_eq!(file.content.matches("[ref1]: https://example.org/norm").count(), 1);
    assert!(!file.content.contains("ref2"));
}

#[test]
fn test_whitespace_only_article_excluded() {
    let doc = statute(&format!(
        "{}{}",
        article("n1", "§ 1", "Inhalt", r#"<div class="jurAbsatz">Text</div>"#),
        article("n2", "§ 2", "Leer", r#"<div class="jurAbsatz">   </div>"#)
    ));
    let vault = convert(&doc, &ConvertOptions::default()).unwrap();

    assert!(vault.file("§-1-Inhalt.md").is_some());
    assert!(vault.file("§-2-Leer.md").is_none());

    let toc = vault.file("Inhaltsübersicht.md").unwrap();
    assert!(toc.content.contains("§-1-Inhalt"));
    assert!(!toc.content.contains("§-2-Leer"));
}

#[test]
fn test_toc_orders_lettered_designators_numerically() {
    let doc = statute(&format!(
        "{}{}{}",
        article("n2", "§ 2", "", r#"<div class="jurAbsatz">a</div>"#),
        article("n10", "§ 10", "", r#"<div class="jurAbsatz">b</div>"#),
        article("n2a", "§ 2a", "", r#"<div class="jurAbsatz">c</div>"#)
    ));
    let vault = convert(&doc, &ConvertOptions::default()).unwrap();

    let toc = &vault.file("Inhaltsübersicht.md").unwrap().content;
    let pos_2 = toc.find("[[TestG/§-2]]").unwrap();
    let pos_2a = toc.find("[[TestG/§-2a]]").unwrap();
    let pos_10 = toc.find("[[TestG/§-10]]").unwrap();
    assert!(pos_2 < pos_2a);
    assert!(pos_2a < pos_10);
}

#[test]
fn test_footnote_reference_and_definition_share_index() {
    let norms = format!(
        "{}{}",
        article(
            "n5",
            "§ 5",
            "Verweis",
            r#"<div class="jurAbsatz">Siehe unten<sup>1</sup></div>"#
        ),
        r#"<div class="jnnorm" title="Fussnoten" id="n5_FNS">
            <div class="jnhtml"><div class="jurAbsatz">Geändert durch Art. 3</div></div>
        </div>"#
    );
    let doc = statute(&norms);
    let vault = convert(&doc, &ConvertOptions::default()).unwrap();

    let file = vault.file("§-5-Verweis.md").unwrap();
    assert!(file.content.contains("Siehe unten[^1]"));
    assert!(file.content.contains("[^1]: Geändert durch Art. 3"));
}

#[test]
fn test_flowing_text_embeds_articles_and_global_footnotes() {
    let norms = format!(
        "{}{}",
        article("n1", "§ 1", "", r#"<div class="jurAbsatz">Text</div>"#),
        r#"<div class="jnnorm" title="Fussnoten" id="stand">
            <div class="jnhtml">Stand: 1. Januar 2024</div>
        </div>"#
    );
    let doc = statute(&norms);
    let vault = convert(&doc, &ConvertOptions::default()).unwrap();

    let flow = &vault.file("Gesetz im Fließtext.md").unwrap().content;
    assert!(flow.starts_with("# Testgesetz im Fließtext"));
    assert!(flow.contains("![[TestG/Inhaltsübersicht]]"));
    assert!(flow.contains("![[TestG/§-1]]"));
    assert!(flow.ends_with("Stand: 1. Januar 2024"));
}

#[test]
fn test_synthetic_documents_can_be_disabled() {
    let doc = statute(&article("n1", "§ 1", "", r#"<div class="jurAbsatz">x</div>"#));
    let options = ConvertOptions::default()
        .with_toc(false)
        .with_flowing_text(false);
    let vault = convert(&doc, &options).unwrap();

    assert!(vault.file("Inhaltsübersicht.md").is_none());
    assert!(vault.file("Gesetz im Fließtext.md").is_none());
    assert_eq!(vault.files.len(), 1);
}

#[test]
fn test_link_prefix_applied_to_wiki_links() {
    let doc = statute(&article("n1", "§ 1", "", r#"<div class="jurAbsatz">x</div>"#));
    let options = ConvertOptions::default().with_link_prefix("Recht");
    let vault = convert(&doc, &options).unwrap();

    let toc = &vault.file("Inhaltsübersicht.md").unwrap().content;
    assert!(toc.contains("[[Recht/TestG/§-1]]"));
}

#[test]
fn test_heading_offset_applied_to_article_bodies() {
    let body = r#"<div class="jurAbsatz"><h1>Binnenüberschrift</h1>Text</div>"#;
    let doc = statute(&article("n1", "§ 1", "", body));
    let options =
        ConvertOptions::default().with_render(RenderConfig::new().with_heading_offset(2));
    let vault = convert(&doc, &options).unwrap();

    assert!(vault.files[0].content.contains("### Binnenüberschrift"));
}

#[test]
fn test_art_designators_accepted() {
    let doc = statute(&article("a3", "Art 3", "Gleichheit", r#"<div class="jurAbsatz">x</div>"#));
    let vault = convert(&doc, &ConvertOptions::default()).unwrap();
    assert!(vault.file("Art-3-Gleichheit.md").is_some());
}

#[test]
fn test_document_without_articles_fails_as_a_run() {
    let doc = statute("<p>kein Inhalt</p>");
    let result = convert(&doc, &ConvertOptions::default());
    assert!(matches!(result, Err(Error::InvalidDocument(_))));
}

#[test]
fn test_missing_metadata_falls_back() {
    let doc = Statute::parse(&format!(
        "<html><body>{}</body></html>",
        article("n1", "§ 1", "", r#"<div class="jurAbsatz">x</div>"#)
    ));
    let vault = convert(&doc, &ConvertOptions::default()).unwrap();

    assert_eq!(vault.name, "Gesetz");
    let toc = &vault.file("Inhaltsübersicht.md").unwrap().content;
    assert!(toc.starts_with("# Gesetz - Inhaltsübersicht"));
}

#[test]
fn test_conversion_is_deterministic() {
    let norms = format!(
        "{}{}{}",
        hierarchy("Teil 1", "Allgemeines"),
        article("n1", "§ 1", "Zweck", r#"<div class="jurAbsatz">eins</div>"#),
        article("n2", "§ 2", "Begriffe", r#"<div class="jurAbsatz">zwei</div>"#)
    );
    let doc = statute(&norms);
    let first = convert(&doc, &ConvertOptions::default()).unwrap();
    let second = convert(&doc, &ConvertOptions::default()).unwrap();
    assert_eq!(first.files, second.files);
}
