//! Tree view snapshots

use std::collections::HashMap;
use usfm_babel::formats::treeviz::{to_treeviz_str, to_treeviz_str_with_params};
use usfm_babel::{parse, FormatRegistry, ParseOptions};

#[test]
fn test_treeviz_aligned_verse() {
    let source = "\\id TIT\n\\c 1\n\\p\n\\v 1 \\zaln-s |x-strong=\"G39720\"\\*\\w Paul\\w*\\zaln-e\\*, a servant\n";
    let doc = parse(source, &ParseOptions::default());

    insta::assert_snapshot!(to_treeviz_str(&doc).trim_end(), @r"
    ⧉ Document (1 headers, 1 chapters)
    ├─ ☰ Headers
    │ └─ ¶ \id TIT
    └─ § Chapter 1
      ├─ ⊤ front
      │ └─ ¶ \p
      └─ ℣ Verse 1
        ├─ ⊕ \zaln
        │ └─ 𝑤 Paul
        └─ ◦ , a servant
    ");
}

#[test]
fn test_treeviz_shows_attributes() {
    let source =
        "\\c 1\n\\v 1 \\zaln-s |x-strong=\"G39720\"\\*\\w Paul|x-occurrence=\"1\"\\w*\\zaln-e\\*\n";
    let doc = parse(source, &ParseOptions::default());

    let mut params = HashMap::new();
    params.insert("show-attributes".to_string(), "true".to_string());
    let output = to_treeviz_str_with_params(&doc, &params).unwrap();

    insta::assert_snapshot!(output.trim_end(), @r"
    ⧉ Document (0 headers, 1 chapters)
    └─ § Chapter 1
      └─ ℣ Verse 1
        ├─ ⊕ \zaln
        │ ├─ = x-strong=G39720
        │ └─ 𝑤 Paul
        │   └─ = x-occurrence=1
        └─ ◦ ⏎
    ");
}

#[test]
fn test_treeviz_footnote_and_fragment() {
    let source = "\\v 1 grace\\f + \\ft Or favor\\f* and peace\n\\v 2 \\nd Lord\\nd*\n";
    let doc = parse(source, &ParseOptions::chunk());

    insta::assert_snapshot!(to_treeviz_str(&doc).trim_end(), @r"
    ⧉ Document (0 headers, 0 chapters)
    ├─ ℣ Verse 1
    │ ├─ ◦ grace
    │ ├─ ³ \f + \ft Or favor
    │ └─ ◦ and peace
    └─ ℣ Verse 2
      └─ ¶ \nd Lord
    ");
}

#[test]
fn test_treeviz_character_style_children() {
    let source = "\\v 1 \\wj \\w Jesus\\w* said\\wj* amen\n";
    let doc = parse(source, &ParseOptions::chunk());

    insta::assert_snapshot!(to_treeviz_str(&doc).trim_end(), @r"
    ⧉ Document (0 headers, 0 chapters)
    └─ ℣ Verse 1
      ├─ ¶ \wj
      │ ├─ 𝑤 Jesus
      │ └─ ◦ said
      └─ ◦ amen
    ");
}

#[test]
fn test_treeviz_through_registry() {
    let registry = FormatRegistry::default();
    let doc = registry.parse("\\c 2\n\\v 1 text\n", "usfm").unwrap();
    let output = registry.serialize(&doc, "treeviz").unwrap();
    assert!(output.starts_with("⧉ Document (0 headers, 1 chapters)\n"));
    assert!(output.contains("§ Chapter 2"));
    assert!(output.contains("℣ Verse 1"));
}
