//! Parsing behavior on small, targeted inputs

use usfm_babel::ast::{MarkerKind, VerseObject, Word};
use usfm_babel::{parse, serialize, Document, ParseOptions, SerializeOptions};

fn parse_default(source: &str) -> Document {
    parse(source, &ParseOptions::default())
}

fn verse_count(doc: &Document, chapter: &str) -> usize {
    doc.chapter(chapter)
        .map(|verses| verses.keys().filter(|id| !id.is_front()).count())
        .unwrap_or(0)
}

#[test]
fn test_fragment_mode_attaches_newlines() {
    let doc = parse("\\v 1 Hello\n\\v 2 World", &ParseOptions::chunk());

    assert_eq!(
        doc.fragment_verse("1").unwrap().verse_objects,
        vec![VerseObject::text("Hello\n")]
    );
    assert_eq!(
        doc.fragment_verse("2").unwrap().verse_objects,
        vec![VerseObject::text("World")]
    );
}

#[test]
fn test_word_alias_is_canonical() {
    let doc = parse_default(
        "\\w Παῦλος|lemma=\"Παῦλος\" strongs=\"G39720\" morph=\"Gr,N,,,,,NMS,\"\\w*",
    );

    let VerseObject::Word(word) = &doc.headers[0] else {
        panic!("Expected word, got {:?}", doc.headers);
    };
    assert_eq!(word.text, "Παῦλος");
    assert_eq!(word.attributes.lemma().as_deref(), Some("Παῦλος"));
    assert_eq!(word.attributes.strong().as_deref(), Some("G39720"));
    assert_eq!(word.attributes.morph().as_deref(), Some("Gr,N,,,,,NMS,"));
    assert!(word.attributes.get("strongs").is_none());
}

#[test]
fn test_milestone_wraps_word() {
    let doc = parse_default("\\zaln-s | x-strong=\"G39720\"\\*\\w word\\w*\\zaln-e\\*");

    let VerseObject::Milestone(milestone) = &doc.headers[0] else {
        panic!("Expected milestone, got {:?}", doc.headers);
    };
    assert_eq!(milestone.tag, "zaln");
    assert_eq!(milestone.attributes.strong().as_deref(), Some("G39720"));
    assert_eq!(milestone.children, vec![VerseObject::Word(Word::new("word"))]);
    assert_eq!(milestone.end_tag.as_deref(), Some("zaln-e\\*"));
}

#[test]
fn test_milestone_wraps_bare_text() {
    let doc = parse_default("\\zaln-s | x-strong=\"G39720\"\\*word\\zaln-e\\*");

    let VerseObject::Milestone(milestone) = &doc.headers[0] else {
        panic!("Expected milestone");
    };
    assert_eq!(milestone.children, vec![VerseObject::text("word")]);
}

#[test]
fn test_footnote_closes_at_its_end_marker() {
    let doc = parse_default("\\f + \\ft text\\f*\\p");

    assert_eq!(doc.headers.len(), 2);
    let VerseObject::Marker(footnote) = &doc.headers[0] else {
        panic!("Expected footnote");
    };
    assert_eq!(footnote.kind, Some(MarkerKind::Footnote));
    assert_eq!(footnote.end_tag.as_deref(), Some("f*"));
    assert!(!footnote.content.as_deref().unwrap_or_default().contains("\\p"));

    let VerseObject::Marker(paragraph) = &doc.headers[1] else {
        panic!("Expected paragraph");
    };
    assert_eq!(paragraph.tag, "p");
    assert_eq!(paragraph.kind, Some(MarkerKind::Paragraph));
}

#[test]
fn test_numberless_chapter_is_literal_text() {
    let source = "\\c 1\n\\v 1 a\n\\c x\n\\v 2 b";
    let doc = parse_default(source);

    assert_eq!(doc.chapters.len(), 1);
    assert_eq!(
        doc.verse("1", "1").unwrap().verse_objects,
        vec![VerseObject::text("a\n\\c x\n")]
    );
    assert_eq!(
        doc.verse("1", "2").unwrap().verse_objects,
        vec![VerseObject::text("b")]
    );
    assert_eq!(serialize(&doc, &SerializeOptions::default()), source);
}

#[test]
fn test_alignment_inside_added_text_stays_structured() {
    let doc = parse_default(
        "\\c 1\n\\v 1 \\add \\zaln-s |x-strong=\"G1\"\\*\\w is\\w*\\zaln-e\\*\\add*\n",
    );
    let VerseObject::Marker(add) = &doc.verse("1", "1").unwrap().verse_objects[0] else {
        panic!("Expected marker");
    };
    let VerseObject::Milestone(zaln) = &add.children[0] else {
        panic!("Expected milestone, got {:?}", add.children);
    };
    assert_eq!(zaln.children, vec![VerseObject::Word(Word::new("is"))]);
}

#[test]
fn test_absent_chapter_is_not_invented() {
    let doc = parse_default(
        "\\c 1\n\\v 1 a\n\\v 2 b\n\\c 3\n\\v 1 c\n\\v 2 d\n\\v 3 e\n",
    );

    let chapters: Vec<&str> = doc.chapters.keys().map(|id| id.as_str()).collect();
    assert_eq!(chapters, vec!["1", "3"]);
    assert_eq!(verse_count(&doc, "1"), 2);
    assert_eq!(verse_count(&doc, "3"), 3);
}

#[test]
fn test_no_phantom_verses() {
    let doc = parse_default("\\c 1\n\\v 1 a\n\\v 2 b\n\\v 3 c\n\\v 21 d\n");

    let verses: Vec<&str> = doc
        .chapter("1")
        .unwrap()
        .keys()
        .map(|id| id.as_str())
        .collect();
    assert_eq!(verses, vec!["1", "2", "3", "21"]);
}

#[test]
fn test_repeated_chapter_keeps_first_content() {
    let doc = parse_default(
        "\\c 1\n\\v 1 first\n\\v 2 second\n\\c 2\n\\v 1 two\n\\c 1\n\\v 1 overwrite\n\\v 2 overwrite\n",
    );

    assert_eq!(
        doc.verse("1", "1").unwrap().verse_objects,
        vec![VerseObject::text("first\n")]
    );
    assert_eq!(
        doc.verse("1", "2").unwrap().verse_objects,
        vec![VerseObject::text("second\n")]
    );
    assert_eq!(verse_count(&doc, "2"), 1);
}

#[test]
fn test_missing_chapter_marker_does_not_overwrite() {
    // Chapter 2's marker is missing, so its verses restart inside chapter 1.
    let doc = parse_default(
        "\\c 1\n\\v 1 a\n\\v 2 b\n\\v 1 c\n\\v 2 d\n\\c 3\n\\v 1 e\n",
    );

    assert!(doc.chapter("2").is_none());
    assert_eq!(verse_count(&doc, "1"), 2);
    assert_eq!(
        doc.verse("1", "1").unwrap().verse_objects,
        vec![VerseObject::text("a\n")]
    );
    assert_eq!(
        doc.verse("3", "1").unwrap().verse_objects,
        vec![VerseObject::text("e\n")]
    );
}

#[test]
fn test_fragment_duplicate_only_drops_that_verse() {
    let doc = parse(
        "\\v 1 a\n\\v 1 again\n\\v 2 b\n",
        &ParseOptions::chunk(),
    );

    let verses = doc.verses.as_ref().unwrap();
    assert_eq!(verses.len(), 2);
    assert_eq!(
        doc.fragment_verse("1").unwrap().verse_objects,
        vec![VerseObject::text("a\n")]
    );
    assert_eq!(
        doc.fragment_verse("2").unwrap().verse_objects,
        vec![VerseObject::text("b\n")]
    );
}

#[test]
fn test_unknown_tag_is_preserved() {
    let doc = parse_default("\\zzz custom payload\n");

    let VerseObject::Marker(marker) = &doc.headers[0] else {
        panic!("Expected marker");
    };
    assert_eq!(marker.tag, "zzz");
    assert_eq!(marker.kind, None);
    assert_eq!(marker.content.as_deref(), Some("custom payload\n"));
}

#[test]
fn test_unclosed_footnote_closes_at_end_of_input() {
    let doc = parse("\\v 1 text\\f + \\ft dangling", &ParseOptions::chunk());

    let objects = &doc.fragment_verse("1").unwrap().verse_objects;
    let VerseObject::Marker(footnote) = &objects[1] else {
        panic!("Expected footnote");
    };
    assert_eq!(footnote.content.as_deref(), Some("+ \\ft dangling"));
    assert_eq!(footnote.end_tag, None);
}

#[test]
fn test_header_lookup() {
    let doc = parse_default("\\id TIT EN_ULT\n\\h Titus\n\\toc1 Letter to Titus\n\\c 1\n");

    let headers = doc.header_lookup();
    assert_eq!(headers["id"], "TIT EN_ULT");
    assert_eq!(headers["h"], "Titus");
    assert_eq!(headers["toc1"], "Letter to Titus");
}
