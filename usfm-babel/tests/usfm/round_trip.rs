//! Fixture files through parse → serialize

use std::collections::BTreeSet;
use usfm_babel::ast::VerseObject;
use usfm_babel::format::Format;
use usfm_babel::formats::{JsonFormat, TextFormat};
use usfm_babel::{flatten_to_plain_text, parse, serialize, Document, ParseOptions, SerializeOptions};

const PLAIN: &str = include_str!("fixtures/tit_plain.usfm");
const ALIGNED: &str = include_str!("fixtures/tit_aligned.usfm");

fn parse_default(source: &str) -> Document {
    parse(source, &ParseOptions::default())
}

fn assert_round_trip(source: &str) {
    let doc = parse_default(source);
    let output = serialize(&doc, &SerializeOptions::default());
    assert_eq!(output, source);
    assert_eq!(parse_default(&output), doc);
}

fn verse_ids(doc: &Document) -> BTreeSet<(String, String)> {
    doc.chapters
        .iter()
        .flat_map(|(chapter, verses)| {
            verses
                .keys()
                .map(move |verse| (chapter.to_string(), verse.to_string()))
        })
        .collect()
}

#[test]
fn test_plain_fixture_round_trip() {
    assert_round_trip(PLAIN);
}

#[test]
fn test_aligned_fixture_round_trip() {
    assert_round_trip(ALIGNED);
}

#[test]
fn test_inline_layouts_round_trip() {
    for source in [
        "\\c 1 \\p\n\\v 1 a\n",
        "\\c 1 text on the chapter line\n\\v 1 a\n",
        "\\c 1\n\\v 1\ttab\n",
        "\\c 1\n\\v 1 a \\k-s |\\*x\\k-e\\*\n",
        "\\c 1\n\\v 1 a \\w x|\\w*\n",
    ] {
        assert_round_trip(source);
    }
}

#[test]
fn test_words_inside_character_styles_round_trip() {
    for source in [
        "\\c 1\n\\p\n\\v 1 \\wj \\w Jesus|strong=\"G2424\"\\w* said\\wj*\n",
        "\\c 1\n\\v 1 \\add \\zaln-s |x-strong=\"G1\"\\*\\w is\\w*\\zaln-e\\*\\add* here\n",
        "\\c 1\n\\v 1 \\wj said\\f + \\ft note\\f* more\n\\q1 still speaking\\wj*\n",
    ] {
        assert_round_trip(source);
    }
}

#[test]
fn test_plain_fixture_structure() {
    let doc = parse_default(PLAIN);

    assert_eq!(doc.chapters.len(), 2);
    let chapter_one: Vec<&str> = doc.chapter("1").unwrap().keys().map(|id| id.as_str()).collect();
    assert_eq!(chapter_one, vec!["front", "1", "2", "3", "4", "5", "6"]);
    let chapter_two: Vec<&str> = doc.chapter("2").unwrap().keys().map(|id| id.as_str()).collect();
    assert_eq!(chapter_two, vec!["front", "1", "2", "3-4"]);

    let headers = doc.header_lookup();
    assert_eq!(headers["h"], "Titus");
    assert_eq!(headers["usfm"], "3.0");
    assert_eq!(headers["toc3"], "Tit");
}

#[test]
fn test_aligned_fixture_structure() {
    let doc = parse_default(ALIGNED);
    let verse = &doc.verse("1", "1").unwrap().verse_objects;

    let milestones: Vec<_> = verse
        .iter()
        .filter_map(|object| match object {
            VerseObject::Milestone(milestone) => Some(milestone),
            _ => None,
        })
        .collect();
    assert_eq!(milestones.len(), 3);
    assert_eq!(milestones[0].attributes.strong().as_deref(), Some("G39720"));
    assert_eq!(milestones[0].attributes.occurrence().as_deref(), Some("1"));
    assert!(milestones.iter().all(|m| m.end_tag.as_deref() == Some("zaln-e\\*")));

    let VerseObject::Milestone(hope) = &doc.verse("1", "2").unwrap().verse_objects[2] else {
        panic!("Expected milestone");
    };
    let VerseObject::Milestone(nested) = &hope.children[0] else {
        panic!("Expected nested milestone");
    };
    assert_eq!(nested.attributes.lemma().as_deref(), Some("αἰώνιος"));
}

#[test]
fn test_json_round_trip_preserves_document() {
    let doc = parse_default(ALIGNED);
    let json = JsonFormat.serialize(&doc).unwrap();
    let back = JsonFormat.parse(&json).unwrap();
    assert_eq!(back, doc);
    assert_eq!(serialize(&back, &SerializeOptions::default()), ALIGNED);
}

#[test]
fn test_forced_new_lines_keeps_content() {
    let doc = parse_default(ALIGNED);
    let options = SerializeOptions {
        forced_new_lines: true,
        ..SerializeOptions::default()
    };
    let forced = serialize(&doc, &options);
    let reparsed = parse_default(&forced);

    assert_eq!(verse_ids(&reparsed), verse_ids(&doc));
    assert_eq!(
        TextFormat.serialize(&reparsed).unwrap(),
        TextFormat.serialize(&doc).unwrap()
    );
}

#[test]
fn test_chunk_round_trip() {
    let fragment = "\\v 5 \\w grace|x-occurrence=\"1\"\\w* and \\nd peace\\nd*\n\\v 6 amen\n";
    let doc = parse(fragment, &ParseOptions::chunk());
    let options = SerializeOptions {
        chunk: true,
        ..SerializeOptions::default()
    };
    assert_eq!(serialize(&doc, &options), fragment);
}

#[test]
fn test_chunk_inline_layouts_round_trip() {
    let options = SerializeOptions {
        chunk: true,
        ..SerializeOptions::default()
    };
    for fragment in [
        "\\v 1 a \\k-s |\\*x\\k-e\\*\n",
        "\\v 1 a \\w x|\\w*\n",
        "\\v 1\ttab",
    ] {
        let doc = parse(fragment, &ParseOptions::chunk());
        assert_eq!(serialize(&doc, &options), fragment);
    }
}

#[test]
fn test_text_views() {
    let doc = parse_default(ALIGNED);
    let text = TextFormat.serialize(&doc).unwrap();
    assert_eq!(
        text,
        "1:1 Paul, a servant of God\n1:2 in hope of eternal life.\n"
    );

    let verse_two = ALIGNED
        .lines()
        .skip_while(|line| !line.starts_with("\\v 2"))
        .collect::<Vec<_>>()
        .join("\n");
    let flat = flatten_to_plain_text(&verse_two);
    assert_eq!(
        flat.split_whitespace().collect::<Vec<_>>().join(" "),
        "in hope of eternal life."
    );
}
