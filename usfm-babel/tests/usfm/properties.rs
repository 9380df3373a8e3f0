//! Round trips over generated documents

use proptest::prelude::*;
use usfm_babel::{parse, serialize, ParseOptions, SerializeOptions};

const WORD: &str = "[a-zα-ω]{1,8}";

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        WORD.prop_map(|w| w),
        (WORD, 1u8..4).prop_map(|(w, n)| {
            format!("\\w {w}|x-occurrence=\"{n}\" x-occurrences=\"{n}\"\\w*")
        }),
        (WORD, 1u32..99999).prop_map(|(w, n)| {
            format!("\\zaln-s |x-strong=\"G{n:05}\" x-lemma=\"{w}\"\\*\\w {w}\\w*\\zaln-e\\*")
        }),
        WORD.prop_map(|w| format!("\\f + \\ft {w}\\f*")),
        WORD.prop_map(|w| format!("\\nd {w}\\nd*")),
    ]
}

fn verse_line() -> impl Strategy<Value = (&'static str, String)> {
    (
        prop_oneof![Just(""), Just("\\p\n"), Just("\\q1 ")],
        prop::collection::vec(segment(), 1..6).prop_map(|segments| segments.join(" ")),
    )
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::collection::vec(verse_line(), 1..6), 1..4).prop_map(|chapters| {
        let mut source = String::from("\\id TIT\n\\h Titus\n");
        for (c, verses) in chapters.iter().enumerate() {
            source.push_str(&format!("\\c {}\n\\p\n", c + 1));
            for (v, (prefix, body)) in verses.iter().enumerate() {
                source.push_str(prefix);
                source.push_str(&format!("\\v {} {body}\n", v + 1));
            }
        }
        source
    })
}

proptest! {
    #[test]
    fn prop_serialize_inverts_parse(source in document()) {
        let doc = parse(&source, &ParseOptions::default());
        prop_assert_eq!(serialize(&doc, &SerializeOptions::default()), source);
    }

    #[test]
    fn prop_parse_of_serialized_tree_is_equal(source in document()) {
        let doc = parse(&source, &ParseOptions::default());
        let output = serialize(&doc, &SerializeOptions::default());
        prop_assert_eq!(parse(&output, &ParseOptions::default()), doc);
    }

    #[test]
    fn prop_fragment_round_trip(lines in prop::collection::vec(verse_line(), 1..8)) {
        let source: String = lines
            .iter()
            .enumerate()
            .map(|(v, (_, body))| format!("\\v {} {body}\n", v + 1))
            .collect();
        let doc = parse(&source, &ParseOptions::chunk());
        prop_assert_eq!(doc.verses.as_ref().map(|v| v.len()), Some(lines.len()));

        let options = SerializeOptions { chunk: true, ..SerializeOptions::default() };
        prop_assert_eq!(serialize(&doc, &options), source);
    }

    #[test]
    fn prop_malformed_input_never_panics(source in "[a-zé \\\\*|=\"0-9\\n+-]{0,80}") {
        let doc = parse(&source, &ParseOptions::default());
        let _ = serialize(&doc, &SerializeOptions::default());
        let fragment = parse(&source, &ParseOptions::chunk());
        let _ = serialize(&fragment, &SerializeOptions::default());
    }
}
