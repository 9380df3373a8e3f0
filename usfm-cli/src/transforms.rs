//! CLI-specific transforms
//!
//! This module defines the views available to `usfm inspect`. Each transform
//! is a stage + format combination (e.g., "tokens-json", "doc-treeviz").
//!
//! ## Transform Pipeline
//!
//! 1. **Tokenization** - Raw text → marker and text tokens, one line at a time
//!    - `tokens-json`: Full token records
//!    - `tokens-simple`: One token per line
//!
//! 2. **Parsing** - Tokens → [`Document`]
//!    - `doc-treeviz`: Tree visualization with Unicode icons (default)
//!    - `doc-json`: JSON representation
//!    - `headers`: Header tag/value table
//!
//! ## Extra Parameters
//!
//! Parse options (`chunk`, `content-source`, `convert-to-int`, `map`) apply to
//! every `doc-*` view. `show-attributes` lists attributes in `doc-treeviz`;
//! `compact` drops pretty printing from the JSON views.
//!
//! Example: `usfm inspect 57-TIT.usfm doc-treeviz --extra-show-attributes`

use std::collections::HashMap;
use usfm_babel::format::bool_param;
use usfm_babel::formats::treeviz::to_treeviz_str_with_params;
use usfm_babel::formats::usfm::tokenizer::{tokenize, Token};
use usfm_babel::{parse, Document, ParseOptions};

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "tokens-json",
    "tokens-simple",
    "doc-json",
    "doc-treeviz",
    "headers",
];

pub const DEFAULT_TRANSFORM: &str = "doc-treeviz";

/// Execute a named transform on a source file with optional extra parameters
///
/// # Examples
///
/// ```ignore
/// let params = HashMap::new();
/// let output = execute_transform("\\c 1\n\\v 1 text\n", "doc-treeviz", &params)?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    match transform_name {
        "tokens-json" => to_json(&tokenize(source), extra_params),
        "tokens-simple" => Ok(tokens_to_simple(&tokenize(source))),
        "doc-json" => to_json(&parse_document(source, extra_params)?, extra_params),
        "doc-treeviz" => {
            let doc = parse_document(source, extra_params)?;
            to_treeviz_str_with_params(&doc, extra_params).map_err(|e| e.to_string())
        }
        "headers" => Ok(headers_table(&parse_document(source, extra_params)?)),
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}

fn parse_document(source: &str, params: &HashMap<String, String>) -> Result<Document, String> {
    let options = ParseOptions::from_params(params).map_err(|e| e.to_string())?;
    Ok(parse(source, &options))
}

fn to_json<T: serde::Serialize>(
    value: &T,
    params: &HashMap<String, String>,
) -> Result<String, String> {
    let compact = bool_param(params, "compact").map_err(|e| e.to_string())?;
    let mut json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| format!("JSON serialization failed: {e}"))?;
    json.push('\n');
    Ok(json)
}

fn tokens_to_simple(tokens: &[Token]) -> String {
    let mut output = String::new();
    for token in tokens {
        match token {
            Token::Text { text } => output.push_str(&format!("TEXT {text:?}")),
            Token::Marker(marker) => {
                output.push_str(&format!("MARKER \\{}", marker.tag));
                if let Some(number) = &marker.number {
                    output.push_str(&format!(" {number}"));
                }
                if !marker.content.is_empty() {
                    output.push_str(&format!(" {:?}", marker.content));
                }
                if let Some(close) = &marker.close {
                    output.push_str(&format!(" \\{close}"));
                }
            }
        }
        output.push('\n');
    }
    output
}

fn headers_table(doc: &Document) -> String {
    doc.header_lookup()
        .iter()
        .map(|(tag, value)| format!("{tag}\t{value}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\\id TIT EN_ULT\n\\h Titus\n\\c 1\n\\p\n\\v 1 \\w Paul|x-occurrence=\"1\"\\w*, a servant\n";

    #[test]
    fn tokens_simple_lists_one_token_per_line() {
        let output = execute_transform("\\v 1 \\w Paul\\w*,\n", "tokens-simple", &HashMap::new())
            .expect("transform to run");
        assert_eq!(
            output,
            "MARKER \\v 1\nMARKER \\w \"Paul\" \\w*\nTEXT \",\\n\"\n"
        );
    }

    #[test]
    fn tokens_json_emits_records() {
        let output =
            execute_transform(SOURCE, "tokens-json", &HashMap::new()).expect("transform to run");
        assert!(output.contains("\"tag\": \"id\""));
        assert!(output.contains("\"close\": \"w*\""));
    }

    #[test]
    fn doc_json_respects_compact() {
        let mut params = HashMap::new();
        params.insert("compact".to_string(), "true".to_string());
        let output = execute_transform(SOURCE, "doc-json", &params).expect("transform to run");
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"verseObjects\""));
    }

    #[test]
    fn doc_treeviz_is_the_default_view() {
        assert!(AVAILABLE_TRANSFORMS.contains(&DEFAULT_TRANSFORM));
        let output =
            execute_transform(SOURCE, DEFAULT_TRANSFORM, &HashMap::new()).expect("transform to run");
        assert!(output.starts_with("⧉ Document (2 headers, 1 chapters)\n"));
        assert!(output.contains("𝑤 Paul"));
    }

    #[test]
    fn doc_views_apply_parse_options() {
        let mut params = HashMap::new();
        params.insert("chunk".to_string(), "true".to_string());
        let output = execute_transform("\\v 1 one\n\\v 2 two\n", "doc-treeviz", &params)
            .expect("transform to run");
        assert!(output.contains("(0 headers, 0 chapters)"));
        assert!(output.contains("℣ Verse 2"));
    }

    #[test]
    fn headers_view_lists_tags() {
        let output =
            execute_transform(SOURCE, "headers", &HashMap::new()).expect("transform to run");
        assert_eq!(output, "h\tTitus\nid\tTIT EN_ULT\n");
    }

    #[test]
    fn bad_params_are_reported() {
        let mut params = HashMap::new();
        params.insert("map".to_string(), "lemma".to_string());
        let err = execute_transform(SOURCE, "doc-json", &params).unwrap_err();
        assert!(err.contains("map"));
    }

    #[test]
    fn unknown_transform_is_an_error() {
        let err = execute_transform(SOURCE, "ast-tag", &HashMap::new()).unwrap_err();
        assert_eq!(err, "Unknown transform: ast-tag");
    }
}
