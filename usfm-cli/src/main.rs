// Command-line interface for usfm
//
// This binary converts USFM scripture files to and from the other formats in
// usfm-babel, and exposes the tokenizer and parser stages for inspection.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  usfm <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  usfm convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  usfm inspect <path> [<transform>]      - Execute a transform (defaults to "doc-treeviz")
//  usfm format <input>                    - Parse and re-serialize to stdout
//  usfm --list-transforms                 - List available transforms
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format/transform.
// Parse keys (chunk, content-source, convert-to-int, map) reach the USFM reader; everything
// else reaches the writer.
// Example:
//  usfm 57-TIT.usfm --to usfm --extra-forced-new-lines
//
// Logging goes to stderr through tracing. RUST_LOG is honored; -v forces debug output.

use usfm_cli::transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use usfm_babel::formats::UsfmFormat;
use usfm_babel::FormatRegistry;
use usfm_config::{Loader, UsfmConfig};

/// Keys understood by the USFM reader.
const PARSE_KEYS: &[&str] = &["chunk", "content-source", "convert-to-int", "map"];

/// Keys understood by both the USFM reader and writer.
const SHARED_KEYS: &[&str] = &["chunk", "map"];

/// Parse extra-* arguments from command line args
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("usfm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting USFM files")
        .long_about(
            "usfm is a command-line tool for working with USFM scripture files.\n\n\
            Commands:\n  \
            - convert: Transform between formats (usfm, json, treeviz, text)\n  \
            - inspect: View internal representations (tokens, document tree)\n  \
            - format:  Parse and re-serialize a USFM file\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            usfm inspect 57-TIT.usfm                        # View the document tree\n  \
            usfm inspect 57-TIT.usfm tokens-simple          # View the token stream\n  \
            usfm 57-TIT.usfm --to json                      # Convert to JSON (stdout)\n  \
            usfm tit.json --to usfm -o 57-TIT.usfm          # Convert back to USFM\n  \
            usfm 57-TIT.usfm --to usfm --extra-ignore morph # Drop an attribute",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a usfm.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log parser recoveries and other debug events to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of USFM files")
                .long_about(
                    "View the structure of a USFM file at different processing stages.\n\n\
                    Transforms (stage-format):\n  \
                    - tokens-json:   Token stream as JSON\n  \
                    - tokens-simple: One token per line\n  \
                    - doc-treeviz:   Document tree visualization (default)\n  \
                    - doc-json:      Document tree as JSON\n  \
                    - headers:       Header tags and values\n\n\
                    Extra Parameters:\n  \
                    --extra-show-attributes  List word and milestone attributes\n  \
                    --extra-chunk            Parse the input as a fragment\n\n\
                    Examples:\n  \
                    usfm inspect 57-TIT.usfm                          # Tree visualization\n  \
                    usfm inspect 57-TIT.usfm --extra-show-attributes  # With attributes\n  \
                    usfm inspect 57-TIT.usfm tokens-json              # View token stream",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the USFM file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'doc-treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - usfm:    USFM markup (.usfm, .sfm)\n  \
                    - json:    Document tree as JSON (.json)\n  \
                    - treeviz: Tree visualization (output only)\n  \
                    - text:    Plain reading text (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Re-serialize a USFM file")
                .long_about(
                    "Parse a USFM file and write it back out.\n\n\
                    With default options the output is byte-identical to well-formed input.\n\
                    Use --extra-forced-new-lines to put verses, words and milestones on\n\
                    their own lines.\n\n\
                    Output is always written to stdout.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["inspect", "convert", "format", "help"].contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_flag("verbose"));

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                exit_with("Error: a path is required");
            };
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            handle_inspect_command(path, transform, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let (Some(input), Some(to)) = (
                sub_matches.get_one::<String>("input"),
                sub_matches.get_one::<String>("to"),
            ) else {
                exit_with("Error: an input and --to are required");
            };

            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => FormatRegistry::default()
                    .detect_format_from_filename(input)
                    .unwrap_or_else(|| {
                        exit_with(&format!(
                            "Error: Could not detect format from filename '{input}'\n\
                            Please specify --from explicitly"
                        ))
                    }),
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("format", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("Error: an input is required");
            };
            handle_convert_command(input, "usfm", "usfm", None, &extra_params, &config);
        }
        _ => exit_with("Unknown subcommand. Use --help for usage information."),
    }
}

fn exit_with(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &UsfmConfig,
) {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with(&format!("Error reading file '{path}': {e}")));

    let params = build_inspect_params(config, extra_params);

    let output = transforms::execute_transform(&source, transform, &params)
        .unwrap_or_else(|e| exit_with(&format!("Execution error: {e}")));

    print!("{output}");
}

/// Handle the convert and format commands
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &UsfmConfig,
) {
    let registry = registry_from_config(config);

    for name in [from, to] {
        if let Err(e) = registry.get(name) {
            exit_with(&format!("Error: {e}"));
        }
    }

    let source = fs::read_to_string(input)
        .unwrap_or_else(|e| exit_with(&format!("Error reading file '{input}': {e}")));

    let (parse_params, serialize_params) = split_format_params(from, to, extra_params);

    let doc = registry
        .parse_with_options(&source, from, &parse_params)
        .unwrap_or_else(|e| exit_with(&format!("Parse error: {e}")));
    debug!(
        headers = doc.headers.len(),
        chapters = doc.chapters.len(),
        "parsed {input}"
    );

    let result = registry
        .serialize_with_options(&doc, to, &serialize_params)
        .unwrap_or_else(|e| exit_with(&format!("Serialization error: {e}")));

    match output {
        Some(path) => {
            fs::write(path, result)
                .unwrap_or_else(|e| exit_with(&format!("Error writing file '{path}': {e}")));
        }
        None => print!("{result}"),
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  tokens  - Line tokenization (markers and text runs)");
    println!("  doc     - Parsed document tree\n");

    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }

    println!("\nConversion formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        println!("  {format_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> UsfmConfig {
    let loader = Loader::new().with_optional_file("usfm.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| exit_with(&format!("Failed to load configuration: {err}")))
}

/// Default registry with the USFM format seeded from the configuration.
fn registry_from_config(config: &UsfmConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::default();
    registry.register(UsfmFormat::new(
        (&config.parse).into(),
        (&config.serialize).into(),
    ));
    registry
}

fn apply_config_overrides(config: &mut UsfmConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["show-attributes", "attributes"]) {
        config.inspect.show_attributes = parse_bool_arg("show-attributes", &raw);
    }
}

/// Routes extra parameters to the reader and writer.
///
/// Only the USFM reader takes parameters. The writer receives everything
/// except reader-only keys, and the shared keys too when it is not USFM.
fn split_format_params(
    from: &str,
    to: &str,
    extra_params: &HashMap<String, String>,
) -> (HashMap<String, String>, HashMap<String, String>) {
    let mut parse_params = HashMap::new();
    let mut serialize_params = HashMap::new();

    for (key, value) in extra_params {
        let is_parse_key = PARSE_KEYS.contains(&key.as_str());
        if from == "usfm" && is_parse_key {
            parse_params.insert(key.clone(), value.clone());
        }
        let reaches_writer = if to == "usfm" {
            !is_parse_key || SHARED_KEYS.contains(&key.as_str())
        } else {
            !is_parse_key
        };
        if reaches_writer {
            serialize_params.insert(key.clone(), value.clone());
        }
    }

    (parse_params, serialize_params)
}

fn build_inspect_params(
    config: &UsfmConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let parse = &config.parse;

    if parse.chunk {
        params.insert("chunk".to_string(), "true".to_string());
    }
    if let Some(source) = &parse.content_source {
        params.insert("content-source".to_string(), source.clone());
    }
    if !parse.convert_to_int.is_empty() {
        params.insert("convert-to-int".to_string(), parse.convert_to_int.join(","));
    }
    if !parse.map.is_empty() {
        let table: Vec<String> = parse.map.iter().map(|(k, v)| format!("{k}={v}")).collect();
        params.insert("map".to_string(), table.join(","));
    }

    params.insert(
        "show-attributes".to_string(),
        config.inspect.show_attributes.to_string(),
    );

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => exit_with(&format!(
            "Invalid boolean value '{other}' for --extra-{flag}"
        )),
    }
}
