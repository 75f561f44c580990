// Command-line interface for twinmark
//
// This binary exposes the twinmark conversion engine: Markdown in, content tree out, and back.
//
// The inspect command is a development aid: it shows how the engine and its handlers see a file.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension, while being overwrittable by an explicit --from flag.
// Usage:
//  twinmark <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  twinmark convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  twinmark inspect <path> [<transform>]      - Execute a transform (defaults to "tree-treeviz")
//  twinmark --list-transforms                 - List available transforms
//  twinmark --list-handlers                   - List registered handlers in priority order
//
// Extra Parameters:
//
// Parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix. Known keys override configuration, the rest go to the transform.
// Example:
//  twinmark inspect notes.md --extra-inline true --extra-diagram-format svg

use twinmark_cli::transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use twinmark_config::{Loader, TwinmarkConfig};
use twinmark_engine::handlers::DiagramFormat;
use twinmark_engine::{FormatRegistry, HandlerRegistry};

const SUBCOMMANDS: &[&str] = &["inspect", "convert", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
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
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-'));

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
    Command::new("twinmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown to and from the twinmark content tree")
        .long_about(
            "twinmark is a command-line tool for the twinmark conversion engine.\n\n\
            Commands:\n  \
            - convert: Transform between formats (markdown, tree, treeviz)\n  \
            - inspect: View how the engine sees a Markdown file\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            twinmark inspect notes.md                  # View tree visualization\n  \
            twinmark inspect notes.md --extra-inline   # Include inline nodes\n  \
            twinmark notes.md --to tree                # Convert to tree JSON (stdout)\n  \
            twinmark tree.json --to markdown -o out.md # Back to Markdown"
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
            Arg::new("list-handlers")
                .long("list-handlers")
                .help("List registered handlers in priority order")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a twinmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect how a Markdown file is parsed")
                .long_about(
                    "View the content tree the engine builds from a Markdown file.\n\n\
                    Transforms (stage-format):\n  \
                    - tree-treeviz:        Tree visualization (default)\n  \
                    - tree-json:           Tree as JSON\n  \
                    - tree-simple:         Top-level block kinds\n  \
                    - markdown-normalized: Markdown after a round trip\n\n\
                    Extra Parameters:\n  \
                    --extra-inline      List inline nodes in tree-treeviz\n\n\
                    Examples:\n  \
                    twinmark inspect notes.md                      # Tree visualization (default)\n  \
                    twinmark inspect notes.md tree-json            # JSON output\n  \
                    twinmark inspect notes.md markdown-normalized  # Normalized Markdown"
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'tree-treeviz'")
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
                    - markdown: Markdown (.md, .markdown)\n  \
                    - tree:     Content tree as JSON (.json)\n  \
                    - treeviz:  Tree visualization (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    twinmark convert notes.md --to tree           # Tree JSON (stdout)\n  \
                    twinmark convert tree.json --to markdown      # Back to Markdown\n  \
                    twinmark notes.md --to markdown -o clean.md   # 'convert' is optional"
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
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means the implicit convert command.
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
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

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    let handlers = config.registry().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    debug!(handlers = ?handlers.names(), "handler registry ready");

    if matches.get_flag("list-handlers") {
        handle_list_handlers_command(&handlers);
        return;
    }

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                exit_usage("path is required");
            };
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            handle_inspect_command(path, transform, &extra_params, &handlers);
        }
        Some(("convert", sub_matches)) => {
            let (Some(input), Some(to)) = (
                sub_matches.get_one::<String>("input"),
                sub_matches.get_one::<String>("to"),
            ) else {
                exit_usage("input and --to are required");
            };
            let formats = FormatRegistry::with_handlers(handlers);

            // Auto-detect --from if not provided
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match formats.detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&formats, input, &from, to, output);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn exit_usage(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(2);
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    handlers: &HandlerRegistry,
) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let output = transforms::execute_transform(&source, transform, extra_params, handlers)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    formats: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    // Validate formats exist
    for name in [from, to] {
        if let Err(e) = formats.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let doc = formats.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    debug!(from, to, blocks = doc.children.len(), "parsed input");

    let mut result = formats.serialize(&doc, to).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    if !result.ends_with('\n') {
        result.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  tree        - Content tree parsed from Markdown");
    println!("  markdown    - Markdown after a parse/serialize round trip\n");

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

/// Handle the list-handlers command
fn handle_list_handlers_command(handlers: &HandlerRegistry) {
    println!("Registered handlers (priority order):\n");
    for handler in handlers.iter() {
        let mut capabilities = Vec::new();
        if handler.block_parser().is_some() {
            capabilities.push("block");
        }
        if handler.inline_transformer().is_some() {
            capabilities.push("inline");
        }
        if handler.serializer().is_some() {
            capabilities.push("serialize");
        }
        println!(
            "  {:>4}  {:<10} {}",
            handler.priority(),
            handler.name(),
            capabilities.join(", ")
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> TwinmarkConfig {
    let loader = Loader::new().with_optional_file("twinmark.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut TwinmarkConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["diagram-format"]) {
        config.diagram.format = match raw.to_lowercase().as_str() {
            "png" => DiagramFormat::Png,
            "svg" => DiagramFormat::Svg,
            other => {
                eprintln!("Invalid diagram format '{other}' (expected png or svg)");
                std::process::exit(1);
            }
        };
    }
    if let Some(raw) = take_override(extra_params, &["diagram-server", "diagram-server-url"]) {
        config.diagram.server_url = raw;
    }
    if let Some(raw) = take_override(extra_params, &["diagram-proxy", "diagram-proxy-url"]) {
        config.diagram.proxy_url = Some(raw);
    }

    let toggles = [
        ("table", &mut config.handlers.table),
        ("diagram", &mut config.handlers.diagram),
        ("code", &mut config.handlers.code),
        ("math", &mut config.handlers.math),
    ];
    for (name, enabled) in toggles {
        let flag = format!("handler-{name}");
        if let Some(raw) = extra_params.remove(&flag) {
            *enabled = parse_bool_arg(&flag, &raw);
        }
    }
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
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
