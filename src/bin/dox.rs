//! Command-line interface for dox.
//! This binary checks annotation files, reformats them canonically, and
//! dumps intermediate representations for debugging.
//!
//! Usage:
//!   dox check `<paths>`... [--config `<file>`]   - Parse, resolve, and report
//!   dox format `<path>` [--width `<n>`]          - Re-emit canonical dox text
//!   dox dump `<path>` [--format `<format>`]      - Dump tokens or entries

use clap::{Arg, Command};
use std::path::PathBuf;

use dox::dox::config::DoxConfig;
use dox::dox::lexer;
use dox::dox::parser::parse_text;
use dox::dox::pipeline;
use dox::dox::raw::formatter::DEFAULT_WIDTH;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("dox")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for checking and processing dox annotation files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Parse and resolve annotation files, reporting all problems")
                .arg(
                    Arg::new("paths")
                        .help("Annotation files to check")
                        .required(true)
                        .num_args(1..),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Path to a dox.yaml configuration file"),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Re-emit one annotation file in canonical form")
                .arg(
                    Arg::new("path")
                        .help("Annotation file to format")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .short('w')
                        .help("Wrapping width")
                        .default_value("77"),
                ),
        )
        .subcommand(
            Command::new("dump")
                .about("Dump an intermediate representation of one file")
                .arg(
                    Arg::new("path")
                        .help("Annotation file to dump")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: 'tokens-simple', 'tokens-json', or 'entries'")
                        .default_value("tokens-simple"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", sub)) => {
            let paths: Vec<PathBuf> = sub
                .get_many::<String>("paths")
                .unwrap_or_default()
                .map(PathBuf::from)
                .collect();
            let config = sub.get_one::<String>("config").map(String::as_str);
            handle_check_command(&paths, config);
        }
        Some(("format", sub)) => {
            let path = sub.get_one::<String>("path").expect("required arg");
            let width = sub.get_one::<String>("width").expect("defaulted arg");
            handle_format_command(path, width);
        }
        Some(("dump", sub)) => {
            let path = sub.get_one::<String>("path").expect("required arg");
            let format = sub.get_one::<String>("format").expect("defaulted arg");
            handle_dump_command(path, format);
        }
        _ => unreachable!(),
    }
}

/// Handle the check command.
fn handle_check_command(paths: &[PathBuf], config_path: Option<&str>) {
    let config = match config_path {
        Some(path) => match DoxConfig::load(std::path::Path::new(path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(2);
            }
        },
        None => DoxConfig::default(),
    };
    let result = pipeline::run(paths, &config);
    for item in result.diags.items() {
        eprintln!("{}", item);
    }
    eprintln!(
        "{} entries, {} error(s), {} warning(s)",
        result.doc.len(),
        result.diags.error_count(),
        result.diags.warning_count()
    );
    if result.diags.error_count() > 0 {
        std::process::exit(1);
    }
}

/// Handle the format command.
fn handle_format_command(path: &str, width: &str) {
    let width: usize = width.parse().unwrap_or(DEFAULT_WIDTH);
    let source = read_or_exit(path);
    match parse_text(&source, path) {
        Ok(doc) => print!("{}", doc.get_formatted(width)),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

/// Handle the dump command.
fn handle_dump_command(path: &str, format: &str) {
    let source = read_or_exit(path);
    match format {
        "tokens-simple" => {
            for token in lexer::lex(&source, path) {
                print!("{}", token);
                if token.kind == lexer::TokenKind::Break {
                    println!();
                }
            }
            println!();
        }
        "tokens-json" => {
            let tokens = lexer::lex(&source, path);
            match serde_json::to_string_pretty(&tokens) {
                Ok(json) => println!("{}", json),
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            }
        }
        "entries" => match parse_text(&source, path) {
            Ok(doc) => {
                let listing: Vec<serde_json::Value> = doc
                    .entries
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "kind": e.kind().as_str(),
                            "name": e.name_text(),
                            "title": e.title_text(),
                        })
                    })
                    .collect();
                match serde_json::to_string_pretty(&listing) {
                    Ok(json) => println!("{}", json),
                    Err(err) => {
                        eprintln!("Error: {}", err);
                        std::process::exit(1);
                    }
                }
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        },
        other => {
            eprintln!(
                "Error: unknown format {:?}; use 'tokens-simple', 'tokens-json', or 'entries'",
                other
            );
            std::process::exit(2);
        }
    }
}

fn read_or_exit(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Error reading {}: {}", path, err);
        std::process::exit(1);
    })
}
