use std::path::Path;
use std::process;

use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use tracing::Level;

use bai2::formatting;
use bai2::language::Node;
use bai2::parsing;
use bai2::schema::RecordType;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("bai2")
        .version(VERSION)
        .propagate_version(true)
        .author("bai2 contributors")
        .about("A parser and query engine for BAI2 cash management statements.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log details of the parse as it happens."),
        )
        .subcommand(
            Command::new("check")
                .about("Parse the given statement and report its diagnostics")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit the diagnostics as a JSON list rather than prose."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the statement you want to check."),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Re-emit the given statement as canonical record text")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the statement you want to format."),
                ),
        )
        .subcommand(
            Command::new("query")
                .about("Extract field values from the given statement")
                .arg(
                    Arg::new("record")
                        .long("record")
                        .required(true)
                        .help("Record type to address, as a type code or a level name (\"03\", \"account\", \"transaction\", ...)."),
                )
                .arg(
                    Arg::new("field")
                        .long("field")
                        .help("Field to project, gathered from every record of the addressed type."),
                )
                .arg(
                    Arg::new("where")
                        .long("where")
                        .value_name("CONDITION")
                        .help("Keep only the parts of the statement matching a \"field=value\" equality."),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit the matching subtree as JSON instead of projecting a field."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the statement you want to query."),
                ),
        )
        .get_matches();

    if matches.get_flag("debug") {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();
    }

    match matches.subcommand() {
        Some(("check", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                check(Path::new(filename), submatches.get_flag("json"));
            }
        }
        Some(("format", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                format(Path::new(filename));
            }
        }
        Some(("query", submatches)) => {
            if let (Some(filename), Some(record)) = (
                submatches.get_one::<String>("filename"),
                submatches.get_one::<String>("record"),
            ) {
                query(
                    Path::new(filename),
                    record,
                    submatches
                        .get_one::<String>("field")
                        .map(String::as_str),
                    submatches
                        .get_one::<String>("where")
                        .map(String::as_str),
                    submatches.get_flag("json"),
                );
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: bai2 [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn check(filename: &Path, json: bool) {
    let content = slurp(filename);
    let statement = parsing::parse(&content);
    let diagnostics = statement.errors();

    if json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(text) => println!("{}", text),
            Err(error) => fail("Failed encoding diagnostics", &error.to_string()),
        }
    } else {
        for message in &diagnostics {
            eprintln!("{}: {}", "error".bright_red(), message);
        }
    }

    if !diagnostics.is_empty() {
        process::exit(1);
    }
}

fn format(filename: &Path) {
    let content = slurp(filename);
    let statement = parsing::parse(&content);

    print!("{}", formatting::render(&statement));
}

fn query(filename: &Path, record: &str, field: Option<&str>, condition: Option<&str>, json: bool) {
    let kind = match RecordType::from_query(record) {
        Some(kind) => kind,
        None => fail("Unknown record type", record),
    };

    let content = slurp(filename);
    let node = Node::File(parsing::parse(&content));

    let node = match condition {
        Some(condition) => match node.filter(kind, condition) {
            Some(matched) => matched,
            None => fail("No records matched", condition),
        },
        None => node,
    };

    if let Some(name) = field {
        match node.field(kind, name) {
            Some(value) => println!("{}", value),
            None => fail("No values found for field", name),
        }
    } else if json {
        match serde_json::to_string_pretty(&node) {
            Ok(text) => println!("{}", text),
            Err(error) => fail("Failed encoding subtree", &error.to_string()),
        }
    } else {
        fail(
            "Nothing to extract",
            "pass --field to project a value, or --json to emit the matching subtree",
        );
    }
}

fn slurp(filename: &Path) -> String {
    match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!(
                "{}: {}: {}",
                "error".bright_red(),
                filename.to_string_lossy(),
                error
            );
            process::exit(1);
        }
    }
}

fn fail(problem: &str, details: &str) -> ! {
    eprintln!("{}: {}: {}", "error".bright_red(), problem, details);
    process::exit(1);
}
