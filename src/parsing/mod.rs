//! parser for BAI2 cash management statements

use std::path::Path;

use tracing::debug;

use crate::language::{LoadingError, Statement};

pub mod parser;

/// Read a file and return an owned String. We pass that ownership back to
/// the caller so that the Statement parsed from it below can borrow for
/// the same lifetime.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into a Statement. Parsing never fails outright; structural
/// and validation diagnostics are carried on the nodes themselves and
/// reported by `errors()`.
pub fn parse(content: &str) -> Statement<'_> {
    let mut input = parser::Parser::new();
    input.initialize(content);

    let statement = input.read_statement();

    debug!(
        "Found {} group{}",
        statement
            .groups
            .len(),
        if statement
            .groups
            .len()
            == 1
        {
            ""
        } else {
            "s"
        }
    );

    let diagnostics = statement.errors();
    if !diagnostics.is_empty() {
        debug!(
            "{} diagnostic{}",
            diagnostics.len(),
            if diagnostics.len() == 1 { "" } else { "s" }
        );
    }

    statement
}
