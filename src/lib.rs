//! A parser and query engine for BAI2 cash management statements

pub mod formatting;
pub mod language;
pub mod parsing;
pub mod schema;
