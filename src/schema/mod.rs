//! Record schemas and field validators for the BAI2 format

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}

/// The record types making up a BAI2 statement, identified on the wire by
/// a two digit type code at the start of each line. Type "88" is reserved
/// for continuation records, which this parser reports but does not join.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum RecordType {
    FileHeader,
    GroupHeader,
    AccountHeader,
    Transaction,
    AccountTrailer,
    GroupTrailer,
    FileTrailer,
    Continuation,
}

impl RecordType {
    pub fn code(&self) -> &'static str {
        match self {
            RecordType::FileHeader => "01",
            RecordType::GroupHeader => "02",
            RecordType::AccountHeader => "03",
            RecordType::Transaction => "16",
            RecordType::AccountTrailer => "49",
            RecordType::GroupTrailer => "98",
            RecordType::FileTrailer => "99",
            RecordType::Continuation => "88",
        }
    }

    pub fn from_code(code: &str) -> Option<RecordType> {
        match code {
            "01" => Some(RecordType::FileHeader),
            "02" => Some(RecordType::GroupHeader),
            "03" => Some(RecordType::AccountHeader),
            "16" => Some(RecordType::Transaction),
            "49" => Some(RecordType::AccountTrailer),
            "88" => Some(RecordType::Continuation),
            "98" => Some(RecordType::GroupTrailer),
            "99" => Some(RecordType::FileTrailer),
            _ => None,
        }
    }

    /// Resolve a record type given on the command line, either as a bare
    /// type code or as a keyword naming the level.
    pub fn from_query(text: &str) -> Option<RecordType> {
        match text
            .to_lowercase()
            .as_str()
        {
            "01" | "file" | "file-header" => Some(RecordType::FileHeader),
            "02" | "group" | "group-header" => Some(RecordType::GroupHeader),
            "03" | "account" | "account-header" => Some(RecordType::AccountHeader),
            "16" | "transaction" | "detail" => Some(RecordType::Transaction),
            "49" | "account-trailer" => Some(RecordType::AccountTrailer),
            "88" | "continuation" => Some(RecordType::Continuation),
            "98" | "group-trailer" => Some(RecordType::GroupTrailer),
            "99" | "file-trailer" => Some(RecordType::FileTrailer),
            _ => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordType::FileHeader => "File Header",
            RecordType::GroupHeader => "Group Header",
            RecordType::AccountHeader => "Account Header",
            RecordType::Transaction => "Transaction",
            RecordType::AccountTrailer => "Account Trailer",
            RecordType::GroupTrailer => "Group Trailer",
            RecordType::FileTrailer => "File Trailer",
            RecordType::Continuation => "Continuation",
        };
        f.write_str(name)
    }
}

/// Character class a field's value has to satisfy. BAI2 fields are
/// optional, so every rule accepts the empty string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rule {
    Numeric,
    Alphanumeric,
    Printable,
}

impl Rule {
    pub fn check(&self, value: &str) -> Option<&'static str> {
        match self {
            Rule::Numeric => validate_numeric(value),
            Rule::Alphanumeric => validate_alphanumeric(value),
            Rule::Printable => validate_printable(value),
        }
    }
}

pub fn validate_numeric(value: &str) -> Option<&'static str> {
    if value.is_empty() || regex!(r"^[0-9]+$").is_match(value) {
        None
    } else {
        Some("must be numeric")
    }
}

pub fn validate_alphanumeric(value: &str) -> Option<&'static str> {
    if value.is_empty() || regex!(r"^[0-9A-Za-z]+$").is_match(value) {
        None
    } else {
        Some("must be alphanumeric")
    }
}

pub fn validate_printable(value: &str) -> Option<&'static str> {
    if regex!(r"^[ -~]*$").is_match(value) {
        None
    } else {
        Some("must be printable ASCII")
    }
}

/// The declared shape of one record type: its ordered field names and the
/// rule each value has to satisfy. A schema with `trailing_text` set ends
/// in an unbounded free text field that may itself contain commas.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub kind: RecordType,
    pub fields: &'static [(&'static str, Rule)],
    pub trailing_text: bool,
}

impl RecordSchema {
    /// Apply every field's rule in declaration order, collecting a
    /// formatted message for each value that fails.
    pub fn validate(&self, values: &[(&'static str, &str)]) -> Vec<String> {
        let mut errors = Vec::new();

        for ((name, rule), (_, value)) in self
            .fields
            .iter()
            .zip(values)
        {
            if let Some(message) = rule.check(value) {
                errors.push(format!("{}: {}: {}", self.kind, name, message));
            }
        }

        errors
    }
}

const FILE_HEADER: &[(&str, Rule)] = &[
    ("Record Code", Rule::Numeric),
    ("Sender Identification", Rule::Alphanumeric),
    ("Receiver Identification", Rule::Alphanumeric),
    ("File Creation Date", Rule::Numeric),
    ("File Creation Time", Rule::Numeric),
    ("File Identification Number", Rule::Alphanumeric),
    ("Physical Record Length", Rule::Numeric),
    ("Block Size", Rule::Numeric),
    ("Version Number", Rule::Numeric),
];

const GROUP_HEADER: &[(&str, Rule)] = &[
    ("Record Code", Rule::Numeric),
    ("Ultimate Receiver Identification", Rule::Alphanumeric),
    ("Originator Identification", Rule::Alphanumeric),
    ("Group Status", Rule::Numeric),
    ("As Of Date", Rule::Numeric),
    ("As Of Time", Rule::Numeric),
    ("Currency Code", Rule::Alphanumeric),
    ("As Of Date Modifier", Rule::Numeric),
];

const ACCOUNT_HEADER: &[(&str, Rule)] = &[
    ("Record Code", Rule::Numeric),
    ("Bank Customer Account", Rule::Alphanumeric),
    ("Currency Code", Rule::Alphanumeric),
    ("Summary Type Code", Rule::Numeric),
    ("Summary Amount", Rule::Numeric),
    ("Summary Item Count", Rule::Numeric),
    ("Funds Type", Rule::Alphanumeric),
];

const TRANSACTION: &[(&str, Rule)] = &[
    ("Record Code", Rule::Numeric),
    ("Detail Type Code", Rule::Numeric),
    ("Transaction Amount", Rule::Numeric),
    ("Funds Type", Rule::Alphanumeric),
    ("Bank Reference Number", Rule::Alphanumeric),
    ("Customer Reference Number", Rule::Alphanumeric),
    ("Detail Text", Rule::Printable),
];

const ACCOUNT_TRAILER: &[(&str, Rule)] = &[
    ("Record Code", Rule::Numeric),
    ("Account Control Total", Rule::Numeric),
    ("Account Total Records", Rule::Numeric),
];

const GROUP_TRAILER: &[(&str, Rule)] = &[
    ("Record Code", Rule::Numeric),
    ("Group Control Total", Rule::Numeric),
    ("Group Total Accounts", Rule::Numeric),
    ("Group Total Records", Rule::Numeric),
];

const FILE_TRAILER: &[(&str, Rule)] = &[
    ("Record Code", Rule::Numeric),
    ("File Control Total", Rule::Numeric),
    ("File Total Groups", Rule::Numeric),
    ("File Total Records", Rule::Numeric),
];

/// The registry of record schemas. Built once, never mutated; lookups
/// borrow from the single shared instance.
#[derive(Debug)]
pub struct Schema {
    entries: Vec<RecordSchema>,
}

impl Schema {
    pub fn standard() -> &'static Schema {
        static STANDARD: OnceLock<Schema> = OnceLock::new();
        STANDARD.get_or_init(|| Schema {
            entries: vec![
                RecordSchema {
                    kind: RecordType::FileHeader,
                    fields: FILE_HEADER,
                    trailing_text: false,
                },
                RecordSchema {
                    kind: RecordType::GroupHeader,
                    fields: GROUP_HEADER,
                    trailing_text: false,
                },
                RecordSchema {
                    kind: RecordType::AccountHeader,
                    fields: ACCOUNT_HEADER,
                    trailing_text: false,
                },
                RecordSchema {
                    kind: RecordType::Transaction,
                    fields: TRANSACTION,
                    trailing_text: true,
                },
                RecordSchema {
                    kind: RecordType::AccountTrailer,
                    fields: ACCOUNT_TRAILER,
                    trailing_text: false,
                },
                RecordSchema {
                    kind: RecordType::GroupTrailer,
                    fields: GROUP_TRAILER,
                    trailing_text: false,
                },
                RecordSchema {
                    kind: RecordType::FileTrailer,
                    fields: FILE_TRAILER,
                    trailing_text: false,
                },
            ],
        })
    }

    /// Continuation records are reserved and carry no schema.
    pub fn lookup(&self, kind: RecordType) -> Option<&RecordSchema> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        let kinds = [
            RecordType::FileHeader,
            RecordType::GroupHeader,
            RecordType::AccountHeader,
            RecordType::Transaction,
            RecordType::AccountTrailer,
            RecordType::GroupTrailer,
            RecordType::FileTrailer,
            RecordType::Continuation,
        ];

        for kind in kinds {
            assert_eq!(RecordType::from_code(kind.code()), Some(kind));
        }

        assert_eq!(RecordType::from_code("77"), None);
        assert_eq!(RecordType::from_code(""), None);
    }

    #[test]
    fn query_names_resolve() {
        assert_eq!(
            RecordType::from_query("account"),
            Some(RecordType::AccountHeader)
        );
        assert_eq!(
            RecordType::from_query("Transaction"),
            Some(RecordType::Transaction)
        );
        assert_eq!(RecordType::from_query("99"), Some(RecordType::FileTrailer));
        assert_eq!(RecordType::from_query("statement"), None);
    }

    #[test]
    fn numeric_values() {
        assert_eq!(validate_numeric("1234567"), None);
        assert_eq!(validate_numeric("0"), None);
        assert_eq!(validate_numeric(""), None);
        assert_eq!(validate_numeric("12x"), Some("must be numeric"));
        assert_eq!(validate_numeric("-5"), Some("must be numeric"));
    }

    #[test]
    fn alphanumeric_values() {
        assert_eq!(validate_alphanumeric("USD"), None);
        assert_eq!(validate_alphanumeric("REF1"), None);
        assert_eq!(validate_alphanumeric(""), None);
        assert_eq!(validate_alphanumeric("U$D"), Some("must be alphanumeric"));
        assert_eq!(
            validate_alphanumeric("two words"),
            Some("must be alphanumeric")
        );
    }

    #[test]
    fn printable_values() {
        assert_eq!(validate_printable("Deposit, with comma"), None);
        assert_eq!(validate_printable(""), None);
        assert_eq!(validate_printable("tab\there"), Some("must be printable ASCII"));
    }

    #[test]
    fn every_record_type_has_a_schema() {
        let schema = Schema::standard();

        assert_eq!(
            schema
                .lookup(RecordType::FileHeader)
                .map(|entry| entry.fields.len()),
            Some(9)
        );
        assert_eq!(
            schema
                .lookup(RecordType::Transaction)
                .map(|entry| entry.trailing_text),
            Some(true)
        );
        assert_eq!(
            schema
                .lookup(RecordType::AccountTrailer)
                .map(|entry| entry.fields.len()),
            Some(3)
        );
        assert!(schema
            .lookup(RecordType::Continuation)
            .is_none());
    }

    #[test]
    fn validation_preserves_field_order() {
        let schema = Schema::standard();
        let account = schema
            .lookup(RecordType::AccountHeader)
            .unwrap();

        let values = vec![
            ("Record Code", "03"),
            ("Bank Customer Account", "12-34"),
            ("Currency Code", "U$D"),
            ("Summary Type Code", "040"),
            ("Summary Amount", "100"),
            ("Summary Item Count", "0"),
            ("Funds Type", "0"),
        ];

        let errors = account.validate(&values);
        assert_eq!(
            errors,
            vec![
                "Account Header: Bank Customer Account: must be alphanumeric".to_string(),
                "Account Header: Currency Code: must be alphanumeric".to_string(),
            ]
        );
    }
}
