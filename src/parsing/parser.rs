//! Recursive descent over the record stream of a BAI2 statement

use crate::language::{Account, Group, Record, Statement, Transaction};
use crate::schema::{RecordSchema, RecordType, Schema};

/// A cursor over the split input. Every `read_*` method consumes exactly
/// the records belonging to its own subtree, peeking at (but never
/// consuming) the first record that belongs to its caller, so the levels
/// compose by simple delegation.
#[derive(Debug)]
pub struct Parser<'i> {
    lines: Vec<(usize, &'i str)>,
    position: usize,
}

impl<'i> Parser<'i> {
    pub fn new() -> Parser<'i> {
        Parser {
            lines: Vec::new(),
            position: 0,
        }
    }

    /// Split the input into records, one per line, keeping original line
    /// numbers for diagnostics. Blank lines carry nothing in BAI2 and are
    /// dropped here.
    pub fn initialize(&mut self, content: &'i str) {
        self.lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();
        self.position = 0;
    }

    fn peek(&self) -> Option<(usize, &'i str)> {
        self.lines
            .get(self.position)
            .copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.lines.len()
    }

    fn remaining(&self) -> usize {
        self.lines.len() - self.position
    }

    /// The record type of the next unconsumed line, judged by its leading
    /// type code.
    fn classify(&self) -> Option<RecordType> {
        let (_, line) = self.peek()?;

        let code = match line.split_once(',') {
            Some((code, _)) => code,
            None => line
                .strip_suffix('/')
                .unwrap_or(line),
        };

        RecordType::from_code(code)
    }

    /// Tokenize, validate, and consume the next line as `kind`. A line
    /// whose token count does not match the schema keeps an empty field
    /// map and carries an explicit mismatch diagnostic instead.
    fn read_record(&mut self, kind: RecordType) -> Option<Record<'i>> {
        let (number, raw) = self.peek()?;
        let schema = Schema::standard().lookup(kind)?;
        self.advance();

        match tokenize(raw, schema) {
            Ok(tokens) => {
                let values: Vec<(&'static str, &'i str)> = schema
                    .fields
                    .iter()
                    .map(|(name, _)| *name)
                    .zip(tokens)
                    .collect();
                let errors = schema.validate(&values);

                Some(Record {
                    kind,
                    line: number,
                    raw,
                    values: Some(values),
                    errors,
                })
            }
            Err(found) => Some(Record {
                kind,
                line: number,
                raw,
                values: None,
                errors: vec![format!(
                    "{}: record {}: expected {} fields, found {}",
                    kind,
                    number,
                    schema
                        .fields
                        .len(),
                    found
                )],
            }),
        }
    }

    /// Continuation records are reserved; absorb one and report it on the
    /// level that saw it.
    fn flag_continuation(&mut self, problems: &mut Vec<String>) {
        if let Some((number, _)) = self.peek() {
            problems.push(format!(
                "{}: record {}: continuation records are not supported",
                RecordType::Continuation,
                number
            ));
        }
        self.advance();
    }

    /// Parse the file level: optional file header, each group in order,
    /// optional file trailer. Anything left over after the trailer is
    /// counted into the statement's problems rather than consumed.
    pub fn read_statement(&mut self) -> Statement<'i> {
        let mut statement = Statement {
            header: None,
            groups: Vec::new(),
            trailer: None,
            problems: Vec::new(),
        };

        if self.classify() == Some(RecordType::FileHeader) {
            statement.header = self.read_record(RecordType::FileHeader);
        }

        loop {
            match self.classify() {
                Some(RecordType::GroupHeader) => {
                    let group = self.read_group();
                    statement
                        .groups
                        .push(group);
                }
                Some(RecordType::Continuation) => {
                    self.flag_continuation(&mut statement.problems)
                }
                _ => break,
            }
        }

        if self.classify() == Some(RecordType::FileTrailer) {
            statement.trailer = self.read_record(RecordType::FileTrailer);
        }

        if !self.is_finished() {
            if let Some((number, _)) = self.peek() {
                statement
                    .problems
                    .push(format!(
                        "File: record {}: {} trailing records left unparsed",
                        number,
                        self.remaining()
                    ));
            }
        }

        statement
    }

    pub fn read_group(&mut self) -> Group<'i> {
        let mut group = Group {
            header: None,
            accounts: Vec::new(),
            trailer: None,
            problems: Vec::new(),
        };

        if self.classify() == Some(RecordType::GroupHeader) {
            group.header = self.read_record(RecordType::GroupHeader);
        }

        loop {
            match self.classify() {
                Some(RecordType::AccountHeader) => {
                    let account = self.read_account();
                    group
                        .accounts
                        .push(account);
                }
                Some(RecordType::Continuation) => self.flag_continuation(&mut group.problems),
                _ => break,
            }
        }

        if self.classify() == Some(RecordType::GroupTrailer) {
            group.trailer = self.read_record(RecordType::GroupTrailer);
        }

        group
    }

    pub fn read_account(&mut self) -> Account<'i> {
        let mut account = Account {
            header: None,
            transactions: Vec::new(),
            trailer: None,
            problems: Vec::new(),
        };

        if self.classify() == Some(RecordType::AccountHeader) {
            account.header = self.read_record(RecordType::AccountHeader);
        }

        loop {
            match self.classify() {
                Some(RecordType::Transaction) => match self.read_transaction() {
                    Some(transaction) => account
                        .transactions
                        .push(transaction),
                    None => break,
                },
                Some(RecordType::Continuation) => self.flag_continuation(&mut account.problems),
                _ => break,
            }
        }

        if self.classify() == Some(RecordType::AccountTrailer) {
            account.trailer = self.read_record(RecordType::AccountTrailer);
        }

        account
    }

    pub fn read_transaction(&mut self) -> Option<Transaction<'i>> {
        let record = self.read_record(RecordType::Transaction)?;
        Some(Transaction { record })
    }
}

/// Split one line into its fields, dropping the `/` record delimiter if
/// present. A schema ending in trailing free text is split into at most
/// its declared field count, so every comma past the last expected
/// delimiter stays verbatim inside the final field.
fn tokenize<'i>(raw: &'i str, schema: &RecordSchema) -> Result<Vec<&'i str>, usize> {
    let body = raw
        .strip_suffix('/')
        .unwrap_or(raw);

    let tokens: Vec<&'i str> = if schema.trailing_text {
        body.splitn(schema.fields.len(), ',')
            .collect()
    } else {
        body.split(',')
            .collect()
    };

    if tokens.len()
        == schema
            .fields
            .len()
    {
        Ok(tokens)
    } else {
        Err(tokens.len())
    }
}
