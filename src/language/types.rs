//! Types representing the record hierarchy of a BAI2 statement

use serde::Serialize;

use crate::schema::RecordType;

/// One parsed record. `values` holds the schema ordered field map, and is
/// `None` when the line's token count did not match its schema; `raw` is
/// kept so such a record can still be re-emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record<'i> {
    pub kind: RecordType,
    pub line: usize,
    pub raw: &'i str,
    pub values: Option<Vec<(&'static str, &'i str)>>,
    pub errors: Vec<String>,
}

impl<'i> Record<'i> {
    /// Look a field up by its schema name. Absent fields, and records
    /// whose field map was never populated, answer `None` rather than
    /// failing at query time.
    pub fn get(&self, name: &str) -> Option<&'i str> {
        self.values
            .as_ref()?
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }
}

/// The file level of the hierarchy: an optional file header, the groups
/// in transmission order, and an optional file trailer. `problems` holds
/// structural diagnostics that belong to this level rather than to any
/// single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement<'i> {
    pub header: Option<Record<'i>>,
    pub groups: Vec<Group<'i>>,
    pub trailer: Option<Record<'i>>,
    pub problems: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<'i> {
    pub header: Option<Record<'i>>,
    pub accounts: Vec<Account<'i>>,
    pub trailer: Option<Record<'i>>,
    pub problems: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account<'i> {
    pub header: Option<Record<'i>>,
    pub transactions: Vec<Transaction<'i>>,
    pub trailer: Option<Record<'i>>,
    pub problems: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction<'i> {
    pub record: Record<'i>,
}

/// Split a `"field=value"` condition on its first `=`. A condition
/// without one matches nothing.
fn split_condition(condition: &str) -> Option<(&str, &str)> {
    let (field, value) = condition.split_once('=')?;
    Some((field.trim(), value.trim()))
}

fn matches_condition(record: Option<&Record>, condition: &str) -> bool {
    let (field, value) = match split_condition(condition) {
        Some(parts) => parts,
        None => return false,
    };

    match record {
        Some(record) => record.get(field) == Some(value),
        None => false,
    }
}

/// Join the non-absent projections from a run of children, or answer
/// `None` when no child had the field.
fn collect_fields<I>(children: I) -> Option<String>
where
    I: Iterator<Item = Option<String>>,
{
    let found: Vec<String> = children
        .flatten()
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(found.join(","))
    }
}

impl<'i> Statement<'i> {
    /// Every diagnostic in this subtree: the header's, then this level's
    /// structural problems, then each group's in order, then the
    /// trailer's.
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(header) = &self.header {
            errors.extend(
                header
                    .errors
                    .iter()
                    .cloned(),
            );
        }
        errors.extend(
            self.problems
                .iter()
                .cloned(),
        );
        for group in &self.groups {
            errors.extend(group.errors());
        }
        if let Some(trailer) = &self.trailer {
            errors.extend(
                trailer
                    .errors
                    .iter()
                    .cloned(),
            );
        }

        errors
    }

    /// Project a field. The file's own records answer directly; any other
    /// record type is gathered from every descendant and joined with the
    /// field delimiter.
    pub fn field(&self, kind: RecordType, name: &str) -> Option<String> {
        match kind {
            RecordType::FileHeader => self
                .header
                .as_ref()?
                .get(name)
                .map(String::from),
            RecordType::FileTrailer => self
                .trailer
                .as_ref()?
                .get(name)
                .map(String::from),
            _ => collect_fields(
                self.groups
                    .iter()
                    .map(|group| group.field(kind, name)),
            ),
        }
    }

    /// Keep the parts of this subtree matching an equality condition at
    /// the addressed level. A match at this level returns the whole
    /// statement; a match further down returns a composite holding
    /// exactly the matching children, with header and trailer left
    /// unpopulated. `None` when nothing matched.
    pub fn filter(&self, kind: RecordType, condition: &str) -> Option<Statement<'i>> {
        match kind {
            RecordType::FileHeader => {
                if matches_condition(self.header.as_ref(), condition) {
                    Some(self.clone())
                } else {
                    None
                }
            }
            RecordType::FileTrailer => {
                if matches_condition(self.trailer.as_ref(), condition) {
                    Some(self.clone())
                } else {
                    None
                }
            }
            _ => {
                let groups: Vec<Group<'i>> = self
                    .groups
                    .iter()
                    .filter_map(|group| group.filter(kind, condition))
                    .collect();

                if groups.is_empty() {
                    None
                } else {
                    Some(Statement {
                        header: None,
                        groups,
                        trailer: None,
                        problems: Vec::new(),
                    })
                }
            }
        }
    }
}

impl<'i> Group<'i> {
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(header) = &self.header {
            errors.extend(
                header
                    .errors
                    .iter()
                    .cloned(),
            );
        }
        errors.extend(
            self.problems
                .iter()
                .cloned(),
        );
        for account in &self.accounts {
            errors.extend(account.errors());
        }
        if let Some(trailer) = &self.trailer {
            errors.extend(
                trailer
                    .errors
                    .iter()
                    .cloned(),
            );
        }

        errors
    }

    pub fn field(&self, kind: RecordType, name: &str) -> Option<String> {
        match kind {
            RecordType::GroupHeader => self
                .header
                .as_ref()?
                .get(name)
                .map(String::from),
            RecordType::GroupTrailer => self
                .trailer
                .as_ref()?
                .get(name)
                .map(String::from),
            _ => collect_fields(
                self.accounts
                    .iter()
                    .map(|account| account.field(kind, name)),
            ),
        }
    }

    pub fn filter(&self, kind: RecordType, condition: &str) -> Option<Group<'i>> {
        match kind {
            RecordType::GroupHeader => {
                if matches_condition(self.header.as_ref(), condition) {
                    Some(self.clone())
                } else {
                    None
                }
            }
            RecordType::GroupTrailer => {
                if matches_condition(self.trailer.as_ref(), condition) {
                    Some(self.clone())
                } else {
                    None
                }
            }
            _ => {
                let accounts: Vec<Account<'i>> = self
                    .accounts
                    .iter()
                    .filter_map(|account| account.filter(kind, condition))
                    .collect();

                if accounts.is_empty() {
                    None
                } else {
                    Some(Group {
                        header: None,
                        accounts,
                        trailer: None,
                        problems: Vec::new(),
                    })
                }
            }
        }
    }
}

impl<'i> Account<'i> {
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(header) = &self.header {
            errors.extend(
                header
                    .errors
                    .iter()
                    .cloned(),
            );
        }
        errors.extend(
            self.problems
                .iter()
                .cloned(),
        );
        for transaction in &self.transactions {
            errors.extend(transaction.errors());
        }
        if let Some(trailer) = &self.trailer {
            errors.extend(
                trailer
                    .errors
                    .iter()
                    .cloned(),
            );
        }

        errors
    }

    pub fn field(&self, kind: RecordType, name: &str) -> Option<String> {
        match kind {
            RecordType::AccountHeader => self
                .header
                .as_ref()?
                .get(name)
                .map(String::from),
            RecordType::AccountTrailer => self
                .trailer
                .as_ref()?
                .get(name)
                .map(String::from),
            _ => collect_fields(
                self.transactions
                    .iter()
                    .map(|transaction| transaction.field(kind, name)),
            ),
        }
    }

    pub fn filter(&self, kind: RecordType, condition: &str) -> Option<Account<'i>> {
        match kind {
            RecordType::AccountHeader => {
                if matches_condition(self.header.as_ref(), condition) {
                    Some(self.clone())
                } else {
                    None
                }
            }
            RecordType::AccountTrailer => {
                if matches_condition(self.trailer.as_ref(), condition) {
                    Some(self.clone())
                } else {
                    None
                }
            }
            _ => {
                let transactions: Vec<Transaction<'i>> = self
                    .transactions
                    .iter()
                    .filter_map(|transaction| transaction.filter(kind, condition))
                    .collect();

                if transactions.is_empty() {
                    None
                } else {
                    Some(Account {
                        header: None,
                        transactions,
                        trailer: None,
                        problems: Vec::new(),
                    })
                }
            }
        }
    }
}

impl<'i> Transaction<'i> {
    pub fn errors(&self) -> Vec<String> {
        self.record
            .errors
            .clone()
    }

    pub fn field(&self, kind: RecordType, name: &str) -> Option<String> {
        if kind == RecordType::Transaction {
            self.record
                .get(name)
                .map(String::from)
        } else {
            None
        }
    }

    pub fn filter(&self, kind: RecordType, condition: &str) -> Option<Transaction<'i>> {
        if kind == RecordType::Transaction && matches_condition(Some(&self.record), condition) {
            Some(self.clone())
        } else {
            None
        }
    }
}

/// One node of the parsed hierarchy, for callers that operate on any
/// level without knowing which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Node<'i> {
    File(Statement<'i>),
    Group(Group<'i>),
    Account(Account<'i>),
    Transaction(Transaction<'i>),
}

impl<'i> Node<'i> {
    pub fn errors(&self) -> Vec<String> {
        match self {
            Node::File(statement) => statement.errors(),
            Node::Group(group) => group.errors(),
            Node::Account(account) => account.errors(),
            Node::Transaction(transaction) => transaction.errors(),
        }
    }

    pub fn field(&self, kind: RecordType, name: &str) -> Option<String> {
        match self {
            Node::File(statement) => statement.field(kind, name),
            Node::Group(group) => group.field(kind, name),
            Node::Account(account) => account.field(kind, name),
            Node::Transaction(transaction) => transaction.field(kind, name),
        }
    }

    pub fn filter(&self, kind: RecordType, condition: &str) -> Option<Node<'i>> {
        match self {
            Node::File(statement) => statement
                .filter(kind, condition)
                .map(Node::File),
            Node::Group(group) => group
                .filter(kind, condition)
                .map(Node::Group),
            Node::Account(account) => account
                .filter(kind, condition)
                .map(Node::Account),
            Node::Transaction(transaction) => transaction
                .filter(kind, condition)
                .map(Node::Transaction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RecordType, values: Vec<(&'static str, &'static str)>) -> Record<'static> {
        Record {
            kind,
            line: 1,
            raw: "",
            values: Some(values),
            errors: Vec::new(),
        }
    }

    #[test]
    fn absent_field_map_answers_none() {
        let unparsed = Record {
            kind: RecordType::Transaction,
            line: 1,
            raw: "16,191,500",
            values: None,
            errors: Vec::new(),
        };

        assert_eq!(unparsed.get("Transaction Amount"), None);
    }

    #[test]
    fn conditions_require_an_equals_sign() {
        let header = record(
            RecordType::AccountHeader,
            vec![("Bank Customer Account", "1234567")],
        );

        assert!(matches_condition(
            Some(&header),
            "Bank Customer Account = 1234567"
        ));
        assert!(!matches_condition(Some(&header), "Bank Customer Account"));
        assert!(!matches_condition(None, "Bank Customer Account=1234567"));
    }

    #[test]
    fn projections_join_in_order() {
        let amounts = vec![Some("100".to_string()), None, Some("300".to_string())];

        assert_eq!(
            collect_fields(amounts.into_iter()),
            Some("100,300".to_string())
        );
        assert_eq!(collect_fields(std::iter::empty()), None);
    }
}
