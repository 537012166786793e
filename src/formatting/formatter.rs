//! Serializer for parsed BAI2 statements

use crate::language::{Account, Group, Record, Statement};

/// Write a statement back out as BAI2 record text, one record per line.
/// A record whose field map was populated is rebuilt from its schema
/// ordered values; one that failed tokenization is reproduced from its
/// raw text. Absent headers and trailers are omitted entirely.
pub fn render(statement: &Statement) -> String {
    let mut output = String::new();

    if let Some(header) = &statement.header {
        render_record(header, &mut output);
    }
    for group in &statement.groups {
        render_group(group, &mut output);
    }
    if let Some(trailer) = &statement.trailer {
        render_record(trailer, &mut output);
    }

    output
}

fn render_group(group: &Group, output: &mut String) {
    if let Some(header) = &group.header {
        render_record(header, output);
    }
    for account in &group.accounts {
        render_account(account, output);
    }
    if let Some(trailer) = &group.trailer {
        render_record(trailer, output);
    }
}

fn render_account(account: &Account, output: &mut String) {
    if let Some(header) = &account.header {
        render_record(header, output);
    }
    for transaction in &account.transactions {
        render_record(&transaction.record, output);
    }
    if let Some(trailer) = &account.trailer {
        render_record(trailer, output);
    }
}

fn render_record(record: &Record, output: &mut String) {
    match &record.values {
        Some(values) => {
            for (i, (_, value)) in values
                .iter()
                .enumerate()
            {
                if i > 0 {
                    output.push(',');
                }
                output.push_str(value);
            }
            output.push('/');
        }
        None => output.push_str(record.raw),
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordType;

    #[test]
    fn records_rebuild_from_their_values() {
        // the record delimiter is restored even when the raw line lacked it
        let record = Record {
            kind: RecordType::AccountTrailer,
            line: 1,
            raw: "49,100,1",
            values: Some(vec![
                ("Record Code", "49"),
                ("Account Control Total", "100"),
                ("Account Total Records", "1"),
            ]),
            errors: Vec::new(),
        };

        let mut output = String::new();
        render_record(&record, &mut output);
        assert_eq!(output, "49,100,1/\n");
    }

    #[test]
    fn unparsed_records_render_verbatim() {
        let record = Record {
            kind: RecordType::Transaction,
            line: 4,
            raw: "16,191,500/",
            values: None,
            errors: vec!["Transaction: record 4: expected 7 fields, found 3".to_string()],
        };

        let mut output = String::new();
        render_record(&record, &mut output);
        assert_eq!(output, "16,191,500/\n");
    }
}
