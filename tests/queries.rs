#[cfg(test)]
mod verify {
    use bai2::language::Node;
    use bai2::parsing;
    use bai2::schema::RecordType;

    fn trim(s: &str) -> &str {
        s.strip_prefix('\n')
            .unwrap_or(s)
    }

    const STATEMENT: &str = r#"
01,SENDER,RECEIVER,210706,1249,1,80,1,2/
02,RECEIVER,SENDER,1,210706,,USD,2/
03,1234567,USD,040,100,0,0/
16,191,100,0,REF1,,first/
16,195,200,0,REF2,,second/
16,191,300,0,REF3,,third/
49,600,5/
03,7654321,USD,040,50,0,0/
16,191,400,0,REF4,,fourth/
49,400,3/
98,1000,2,10/
99,1000,1,12/
            "#;

    #[test]
    fn filter_keeps_the_matching_account() {
        let statement = parsing::parse(trim(STATEMENT));

        let matched = statement
            .filter(RecordType::AccountHeader, "Bank Customer Account=1234567")
            .unwrap();

        // a composite: only the matching account, enclosing header and
        // trailer left unpopulated
        assert_eq!(matched.header, None);
        assert_eq!(matched.trailer, None);
        assert_eq!(
            matched
                .groups
                .len(),
            1
        );
        assert_eq!(matched.groups[0].header, None);

        let accounts = &matched.groups[0].accounts;
        assert_eq!(accounts.len(), 1);
        assert_eq!(
            accounts[0]
                .header
                .as_ref()
                .unwrap()
                .get("Bank Customer Account"),
            Some("1234567")
        );
        assert_eq!(
            accounts[0]
                .transactions
                .len(),
            3
        );
    }

    #[test]
    fn filter_misses_return_none() {
        let statement = parsing::parse(trim(STATEMENT));

        assert_eq!(
            statement.filter(RecordType::AccountHeader, "Bank Customer Account=9999999"),
            None
        );
    }

    #[test]
    fn conditions_without_an_equality_match_nothing() {
        let statement = parsing::parse(trim(STATEMENT));

        assert_eq!(
            statement.filter(RecordType::AccountHeader, "Bank Customer Account"),
            None
        );
    }

    #[test]
    fn filter_addresses_trailers_too() {
        let statement = parsing::parse(trim(STATEMENT));

        let matched = statement
            .filter(RecordType::AccountTrailer, "Account Total Records=3")
            .unwrap();

        let accounts = &matched.groups[0].accounts;
        assert_eq!(accounts.len(), 1);
        assert_eq!(
            accounts[0]
                .header
                .as_ref()
                .unwrap()
                .get("Bank Customer Account"),
            Some("7654321")
        );
    }

    #[test]
    fn fields_project_across_descendants() {
        let statement = parsing::parse(trim(STATEMENT));

        assert_eq!(
            statement.field(RecordType::Transaction, "Transaction Amount"),
            Some("100,200,300,400".to_string())
        );
        assert_eq!(
            statement.field(RecordType::AccountHeader, "Bank Customer Account"),
            Some("1234567,7654321".to_string())
        );
    }

    #[test]
    fn fields_answer_from_the_nodes_own_records() {
        let statement = parsing::parse(trim(STATEMENT));

        assert_eq!(
            statement.field(RecordType::FileHeader, "Sender Identification"),
            Some("SENDER".to_string())
        );
        assert_eq!(
            statement.field(RecordType::FileTrailer, "File Control Total"),
            Some("1000".to_string())
        );
        assert_eq!(
            statement.field(RecordType::FileHeader, "No Such Field"),
            None
        );
    }

    #[test]
    fn filtered_accounts_project_their_own_amounts() {
        let statement = parsing::parse(trim(STATEMENT));

        let matched = statement
            .filter(RecordType::AccountHeader, "Bank Customer Account=1234567")
            .unwrap();

        assert_eq!(
            matched.field(RecordType::Transaction, "Transaction Amount"),
            Some("100,200,300".to_string())
        );
    }

    #[test]
    fn nodes_dispatch_to_their_level() {
        let content = trim(STATEMENT);
        let node = Node::File(parsing::parse(content));

        assert_eq!(
            node.field(RecordType::GroupTrailer, "Group Total Accounts"),
            Some("2".to_string())
        );

        // conditions are trimmed around the equals sign
        let matched = node
            .filter(RecordType::AccountHeader, "Bank Customer Account = 7654321")
            .unwrap();
        assert_eq!(
            matched.field(RecordType::Transaction, "Transaction Amount"),
            Some("400".to_string())
        );
        assert_eq!(matched.errors(), Vec::<String>::new());
    }

    #[test]
    fn validation_failures_roll_up_in_order() {
        let statement = parsing::parse(trim(
            r#"
01,SEN$ER,RECEIVER,210706,1249,1,80,1,2/
02,RECEIVER,SENDER,1,210706,,U$D,2/
03,12-34,USD,040,100,0,0/
16,191,20x,0,REF1,,ok/
49,x,1/
98,600,1,6/
99,600,1,8/
            "#,
        ));

        assert_eq!(
            statement.errors(),
            vec![
                "File Header: Sender Identification: must be alphanumeric".to_string(),
                "Group Header: Currency Code: must be alphanumeric".to_string(),
                "Account Header: Bank Customer Account: must be alphanumeric".to_string(),
                "Transaction: Transaction Amount: must be numeric".to_string(),
                "Account Trailer: Account Control Total: must be numeric".to_string(),
            ]
        );

        // the roll-up is additive: each level carries exactly its own
        // record's failures plus its descendants'
        let group = &statement.groups[0];
        let account = &group.accounts[0];
        assert_eq!(
            account
                .errors()
                .len(),
            3
        );
        assert_eq!(
            group
                .errors()
                .len(),
            4
        );
        assert_eq!(
            statement
                .errors()
                .len(),
            5
        );
    }
}
