//! Schema validation.
//!
//! Runs once per generation run, before any table is handed to the pipeline.
//!
//! # Name matching
//!
//! Duplicate detection compares names exactly: tables `Account` and
//! `account` both pass, even though [`Schema::find_table`] resolves either
//! spelling case-insensitively to the first one. The asymmetry is kept as
//! the documented contract. Both tables derive the same class `Account`, so
//! the second one fails at generation time rather than here (see
//! [`GenerationJob::plan`](crate::pipeline::GenerationJob::plan)).

use std::collections::HashSet;

use super::schema::Schema;
use crate::error::{GenError, Result};

/// Validate the schema, returning the first violation found.
///
/// Checks, in order, for each table: the table's own invariants, duplicate
/// table names, duplicate sequence names across the whole schema. Then each
/// view name against every table and earlier view name.
pub fn validate(schema: &Schema) -> Result<()> {
    match walk(schema, true).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Run the same checks as [`validate`] but collect every violation.
pub fn collect_violations(schema: &Schema) -> Vec<GenError> {
    walk(schema, false)
}

fn walk(schema: &Schema, fail_fast: bool) -> Vec<GenError> {
    let mut errors = Vec::new();
    let mut table_view_names: HashSet<&str> = HashSet::new();
    let mut sequences: HashSet<&str> = HashSet::new();

    macro_rules! report {
        ($err:expr) => {{
            errors.push($err);
            if fail_fast {
                return errors;
            }
        }};
    }

    for table in &schema.tables {
        for err in table.violations() {
            report!(err);
        }

        if !table_view_names.insert(table.name.as_str()) {
            report!(GenError::DuplicateTableName {
                table: table.name.clone(),
                database: schema.name.clone(),
            });
        }

        for seq in table.sequence_names() {
            if !sequences.insert(seq) {
                report!(GenError::DuplicateSequenceName {
                    sequence: seq.to_string(),
                    database: schema.name.clone(),
                });
            }
        }
    }

    for view in &schema.views {
        for err in view.violations() {
            report!(err);
        }

        if !table_view_names.insert(view.name.as_str()) {
            report!(GenError::DuplicateViewOrTableName {
                view: view.name.clone(),
                database: schema.name.clone(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, Table, View};
    use crate::typemap::ColumnKind;

    fn valid_schema() -> Schema {
        Schema::new("bank")
            .with_table(
                Table::new("Account")
                    .with_column(Column::new("id", ColumnKind::Integer, false))
                    .with_sequence("account_seq"),
            )
            .with_table(Table::new("Customer").with_sequence("customer_seq"))
            .with_view(View::new("AccountSummary"))
    }

    #[test]
    fn test_valid_schema() {
        let schema = valid_schema();
        assert!(validate(&schema).is_ok());
        assert!(collect_violations(&schema).is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let schema = valid_schema();
        let before = schema.clone();
        assert!(validate(&schema).is_ok());
        assert!(validate(&schema).is_ok());
        assert_eq!(schema, before);
    }

    #[test]
    fn test_duplicate_table_name() {
        let schema = valid_schema().with_table(Table::new("Account"));
        match validate(&schema) {
            Err(GenError::DuplicateTableName { table, database }) => {
                assert_eq!(table, "Account");
                assert_eq!(database, "bank");
            }
            other => panic!("expected DuplicateTableName, got {:?}", other),
        }
    }

    #[test]
    fn test_case_only_difference_passes() {
        let schema = Schema::new("bank")
            .with_table(Table::new("Account"))
            .with_table(Table::new("account"));
        assert!(validate(&schema).is_ok());
        assert!(schema.find_table("ACCOUNT").is_some());
    }

    #[test]
    fn test_duplicate_sequence_across_tables() {
        let schema = Schema::new("bank")
            .with_table(Table::new("Account").with_sequence("seq_id"))
            .with_table(Table::new("Customer").with_sequence("seq_id"));
        assert!(matches!(
            validate(&schema),
            Err(GenError::DuplicateSequenceName { ref sequence, .. }) if sequence == "seq_id"
        ));
    }

    #[test]
    fn test_duplicate_sequence_from_column() {
        let schema = Schema::new("bank")
            .with_table(Table::new("Account").with_sequence("seq_id"))
            .with_table(
                Table::new("Customer").with_column(
                    Column::new("id", ColumnKind::BigInt, false).with_sequence("seq_id"),
                ),
            );
        assert!(matches!(
            validate(&schema),
            Err(GenError::DuplicateSequenceName { .. })
        ));
    }

    #[test]
    fn test_view_collides_with_table() {
        let schema = valid_schema().with_view(View::new("Customer"));
        assert!(matches!(
            validate(&schema),
            Err(GenError::DuplicateViewOrTableName { ref view, .. }) if view == "Customer"
        ));
    }

    #[test]
    fn test_view_collides_with_view() {
        let schema = valid_schema().with_view(View::new("AccountSummary"));
        assert!(matches!(
            validate(&schema),
            Err(GenError::DuplicateViewOrTableName { .. })
        ));
    }

    #[test]
    fn test_fail_fast_reports_first_violation() {
        let schema = Schema::new("bank")
            .with_table(Table::new("Account").with_sequence("s"))
            .with_table(Table::new("Account").with_sequence("s"))
            .with_view(View::new("Account"));
        assert!(matches!(
            validate(&schema),
            Err(GenError::DuplicateTableName { .. })
        ));

        let all = collect_violations(&schema);
        assert_eq!(all.len(), 3);
        assert!(matches!(all[0], GenError::DuplicateTableName { .. }));
        assert!(matches!(all[1], GenError::DuplicateSequenceName { .. }));
        assert!(matches!(all[2], GenError::DuplicateViewOrTableName { .. }));
    }

    #[test]
    fn test_table_invariants_checked_first() {
        let schema = Schema::new("bank").with_table(
            Table::new("Account")
                .with_column(Column::new("id", ColumnKind::Integer, false))
                .with_column(Column::new("id", ColumnKind::Integer, false)),
        );
        assert!(matches!(
            validate(&schema),
            Err(GenError::DuplicateColumnName { .. })
        ));
    }
}
