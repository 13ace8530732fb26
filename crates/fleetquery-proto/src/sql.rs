//! Rendering of clause lists into IoT hub SQL text.
//!
//! The hub's device query dialect accepts `SELECT * FROM devices WHERE ...`
//! with AND-joined comparisons over twin paths. Only the seven comparison and
//! membership operators render here; routing a text-matching clause to this
//! module is a programming error and fails loudly.

use crate::clause::{Clause, ClauseType};
use crate::error::Error;

const SELECT_DEVICES: &str = "SELECT * FROM devices";
const SELECT_DEVICE_COUNT: &str = "SELECT COUNT() AS total FROM devices";

/// Render an ordered clause list into a single WHERE condition.
///
/// Clauses with a blank column name are skipped; an empty result yields the
/// empty string. Rendered clauses are joined with `" AND "` in input order.
pub fn condition(clauses: &[Clause]) -> Result<String, Error> {
    let mut parts = Vec::with_capacity(clauses.len());
    for clause in clauses {
        if clause.is_blank() {
            continue;
        }
        let op = clause
            .clause_type
            .sql_operator()
            .ok_or(Error::UnsupportedClauseType(clause.clause_type))?;
        // IN lists arrive pre-formatted and bracketed; emit them untouched.
        let value = if clause.clause_type == ClauseType::In {
            clause.value.as_str().to_string()
        } else {
            clause.value.to_sql()
        };
        parts.push(format!("{} {} {}", qualify_column(&clause.column_name), op, value));
    }
    Ok(parts.join(" AND "))
}

/// Render the full device SELECT for a condition built by [`condition`].
pub fn select_query(condition: &str) -> String {
    append_condition(SELECT_DEVICES, condition)
}

/// Render the device count query for a condition built by [`condition`].
pub fn count_query(condition: &str) -> String {
    append_condition(SELECT_DEVICE_COUNT, condition)
}

fn append_condition(prefix: &str, condition: &str) -> String {
    if condition.trim().is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix} WHERE {condition}")
    }
}

/// Twin property paths may be written without the `properties.` prefix as a
/// convenience; restore it for the hub.
fn qualify_column(name: &str) -> String {
    if name.starts_with("desired.") || name.starts_with("reported.") {
        format!("properties.{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_joins_in_input_order() {
        let clauses = vec![
            Clause::new("tags.x", ClauseType::Eq, "one"),
            Clause::new("tags.u", ClauseType::Ne, "two"),
        ];
        assert_eq!(
            condition(&clauses).unwrap(),
            "tags.x = 'one' AND tags.u != 'two'"
        );
    }

    #[test]
    fn test_empty_clause_list() {
        assert_eq!(condition(&[]).unwrap(), "");
        // Blank column names are skipped entirely.
        let blanks = vec![Clause::default(), Clause::default()];
        assert_eq!(condition(&blanks).unwrap(), "");
    }

    #[test]
    fn test_text_operator_is_rejected() {
        let clauses = vec![Clause::new(
            "tags.x",
            ClauseType::ContainsCaseInsensitive,
            "one",
        )];
        let err = condition(&clauses).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedClauseType(ClauseType::ContainsCaseInsensitive)
        ));
    }

    #[test]
    fn test_status_operator_is_rejected() {
        let clauses = vec![Clause::new("status", ClauseType::Status, "Running")];
        assert!(condition(&clauses).is_err());
    }

    #[test]
    fn test_properties_prefix_restored() {
        let clauses = vec![
            Clause::new("desired.y", ClauseType::Eq, "1"),
            Clause::new("reported.z", ClauseType::Gt, "'1'"),
        ];
        assert_eq!(
            condition(&clauses).unwrap(),
            "properties.desired.y = '1' AND properties.reported.z > '1'"
        );
    }

    #[test]
    fn test_already_prefixed_columns_unchanged() {
        let clauses = vec![
            Clause::new("properties.desired.y", ClauseType::Lt, "1"),
            Clause::new("tags.x", ClauseType::Eq, "one"),
            Clause::new("deviceId", ClauseType::Ne, "x"),
        ];
        assert_eq!(
            condition(&clauses).unwrap(),
            "properties.desired.y < '1' AND tags.x = 'one' AND deviceId != 'x'"
        );
    }

    #[test]
    fn test_in_list_is_verbatim() {
        let clauses = vec![Clause::in_list("deviceId", "['a','b']")];
        assert_eq!(condition(&clauses).unwrap(), "deviceId IN ['a','b']");
    }

    #[test]
    fn test_empty_value_renders_empty_quotes() {
        let clauses = vec![Clause::new("tag.x", ClauseType::Ne, "")];
        assert_eq!(condition(&clauses).unwrap(), "tag.x != ''");
    }

    #[test]
    fn test_select_query_wrapping() {
        assert_eq!(select_query(""), "SELECT * FROM devices");
        assert_eq!(select_query("  "), "SELECT * FROM devices");
        assert_eq!(
            select_query("tags.x = 'one'"),
            "SELECT * FROM devices WHERE tags.x = 'one'"
        );
    }

    #[test]
    fn test_count_query_wrapping() {
        assert_eq!(count_query(""), "SELECT COUNT() AS total FROM devices");
        assert_eq!(
            count_query("tags.x = 'one'"),
            "SELECT COUNT() AS total FROM devices WHERE tags.x = 'one'"
        );
    }

    #[test]
    fn test_query_equals_prefix_plus_condition() {
        let clauses = vec![
            Clause::new("tags.x", ClauseType::Eq, "one"),
            Clause::numeric("desired.v", ClauseType::Le, "2"),
        ];
        let cond = condition(&clauses).unwrap();
        assert_eq!(
            select_query(&cond),
            format!("SELECT * FROM devices WHERE {cond}")
        );
    }
}
