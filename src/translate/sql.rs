//! SQL to relational algebra.

use super::{ALL_COLUMNS, JOIN, PROJECTION, SELECTION, TranslateError, UNSUPPORTED_SQL, into_output};
use crate::pattern::{Pattern, compiled};
use once_cell::sync::Lazy;
use regex::Regex;

// Identifiers are ASCII word characters; a table name stops at the first
// character outside that set.
static SELECT: Pattern =
    Lazy::new(|| Regex::new(r"select\s+(.*?)\s+from\s+((?-u:\w)+)(?:\s+where\s+(.*))?"));

static SELECT_JOIN: Pattern = Lazy::new(|| {
    Regex::new(r"select\s+.*?\s+from\s+((?-u:\w)+)\s+join\s+((?-u:\w)+)\s+on\s+(.*)")
});

static COLUMNS: Pattern = Lazy::new(|| Regex::new(r"select\s+(.*?)\s+from"));

/// Translate a single SQL statement into relational algebra.
///
/// Returns [`UNSUPPORTED_SQL`] when the query has no recognized shape.
pub fn sql_to_algebra(sql: &str) -> String {
    into_output(try_sql_to_algebra(sql), UNSUPPORTED_SQL)
}

/// Like [`sql_to_algebra`], with `Ok(None)` for an unrecognized shape.
///
/// The plain `SELECT ... FROM t [WHERE ...]` shape is tried before the join
/// shape, so a `JOIN` query is usually read as a projection over its first
/// table.
pub fn try_sql_to_algebra(sql: &str) -> Result<Option<String>, TranslateError> {
    let sql = sql.to_lowercase();
    let sql = sql.trim();

    if let Some(caps) = compiled(&SELECT)?.captures(sql) {
        let columns = projection_columns(&caps[1]);
        let table = &caps[2];
        let expression = match caps.get(3) {
            Some(condition) => format!(
                "{PROJECTION} {columns} ({SELECTION} {} ({table}))",
                condition.as_str()
            ),
            None => format!("{PROJECTION} {columns} ({table})"),
        };
        return Ok(Some(expression));
    }

    if let Some(caps) = compiled(&SELECT_JOIN)?.captures(sql) {
        let (left, right) = (&caps[1], &caps[2]);
        log::debug!("join condition not carried into algebra: {}", &caps[3]);

        let columns = compiled(&COLUMNS)?
            .captures(sql)
            .and_then(|c| c.get(1))
            .map_or("*", |m| m.as_str());
        let columns = projection_columns(columns);
        return Ok(Some(format!("{PROJECTION} {columns} ({left} {JOIN} {right})")));
    }

    Ok(None)
}

fn projection_columns(columns: &str) -> &str {
    if columns == "*" { ALL_COLUMNS } else { columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all() {
        assert_eq!(sql_to_algebra("select * from employees"), "π all_columns (employees)");
    }

    #[test]
    fn test_select_where() {
        assert_eq!(
            sql_to_algebra("select name from employees where age > 30"),
            "π name (σ age > 30 (employees))"
        );
    }

    #[test]
    fn test_case_and_whitespace_are_normalized() {
        assert_eq!(
            sql_to_algebra("  SELECT Name, Salary FROM Employees WHERE Dept = 'IT'  "),
            "π name, salary (σ dept = 'it' (employees))"
        );
    }

    #[test]
    fn test_join_is_shadowed_by_simple_shape() {
        assert_eq!(
            sql_to_algebra("select e.name from employees join departments on e.dept = d.id"),
            "π e.name (employees)"
        );
    }

    #[test]
    fn test_table_name_is_ascii() {
        assert_eq!(sql_to_algebra("select * from año"), "π all_columns (a)");
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(sql_to_algebra("delete from employees"), UNSUPPORTED_SQL);
        assert_eq!(sql_to_algebra(""), UNSUPPORTED_SQL);
        assert_eq!(try_sql_to_algebra("update t set a = 1").unwrap(), None);
    }
}
