//! Best-effort translation between SQL and relational algebra.
//!
//! Both directions match the input against a short list of shapes and the
//! first shape that matches wins. Nothing is thrown: an input no shape fits
//! gives a fixed sentinel string, and an internal failure is folded into an
//! `error in translation: ...` string.

pub mod algebra;
pub mod sql;

pub use algebra::algebra_to_sql;
pub use sql::sql_to_algebra;

use thiserror::Error;

/// Stand-in for `*` inside a projection.
pub const ALL_COLUMNS: &str = "all_columns";

/// Emitted in place of a join condition that cannot be recovered.
pub const JOIN_CONDITION_PLACEHOLDER: &str = "[condition]";

pub const UNSUPPORTED_SQL: &str = "unsupported SQL query type for translation";

pub const UNSUPPORTED_ALGEBRA: &str = "unsupported relational algebra expression for translation";

pub const PROJECTION: char = 'π';
pub const SELECTION: char = 'σ';
pub const JOIN: char = '⨝';

#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Fold a translation attempt into the output channel.
fn into_output(result: Result<Option<String>, TranslateError>, unsupported: &str) -> String {
    match result {
        Ok(Some(output)) => output,
        Ok(None) => unsupported.to_string(),
        Err(e) => {
            log::error!("translation failed: {e}");
            format!("error in translation: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_output() {
        assert_eq!(into_output(Ok(Some("x".into())), UNSUPPORTED_SQL), "x");
        assert_eq!(into_output(Ok(None), UNSUPPORTED_SQL), UNSUPPORTED_SQL);

        let err = regex::Regex::new("(").unwrap_err();
        let output = into_output(Err(TranslateError::Pattern(err)), UNSUPPORTED_SQL);
        assert!(output.starts_with("error in translation: invalid pattern"));
    }

    #[test]
    fn test_round_trip_simple_selection() {
        let sql = "SELECT col FROM t WHERE cond";
        assert_eq!(algebra_to_sql(&sql_to_algebra(sql)), sql);
    }

    #[test]
    fn test_round_trip_all_columns() {
        assert_eq!(
            algebra_to_sql(&sql_to_algebra("select * from employees")),
            "SELECT * FROM employees"
        );
    }
}
