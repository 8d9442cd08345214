//! Relational algebra to SQL.

use super::{
    ALL_COLUMNS, JOIN_CONDITION_PLACEHOLDER, TranslateError, UNSUPPORTED_ALGEBRA, into_output,
};
use crate::pattern::{Pattern, compiled};
use once_cell::sync::Lazy;
use regex::Regex;

static PROJECTION: Pattern = Lazy::new(|| Regex::new(r"π\s+([^*].*?)\s+\((.*)\)"));

static SELECTION: Pattern = Lazy::new(|| Regex::new(r"σ\s+(.*?)\s+\((.*)\)"));

static JOIN: Pattern = Lazy::new(|| Regex::new(r"\((.*)\)\s+⨝\s+\((.*)\)"));

static TABLE: Pattern = Lazy::new(|| Regex::new(r"^(?-u:\w)+$"));

/// Translate a relational algebra expression into SQL.
///
/// Returns [`UNSUPPORTED_ALGEBRA`] when the expression has no recognized
/// shape.
pub fn algebra_to_sql(expression: &str) -> String {
    into_output(try_algebra_to_sql(expression), UNSUPPORTED_ALGEBRA)
}

pub fn try_algebra_to_sql(expression: &str) -> Result<Option<String>, TranslateError> {
    let expression = expression.trim();
    let selection_re = compiled(&SELECTION)?;

    if let Some(caps) = compiled(&PROJECTION)?.captures(expression) {
        let columns = select_list(caps[1].trim());
        let inner = caps[2].trim();

        let sql = match selection_re.captures(inner) {
            Some(sel) => format!(
                "SELECT {columns} FROM {} WHERE {}",
                sel[2].trim(),
                sel[1].trim()
            ),
            None => format!("SELECT {columns} FROM {inner}"),
        };
        return Ok(Some(sql));
    }

    // A bare selection always selects every column.
    if let Some(sel) = selection_re.captures(expression) {
        return Ok(Some(format!(
            "SELECT * FROM {} WHERE {}",
            sel[2].trim(),
            sel[1].trim()
        )));
    }

    // The join condition is not part of the algebra form, so it cannot be
    // recovered here.
    if let Some(caps) = compiled(&JOIN)?.captures(expression) {
        return Ok(Some(format!(
            "SELECT * FROM {} JOIN {} ON {JOIN_CONDITION_PLACEHOLDER}",
            caps[1].trim(),
            caps[2].trim()
        )));
    }

    if compiled(&TABLE)?.is_match(expression) {
        return Ok(Some(format!("SELECT * FROM {expression}")));
    }

    Ok(None)
}

fn select_list(columns: &str) -> &str {
    if columns == ALL_COLUMNS { "*" } else { columns }
}
