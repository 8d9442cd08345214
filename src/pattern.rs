//! Shared compiled regular expressions.
//!
//! Patterns are compiled once on first use. A pattern that fails to compile
//! keeps its error, so every caller sees it as an ordinary `Result`.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) type Pattern = Lazy<Result<Regex, regex::Error>>;

/// Get the compiled regex behind a pattern static.
pub(crate) fn compiled(pattern: &'static Pattern) -> Result<&'static Regex, regex::Error> {
    pattern.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    static DIGITS: Pattern = Lazy::new(|| Regex::new(r"^\d+$"));
    static BROKEN: Pattern = Lazy::new(|| Regex::new(r"(unclosed"));

    #[test]
    fn test_compiled_pattern() {
        let re = compiled(&DIGITS).unwrap();
        assert!(re.is_match("42"));
        assert!(!re.is_match("4x2"));
    }

    #[test]
    fn test_broken_pattern_is_an_error() {
        assert!(compiled(&BROKEN).is_err());
        // Still an error the second time around.
        assert!(compiled(&BROKEN).is_err());
    }
}
