//! Quick structural checks on a notation document before it is rendered.

use crate::notation::HEADER;
use crate::pattern::{Pattern, compiled};
use once_cell::sync::Lazy;
use regex::Regex;

static ENTITY_OPEN: Pattern = Lazy::new(|| Regex::new(r"^\s*\w+\s*\{"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// The header was missing; holds the document with the header added.
    Corrected(String),
    NoEntities,
}

impl Validation {
    /// Whether the document can be handed to the renderer as is or corrected.
    pub fn is_usable(&self) -> bool {
        !matches!(self, Self::NoEntities)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Valid => "notation is valid",
            Self::Corrected(_) => "added missing erDiagram header",
            Self::NoEntities => "no entities found in the diagram",
        }
    }
}

/// Check the header first, then that at least one entity block is opened.
/// A document missing its header is corrected without further checks.
pub fn validate_notation(code: &str) -> Result<Validation, regex::Error> {
    let first = code.lines().next().unwrap_or_default();
    if !first.trim().starts_with(HEADER) {
        return Ok(Validation::Corrected(format!("{HEADER}\n{code}")));
    }

    let entity_re = compiled(&ENTITY_OPEN)?;
    if !code.lines().any(|line| entity_re.is_match(line)) {
        return Ok(Validation::NoEntities);
    }

    Ok(Validation::Valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        let code = "erDiagram\n    User {\n        int id PK\n    }\n";
        assert_eq!(validate_notation(code).unwrap(), Validation::Valid);
    }

    #[test]
    fn test_missing_header_is_corrected() {
        let code = "    User {\n    }";
        let validation = validate_notation(code).unwrap();
        assert_eq!(validation, Validation::Corrected("erDiagram\n    User {\n    }".to_string()));
        assert!(validation.is_usable());
    }

    #[test]
    fn test_empty_input_is_corrected() {
        assert_eq!(
            validate_notation("").unwrap(),
            Validation::Corrected("erDiagram\n".to_string())
        );
    }

    #[test]
    fn test_relationships_only() {
        let code = "erDiagram\n    A ||--o{ B : \"has\"\n";
        let validation = validate_notation(code).unwrap();
        assert_eq!(validation, Validation::NoEntities);
        assert!(!validation.is_usable());
        assert_eq!(validation.message(), "no entities found in the diagram");
    }
}
