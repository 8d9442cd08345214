//! Backend schema description to notation conversion.
//!
//! Both dialects are read line by line with a flat block structure: a block
//! opens on a marker line, attribute lines belong to the open block, and a
//! close marker ends it. Lines that match nothing are dropped.

pub mod er;
pub mod relational;

use crate::notation::{Attribute, KeyMarker, NotationDocument};
use crate::pattern::{Pattern, compiled};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Label used for ER relationships that carry none.
pub const DEFAULT_LABEL: &str = "related_to";

static ATTRIBUTE: Pattern =
    Lazy::new(|| Regex::new(r"(int|varchar|text|decimal|datetime|date|bit)\s+(?-u:\w)+"));

#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Description has {lines} lines, limit is {limit}")]
    TooManyLines { lines: usize, limit: usize },
}

/// Description dialect, which picks the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramMode {
    /// Brace blocks with `||--o{` relationship lines
    #[default]
    Er,
    /// Paren blocks with `FOREIGN KEY ... REFERENCES ...` lines
    Relational,
}

impl DiagramMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "er" | "eer" => Some(Self::Er),
            "relational" => Some(Self::Relational),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub default_label: String,
    /// Refuse descriptions longer than this many lines
    pub max_lines: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            default_label: DEFAULT_LABEL.to_string(),
            max_lines: None,
        }
    }
}

impl ConvertOptions {
    fn check(&self, description: &str) -> Result<(), ConvertError> {
        if let Some(limit) = self.max_lines {
            let lines = description.lines().count();
            if lines > limit {
                return Err(ConvertError::TooManyLines { lines, limit });
            }
        }
        Ok(())
    }
}

/// Convert a description with default options.
///
/// Returns `None` when conversion fails; the caller shows the raw description
/// as text instead.
pub fn to_notation(description: &str, mode: DiagramMode) -> Option<String> {
    to_notation_with(description, mode, &ConvertOptions::default())
}

pub fn to_notation_with(
    description: &str,
    mode: DiagramMode,
    options: &ConvertOptions,
) -> Option<String> {
    match try_convert(description, mode, options) {
        Ok(doc) => Some(doc.to_string()),
        Err(e) => {
            log::error!("{mode:?} description conversion failed: {e}");
            None
        }
    }
}

pub fn try_convert(
    description: &str,
    mode: DiagramMode,
    options: &ConvertOptions,
) -> Result<NotationDocument, ConvertError> {
    match mode {
        DiagramMode::Er => er::convert(description, options),
        DiagramMode::Relational => relational::convert(description, options),
    }
}

/// Matches lines carrying a primitive type token followed by an identifier.
fn attribute_pattern() -> Result<&'static Regex, ConvertError> {
    Ok(compiled(&ATTRIBUTE)?)
}

/// Split an attribute line into type, name and modifier suffix.
fn parse_attribute(line: &str) -> Option<Attribute> {
    let mut tokens = line.split_whitespace();
    let typ = tokens.next()?;
    let name = tokens.next()?;
    let modifiers = tokens.collect::<Vec<_>>().join(" ");

    Some(Attribute {
        typ: typ.to_string(),
        name: name.to_string(),
        key: KeyMarker::from_modifiers(&modifiers),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(DiagramMode::from_str("er"), Some(DiagramMode::Er));
        assert_eq!(DiagramMode::from_str("Relational"), Some(DiagramMode::Relational));
        assert_eq!(DiagramMode::from_str("uml"), None);
    }

    #[test]
    fn test_parse_attribute() {
        let attr = parse_attribute("int   id  PK  NOT NULL").unwrap();
        assert_eq!(attr.typ, "int");
        assert_eq!(attr.name, "id");
        assert_eq!(attr.key, Some(KeyMarker::Pk));

        let attr = parse_attribute("varchar email").unwrap();
        assert_eq!(attr.key, None);

        assert!(parse_attribute("int").is_none());
    }

    #[test]
    fn test_attribute_pattern() {
        let re = attribute_pattern().unwrap();
        assert!(re.is_match("int id"));
        assert!(re.is_match("datetime created_at NULL"));
        assert!(!re.is_match("INT id"));
        assert!(!re.is_match("varchar(50) name"));
        assert!(!re.is_match("text ñame"));
    }

    #[test]
    fn test_line_limit_yields_none() {
        let options = ConvertOptions {
            max_lines: Some(2),
            ..ConvertOptions::default()
        };
        let description = "User {\n    int id PK\n}\n";
        assert!(to_notation_with(description, DiagramMode::Er, &options).is_none());

        let err = try_convert(description, DiagramMode::Er, &options).unwrap_err();
        assert!(matches!(err, ConvertError::TooManyLines { lines: 3, limit: 2 }));
    }

    #[test]
    fn test_dispatch_by_mode() {
        let er = to_notation("User {\n}", DiagramMode::Er).unwrap();
        assert_eq!(er, "erDiagram\n    User {\n    }\n");

        let relational = to_notation("users (\n)", DiagramMode::Relational).unwrap();
        assert_eq!(relational, "erDiagram\n    users {\n    }\n");
    }
}
