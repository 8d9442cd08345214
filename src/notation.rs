//! Notation documents: the `erDiagram` markup handed to the diagram renderer.

use std::fmt;

/// Header line every notation document starts with.
pub const HEADER: &str = "erDiagram";

/// One-to-many cardinality token.
pub const ONE_TO_MANY: &str = "||--o{";

/// Mirror of [`ONE_TO_MANY`]; recognized but never parsed.
pub const MANY_TO_ONE: &str = "}o--||";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMarker {
    Pk,
    Fk,
    Null,
}

impl KeyMarker {
    /// Pick the marker for a modifier string. `PK` beats `FK` beats `NULL`,
    /// matched by containment so `NOT NULL` counts as `NULL`.
    pub fn from_modifiers(modifiers: &str) -> Option<Self> {
        if modifiers.contains("PK") {
            Some(Self::Pk)
        } else if modifiers.contains("FK") {
            Some(Self::Fk)
        } else if modifiers.contains("NULL") {
            Some(Self::Null)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pk => "PK",
            Self::Fk => "FK",
            Self::Null => "NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub typ: String,
    pub name: String,
    pub key: Option<KeyMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub left: String,
    pub right: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    EntityOpen(String),
    Attribute(Attribute),
    EntityClose,
    Relationship(Relationship),
}

/// Ordered notation statements. Rendered through `Display`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotationDocument {
    statements: Vec<Statement>,
}

impl NotationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_entity(&mut self, name: impl Into<String>) {
        self.statements.push(Statement::EntityOpen(name.into()));
    }

    pub fn close_entity(&mut self) {
        self.statements.push(Statement::EntityClose);
    }

    pub fn attribute(&mut self, attribute: Attribute) {
        self.statements.push(Statement::Attribute(attribute));
    }

    pub fn relationship(&mut self, relationship: Relationship) {
        self.statements.push(Statement::Relationship(relationship));
    }
}

impl fmt::Display for NotationDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        for statement in &self.statements {
            match statement {
                Statement::EntityOpen(name) => writeln!(f, "    {name} {{")?,
                Statement::EntityClose => writeln!(f, "    }}")?,
                Statement::Attribute(attr) => {
                    write!(f, "        {} {}", attr.typ, attr.name)?;
                    if let Some(key) = attr.key {
                        write!(f, " {}", key.as_str())?;
                    }
                    writeln!(f)?;
                }
                Statement::Relationship(rel) => writeln!(
                    f,
                    "    {} {ONE_TO_MANY} {} : \"{}\"",
                    rel.left, rel.right, rel.label
                )?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_marker_precedence() {
        assert_eq!(KeyMarker::from_modifiers("PK FK NULL"), Some(KeyMarker::Pk));
        assert_eq!(KeyMarker::from_modifiers("NULL FK"), Some(KeyMarker::Fk));
        assert_eq!(KeyMarker::from_modifiers("NOT NULL"), Some(KeyMarker::Null));
        assert_eq!(KeyMarker::from_modifiers("unique"), None);
        assert_eq!(KeyMarker::from_modifiers(""), None);
    }

    #[test]
    fn test_empty_document_is_header_only() {
        assert_eq!(NotationDocument::new().to_string(), "erDiagram\n");
    }

    #[test]
    fn test_render_statements() {
        let mut doc = NotationDocument::new();
        doc.open_entity("Customer");
        doc.attribute(Attribute {
            typ: "int".into(),
            name: "id".into(),
            key: Some(KeyMarker::Pk),
        });
        doc.attribute(Attribute {
            typ: "varchar".into(),
            name: "email".into(),
            key: None,
        });
        doc.close_entity();
        doc.relationship(Relationship {
            left: "Customer".into(),
            right: "Order".into(),
            label: "places".into(),
        });

        let expected = "erDiagram\n    Customer {\n        int id PK\n        varchar email\n    }\n    Customer ||--o{ Order : \"places\"\n";
        assert_eq!(doc.to_string(), expected);
    }
}
