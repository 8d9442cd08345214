//! Relational descriptions: `table (` ... `)` blocks and
//! `FOREIGN KEY (col) REFERENCES table (col)` lines.

use super::{ConvertError, ConvertOptions, attribute_pattern, parse_attribute};
use crate::notation::{NotationDocument, Relationship};
use crate::pattern::{Pattern, compiled};
use once_cell::sync::Lazy;
use regex::Regex;

const FOREIGN_KEY_MARKER: &str = "FOREIGN KEY";

static FOREIGN_KEY: Pattern = Lazy::new(|| {
    Regex::new(r"FOREIGN KEY\s*\((.*?)\)\s*REFERENCES\s*(.*?)\s*\((.*?)\)")
});

pub fn convert(
    description: &str,
    options: &ConvertOptions,
) -> Result<NotationDocument, ConvertError> {
    options.check(description)?;
    let attribute_re = attribute_pattern()?;
    let foreign_key_re = compiled(&FOREIGN_KEY)?;

    let mut doc = NotationDocument::new();
    let mut current: Option<String> = None;

    for line in description.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = line
            .strip_suffix('(')
            .filter(|_| !line.contains(FOREIGN_KEY_MARKER))
        {
            let name = name.trim();
            doc.open_entity(name);
            // A nameless block is written out but takes no attributes.
            current = Some(name.to_string()).filter(|n| !n.is_empty());
        } else if line == ")" {
            doc.close_entity();
            current = None;
        } else if current.is_some() && attribute_re.is_match(line) {
            if let Some(attr) = parse_attribute(line) {
                doc.attribute(attr);
            }
        } else if line.contains(FOREIGN_KEY_MARKER) {
            match foreign_key_re.captures(line) {
                Some(caps) => {
                    // The relationship points at whichever table is open, if any.
                    doc.relationship(Relationship {
                        left: caps[2].to_string(),
                        right: current.clone().unwrap_or_default(),
                        label: format!("{} references {}", &caps[1], &caps[3]),
                    });
                }
                None => log::debug!("dropping malformed foreign key: {line}"),
            }
        } else {
            log::debug!("dropping line: {line}");
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(description: &str) -> String {
        convert(description, &ConvertOptions::default())
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_convert_table() {
        let description = "\
orders (
    int id PK NOT NULL,
    int customer_id FK NOT NULL,
    decimal total NULL,
    datetime placed_at
)";
        let expected = "\
erDiagram
    orders {
        int id PK
        int customer_id FK
        decimal total NULL
        datetime placed_at
    }
";
        assert_eq!(run(description), expected);
    }

    #[test]
    fn test_foreign_key_inside_table() {
        let description = "\
orders (
    int customer_id FK
    FOREIGN KEY (customer_id) REFERENCES customers (id)
)";
        let output = run(description);
        assert!(output.contains("    customers ||--o{ orders : \"customer_id references id\"\n"));
    }

    #[test]
    fn test_nameless_table_takes_no_attributes() {
        assert_eq!(run("(\n    int id PK\n)"), "erDiagram\n     {\n    }\n");
    }

    #[test]
    fn test_foreign_key_outside_table() {
        let output = run("FOREIGN KEY (customer_id) REFERENCES customers(id)");
        assert_eq!(
            output,
            "erDiagram\n    customers ||--o{  : \"customer_id references id\"\n"
        );
    }

    #[test]
    fn test_foreign_key_line_ending_in_paren_is_not_a_block() {
        let output = run("FOREIGN KEY (a) REFERENCES (");
        assert_eq!(output, "erDiagram\n");
    }

    #[test]
    fn test_malformed_foreign_key_does_not_stop_processing() {
        let description = "\
orders (
    FOREIGN KEY customer_id REFERENCES customers
    int id PK
)";
        let expected = "erDiagram\n    orders {\n        int id PK\n    }\n";
        assert_eq!(run(description), expected);
    }
}
