//! Generate schema descriptions from a catalog.
//!
//! These are the texts a database backend hands to the converters: notation
//! markup for ER mode, a relational model listing for relational mode, and a
//! plain-text ER report for display.

use crate::catalog::{Catalog, Column, Table};
use crate::measure::rule;
use crate::notation::{HEADER, KeyMarker, ONE_TO_MANY};

const TITLE_RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionFormat {
    #[default]
    Notation,
    Text,
    Relational,
}

impl DescriptionFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mermaid" | "notation" => Some(Self::Notation),
            "text" => Some(Self::Text),
            "relational" => Some(Self::Relational),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescribeOptions {
    pub show_cardinalities: bool,
    pub show_attributes: bool,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            show_cardinalities: true,
            show_attributes: true,
        }
    }
}

/// Describe a catalog in the given format.
pub fn describe(catalog: &Catalog, format: DescriptionFormat, options: DescribeOptions) -> String {
    match format {
        DescriptionFormat::Notation => notation(catalog, options),
        DescriptionFormat::Text => text(catalog, options),
        DescriptionFormat::Relational => relational(catalog),
    }
}

/// Notation markup, read back by the ER converter.
pub fn notation(catalog: &Catalog, options: DescribeOptions) -> String {
    let mut lines = vec![HEADER.to_string()];

    for table in &catalog.tables {
        lines.push(format!("    {} {{", table.name));
        if options.show_attributes {
            for column in table.primary_key_first() {
                lines.push(notation_attribute(column));
            }
        }
        lines.push("    }".to_string());
    }

    if options.show_cardinalities {
        for fk in &catalog.foreign_keys {
            lines.push(format!(
                "    {} {ONE_TO_MANY} {} : \"{}\"",
                fk.table, fk.ref_table, fk.name
            ));
        }
    }

    lines.join("\n")
}

fn notation_attribute(column: &Column) -> String {
    let mut line = format!("        {} {}", column.typ, column.name);
    if column.primary_key {
        line.push(' ');
        line.push_str(KeyMarker::Pk.as_str());
        return line;
    }
    if column.foreign_key {
        line.push(' ');
        line.push_str(KeyMarker::Fk.as_str());
    }
    if column.nullable {
        line.push(' ');
        line.push_str(KeyMarker::Null.as_str());
    }
    line
}

/// Plain-text ER report.
pub fn text(catalog: &Catalog, options: DescribeOptions) -> String {
    let mut lines = vec![
        "ENTITY-RELATIONSHIP DIAGRAM (ER/EER)".to_string(),
        "=".repeat(TITLE_RULE_WIDTH),
        String::new(),
    ];

    for table in &catalog.tables {
        let heading = format!("ENTITY: {}", table.name);
        let underline = rule('-', SECTION_RULE_WIDTH, &heading);
        lines.push(heading);
        lines.push(underline);

        if options.show_attributes {
            text_attributes(&mut lines, table);
        }
        lines.push(String::new());
    }

    if options.show_cardinalities && !catalog.foreign_keys.is_empty() {
        lines.push("RELATIONSHIPS:".to_string());
        lines.push("-".repeat(SECTION_RULE_WIDTH));
        for fk in &catalog.foreign_keys {
            lines.push(format!(
                "* {}: {}.{} -> {}.{}",
                fk.name, fk.table, fk.column, fk.ref_table, fk.ref_column
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn text_attributes(lines: &mut Vec<String>, table: &Table) {
    let (keys, others): (Vec<&Column>, Vec<&Column>) =
        table.columns.iter().partition(|c| c.primary_key);

    if !keys.is_empty() {
        lines.push("  PRIMARY KEY ATTRIBUTES:".to_string());
        for column in keys {
            lines.push(format!("    * {} ({})", column.name, column.typ));
        }
    }

    if !others.is_empty() {
        lines.push("  OTHER ATTRIBUTES:".to_string());
        for column in others {
            let mut line = format!("    * {} ({})", column.name, column.typ);
            if column.foreign_key {
                line.push_str(" [FK]");
            }
            if column.nullable {
                line.push_str(" [NULL]");
            }
            lines.push(line);
        }
    }
}

/// Relational model listing, read back by the relational converter.
pub fn relational(catalog: &Catalog) -> String {
    let mut lines = vec![
        "RELATIONAL MODEL".to_string(),
        "=".repeat(TITLE_RULE_WIDTH),
        String::new(),
    ];

    for table in &catalog.tables {
        lines.push(format!("{} (", table.name));

        let columns = table.primary_key_first();
        let last = columns.len().saturating_sub(1);
        for (i, column) in columns.into_iter().enumerate() {
            let mut line = format!("    {} {}", column.name, column.display_type());
            if column.primary_key {
                line.push_str(" PK");
            }
            if column.foreign_key {
                line.push_str(" FK");
            }
            line.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
            if i < last {
                line.push(',');
            }
            lines.push(line);
        }

        lines.push(")".to_string());
        lines.push(String::new());
    }

    if !catalog.foreign_keys.is_empty() {
        lines.push("FOREIGN KEYS:".to_string());
        lines.push("-".repeat(SECTION_RULE_WIDTH));
        for fk in &catalog.foreign_keys {
            lines.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                fk.column, fk.ref_table, fk.ref_column
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ForeignKey, TypeSize};

    fn shop() -> Catalog {
        let mut customers = Table::new("customers");
        customers.columns.push(Column {
            nullable: false,
            primary_key: true,
            ..Column::new("id", "int")
        });
        customers.columns.push(Column {
            size: Some(TypeSize::Length(120)),
            ..Column::new("email", "varchar")
        });

        let mut orders = Table::new("orders");
        orders.columns.push(Column {
            nullable: false,
            foreign_key: true,
            ..Column::new("customer_id", "int")
        });
        orders.columns.push(Column {
            nullable: false,
            primary_key: true,
            ..Column::new("id", "int")
        });

        Catalog {
            tables: vec![customers, orders],
            foreign_keys: vec![ForeignKey {
                name: "FK_orders_customers".into(),
                table: "orders".into(),
                column: "customer_id".into(),
                ref_table: "customers".into(),
                ref_column: "id".into(),
            }],
        }
    }

    #[test]
    fn test_notation() {
        let expected = "\
erDiagram
    customers {
        int id PK
        varchar email NULL
    }
    orders {
        int id PK
        int customer_id FK
    }
    orders ||--o{ customers : \"FK_orders_customers\"";
        assert_eq!(notation(&shop(), DescribeOptions::default()), expected);
    }

    #[test]
    fn test_notation_without_attributes_or_cardinalities() {
        let options = DescribeOptions {
            show_cardinalities: false,
            show_attributes: false,
        };
        assert_eq!(
            notation(&shop(), options),
            "erDiagram\n    customers {\n    }\n    orders {\n    }"
        );
    }

    #[test]
    fn test_text() {
        let output = text(&shop(), DescribeOptions::default());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "ENTITY-RELATIONSHIP DIAGRAM (ER/EER)");
        assert_eq!(lines[3], "ENTITY: customers");
        assert_eq!(lines[4], "-".repeat(30));
        assert_eq!(lines[5], "  PRIMARY KEY ATTRIBUTES:");
        assert_eq!(lines[6], "    * id (int)");
        assert_eq!(lines[7], "  OTHER ATTRIBUTES:");
        assert_eq!(lines[8], "    * email (varchar) [NULL]");
        assert!(output.contains("    * customer_id (int) [FK]\n"));
        assert!(output.contains("* FK_orders_customers: orders.customer_id -> customers.id"));
    }

    #[test]
    fn test_relational() {
        let expected = "\
RELATIONAL MODEL
==================================================

customers (
    id int PK NOT NULL,
    email varchar(120) NULL
)

orders (
    id int PK NOT NULL,
    customer_id int FK NOT NULL
)

FOREIGN KEYS:
------------------------------
FOREIGN KEY (customer_id) REFERENCES customers(id)
";
        assert_eq!(relational(&shop()), expected);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(DescriptionFormat::from_str("mermaid"), Some(DescriptionFormat::Notation));
        assert_eq!(DescriptionFormat::from_str("TEXT"), Some(DescriptionFormat::Text));
        assert_eq!(DescriptionFormat::from_str("svg"), None);
    }
}
