//! In-memory table metadata: the source the backend descriptions are
//! generated from.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub tables: Vec<Table>,
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub typ: String,
    pub size: Option<TypeSize>,
    pub nullable: bool,
    pub primary_key: bool,
    pub foreign_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSize {
    Length(u32),
    Max,
    Precision { precision: u32, scale: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: String,
    pub table: String,
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

impl Catalog {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Columns with primary key columns first, otherwise in declaration order.
    pub fn primary_key_first(&self) -> Vec<&Column> {
        let (mut keys, rest): (Vec<&Column>, Vec<&Column>) =
            self.columns.iter().partition(|c| c.primary_key);
        keys.extend(rest);
        keys
    }
}

impl Column {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            size: None,
            nullable: true,
            primary_key: false,
            foreign_key: false,
        }
    }

    /// Type with its size, for the types whose size is worth showing.
    pub fn display_type(&self) -> String {
        match (self.typ.as_str(), self.size) {
            ("varchar" | "nvarchar" | "char" | "nchar", Some(TypeSize::Length(n))) => {
                format!("{}({n})", self.typ)
            }
            ("varchar" | "nvarchar" | "char" | "nchar", Some(TypeSize::Max)) => {
                format!("{}(MAX)", self.typ)
            }
            ("decimal" | "numeric", Some(TypeSize::Precision { precision, scale })) => {
                format!("{}({precision}, {scale})", self.typ)
            }
            _ => self.typ.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_type() {
        let mut col = Column::new("email", "varchar");
        assert_eq!(col.display_type(), "varchar");

        col.size = Some(TypeSize::Length(255));
        assert_eq!(col.display_type(), "varchar(255)");

        col.size = Some(TypeSize::Max);
        assert_eq!(col.display_type(), "varchar(MAX)");

        let mut price = Column::new("price", "decimal");
        price.size = Some(TypeSize::Precision { precision: 10, scale: 2 });
        assert_eq!(price.display_type(), "decimal(10, 2)");

        let mut id = Column::new("id", "int");
        id.size = Some(TypeSize::Length(4));
        assert_eq!(id.display_type(), "int");
    }

    #[test]
    fn test_primary_key_first() {
        let mut table = Table::new("order_items");
        table.columns.push(Column::new("quantity", "int"));
        table.columns.push(Column {
            primary_key: true,
            ..Column::new("order_id", "int")
        });
        table.columns.push(Column::new("note", "text"));
        table.columns.push(Column {
            primary_key: true,
            ..Column::new("product_id", "int")
        });

        let names: Vec<&str> = table.primary_key_first().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["order_id", "product_id", "quantity", "note"]);
    }

    #[test]
    fn test_table_lookup() {
        let catalog = Catalog {
            tables: vec![Table::new("users"), Table::new("orders")],
            foreign_keys: vec![],
        };
        assert!(catalog.table("orders").is_some());
        assert!(catalog.table("Orders").is_none());
    }
}
