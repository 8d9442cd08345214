//! SQL parser for CREATE TABLE and ALTER TABLE ... FOREIGN KEY statements.

use super::lexer::{Lexer, Token};
use crate::catalog::{Catalog, Column, ForeignKey, Table, TypeSize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DdlError {
    #[error("Expected {expected}, found {found:?}")]
    Expected { expected: &'static str, found: Token },
}

/// Parse SQL DDL into a catalog.
///
/// Statements other than CREATE TABLE and ALTER TABLE ... ADD CONSTRAINT
/// ... FOREIGN KEY are skipped.
pub fn parse_ddl(input: &str) -> Result<Catalog, DdlError> {
    let tokens = Lexer::new(input).tokenize();
    Parser::new(tokens).parse()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn take_ident(&mut self) -> Option<String> {
        match self.current() {
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    fn parse(&mut self) -> Result<Catalog, DdlError> {
        let mut tables = Vec::new();
        let mut foreign_keys = Vec::new();

        while self.current() != &Token::Eof {
            match self.current() {
                Token::Create => {
                    self.advance();
                    if self.current() == &Token::Table {
                        self.advance();
                        self.skip_if_not_exists();
                        if let Some((table, fks)) = self.parse_create_table()? {
                            tables.push(table);
                            foreign_keys.extend(fks);
                        }
                    } else {
                        // CREATE INDEX, CREATE VIEW, ...
                        self.skip_statement();
                    }
                }
                Token::Alter => {
                    foreign_keys.extend(self.parse_alter_table_fk()?);
                }
                _ => self.advance(),
            }
        }

        let mut catalog = Catalog {
            tables,
            foreign_keys: Vec::new(),
        };
        for fk in foreign_keys {
            if catalog.table(&fk.ref_table).is_none() {
                log::debug!("skipping {}: unknown table {}", fk.name, fk.ref_table);
                continue;
            }
            let Some(column) = catalog
                .table_mut(&fk.table)
                .and_then(|t| t.column_mut(&fk.column))
            else {
                log::debug!("skipping {}: unknown column {}.{}", fk.name, fk.table, fk.column);
                continue;
            };
            column.foreign_key = true;
            catalog.foreign_keys.push(fk);
        }

        Ok(catalog)
    }

    fn skip_if_not_exists(&mut self) {
        if self.current() == &Token::If {
            self.advance();
            if self.current() == &Token::Not {
                self.advance();
            }
            if self.current() == &Token::Exists {
                self.advance();
            }
        }
    }

    /// Read `name` or `schema.name`, keeping the last part.
    fn parse_qualified_name(&mut self) -> Option<String> {
        let mut name = self.take_ident()?;
        while self.current() == &Token::Dot {
            self.advance();
            name = self.take_ident()?;
        }
        Some(name)
    }

    fn parse_create_table(&mut self) -> Result<Option<(Table, Vec<ForeignKey>)>, DdlError> {
        let Some(name) = self.parse_qualified_name() else {
            self.skip_statement();
            return Ok(None);
        };

        if self.current() != &Token::LParen {
            self.skip_statement();
            return Ok(None);
        }
        self.advance();

        let mut table = Table::new(name);
        let mut fks = Vec::new();
        let mut pk_columns: Vec<String> = Vec::new();
        let mut constraint_name: Option<String> = None;

        loop {
            match self.current() {
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    self.advance();
                    constraint_name = None;
                }
                Token::Constraint => {
                    self.advance();
                    constraint_name = self.take_ident();
                }
                Token::Primary => {
                    // PRIMARY KEY [CLUSTERED] (col1, col2, ...)
                    self.advance();
                    if self.current() == &Token::Key {
                        self.advance();
                    }
                    while self.take_ident().is_some() {}
                    pk_columns.extend(self.parse_column_list());
                }
                Token::Foreign => {
                    fks.extend(self.parse_foreign_key_constraint(
                        &table.name,
                        constraint_name.take(),
                    )?);
                }
                Token::Unique => {
                    self.advance();
                    if self.current() == &Token::Key {
                        self.advance();
                    }
                    self.skip_until(&[Token::Comma, Token::RParen]);
                }
                Token::Index | Token::Key => {
                    self.skip_until(&[Token::Comma, Token::RParen]);
                }
                Token::Check => {
                    self.advance();
                    self.skip_parenthesized();
                }
                Token::Ident(_) => {
                    if let Some(column) = self.parse_column(&table.name, &mut fks)? {
                        table.columns.push(column);
                    }
                }
                Token::Eof => break,
                _ => self.advance(),
            }
        }

        // Table options (ENGINE=, WITH (...), ON [PRIMARY], ...)
        self.skip_statement();

        for column in &mut table.columns {
            if pk_columns.contains(&column.name) {
                column.primary_key = true;
            }
            if column.primary_key {
                column.nullable = false;
            }
        }

        Ok(Some((table, fks)))
    }

    fn parse_column(
        &mut self,
        table: &str,
        fks: &mut Vec<ForeignKey>,
    ) -> Result<Option<Column>, DdlError> {
        let Some(name) = self.take_ident() else {
            return Ok(None);
        };
        let Some(typ) = self.take_ident() else {
            // Not a column definition; leave the rest to the body loop.
            self.skip_until(&[Token::Comma, Token::RParen]);
            return Ok(None);
        };

        let mut column = Column::new(name, typ.to_lowercase());
        if self.current() == &Token::LParen {
            column.size = self.parse_type_size(&column.typ);
        }

        let mut constraint_name: Option<String> = None;

        loop {
            match self.current() {
                Token::Primary => {
                    self.advance();
                    if self.current() == &Token::Key {
                        self.advance();
                    }
                    column.primary_key = true;
                }
                Token::Not => {
                    self.advance();
                    if self.current() == &Token::Null {
                        self.advance();
                        column.nullable = false;
                    }
                }
                Token::Null => {
                    self.advance();
                    column.nullable = true;
                }
                Token::Unique => {
                    self.advance();
                    if self.current() == &Token::Key {
                        self.advance();
                    }
                }
                Token::Default => {
                    self.advance();
                    self.skip_default_value();
                }
                Token::References => {
                    // Inline FK reference
                    self.advance();
                    let (ref_table, ref_column) = self.parse_reference()?;
                    fks.push(ForeignKey {
                        name: constraint_name
                            .take()
                            .unwrap_or_else(|| default_fk_name(table, &ref_table)),
                        table: table.to_string(),
                        column: column.name.clone(),
                        ref_table,
                        ref_column,
                    });
                    self.skip_on_actions();
                }
                Token::Check => {
                    self.advance();
                    self.skip_parenthesized();
                }
                Token::Constraint => {
                    self.advance();
                    constraint_name = self.take_ident();
                }
                Token::On => self.skip_on_actions(),
                // IDENTITY(1,1), COLLATE ..., generated column bodies
                Token::LParen => self.skip_parenthesized(),
                Token::Comma | Token::RParen | Token::Eof => break,
                _ => self.advance(),
            }
        }

        Ok(Some(column))
    }

    /// Parse `(n)`, `(max)` or `(p, s)` after a type name.
    fn parse_type_size(&mut self, typ: &str) -> Option<TypeSize> {
        self.advance(); // (
        let mut args = Vec::new();
        loop {
            match self.current() {
                Token::Num(n) => {
                    args.push(n.clone());
                    self.advance();
                }
                Token::Ident(s) => {
                    args.push(s.to_lowercase());
                    self.advance();
                }
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
                _ => self.advance(),
            }
        }

        let numbers: Vec<u32> = args.iter().filter_map(|a| a.parse().ok()).collect();
        match (args.as_slice(), numbers.as_slice()) {
            ([arg], _) if arg == "max" => Some(TypeSize::Max),
            (_, [precision, scale]) => Some(TypeSize::Precision {
                precision: *precision,
                scale: *scale,
            }),
            (_, [n]) if matches!(typ, "decimal" | "numeric") => Some(TypeSize::Precision {
                precision: *n,
                scale: 0,
            }),
            (_, [n]) => Some(TypeSize::Length(*n)),
            _ => None,
        }
    }

    fn skip_default_value(&mut self) {
        match self.current() {
            Token::LParen => self.skip_parenthesized(),
            Token::Ident(_) => {
                self.advance();
                // Function calls like NOW() or getdate()
                if self.current() == &Token::LParen {
                    self.skip_parenthesized();
                }
            }
            Token::Str(_) | Token::Num(_) | Token::Null => self.advance(),
            _ => {}
        }
    }

    fn parse_reference(&mut self) -> Result<(String, String), DdlError> {
        let Some(target) = self.parse_qualified_name() else {
            return Err(DdlError::Expected {
                expected: "referenced table",
                found: self.current().clone(),
            });
        };

        let column = if self.current() == &Token::LParen {
            self.parse_column_list().into_iter().next()
        } else {
            None
        };

        Ok((target, column.unwrap_or_else(|| "id".to_string())))
    }

    fn parse_foreign_key_constraint(
        &mut self,
        table: &str,
        name: Option<String>,
    ) -> Result<Vec<ForeignKey>, DdlError> {
        self.advance(); // FOREIGN
        if self.current() != &Token::Key {
            return Ok(Vec::new());
        }
        self.advance(); // KEY

        let columns = self.parse_column_list();

        if self.current() != &Token::References {
            return Ok(Vec::new());
        }
        self.advance();

        let Some(ref_table) = self.parse_qualified_name() else {
            return Err(DdlError::Expected {
                expected: "referenced table",
                found: self.current().clone(),
            });
        };
        let ref_columns = self.parse_column_list();

        self.skip_on_actions();

        let name = name.unwrap_or_else(|| default_fk_name(table, &ref_table));
        Ok(columns
            .into_iter()
            .zip(ref_columns)
            .map(|(column, ref_column)| ForeignKey {
                name: name.clone(),
                table: table.to_string(),
                column,
                ref_table: ref_table.clone(),
                ref_column,
            })
            .collect())
    }

    fn parse_column_list(&mut self) -> Vec<String> {
        let mut cols = Vec::new();

        if self.current() != &Token::LParen {
            return cols;
        }
        self.advance();

        loop {
            match self.current() {
                Token::Ident(name) => {
                    cols.push(name.clone());
                    self.advance();
                    // ASC / DESC after a key column
                    while self.current().is_word("ASC") || self.current().is_word("DESC") {
                        self.advance();
                    }
                }
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
                _ => self.advance(),
            }
        }

        cols
    }

    fn skip_on_actions(&mut self) {
        while self.current() == &Token::On {
            self.advance();
            // DELETE or UPDATE
            if self.current().is_word("DELETE") || self.current().is_word("UPDATE") {
                self.advance();
            }
            // CASCADE, RESTRICT, SET NULL, SET DEFAULT, NO ACTION
            if self.current().is_word("SET") {
                self.advance();
                if matches!(self.current(), Token::Null | Token::Default) {
                    self.advance();
                }
            } else if self.current().is_word("NO") {
                self.advance();
                if self.current().is_word("ACTION") {
                    self.advance();
                }
            } else if self.current().is_word("CASCADE") || self.current().is_word("RESTRICT") {
                self.advance();
            }
        }
    }

    fn skip_parenthesized(&mut self) {
        if self.current() != &Token::LParen {
            return;
        }
        self.advance();
        let mut depth = 1;
        while depth > 0 {
            match self.current() {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                Token::Eof => break,
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_statement(&mut self) {
        while !matches!(self.current(), Token::Semicolon | Token::Eof) {
            self.advance();
        }
        if self.current() == &Token::Semicolon {
            self.advance();
        }
    }

    fn skip_until(&mut self, tokens: &[Token]) {
        while !tokens.contains(self.current()) && self.current() != &Token::Eof {
            if self.current() == &Token::LParen {
                self.skip_parenthesized();
            } else {
                self.advance();
            }
        }
    }

    /// Parse ALTER TABLE [ONLY] t ADD CONSTRAINT name FOREIGN KEY ...
    fn parse_alter_table_fk(&mut self) -> Result<Vec<ForeignKey>, DdlError> {
        self.advance(); // ALTER

        if self.current() != &Token::Table {
            self.skip_statement();
            return Ok(Vec::new());
        }
        self.advance(); // TABLE

        if self.current() == &Token::Only {
            self.advance();
        }

        let Some(table) = self.parse_qualified_name() else {
            self.skip_statement();
            return Ok(Vec::new());
        };

        // SQL Server: ALTER TABLE t WITH CHECK ADD CONSTRAINT ...
        while self.current() != &Token::Add
            && !matches!(self.current(), Token::Semicolon | Token::Eof)
        {
            self.advance();
        }
        if self.current() != &Token::Add {
            self.skip_statement();
            return Ok(Vec::new());
        }
        self.advance(); // ADD

        let mut name = None;
        if self.current() == &Token::Constraint {
            self.advance();
            name = self.take_ident();
        }

        if self.current() != &Token::Foreign {
            self.skip_statement();
            return Ok(Vec::new());
        }

        let fks = self.parse_foreign_key_constraint(&table, name)?;
        self.skip_statement();
        Ok(fks)
    }
}

fn default_fk_name(table: &str, ref_table: &str) -> String {
    format!("FK_{table}_{ref_table}")
}
