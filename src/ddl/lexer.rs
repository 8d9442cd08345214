//! Tokens for CREATE TABLE / ALTER TABLE scripts.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Create,
    Alter,
    Add,
    Table,
    Only,
    Primary,
    Key,
    Foreign,
    References,
    Not,
    Null,
    Unique,
    Default,
    On,
    Constraint,
    Index,
    If,
    Exists,
    Check,

    // Identifiers and literals
    Ident(String),
    Str(String),
    Num(String),

    // Symbols
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,

    // End of input
    Eof,
}

impl Token {
    /// Case-insensitive check for a word the lexer leaves as an identifier.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Ident(s) if s.eq_ignore_ascii_case(word))
    }
}

/// Scans DDL text into tokens. Comments and operators the schema reader
/// has no use for are skipped.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn first(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) {
        if let Some(c) = self.first() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume the longest prefix whose chars satisfy `pred`.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_to_line_end(&mut self) {
        self.eat_while(|c| c != '\n');
    }

    fn skip_block_comment(&mut self) {
        match self.rest().find("*/") {
            Some(end) => self.pos += end + 2,
            None => self.pos = self.input.len(),
        }
    }

    /// Text up to `close`; a doubled `close` stands for itself.
    fn delimited(&mut self, close: char) -> String {
        self.bump();
        let mut text = String::new();
        while let Some(c) = self.first() {
            self.bump();
            if c != close {
                text.push(c);
            } else if self.first() == Some(close) {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text
    }

    fn number(&mut self) -> String {
        let start = self.pos;
        if self.first() == Some('-') {
            self.bump();
        }
        self.eat_while(|c| c.is_ascii_digit());
        if self.first() == Some('.') {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        self.input[start..self.pos].to_string()
    }

    fn word(&mut self) -> Token {
        let word = self.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
        keyword(word).unwrap_or_else(|| Token::Ident(word.to_string()))
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            self.eat_while(char::is_whitespace);

            let Some(c) = self.first() else {
                return Token::Eof;
            };
            let symbol = match c {
                '(' => Some(Token::LParen),
                ')' => Some(Token::RParen),
                ',' => Some(Token::Comma),
                ';' => Some(Token::Semicolon),
                '.' => Some(Token::Dot),
                _ => None,
            };
            if let Some(token) = symbol {
                self.bump();
                return token;
            }

            match (c, self.second()) {
                ('-', Some('-')) | ('#', _) => self.skip_to_line_end(),
                ('/', Some('*')) => {
                    self.pos += 2;
                    self.skip_block_comment();
                }
                ('-', Some(d)) if d.is_ascii_digit() => return Token::Num(self.number()),
                (d, _) if d.is_ascii_digit() => return Token::Num(self.number()),
                ('"', _) => return Token::Ident(self.delimited('"')),
                ('`', _) => return Token::Ident(self.delimited('`')),
                // SQL Server [bracketed] names
                ('[', _) => return Token::Ident(self.delimited(']')),
                ('\'', _) => return Token::Str(self.delimited('\'')),
                (w, _) if w.is_alphabetic() || w == '_' => return self.word(),
                _ => self.bump(),
            }
        }
    }

    /// All tokens, ending with `Token::Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token == Token::Eof {
                tokens.push(token);
                return tokens;
            }
            tokens.push(token);
        }
    }
}

fn keyword(word: &str) -> Option<Token> {
    let token = match word.to_ascii_uppercase().as_str() {
        "CREATE" => Token::Create,
        "ALTER" => Token::Alter,
        "ADD" => Token::Add,
        "TABLE" => Token::Table,
        "ONLY" => Token::Only,
        "PRIMARY" => Token::Primary,
        "KEY" => Token::Key,
        "FOREIGN" => Token::Foreign,
        "REFERENCES" => Token::References,
        "NOT" => Token::Not,
        "NULL" => Token::Null,
        "UNIQUE" => Token::Unique,
        "DEFAULT" => Token::Default,
        "ON" => Token::On,
        "CONSTRAINT" => Token::Constraint,
        "INDEX" => Token::Index,
        "IF" => Token::If,
        "EXISTS" => Token::Exists,
        "CHECK" => Token::Check,
        _ => return None,
    };
    Some(token)
}
