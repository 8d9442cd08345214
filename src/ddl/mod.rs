//! SQL DDL to catalog conversion module.

mod lexer;
mod parser;

pub use lexer::Token;
pub use parser::{DdlError, parse_ddl};
