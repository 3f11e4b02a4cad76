//! Front end for the analyzed language: lexer, parser, syntax tree, and
//! symbol resolver.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod resolver;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] lexer::LexError),

    #[error(transparent)]
    Parse(#[from] parser::ParseError),
}

/// Lex and parse a compilation unit.
pub fn parse(source: &str) -> Result<ast::CompilationUnit, SyntaxError> {
    let tokens = lexer::Lexer::new(source).tokenize()?;
    let unit = parser::Parser::new(&tokens).parse()?;
    Ok(unit)
}
