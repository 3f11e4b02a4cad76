//! Hand-written lexer for the analyzed language.

use std::iter::Peekable;
use std::num::ParseIntError;
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub pos: usize,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum TokenKind {
    Ident(String),
    IntLit(i64),
    StringLit(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Equals,
    EqEq,
    NotEq,
    LessThan,
    GreaterThan,
    LessThanEq,
    GreaterThanEq,
    AndAnd,
    OrOr,
    Eof,
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unexpected character {0:?} at byte {1}")]
    UnexpectedCharacter(char, usize),

    #[error("invalid integer literal at byte {1}: {0}")]
    InvalidInteger(ParseIntError, usize),

    #[error("unterminated string literal starting at byte {0}")]
    UnterminatedString(usize),

    #[error("unterminated block comment starting at byte {0}")]
    UnterminatedComment(usize),
}

pub struct Lexer<'a> {
    source: Peekable<Chars<'a>>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.chars().peekable(),
            pos: 0,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.next();
        if let Some(c) = ch {
            self.pos += c.len_utf8();
        }
        ch
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            while let Some(&ch) = self.source.peek() {
                if !ch.is_whitespace() {
                    break;
                }
                self.advance();
            }
            if self.source.peek() != Some(&'/') {
                return Ok(());
            }
            let start = self.pos;
            let mut lookahead = self.source.clone();
            lookahead.next();
            match lookahead.peek() {
                Some('/') => {
                    while let Some(&ch) = self.source.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('*') => {
                    self.advance();
                    self.advance();
                    let mut prev = '\0';
                    loop {
                        match self.advance() {
                            Some('/') if prev == '*' => break,
                            Some(ch) => prev = ch,
                            None => return Err(LexError::UnterminatedComment(start)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        let pos = self.pos;
        let kind = self.next_kind(pos)?;
        Ok(Token { kind, pos })
    }

    fn next_kind(&mut self, pos: usize) -> Result<TokenKind, LexError> {
        match self.source.peek() {
            Some(&ch) if ch.is_alphabetic() || ch == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = self.source.peek() {
                    if !ch.is_alphanumeric() && ch != '_' {
                        break;
                    }
                    ident.push(ch);
                    self.advance();
                }
                Ok(TokenKind::Ident(ident))
            }
            Some(&ch) if ch.is_ascii_digit() => {
                let mut num_str = String::new();
                while let Some(&ch) = self.source.peek() {
                    if !ch.is_ascii_digit() {
                        break;
                    }
                    num_str.push(ch);
                    self.advance();
                }
                let value = num_str
                    .parse::<i64>()
                    .map_err(|e| LexError::InvalidInteger(e, pos))?;
                Ok(TokenKind::IntLit(value))
            }
            Some(&'"') => {
                self.advance();
                let mut value = String::new();
                loop {
                    match self.advance() {
                        Some('"') => break,
                        Some('\\') => match self.advance() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(ch) => value.push(ch),
                            None => return Err(LexError::UnterminatedString(pos)),
                        },
                        Some(ch) => value.push(ch),
                        None => return Err(LexError::UnterminatedString(pos)),
                    }
                }
                Ok(TokenKind::StringLit(value))
            }
            Some(&'(') => {
                self.advance();
                Ok(TokenKind::LParen)
            }
            Some(&')') => {
                self.advance();
                Ok(TokenKind::RParen)
            }
            Some(&'{') => {
                self.advance();
                Ok(TokenKind::LBrace)
            }
            Some(&'}') => {
                self.advance();
                Ok(TokenKind::RBrace)
            }
            Some(&',') => {
                self.advance();
                Ok(TokenKind::Comma)
            }
            Some(&'.') => {
                self.advance();
                Ok(TokenKind::Dot)
            }
            Some(&';') => {
                self.advance();
                Ok(TokenKind::Semicolon)
            }
            Some(&'+') => {
                self.advance();
                Ok(TokenKind::Plus)
            }
            Some(&'-') => {
                self.advance();
                Ok(TokenKind::Minus)
            }
            Some(&'*') => {
                self.advance();
                Ok(TokenKind::Star)
            }
            Some(&'/') => {
                self.advance();
                Ok(TokenKind::Slash)
            }
            Some(&'%') => {
                self.advance();
                Ok(TokenKind::Percent)
            }
            Some(&'=') => {
                self.advance();
                if self.source.peek() == Some(&'=') {
                    self.advance();
                    Ok(TokenKind::EqEq)
                } else {
                    Ok(TokenKind::Equals)
                }
            }
            Some(&'!') => {
                self.advance();
                if self.source.peek() == Some(&'=') {
                    self.advance();
                    Ok(TokenKind::NotEq)
                } else {
                    Ok(TokenKind::Bang)
                }
            }
            Some(&'<') => {
                self.advance();
                if self.source.peek() == Some(&'=') {
                    self.advance();
                    Ok(TokenKind::LessThanEq)
                } else {
                    Ok(TokenKind::LessThan)
                }
            }
            Some(&'>') => {
                self.advance();
                if self.source.peek() == Some(&'=') {
                    self.advance();
                    Ok(TokenKind::GreaterThanEq)
                } else {
                    Ok(TokenKind::GreaterThan)
                }
            }
            Some(&'&') => {
                self.advance();
                if self.source.peek() == Some(&'&') {
                    self.advance();
                    Ok(TokenKind::AndAnd)
                } else {
                    Err(LexError::UnexpectedCharacter('&', pos))
                }
            }
            Some(&'|') => {
                self.advance();
                if self.source.peek() == Some(&'|') {
                    self.advance();
                    Ok(TokenKind::OrOr)
                } else {
                    Err(LexError::UnexpectedCharacter('|', pos))
                }
            }
            Some(&ch) => Err(LexError::UnexpectedCharacter(ch, pos)),
            None => Ok(TokenKind::Eof),
        }
    }

    /// Lex the whole input, ending with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_member_invocation() {
        assert_eq!(
            kinds(r#"Console.WriteLine("x");"#),
            vec![
                TokenKind::Ident("Console".into()),
                TokenKind::Dot,
                TokenKind::Ident("WriteLine".into()),
                TokenKind::LParen,
                TokenKind::StringLit("x".into()),
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_two_char_operators() {
        assert_eq!(
            kinds("a == b != c <= d >= e && f || g"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::EqEq,
                TokenKind::Ident("b".into()),
                TokenKind::NotEq,
                TokenKind::Ident("c".into()),
                TokenKind::LessThanEq,
                TokenKind::Ident("d".into()),
                TokenKind::GreaterThanEq,
                TokenKind::Ident("e".into()),
                TokenKind::AndAnd,
                TokenKind::Ident("f".into()),
                TokenKind::OrOr,
                TokenKind::Ident("g".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("a // line\n/* block\nstill block */ b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""a\nb\"c""#),
            vec![TokenKind::StringLit("a\nb\"c".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn rejects_stray_ampersand() {
        let err = Lexer::new("a & b").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter('&', _)));
    }

    #[test]
    fn reports_unterminated_string() {
        let err = Lexer::new("\"abc").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString(0)));
    }
}
