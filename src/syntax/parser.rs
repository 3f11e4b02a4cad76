//! Recursive-descent parser for the analyzed language.

use crate::syntax::ast::{
    BinOp, ClassDecl, CompilationUnit, Expr, ExprKind, FieldDecl, MethodDecl, Modifiers, NodeIdGen,
    Param, PropertyDecl, Stmt, StmtKind, UnaryOp, Visibility,
};
use crate::syntax::lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected {0:?}, found {1:?}")]
    ExpectedToken(TokenKind, Token),

    #[error("expected keyword `{0}`, found {1:?}")]
    ExpectedKeyword(String, Token),

    #[error("expected identifier, found {0:?}")]
    ExpectedIdent(Token),

    #[error("expected class member, found {0:?}")]
    ExpectedMember(Token),

    #[error("expected primary expression, found {0:?}")]
    ExpectedPrimary(Token),

    #[error("unexpected token: {0:?}")]
    UnexpectedToken(Token),
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    curr_token: &'a Token,
    ids: NodeIdGen,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            curr_token: &tokens[0],
            ids: NodeIdGen::new(),
        }
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
            self.curr_token = &self.tokens[self.pos];
        }
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn consume(&mut self, expected: &TokenKind) -> Result<(), ParseError> {
        if self.curr_token.kind == *expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::ExpectedToken(
                expected.clone(),
                self.curr_token.clone(),
            ))
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.curr_token.kind, TokenKind::Ident(name) if name == keyword)
    }

    fn consume_keyword(&mut self, expected: &str) -> Result<(), ParseError> {
        if self.at_keyword(expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::ExpectedKeyword(
                expected.to_string(),
                self.curr_token.clone(),
            ))
        }
    }

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = &self.curr_token.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::ExpectedIdent(self.curr_token.clone()))
        }
    }

    pub fn parse(&mut self) -> Result<CompilationUnit, ParseError> {
        let mut classes = Vec::new();
        while self.at_keyword("class") {
            classes.push(self.parse_class()?);
        }
        if self.curr_token.kind != TokenKind::Eof {
            return Err(ParseError::UnexpectedToken(self.curr_token.clone()));
        }
        Ok(CompilationUnit { classes })
    }

    fn parse_class(&mut self) -> Result<ClassDecl, ParseError> {
        self.consume_keyword("class")?;
        let name = self.parse_ident()?;
        self.consume(&TokenKind::LBrace)?;

        let mut class = ClassDecl {
            name,
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        };
        while self.curr_token.kind != TokenKind::RBrace {
            self.parse_member(&mut class)?;
        }
        self.consume(&TokenKind::RBrace)?;
        Ok(class)
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            match &self.curr_token.kind {
                TokenKind::Ident(name) => match name.as_str() {
                    "static" => modifiers.is_static = true,
                    "public" => modifiers.visibility = Visibility::Public,
                    "private" => modifiers.visibility = Visibility::Private,
                    "protected" => modifiers.visibility = Visibility::Protected,
                    "internal" => modifiers.visibility = Visibility::Internal,
                    _ => return modifiers,
                },
                _ => return modifiers,
            }
            self.advance();
        }
    }

    fn parse_member(&mut self, class: &mut ClassDecl) -> Result<(), ParseError> {
        let modifiers = self.parse_modifiers();
        let ty = self.parse_ident()?;
        let name = self.parse_ident()?;

        match &self.curr_token.kind {
            TokenKind::LParen => {
                let method = self.parse_method_rest(modifiers, ty, name)?;
                class.methods.push(method);
            }
            TokenKind::LBrace => {
                self.parse_accessors()?;
                class.properties.push(PropertyDecl {
                    modifiers,
                    ty,
                    name,
                });
            }
            TokenKind::Equals => {
                self.advance();
                let init = self.parse_expr()?;
                self.consume(&TokenKind::Semicolon)?;
                class.fields.push(FieldDecl {
                    modifiers,
                    ty,
                    name,
                    init: Some(init),
                });
            }
            TokenKind::Semicolon => {
                self.advance();
                class.fields.push(FieldDecl {
                    modifiers,
                    ty,
                    name,
                    init: None,
                });
            }
            _ => return Err(ParseError::ExpectedMember(self.curr_token.clone())),
        }
        Ok(())
    }

    fn parse_method_rest(
        &mut self,
        modifiers: Modifiers,
        return_type: String,
        name: String,
    ) -> Result<MethodDecl, ParseError> {
        self.consume(&TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.consume(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(MethodDecl {
            modifiers,
            return_type,
            name,
            params,
            body,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        while self.curr_token.kind != TokenKind::RParen {
            let ty = self.parse_ident()?;
            let name = self.parse_ident()?;
            params.push(Param { ty, name });
            if self.curr_token.kind == TokenKind::Comma {
                self.advance();
            }
        }
        Ok(params)
    }

    fn parse_accessors(&mut self) -> Result<(), ParseError> {
        self.consume(&TokenKind::LBrace)?;
        while self.at_keyword("get") || self.at_keyword("set") {
            self.advance();
            self.consume(&TokenKind::Semicolon)?;
        }
        self.consume(&TokenKind::RBrace)?;
        Ok(())
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.consume(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while self.curr_token.kind != TokenKind::RBrace {
            body.push(self.parse_stmt()?);
        }
        self.consume(&TokenKind::RBrace)?;
        Ok(body)
    }

    /// A braced block, or a single statement as a one-element body.
    fn parse_block_or_stmt(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.curr_token.kind == TokenKind::LBrace {
            self.parse_block()
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        if self.at_keyword("return") {
            self.advance();
            let value = if self.curr_token.kind == TokenKind::Semicolon {
                None
            } else {
                Some(self.parse_expr()?)
            };
            self.consume(&TokenKind::Semicolon)?;
            return Ok(Stmt {
                kind: StmtKind::Return(value),
            });
        }
        if self.at_keyword("if") {
            self.advance();
            self.consume(&TokenKind::LParen)?;
            let cond = self.parse_expr()?;
            self.consume(&TokenKind::RParen)?;
            let then_body = self.parse_block_or_stmt()?;
            let else_body = if self.at_keyword("else") {
                self.advance();
                self.parse_block_or_stmt()?
            } else {
                Vec::new()
            };
            return Ok(Stmt {
                kind: StmtKind::If {
                    cond,
                    then_body,
                    else_body,
                },
            });
        }
        if self.at_keyword("while") {
            self.advance();
            self.consume(&TokenKind::LParen)?;
            let cond = self.parse_expr()?;
            self.consume(&TokenKind::RParen)?;
            let body = self.parse_block_or_stmt()?;
            return Ok(Stmt {
                kind: StmtKind::While { cond, body },
            });
        }
        // `type name [= expr];` is a local declaration; anything else that
        // starts with an identifier is an expression statement.
        if matches!(self.curr_token.kind, TokenKind::Ident(_))
            && matches!(self.peek_kind(1), Some(TokenKind::Ident(_)))
            && matches!(
                self.peek_kind(2),
                Some(TokenKind::Equals) | Some(TokenKind::Semicolon)
            )
        {
            let ty = self.parse_ident()?;
            let name = self.parse_ident()?;
            let init = if self.curr_token.kind == TokenKind::Equals {
                self.advance();
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.consume(&TokenKind::Semicolon)?;
            return Ok(Stmt {
                kind: StmtKind::Local { ty, name, init },
            });
        }
        let expr = self.parse_expr()?;
        self.consume(&TokenKind::Semicolon)?;
        Ok(Stmt {
            kind: StmtKind::Expr(expr),
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_binary(0)?;
        if self.curr_token.kind == TokenKind::Equals {
            self.advance();
            let value = self.parse_expr()?;
            let id = self.ids.new_id();
            return Ok(Expr {
                id,
                kind: ExprKind::Assign {
                    target: Box::new(lhs),
                    value: Box::new(value),
                },
            });
        }
        Ok(lhs)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        while let Some((op, bp)) = Self::bin_op_from_token(&self.curr_token.kind) {
            if bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(bp + 1)?;
            let id = self.ids.new_id();
            lhs = Expr {
                id,
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
        }
        Ok(lhs)
    }

    fn bin_op_from_token(token: &TokenKind) -> Option<(BinOp, u8)> {
        match token {
            TokenKind::OrOr => Some((BinOp::Or, 1)),
            TokenKind::AndAnd => Some((BinOp::And, 2)),
            TokenKind::EqEq => Some((BinOp::Eq, 3)),
            TokenKind::NotEq => Some((BinOp::Ne, 3)),
            TokenKind::LessThan => Some((BinOp::Lt, 4)),
            TokenKind::GreaterThan => Some((BinOp::Gt, 4)),
            TokenKind::LessThanEq => Some((BinOp::Le, 4)),
            TokenKind::GreaterThanEq => Some((BinOp::Ge, 4)),
            TokenKind::Plus => Some((BinOp::Add, 5)),
            TokenKind::Minus => Some((BinOp::Sub, 5)),
            TokenKind::Star => Some((BinOp::Mul, 6)),
            TokenKind::Slash => Some((BinOp::Div, 6)),
            TokenKind::Percent => Some((BinOp::Rem, 6)),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.curr_token.kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let id = self.ids.new_id();
            return Ok(Expr {
                id,
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.curr_token.kind {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.parse_ident()?;
                    let name_id = self.ids.new_id();
                    let id = self.ids.new_id();
                    expr = Expr {
                        id,
                        kind: ExprKind::Member {
                            receiver: Box::new(expr),
                            name,
                            name_id,
                        },
                    };
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_args()?;
                    self.consume(&TokenKind::RParen)?;
                    let id = self.ids.new_id();
                    expr = Expr {
                        id,
                        kind: ExprKind::Invoke {
                            callee: Box::new(expr),
                            args,
                        },
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        while self.curr_token.kind != TokenKind::RParen {
            args.push(self.parse_expr()?);
            if self.curr_token.kind == TokenKind::Comma {
                self.advance();
            }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let kind = match &self.curr_token.kind {
            TokenKind::IntLit(value) => {
                let value = *value;
                self.advance();
                ExprKind::IntLit(value)
            }
            TokenKind::StringLit(value) => {
                let value = value.clone();
                self.advance();
                ExprKind::StringLit(value)
            }
            TokenKind::Ident(name) if name == "true" => {
                self.advance();
                ExprKind::BoolLit(true)
            }
            TokenKind::Ident(name) if name == "false" => {
                self.advance();
                ExprKind::BoolLit(false)
            }
            TokenKind::Ident(name) if name == "new" => {
                self.advance();
                let class = self.parse_ident()?;
                self.consume(&TokenKind::LParen)?;
                let args = self.parse_args()?;
                self.consume(&TokenKind::RParen)?;
                ExprKind::New { class, args }
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                ExprKind::Ident(name)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.consume(&TokenKind::RParen)?;
                return Ok(inner);
            }
            _ => return Err(ParseError::ExpectedPrimary(self.curr_token.clone())),
        };
        let id = self.ids.new_id();
        Ok(Expr { id, kind })
    }
}
