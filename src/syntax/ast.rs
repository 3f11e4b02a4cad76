//! Syntax tree for the analyzed language.
//!
//! Expressions carry dense `NodeId` handles assigned by the parser; method
//! declarations are addressed by `MethodRef` handles. Handles are plain
//! indices into the tree that produced them, so downstream identities hold
//! no borrows.

use std::fmt;

/// Id of an expression node, unique within one compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

pub struct NodeIdGen {
    next_id: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn new_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for NodeIdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle of a method declaration: class index and method index within the
/// class, both in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodRef {
    pub class: usize,
    pub method: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    pub classes: Vec<ClassDecl>,
}

impl CompilationUnit {
    pub fn class(&self, index: usize) -> &ClassDecl {
        &self.classes[index]
    }

    pub fn method(&self, decl: MethodRef) -> &MethodDecl {
        &self.classes[decl.class].methods[decl.method]
    }

    /// All method declarations in document order.
    pub fn methods(&self) -> impl Iterator<Item = (MethodRef, &MethodDecl)> + '_ {
        self.classes.iter().enumerate().flat_map(|(ci, class)| {
            class.methods.iter().enumerate().map(move |(mi, method)| {
                (
                    MethodRef {
                        class: ci,
                        method: mi,
                    },
                    method,
                )
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub ty: String,
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub modifiers: Modifiers,
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub is_static: bool,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Private,
    Public,
    Protected,
    Internal,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Local {
        ty: String,
        name: String,
        init: Option<Expr>,
    },
    Return(Option<Expr>),
    Expr(Expr),
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLit(i64),
    StringLit(String),
    BoolLit(bool),
    Ident(String),
    Member {
        receiver: Box<Expr>,
        name: String,
        /// Id of the member-name reference itself, bound separately from the
        /// receiver so static-state scans see it as an identifier reference.
        name_id: NodeId,
    },
    Invoke {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        class: String,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinOp {
    fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Compact textual rendering of an expression, with no interior whitespace.
/// This is the normalized form used for external method identifiers.
pub fn expr_text(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_expr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::IntLit(value) => out.push_str(&value.to_string()),
        ExprKind::StringLit(value) => {
            out.push('"');
            out.push_str(value);
            out.push('"');
        }
        ExprKind::BoolLit(value) => out.push_str(if *value { "true" } else { "false" }),
        ExprKind::Ident(name) => out.push_str(name),
        ExprKind::Member { receiver, name, .. } => {
            write_expr(out, receiver);
            out.push('.');
            out.push_str(name);
        }
        ExprKind::Invoke { callee, args } => {
            write_expr(out, callee);
            write_args(out, args);
        }
        ExprKind::New { class, args } => {
            out.push_str("new");
            out.push_str(class);
            write_args(out, args);
        }
        ExprKind::Unary { op, operand } => {
            out.push(match op {
                UnaryOp::Neg => '-',
                UnaryOp::Not => '!',
            });
            write_expr(out, operand);
        }
        ExprKind::Binary { op, lhs, rhs } => {
            write_expr(out, lhs);
            out.push_str(op.as_str());
            write_expr(out, rhs);
        }
        ExprKind::Assign { target, value } => {
            write_expr(out, target);
            out.push('=');
            write_expr(out, value);
        }
    }
}

fn write_args(out: &mut String, args: &[Expr]) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_expr(out, arg);
    }
    out.push(')');
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&expr_text(self))
    }
}

/// Invocation expressions in a method body, outermost first.
pub fn invocations(body: &[Stmt]) -> Vec<&Expr> {
    let mut found = Vec::new();
    walk_body(body, &mut |expr| {
        if matches!(expr.kind, ExprKind::Invoke { .. }) {
            found.push(expr);
        }
    });
    found
}

/// Identifier-name references in a method body: plain identifiers and the
/// name components of member accesses, receiver before name.
pub fn identifier_nodes(body: &[Stmt]) -> Vec<NodeId> {
    let mut found = Vec::new();
    walk_body(body, &mut |expr| match &expr.kind {
        ExprKind::Ident(_) => found.push(expr.id),
        ExprKind::Member { name_id, .. } => found.push(*name_id),
        _ => {}
    });
    found
}

fn walk_body<'a>(body: &'a [Stmt], visit: &mut impl FnMut(&'a Expr)) {
    for stmt in body {
        match &stmt.kind {
            StmtKind::Local { init, .. } => {
                if let Some(expr) = init {
                    walk_expr(expr, visit);
                }
            }
            StmtKind::Return(value) => {
                if let Some(expr) = value {
                    walk_expr(expr, visit);
                }
            }
            StmtKind::Expr(expr) => walk_expr(expr, visit),
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                walk_expr(cond, visit);
                walk_body(then_body, visit);
                walk_body(else_body, visit);
            }
            StmtKind::While { cond, body } => {
                walk_expr(cond, visit);
                walk_body(body, visit);
            }
        }
    }
}

fn walk_expr<'a>(expr: &'a Expr, visit: &mut impl FnMut(&'a Expr)) {
    match &expr.kind {
        ExprKind::IntLit(_)
        | ExprKind::StringLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::Ident(_) => visit(expr),
        ExprKind::Member { receiver, .. } => {
            walk_expr(receiver, visit);
            visit(expr);
        }
        ExprKind::Invoke { callee, args } => {
            visit(expr);
            walk_expr(callee, visit);
            for arg in args {
                walk_expr(arg, visit);
            }
        }
        ExprKind::New { args, .. } => {
            visit(expr);
            for arg in args {
                walk_expr(arg, visit);
            }
        }
        ExprKind::Unary { operand, .. } => {
            visit(expr);
            walk_expr(operand, visit);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            visit(expr);
            walk_expr(lhs, visit);
            walk_expr(rhs, visit);
        }
        ExprKind::Assign { target, value } => {
            visit(expr);
            walk_expr(target, visit);
            walk_expr(value, visit);
        }
    }
}
