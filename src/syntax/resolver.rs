//! Name resolution for the analyzed language.
//!
//! A single binding pass walks every method body and records, per expression
//! node, the symbol it refers to. Identifiers that name nothing declared in
//! the compilation unit stay unbound; the engine treats their invocations as
//! external methods.

use crate::syntax::ast::{
    CompilationUnit, Expr, ExprKind, MethodRef, NodeId, Stmt, StmtKind,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Field,
    Property,
    Method,
    Parameter,
    Local,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub is_static: bool,
    /// Declared type of the symbol (return type for methods), used to chase
    /// member accesses through typed receivers.
    pub ty: Option<String>,
    /// Declaring method references within the analyzed tree. Populated only
    /// for method symbols.
    pub declaring_refs: Vec<MethodRef>,
}

impl Symbol {
    fn local(kind: SymbolKind, ty: &str) -> Self {
        Symbol {
            kind,
            is_static: false,
            ty: Some(ty.to_string()),
            declaring_refs: Vec::new(),
        }
    }
}

/// Per-class member tables, keyed by member name.
struct ClassInfo {
    fields: HashMap<String, (bool, String)>,
    properties: HashMap<String, (bool, String)>,
    methods: HashMap<String, (bool, String, MethodRef)>,
}

impl ClassInfo {
    fn member_symbol(&self, name: &str) -> Option<Symbol> {
        if let Some((is_static, ty)) = self.fields.get(name) {
            return Some(Symbol {
                kind: SymbolKind::Field,
                is_static: *is_static,
                ty: Some(ty.clone()),
                declaring_refs: Vec::new(),
            });
        }
        if let Some((is_static, ty)) = self.properties.get(name) {
            return Some(Symbol {
                kind: SymbolKind::Property,
                is_static: *is_static,
                ty: Some(ty.clone()),
                declaring_refs: Vec::new(),
            });
        }
        if let Some((is_static, return_type, decl)) = self.methods.get(name) {
            return Some(Symbol {
                kind: SymbolKind::Method,
                is_static: *is_static,
                ty: Some(return_type.clone()),
                declaring_refs: vec![*decl],
            });
        }
        None
    }
}

pub struct Resolver {
    bindings: HashMap<NodeId, Symbol>,
}

impl Resolver {
    pub fn new(unit: &CompilationUnit) -> Self {
        let mut class_table = HashMap::new();
        for (ci, class) in unit.classes.iter().enumerate() {
            let mut info = ClassInfo {
                fields: HashMap::new(),
                properties: HashMap::new(),
                methods: HashMap::new(),
            };
            for field in &class.fields {
                info.fields
                    .insert(field.name.clone(), (field.modifiers.is_static, field.ty.clone()));
            }
            for property in &class.properties {
                info.properties.insert(
                    property.name.clone(),
                    (property.modifiers.is_static, property.ty.clone()),
                );
            }
            for (mi, method) in class.methods.iter().enumerate() {
                info.methods.entry(method.name.clone()).or_insert((
                    method.modifiers.is_static,
                    method.return_type.clone(),
                    MethodRef {
                        class: ci,
                        method: mi,
                    },
                ));
            }
            class_table.insert(class.name.clone(), info);
        }

        let mut bindings = HashMap::new();
        for (decl, method) in unit.methods() {
            let enclosing = &unit.classes[decl.class].name;
            let mut binder = Binder {
                class_table: &class_table,
                enclosing,
                scope: method
                    .params
                    .iter()
                    .map(|p| (p.name.clone(), (SymbolKind::Parameter, p.ty.clone())))
                    .collect(),
                bindings: &mut bindings,
            };
            binder.bind_body(&method.body);
        }

        Resolver { bindings }
    }

    /// The symbol bound to the given node, if the binding pass found one.
    pub fn symbol_of(&self, node: NodeId) -> Option<&Symbol> {
        self.bindings.get(&node)
    }
}

struct Binder<'a> {
    class_table: &'a HashMap<String, ClassInfo>,
    enclosing: &'a str,
    /// Parameters and locals in scope, name to (kind, declared type).
    scope: HashMap<String, (SymbolKind, String)>,
    bindings: &'a mut HashMap<NodeId, Symbol>,
}

impl Binder<'_> {
    fn bind_body(&mut self, body: &[Stmt]) {
        for stmt in body {
            match &stmt.kind {
                StmtKind::Local { ty, name, init } => {
                    if let Some(expr) = init {
                        self.bind_expr(expr);
                    }
                    self.scope
                        .insert(name.clone(), (SymbolKind::Local, ty.clone()));
                }
                StmtKind::Return(value) => {
                    if let Some(expr) = value {
                        self.bind_expr(expr);
                    }
                }
                StmtKind::Expr(expr) => self.bind_expr(expr),
                StmtKind::If {
                    cond,
                    then_body,
                    else_body,
                } => {
                    self.bind_expr(cond);
                    self.bind_body(then_body);
                    self.bind_body(else_body);
                }
                StmtKind::While { cond, body } => {
                    self.bind_expr(cond);
                    self.bind_body(body);
                }
            }
        }
    }

    fn bind_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntLit(_) | ExprKind::StringLit(_) | ExprKind::BoolLit(_) => {}
            ExprKind::Ident(name) => {
                if let Some(symbol) = self.resolve_name(name) {
                    self.bindings.insert(expr.id, symbol);
                }
            }
            ExprKind::Member {
                receiver,
                name,
                name_id,
            } => {
                self.bind_expr(receiver);
                let symbol = self
                    .receiver_class(receiver)
                    .and_then(|info| info.member_symbol(name));
                if let Some(symbol) = symbol {
                    self.bindings.insert(*name_id, symbol);
                }
            }
            ExprKind::Invoke { callee, args } => {
                self.bind_expr(callee);
                for arg in args {
                    self.bind_expr(arg);
                }
                let callee_id = match &callee.kind {
                    ExprKind::Member { name_id, .. } => *name_id,
                    _ => callee.id,
                };
                let method_symbol = match self.bindings.get(&callee_id) {
                    Some(symbol) if symbol.kind == SymbolKind::Method => Some(symbol.clone()),
                    _ => None,
                };
                if let Some(symbol) = method_symbol {
                    self.bindings.insert(expr.id, symbol);
                }
            }
            ExprKind::New { args, .. } => {
                for arg in args {
                    self.bind_expr(arg);
                }
            }
            ExprKind::Unary { operand, .. } => self.bind_expr(operand),
            ExprKind::Binary { lhs, rhs, .. } => {
                self.bind_expr(lhs);
                self.bind_expr(rhs);
            }
            ExprKind::Assign { target, value } => {
                self.bind_expr(target);
                self.bind_expr(value);
            }
        }
    }

    fn resolve_name(&self, name: &str) -> Option<Symbol> {
        if let Some((kind, ty)) = self.scope.get(name) {
            return Some(Symbol::local(*kind, ty));
        }
        if let Some(symbol) = self
            .class_table
            .get(self.enclosing)
            .and_then(|info| info.member_symbol(name))
        {
            return Some(symbol);
        }
        if self.class_table.contains_key(name) {
            return Some(Symbol {
                kind: SymbolKind::Class,
                is_static: false,
                ty: None,
                declaring_refs: Vec::new(),
            });
        }
        None
    }

    /// The class whose members a member access on this receiver refers to:
    /// either the receiver names a class of the unit (static lookup) or its
    /// bound symbol has a declared type naming one (instance lookup).
    fn receiver_class(&self, receiver: &Expr) -> Option<&ClassInfo> {
        let receiver_id = match &receiver.kind {
            ExprKind::Member { name_id, .. } => *name_id,
            _ => receiver.id,
        };
        let symbol = self.bindings.get(&receiver_id)?;
        match symbol.kind {
            SymbolKind::Class => match &receiver.kind {
                ExprKind::Ident(name) => self.class_table.get(name),
                _ => None,
            },
            _ => symbol.ty.as_deref().and_then(|ty| self.class_table.get(ty)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::{identifier_nodes, invocations};
    use crate::syntax::parse;

    fn resolve(source: &str) -> (CompilationUnit, Resolver) {
        let unit = parse(source).unwrap();
        let resolver = Resolver::new(&unit);
        (unit, resolver)
    }

    #[test]
    fn binds_locals_params_and_fields() {
        let (unit, resolver) = resolve(
            "class C { static int s; int f(int p) { int x = p; return x + s; } }",
        );
        let body = &unit.classes[0].methods[0].body;
        let idents = identifier_nodes(body);
        let kinds: Vec<SymbolKind> = idents
            .iter()
            .map(|id| resolver.symbol_of(*id).expect("bound").kind)
            .collect();
        assert_eq!(
            kinds,
            vec![SymbolKind::Parameter, SymbolKind::Local, SymbolKind::Field]
        );
        let field = resolver.symbol_of(idents[2]).unwrap();
        assert!(field.is_static);
    }

    #[test]
    fn binds_static_member_through_class_receiver() {
        let (unit, resolver) = resolve(
            "class A { int x() { return B.y(); } } \
             class B { public static int y() { return 1; } }",
        );
        let body = &unit.classes[0].methods[0].body;
        let invoke = invocations(body)[0];
        let symbol = resolver.symbol_of(invoke.id).expect("invocation bound");
        assert_eq!(symbol.kind, SymbolKind::Method);
        assert!(symbol.is_static);
        assert_eq!(
            symbol.declaring_refs,
            vec![MethodRef { class: 1, method: 0 }]
        );
    }

    #[test]
    fn binds_instance_member_through_typed_local() {
        let (unit, resolver) = resolve(
            "class C { void f() { D d = new D(); d.g(); } } \
             class D { void g() { } }",
        );
        let body = &unit.classes[0].methods[0].body;
        let invoke = invocations(body)[0];
        let symbol = resolver.symbol_of(invoke.id).expect("invocation bound");
        assert_eq!(
            symbol.declaring_refs,
            vec![MethodRef { class: 1, method: 0 }]
        );
    }

    #[test]
    fn unknown_receiver_stays_unbound() {
        let (unit, resolver) = resolve(r#"class C { void f() { Console.WriteLine("x"); } }"#);
        let body = &unit.classes[0].methods[0].body;
        let invoke = invocations(body)[0];
        assert!(resolver.symbol_of(invoke.id).is_none());
    }

    #[test]
    fn same_class_call_binds_without_receiver() {
        let (unit, resolver) = resolve(
            "class C { int foo() { return bar(); } int bar() { return 42; } }",
        );
        let body = &unit.classes[0].methods[0].body;
        let invoke = invocations(body)[0];
        let symbol = resolver.symbol_of(invoke.id).expect("invocation bound");
        assert_eq!(
            symbol.declaring_refs,
            vec![MethodRef { class: 0, method: 1 }]
        );
    }
}
