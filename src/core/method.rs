//! Method identity.
//!
//! A method is either *resolved* (declared somewhere in the analyzed
//! compilation unit, identified by its declaration handle) or *external*
//! (known only by the normalized text of the invocation that named it).
//! The two variants never compare equal.

use crate::syntax::ast::{self, CompilationUnit, Expr, ExprKind, MethodRef};
use crate::syntax::resolver::{Resolver, SymbolKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// Declared in the analyzed tree. The display form
    /// `<return-type> <class>.<name>` is cached at construction.
    Resolved { decl: MethodRef, display: String },
    /// Known only by name. The identifier is the invocation's
    /// receiver-plus-name text with all whitespace removed.
    External { identifier: String },
}

impl Method {
    pub fn from_declaration(unit: &CompilationUnit, decl: MethodRef) -> Self {
        let class = unit.class(decl.class);
        let method = unit.method(decl);
        Method::Resolved {
            decl,
            display: format!("{} {}.{}", method.return_type, class.name, method.name),
        }
    }

    /// Identity of an invocation's target. Produces a resolved identity when
    /// the resolver binds the invocation to a method declared in the tree,
    /// and an external identity from the callee text otherwise.
    pub fn from_invocation(unit: &CompilationUnit, resolver: &Resolver, invocation: &Expr) -> Self {
        if let Some(symbol) = resolver.symbol_of(invocation.id) {
            if let Some(&decl) = symbol.declaring_refs.first() {
                return Method::from_declaration(unit, decl);
            }
        }
        let callee = match &invocation.kind {
            ExprKind::Invoke { callee, .. } => callee.as_ref(),
            _ => invocation,
        };
        let mut identifier = ast::expr_text(callee);
        identifier.retain(|c| !c.is_whitespace());
        Method::External { identifier }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Method::Resolved { .. })
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Method::External { .. })
    }

    pub fn decl(&self) -> Option<MethodRef> {
        match self {
            Method::Resolved { decl, .. } => Some(*decl),
            Method::External { .. } => None,
        }
    }

    /// `<return-type> <class>.<name>` for resolved methods, the raw
    /// identifier for external ones.
    pub fn display(&self) -> &str {
        match self {
            Method::Resolved { display, .. } => display,
            Method::External { identifier } => identifier,
        }
    }

    /// Whether the declaration body reads (or writes) a static field or
    /// property. Scans identifier references in document order; the scan
    /// stops with `false` as soon as an identifier fails to resolve, leaving
    /// the classification to the other impurity criteria. Always `false` for
    /// external identities.
    pub fn reads_static_program_state(&self, unit: &CompilationUnit, resolver: &Resolver) -> bool {
        let Some(decl) = self.decl() else {
            return false;
        };
        let body = &unit.method(decl).body;
        for node in ast::identifier_nodes(body) {
            match resolver.symbol_of(node) {
                None => return false,
                Some(symbol) => {
                    if symbol.is_static
                        && matches!(symbol.kind, SymbolKind::Field | SymbolKind::Property)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::invocations;
    use crate::syntax::parse;

    fn first_invocation_identity(source: &str) -> Method {
        let unit = parse(source).unwrap();
        let resolver = Resolver::new(&unit);
        let (decl, _) = unit.methods().next().unwrap();
        let body = &unit.method(decl).body;
        let invoke = invocations(body)[0];
        Method::from_invocation(&unit, &resolver, invoke)
    }

    #[test]
    fn resolved_display_form() {
        let unit = parse("class C { int foo() { return 42; } }").unwrap();
        let (decl, _) = unit.methods().next().unwrap();
        let method = Method::from_declaration(&unit, decl);
        assert_eq!(method.display(), "int C.foo");
        assert!(method.is_resolved());
    }

    #[test]
    fn invocation_of_declared_method_resolves() {
        let identity = first_invocation_identity(
            "class C { int foo() { return bar(); } int bar() { return 1; } }",
        );
        assert!(identity.is_resolved());
        assert_eq!(identity.display(), "int C.bar");
    }

    #[test]
    fn invocation_of_unknown_receiver_is_external() {
        let identity =
            first_invocation_identity(r#"class C { void f() { Console.WriteLine("x"); } }"#);
        assert_eq!(
            identity,
            Method::External {
                identifier: "Console.WriteLine".to_string()
            }
        );
    }

    #[test]
    fn resolved_and_external_never_equal() {
        let unit = parse("class C { int foo() { return 42; } }").unwrap();
        let (decl, _) = unit.methods().next().unwrap();
        let resolved = Method::from_declaration(&unit, decl);
        let external = Method::External {
            identifier: resolved.display().to_string(),
        };
        assert_ne!(resolved, external);
    }

    #[test]
    fn detects_static_field_read() {
        let unit = parse("class C { static int s; int f() { return s + 1; } }").unwrap();
        let resolver = Resolver::new(&unit);
        let (decl, _) = unit.methods().next().unwrap();
        let method = Method::from_declaration(&unit, decl);
        assert!(method.reads_static_program_state(&unit, &resolver));
    }

    #[test]
    fn detects_static_property_read() {
        let unit =
            parse("class C { static int Count { get; set; } int f() { return Count; } }").unwrap();
        let resolver = Resolver::new(&unit);
        let (decl, _) = unit.methods().next().unwrap();
        let method = Method::from_declaration(&unit, decl);
        assert!(method.reads_static_program_state(&unit, &resolver));
    }

    #[test]
    fn instance_field_read_is_not_static_state() {
        let unit = parse("class C { int s; int f() { return s + 1; } }").unwrap();
        let resolver = Resolver::new(&unit);
        let (decl, _) = unit.methods().next().unwrap();
        let method = Method::from_declaration(&unit, decl);
        assert!(!method.reads_static_program_state(&unit, &resolver));
    }

    #[test]
    fn static_method_call_is_not_static_state() {
        let unit = parse(
            "class A { int x() { return B.y(); } } \
             class B { public static int y() { return 1; } }",
        )
        .unwrap();
        let resolver = Resolver::new(&unit);
        let (decl, _) = unit.methods().next().unwrap();
        let method = Method::from_declaration(&unit, decl);
        assert!(!method.reads_static_program_state(&unit, &resolver));
    }

    #[test]
    fn unresolved_identifier_ends_the_scan() {
        // `Missing` does not resolve, so the scan bails out before reaching
        // the static field reference that follows it.
        let unit = parse("class C { static int s; int f() { return Missing.g() + s; } }").unwrap();
        let resolver = Resolver::new(&unit);
        let (decl, _) = unit.methods().next().unwrap();
        let method = Method::from_declaration(&unit, decl);
        assert!(!method.reads_static_program_state(&unit, &resolver));
    }
}
