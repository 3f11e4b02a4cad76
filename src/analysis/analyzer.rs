//! The analyzer driver: builds the call graph and runs the fixed-point
//! purity propagation loop.

use crate::analysis::knowledge;
use crate::analysis::lookup::{LookupTable, MethodId};
use crate::core::{Method, Purity};
use crate::syntax::ast::{self, CompilationUnit};
use crate::syntax::resolver::Resolver;
use tracing::{debug, info};

/// Fixed-point purity inference over a parsed compilation unit.
///
/// The tree and resolver are borrowed read-only for the duration of one
/// `analyze` call; the returned table owns its rows outright.
pub struct PurityAnalyzer<'a> {
    unit: &'a CompilationUnit,
    resolver: &'a Resolver,
}

impl<'a> PurityAnalyzer<'a> {
    pub fn new(unit: &'a CompilationUnit, resolver: &'a Resolver) -> Self {
        Self { unit, resolver }
    }

    pub fn analyze(&self) -> LookupTable {
        let mut table = self.build_table();
        info!(methods = table.len(), "built initial lookup table");

        let mut sweep = 0usize;
        loop {
            sweep += 1;
            let mut modified = false;
            for id in table.working_set() {
                modified |= self.process(&mut table, id);
            }
            table.recompute_working_set();
            debug!(sweep, modified, "completed working-set sweep");
            if !modified {
                break;
            }
        }
        table
    }

    /// One row per declared method, with its immediate dependencies: one
    /// edge per distinct invocation target in the body.
    fn build_table(&self) -> LookupTable {
        let mut table = LookupTable::new();
        for (decl, method_decl) in self.unit.methods() {
            let caller = Method::from_declaration(self.unit, decl);
            table.add_method(caller.clone());
            for invocation in ast::invocations(&method_decl.body) {
                let callee = Method::from_invocation(self.unit, self.resolver, invocation);
                table.add_dependency(caller.clone(), callee);
            }
        }
        table.recompute_working_set();
        table
    }

    /// Apply the impurity criteria to one ready method, then fold its level
    /// into its callers and release their edges. Returns whether anything
    /// about the table changed.
    fn process(&self, table: &mut LookupTable, id: MethodId) -> bool {
        let method = table.method(id).clone();
        let before = table.purity_of(id);

        // The method's own criterion is joined with whatever propagation
        // has already folded in; levels never rise.
        let level = match knowledge::prior_purity(&method) {
            Some(prior) => before.join(prior),
            None => {
                let derived = if method.reads_static_program_state(self.unit, self.resolver) {
                    Purity::Impure
                } else if method.is_external() {
                    // No declaration to inspect and no prior knowledge.
                    Purity::Unknown
                } else {
                    Purity::Pure
                };
                before.join(derived)
            }
        };

        let had_callers = table.has_callers(id);
        if level != before {
            table.set_purity_of(id, level);
            debug!(method = %method, level = %level, "classified");
        }
        table.propagate_from(id);
        level != before || had_callers
    }
}
