//! The lookup table: the central mapping from method identity to dependency
//! set and purity level.
//!
//! Rows live in an arena keyed by dense `MethodId` handles assigned in
//! insertion order; an identity index maps `Method` values to handles, and a
//! reverse caller index is maintained incrementally so `GetCallers` and
//! propagation never scan the table.

use crate::analysis::working_set::WorkingSet;
use crate::core::{Method, Purity};
use im::{HashMap as ImHashMap, OrdSet, Vector};
use thiserror::Error;

/// Structural-precondition failures. These indicate a misuse of the table,
/// never a property of well-formed input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("method not present in lookup table: {method}")]
    MethodNotFound { method: String },

    #[error("dependency not present in lookup table: {caller} -> {callee}")]
    DependencyNotFound { caller: String, callee: String },
}

/// Dense handle of a table row. Handles are assigned in insertion order and
/// are meaningless outside the table that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(u32);

impl MethodId {
    #[cfg(test)]
    pub(crate) fn new(raw: u32) -> Self {
        MethodId(raw)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct MethodRow {
    method: Method,
    /// Unresolved callees, in first-seen order, duplicate-free.
    deps: Vector<MethodId>,
    /// Reverse index: every row whose dependency set contains this one.
    callers: OrdSet<MethodId>,
    purity: Purity,
    alive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    rows: Vector<MethodRow>,
    index: ImHashMap<Method, MethodId>,
    working: WorkingSet,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.rows.iter().filter(|row| row.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| !row.alive)
    }

    /// Add a method with no dependencies and initial purity `Pure`.
    /// Idempotent: an existing row is left untouched.
    pub fn add_method(&mut self, method: Method) -> MethodId {
        if let Some(&id) = self.index.get(&method) {
            return id;
        }
        let id = MethodId(self.rows.len() as u32);
        self.index.insert(method.clone(), id);
        self.rows.push_back(MethodRow {
            method,
            deps: Vector::new(),
            callers: OrdSet::new(),
            purity: Purity::Pure,
            alive: true,
        });
        id
    }

    /// Remove a method's row, unlinking every edge that touches it.
    pub fn remove_method(&mut self, method: &Method) -> Result<(), EngineError> {
        let id = self.require(method)?;
        let row = self.rows[id.index()].clone();
        for caller in &row.callers {
            let caller_row = &mut self.rows[caller.index()];
            if let Some(pos) = caller_row.deps.iter().position(|dep| *dep == id) {
                caller_row.deps.remove(pos);
            }
        }
        for dep in &row.deps {
            self.rows[dep.index()].callers.remove(&id);
        }
        let dead = &mut self.rows[id.index()];
        dead.alive = false;
        dead.deps = Vector::new();
        dead.callers = OrdSet::new();
        self.index.remove(method);
        Ok(())
    }

    pub fn has_method(&self, method: &Method) -> bool {
        self.index.contains_key(method)
    }

    pub fn id_of(&self, method: &Method) -> Option<MethodId> {
        self.index.get(method).copied()
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.rows[id.index()].method
    }

    /// Ensure both rows exist and record `callee` as a dependency of
    /// `caller`, ignoring duplicates.
    pub fn add_dependency(&mut self, caller: Method, callee: Method) {
        let caller_id = self.add_method(caller);
        let callee_id = self.add_method(callee);
        let caller_row = &mut self.rows[caller_id.index()];
        if caller_row.deps.iter().any(|dep| *dep == callee_id) {
            return;
        }
        caller_row.deps.push_back(callee_id);
        self.rows[callee_id.index()].callers.insert(caller_id);
    }

    /// Remove `callee` from `caller`'s dependency set. Both rows and the
    /// edge itself must exist.
    pub fn remove_dependency(&mut self, caller: &Method, callee: &Method) -> Result<(), EngineError> {
        let caller_id = self.require(caller)?;
        let callee_id = self.require(callee)?;
        let caller_row = &mut self.rows[caller_id.index()];
        let Some(pos) = caller_row.deps.iter().position(|dep| *dep == callee_id) else {
            return Err(EngineError::DependencyNotFound {
                caller: caller.display().to_string(),
                callee: callee.display().to_string(),
            });
        };
        caller_row.deps.remove(pos);
        self.rows[callee_id.index()].callers.remove(&caller_id);
        Ok(())
    }

    pub fn has_dependency(&self, caller: &Method, callee: &Method) -> bool {
        let (Some(caller_id), Some(callee_id)) = (self.id_of(caller), self.id_of(callee)) else {
            return false;
        };
        self.rows[caller_id.index()]
            .deps
            .iter()
            .any(|dep| *dep == callee_id)
    }

    /// Current dependencies of a method, in first-seen order.
    pub fn dependencies(&self, method: &Method) -> Vec<Method> {
        let Some(id) = self.id_of(method) else {
            return Vec::new();
        };
        self.rows[id.index()]
            .deps
            .iter()
            .map(|dep| self.rows[dep.index()].method.clone())
            .collect()
    }

    pub fn purity(&self, method: &Method) -> Result<Purity, EngineError> {
        let id = self.require(method)?;
        Ok(self.rows[id.index()].purity)
    }

    pub fn set_purity(&mut self, method: &Method, purity: Purity) -> Result<(), EngineError> {
        let id = self.require(method)?;
        self.rows[id.index()].purity = purity;
        Ok(())
    }

    /// Every method whose dependency set contains the given one.
    pub fn callers(&self, method: &Method) -> Vec<Method> {
        let Some(id) = self.id_of(method) else {
            return Vec::new();
        };
        self.rows[id.index()]
            .callers
            .iter()
            .map(|caller| self.rows[caller.index()].method.clone())
            .collect()
    }

    /// Fold this method's purity into each caller and drop the resolved
    /// edge. Callers move toward the bottom of the lattice only: each takes
    /// the join of its current level and this method's.
    pub fn propagate_purity(&mut self, method: &Method) {
        if let Some(id) = self.id_of(method) {
            self.propagate_from(id);
        }
    }

    pub(crate) fn propagate_from(&mut self, id: MethodId) {
        let purity = self.rows[id.index()].purity;
        let callers: Vec<MethodId> = self.rows[id.index()].callers.iter().copied().collect();
        for caller in callers {
            {
                let caller_row = &mut self.rows[caller.index()];
                caller_row.purity = caller_row.purity.join(purity);
                if let Some(pos) = caller_row.deps.iter().position(|dep| *dep == id) {
                    caller_row.deps.remove(pos);
                }
            }
            self.rows[id.index()].callers.remove(&caller);
        }
    }

    pub(crate) fn purity_of(&self, id: MethodId) -> Purity {
        self.rows[id.index()].purity
    }

    pub(crate) fn set_purity_of(&mut self, id: MethodId, purity: Purity) {
        self.rows[id.index()].purity = purity;
    }

    pub(crate) fn has_callers(&self, id: MethodId) -> bool {
        !self.rows[id.index()].callers.is_empty()
    }

    /// A copy holding only the rows resolved to a declaration in the parsed
    /// tree, with the edges between them.
    pub fn strip_external(&self) -> LookupTable {
        let mut stripped = LookupTable::new();
        for row in self.rows.iter().filter(|row| row.alive) {
            if row.method.is_resolved() {
                let id = stripped.add_method(row.method.clone());
                stripped.set_purity_of(id, row.purity);
            }
        }
        for row in self.rows.iter().filter(|row| row.alive) {
            if !row.method.is_resolved() {
                continue;
            }
            for dep in &row.deps {
                let dep_method = &self.rows[dep.index()].method;
                if dep_method.is_resolved() {
                    stripped.add_dependency(row.method.clone(), dep_method.clone());
                }
            }
        }
        stripped
    }

    /// Live rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Method, Purity)> + '_ {
        self.rows
            .iter()
            .filter(|row| row.alive)
            .map(|row| (&row.method, row.purity))
    }

    /// Rebuild the working set from the rows whose dependency sets are
    /// currently empty.
    pub fn recompute_working_set(&mut self) {
        let candidates: Vec<MethodId> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.alive && row.deps.is_empty())
            .map(|(i, _)| MethodId(i as u32))
            .collect();
        self.working.recompute(candidates);
    }

    /// Snapshot of the current working set.
    pub fn working_set(&self) -> Vector<MethodId> {
        self.working.snapshot()
    }

    fn require(&self, method: &Method) -> Result<MethodId, EngineError> {
        self.id_of(method).ok_or_else(|| EngineError::MethodNotFound {
            method: method.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external(identifier: &str) -> Method {
        Method::External {
            identifier: identifier.to_string(),
        }
    }

    #[test]
    fn add_method_is_idempotent() {
        let mut table = LookupTable::new();
        let first = table.add_method(external("a"));
        let second = table.add_method(external("a"));
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        assert_eq!(table.purity(&external("a")).unwrap(), Purity::Pure);
    }

    #[test]
    fn add_dependency_creates_missing_rows_and_dedupes() {
        let mut table = LookupTable::new();
        table.add_dependency(external("a"), external("b"));
        table.add_dependency(external("a"), external("b"));
        assert!(table.has_method(&external("a")));
        assert!(table.has_method(&external("b")));
        assert!(table.has_dependency(&external("a"), &external("b")));
        assert_eq!(table.dependencies(&external("a")).len(), 1);
        assert_eq!(table.callers(&external("b")), vec![external("a")]);
    }

    #[test]
    fn remove_dependency_requires_the_edge() {
        let mut table = LookupTable::new();
        table.add_method(external("a"));
        table.add_method(external("b"));
        let err = table
            .remove_dependency(&external("a"), &external("b"))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::DependencyNotFound {
                caller: "a".to_string(),
                callee: "b".to_string(),
            }
        );

        table.add_dependency(external("a"), external("b"));
        table.remove_dependency(&external("a"), &external("b")).unwrap();
        assert!(!table.has_dependency(&external("a"), &external("b")));
        assert!(table.callers(&external("b")).is_empty());
    }

    #[test]
    fn operations_on_missing_methods_fail() {
        let mut table = LookupTable::new();
        assert!(matches!(
            table.purity(&external("ghost")),
            Err(EngineError::MethodNotFound { .. })
        ));
        assert!(matches!(
            table.set_purity(&external("ghost"), Purity::Impure),
            Err(EngineError::MethodNotFound { .. })
        ));
        assert!(matches!(
            table.remove_method(&external("ghost")),
            Err(EngineError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn remove_method_unlinks_both_directions() {
        let mut table = LookupTable::new();
        table.add_dependency(external("a"), external("b"));
        table.add_dependency(external("b"), external("c"));
        table.remove_method(&external("b")).unwrap();
        assert!(!table.has_method(&external("b")));
        assert!(table.dependencies(&external("a")).is_empty());
        assert!(table.callers(&external("c")).is_empty());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn propagate_joins_and_strips_the_edge() {
        let mut table = LookupTable::new();
        table.add_dependency(external("caller"), external("callee"));
        table.set_purity(&external("callee"), Purity::Impure).unwrap();
        table.propagate_purity(&external("callee"));
        assert_eq!(table.purity(&external("caller")).unwrap(), Purity::Impure);
        assert!(!table.has_dependency(&external("caller"), &external("callee")));
        assert!(table.callers(&external("callee")).is_empty());
    }

    #[test]
    fn propagation_never_raises_a_caller() {
        let mut table = LookupTable::new();
        table.add_dependency(external("caller"), external("callee"));
        table.set_purity(&external("caller"), Purity::Impure).unwrap();
        // Callee stays Pure; the join must keep the caller at Impure.
        table.propagate_purity(&external("callee"));
        assert_eq!(table.purity(&external("caller")).unwrap(), Purity::Impure);
    }

    #[test]
    fn strip_external_keeps_resolved_rows_only() {
        use crate::syntax::ast::MethodRef;
        let resolved_a = Method::Resolved {
            decl: MethodRef { class: 0, method: 0 },
            display: "int C.a".to_string(),
        };
        let resolved_b = Method::Resolved {
            decl: MethodRef { class: 0, method: 1 },
            display: "int C.b".to_string(),
        };
        let mut table = LookupTable::new();
        table.add_dependency(resolved_a.clone(), resolved_b.clone());
        table.add_dependency(resolved_a.clone(), external("Console.WriteLine"));
        table.set_purity(&resolved_a, Purity::Impure).unwrap();

        let stripped = table.strip_external();
        assert_eq!(stripped.len(), 2);
        assert!(!stripped.has_method(&external("Console.WriteLine")));
        assert!(stripped.has_dependency(&resolved_a, &resolved_b));
        assert_eq!(stripped.purity(&resolved_a).unwrap(), Purity::Impure);
    }

    #[test]
    fn copy_is_independent_of_the_original() {
        let mut table = LookupTable::new();
        table.add_dependency(external("a"), external("b"));
        let copy = table.clone();
        table.set_purity(&external("a"), Purity::Impure).unwrap();
        table.remove_dependency(&external("a"), &external("b")).unwrap();
        assert_eq!(copy.purity(&external("a")).unwrap(), Purity::Pure);
        assert!(copy.has_dependency(&external("a"), &external("b")));
    }

    #[test]
    fn working_set_tracks_empty_dependency_rows() {
        let mut table = LookupTable::new();
        table.add_dependency(external("a"), external("b"));
        table.recompute_working_set();
        let ready: Vec<Method> = table
            .working_set()
            .into_iter()
            .map(|id| table.method(id).clone())
            .collect();
        assert_eq!(ready, vec![external("b")]);

        table.set_purity(&external("b"), Purity::Impure).unwrap();
        table.propagate_purity(&external("b"));
        table.recompute_working_set();
        let ready: Vec<Method> = table
            .working_set()
            .into_iter()
            .map(|id| table.method(id).clone())
            .collect();
        // `b` is in the history now; only the newly freed `a` appears.
        assert_eq!(ready, vec![external("a")]);
    }
}
