//! Variable declarations and the semantic model queried by folds.

use crate::expr::{Expr, ExprKind};
use crate::ids::VarId;
use crate::types::Type;
use ferrule_common::Ident;
use serde::{Deserialize, Serialize};

/// Where a variable is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    /// A local variable in a method body.
    Local,
    /// A method or lambda parameter.
    Parameter,
    /// A field of a class.
    Field {
        /// Whether the field is `static`.
        is_static: bool,
    },
}

/// A declared variable as seen by the semantic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// The variable name.
    pub name: Ident,
    /// The declared type.
    pub ty: Type,
    /// Where the variable lives.
    pub kind: DeclKind,
    /// Whether the declaration carries the `final` modifier.
    pub is_final: bool,
    /// Number of assignments after the declaration.
    pub reassignments: u32,
    /// The initializer expression, if any.
    pub initializer: Option<Expr>,
}

impl Declaration {
    /// Creates a declaration without initializer or reassignments.
    pub fn new(name: Ident, ty: Type, kind: DeclKind) -> Self {
        Self {
            name,
            ty,
            kind,
            is_final: false,
            reassignments: 0,
            initializer: None,
        }
    }

    /// Sets the initializer.
    pub fn with_initializer(mut self, init: Expr) -> Self {
        self.initializer = Some(init);
        self
    }

    /// Marks the declaration `final`.
    pub fn make_final(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// Declaration lookups the folds need from the surrounding analysis.
///
/// Implementations must be shareable across threads so that one model can
/// back evaluators running in parallel.
pub trait SemanticModel: Send + Sync {
    /// Resolves the declaration a variable read refers to.
    ///
    /// Returns `None` for any other node, or if the declaration is unknown.
    fn resolve_declaration(&self, expr: &Expr) -> Option<&Declaration>;

    /// Returns `true` if the variable is never assigned after its declaration.
    fn is_effectively_final(&self, decl: &Declaration) -> bool;

    /// Returns the initializer of a declaration.
    fn initializer<'a>(&'a self, decl: &'a Declaration) -> Option<&'a Expr>;
}

/// All declarations of an analyzed compilation unit, indexed by [`VarId`].
///
/// Declarations are only ever appended, so an ID stays valid for the life of
/// the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationTable {
    decls: Vec<Declaration>,
}

impl DeclarationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration and returns its ID.
    pub fn declare(&mut self, decl: Declaration) -> VarId {
        let id = VarId::from_raw(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    /// Returns the declaration with the given ID.
    pub fn get(&self, id: VarId) -> Option<&Declaration> {
        self.decls.get(id.index())
    }

    /// Iterates over `(id, declaration)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (VarId::from_raw(i as u32), decl))
    }

    /// Creates a read of a declared variable, typed with its declared type.
    pub fn read(&self, id: VarId) -> Option<Expr> {
        self.get(id)
            .map(|decl| Expr::var_read(id, decl.name, decl.ty.clone()))
    }

    /// Records an assignment to a declared variable.
    pub fn record_assignment(&mut self, id: VarId) {
        if let Some(decl) = self.decls.get_mut(id.index()) {
            decl.reassignments += 1;
        }
    }

    /// Returns the number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns `true` if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl SemanticModel for DeclarationTable {
    fn resolve_declaration(&self, expr: &Expr) -> Option<&Declaration> {
        match expr.kind {
            ExprKind::VariableRead { var, .. } => self.get(var),
            _ => None,
        }
    }

    fn is_effectively_final(&self, decl: &Declaration) -> bool {
        decl.reassignments == 0
    }

    fn initializer<'a>(&'a self, decl: &'a Declaration) -> Option<&'a Expr> {
        decl.initializer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use ferrule_common::Interner;

    #[test]
    fn declare_and_resolve() {
        let interner = Interner::new();
        let mut table = DeclarationTable::new();
        let limit = table.declare(
            Declaration::new(
                interner.get_or_intern("LIMIT"),
                Type::INT,
                DeclKind::Field { is_static: true },
            )
            .make_final()
            .with_initializer(Expr::literal(Value::Int(10))),
        );
        let read = table.read(limit).unwrap();
        let decl = table.resolve_declaration(&read).unwrap();
        assert_eq!(interner.resolve(decl.name), "LIMIT");
        assert!(table.is_effectively_final(decl));
        assert_eq!(
            table.initializer(decl).and_then(Expr::as_literal),
            Some(&Value::Int(10))
        );
    }

    #[test]
    fn reassignment_breaks_effective_finality() {
        let mut table = DeclarationTable::new();
        let id = table.declare(Declaration::new(Ident::from_raw(0), Type::INT, DeclKind::Local));
        table.record_assignment(id);
        let decl = table.get(id).unwrap();
        assert!(!table.is_effectively_final(decl));
        assert_eq!(decl.kind, DeclKind::Local);
    }

    #[test]
    fn non_reads_do_not_resolve() {
        let table = DeclarationTable::new();
        assert!(table
            .resolve_declaration(&Expr::literal(Value::Bool(true)))
            .is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn table_survives_serialization() {
        let interner = Interner::new();
        let mut table = DeclarationTable::new();
        let n = interner.get_or_intern("n");
        table.declare(Declaration::new(n, Type::LONG, DeclKind::Parameter));
        let init = Expr::literal(Value::Int(3));
        let local = Declaration::new(n, Type::INT, DeclKind::Local).with_initializer(init);
        let id = table.declare(local);
        let json = serde_json::to_string(&table).unwrap();
        let restored: DeclarationTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get(id), table.get(id));
        let ids: Vec<u32> = restored.iter().map(|(id, _)| id.as_raw()).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
