//! The symbol table: a stack of lexical scopes.
//!
//! Variable lookup walks innermost to outermost. Function lookup resolves
//! against the overload set of the innermost scope declaring the name, never by
//! name alone. A popped scope is gone; nothing consults it afterwards.

use std::collections::HashMap;

use crate::ast::{FnSig, QualifierKind};
use crate::error::SemanticError;
use crate::sema::types::Type;

#[derive(Clone, Debug, PartialEq)]
pub struct VarInfo {
    pub ty: Option<Type>,
    pub qualifier: Option<QualifierKind>,
    /// declared outside any function body (shader, sub-shader or pass level).
    pub is_global: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructInfo {
    pub fields: Vec<(String, Option<Type>)>,
}

impl StructInfo {
    pub fn field(&self, name: &str) -> Option<&Option<Type>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SymbolEntry {
    Var(VarInfo),
    Fn(Vec<FnSig>),
    Struct(StructInfo),
}

#[derive(Default)]
struct Scope {
    symbols: HashMap<String, SymbolEntry>,
}

pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// drop everything and return to a single empty root scope.
    pub fn reset(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::default());
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop(&mut self) {
        // the root scope stays; unbalanced pops would be a parser defect.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn top(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack is never empty")
    }

    /// declare a variable in the innermost scope. Redeclaring a name already
    /// bound in that same scope is an error; shadowing an outer scope is legal.
    pub fn declare_var(&mut self, name: &str, info: VarInfo) -> Result<(), SemanticError> {
        let top = self.top();
        if top.symbols.contains_key(name) {
            return Err(SemanticError::DuplicateDeclaration(name.to_string()));
        }
        top.symbols.insert(name.to_string(), SymbolEntry::Var(info));
        Ok(())
    }

    pub fn declare_struct(&mut self, name: &str, info: StructInfo) -> Result<(), SemanticError> {
        let top = self.top();
        if top.symbols.contains_key(name) {
            return Err(SemanticError::DuplicateDeclaration(name.to_string()));
        }
        top.symbols
            .insert(name.to_string(), SymbolEntry::Struct(info));
        Ok(())
    }

    /// add an overload to the innermost scope. Two overloads of one name must
    /// not share a parameter-type signature.
    pub fn declare_fn(&mut self, sig: FnSig) -> Result<(), SemanticError> {
        let key = sig.key();
        let top = self.top();
        match top.symbols.get_mut(&sig.name) {
            None => {
                top.symbols
                    .insert(sig.name.clone(), SymbolEntry::Fn(vec![sig]));
                Ok(())
            }
            Some(SymbolEntry::Fn(overloads)) => {
                if overloads.iter().any(|s| s.key() == key) {
                    return Err(SemanticError::DuplicateDeclaration(sig.name.clone()));
                }
                overloads.push(sig);
                Ok(())
            }
            Some(_) => Err(SemanticError::DuplicateDeclaration(sig.name.clone())),
        }
    }

    pub fn lookup_var(&self, name: &str) -> Option<&VarInfo> {
        for scope in self.scopes.iter().rev() {
            match scope.symbols.get(name) {
                Some(SymbolEntry::Var(info)) => return Some(info),
                Some(_) => return None,
                None => {}
            }
        }
        None
    }

    pub fn lookup_struct(&self, name: &str) -> Option<&StructInfo> {
        for scope in self.scopes.iter().rev() {
            match scope.symbols.get(name) {
                Some(SymbolEntry::Struct(info)) => return Some(info),
                Some(_) => return None,
                None => {}
            }
        }
        None
    }

    /// overload set of the innermost scope declaring `name` as a function.
    pub fn lookup_fn_overloads(&self, name: &str) -> Option<&[FnSig]> {
        for scope in self.scopes.iter().rev() {
            match scope.symbols.get(name) {
                Some(SymbolEntry::Fn(overloads)) => return Some(overloads),
                Some(_) => return None,
                None => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(ty: Type) -> VarInfo {
        VarInfo {
            ty: Some(ty),
            qualifier: None,
            is_global: false,
        }
    }

    #[test]
    fn shadowing_is_legal_but_redeclaration_is_not() {
        let mut scopes = ScopeStack::new();
        scopes.declare_var("x", var(Type::Float)).unwrap();
        assert!(scopes.declare_var("x", var(Type::Int)).is_err());

        scopes.push();
        scopes.declare_var("x", var(Type::Int)).unwrap();
        assert_eq!(scopes.lookup_var("x").unwrap().ty, Some(Type::Int));
        scopes.pop();
        assert_eq!(scopes.lookup_var("x").unwrap().ty, Some(Type::Float));
    }

    #[test]
    fn popped_scope_is_gone() {
        let mut scopes = ScopeStack::new();
        scopes.push();
        scopes.declare_var("local", var(Type::Float)).unwrap();
        scopes.pop();
        assert!(scopes.lookup_var("local").is_none());
    }

    #[test]
    fn duplicate_overload_signature_is_rejected() {
        let mut scopes = ScopeStack::new();
        let sig = FnSig {
            name: "f".to_string(),
            ret: Some(Type::Float),
            params: vec![],
            returns_value: false,
        };
        scopes.declare_fn(sig.clone()).unwrap();
        // same parameter signature, different return type: still a duplicate.
        let mut dup = sig;
        dup.ret = Some(Type::Int);
        assert!(scopes.declare_fn(dup).is_err());
    }
}
