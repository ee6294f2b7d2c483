//! Reduce-time semantic analysis.
//!
//! Every node runs [`analyze`] once, bottom-up, the moment it is reduced:
//! its children are complete, so scoping and typing happen during the parse
//! itself. Semantic errors are collected on the [`Context`] instead of aborting,
//! so a batch of actionable diagnostics comes out of one attempt; a non-empty
//! batch still fails the compilation.

pub mod builtin;
pub mod scope;
pub mod types;

use crate::ast::{
    AstPool, CallTarget, Child, Derived, FnSig, IdentTarget, NodeId, NodeKind, QualifierKind,
    VarSig,
};
use crate::error::{SemanticDiagnostic, SemanticError};
use crate::span::Span;
use crate::token::{Token, TermKind};
use builtin::{builtin_var, resolve_builtin};
use scope::{ScopeStack, StructInfo, VarInfo};
use types::Type;

/// Per-compilation mutable state: the node pool, the scope stack and the
/// collected diagnostics. Strict create → use → reset lifecycle; reusing a
/// context without [`Context::reset`] leaks symbols and nodes of the previous
/// compilation into the next one.
pub struct Context {
    pub pool: AstPool,
    pub scopes: ScopeStack,
    pub diagnostics: Vec<SemanticDiagnostic>,
    current_fn: Option<FnSig>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            pool: AstPool::new(),
            scopes: ScopeStack::new(),
            diagnostics: Vec::new(),
            current_fn: None,
        }
    }

    pub fn reset(&mut self) {
        self.pool.reset();
        self.scopes.reset();
        self.diagnostics.clear();
        self.current_fn = None;
    }

    fn error(&mut self, error: SemanticError, span: Span) {
        self.diagnostics.push(SemanticDiagnostic { error, span });
    }
}

pub fn is_expr_kind(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::AssignExpr
            | NodeKind::TernaryExpr
            | NodeKind::BinaryExpr
            | NodeKind::UnaryExpr
            | NodeKind::PostfixOp
            | NodeKind::MemberExpr
            | NodeKind::IndexExpr
            | NodeKind::CallExpr
            | NodeKind::ParenExpr
            | NodeKind::IdentExpr
            | NodeKind::LiteralExpr
    )
}

/// the semantic hook, dispatched by node kind. Called by the parser right after
/// the node is allocated from the pool.
pub fn analyze(id: NodeId, ctx: &mut Context) {
    match ctx.pool.kind(id) {
        NodeKind::ScopeBegin | NodeKind::ForBegin => ctx.scopes.push(),
        NodeKind::CompoundStmt
        | NodeKind::ForStmt
        | NodeKind::ShaderProgram
        | NodeKind::SubShader
        | NodeKind::Pass => ctx.scopes.pop(),
        NodeKind::TypeSpec => analyze_type_spec(id, ctx),
        NodeKind::VarDecl => analyze_var_decl(id, ctx),
        NodeKind::StructMember => analyze_struct_member(id, ctx),
        NodeKind::StructDef => analyze_struct_def(id, ctx),
        NodeKind::Param => analyze_param(id, ctx),
        NodeKind::FnHeader => analyze_fn_header(id, ctx),
        NodeKind::FnDef => analyze_fn_def(id, ctx),
        NodeKind::ReturnStmt => analyze_return(id, ctx),
        NodeKind::IdentExpr => analyze_ident(id, ctx),
        NodeKind::LiteralExpr => analyze_literal(id, ctx),
        NodeKind::ParenExpr => analyze_paren(id, ctx),
        NodeKind::UnaryExpr => analyze_unary(id, ctx),
        NodeKind::PostfixOp => analyze_postfix_op(id, ctx),
        NodeKind::BinaryExpr => analyze_binary(id, ctx),
        NodeKind::AssignExpr => analyze_assign(id, ctx),
        NodeKind::TernaryExpr => analyze_ternary(id, ctx),
        NodeKind::MemberExpr => analyze_member(id, ctx),
        NodeKind::IndexExpr => analyze_index(id, ctx),
        NodeKind::CallExpr => analyze_call(id, ctx),
        // structural and metadata kinds carry no symbols or types.
        _ => {}
    }
}

fn expr_type_of(pool: &AstPool, id: NodeId) -> Option<Type> {
    pool.get(id).expr_type()
}

fn first_token_term(pool: &AstPool, id: NodeId) -> Option<TermKind> {
    pool.get(id)
        .children
        .iter()
        .filter_map(Child::token)
        .map(|tok| tok.token.term())
        .next()
}

fn analyze_type_spec(id: NodeId, ctx: &mut Context) {
    let ty = match first_token_term(&ctx.pool, id) {
        Some(TermKind::Ident) => {
            let name = ctx.pool.child_ident(id).expect("ident type spec").to_string();
            ctx.scopes
                .lookup_struct(&name)
                .map(|_| Type::Struct(name))
        }
        Some(term) => Type::from_term(term),
        None => None,
    };
    ctx.pool.get_mut(id).derived = Derived::Type(ty);
}

fn type_spec_name(pool: &AstPool, id: NodeId) -> String {
    pool.get(id)
        .children
        .iter()
        .filter_map(Child::token)
        .map(|tok| tok.token.text())
        .next()
        .unwrap_or_default()
}

/// resolved type of a `TypeSpec` child, reporting an undeclared type name.
fn resolve_type_spec(id: NodeId, ctx: &mut Context) -> Option<Type> {
    let spec = ctx.pool.child_of_kind(id, NodeKind::TypeSpec)?;
    let ty = match &ctx.pool.get(spec).derived {
        Derived::Type(ty) => ty.clone(),
        _ => None,
    };
    if ty.is_none() {
        let name = type_spec_name(&ctx.pool, spec);
        let span = ctx.pool.get(spec).span.clone();
        ctx.error(SemanticError::UndeclaredIdentifier(name), span);
    }
    ty
}

/// applies array specifiers to a base type; more than one specifier is the
/// array-of-array error.
fn apply_array_specs(id: NodeId, base: Option<Type>, ctx: &mut Context) -> Option<Type> {
    let specs = match ctx.pool.child_of_kind(id, NodeKind::ItemList) {
        Some(list) => ctx.pool.list_items(list),
        None => return base,
    };
    if specs.len() > 1 {
        let span = ctx.pool.get(id).span.clone();
        ctx.error(SemanticError::ArrayOfArray, span);
    }
    let size = specs.first().and_then(|&spec| array_size(&ctx.pool, spec));
    base.map(|ty| Type::Array(Box::new(ty), size))
}

fn array_size(pool: &AstPool, spec: NodeId) -> Option<usize> {
    let expr = pool.child_nodes(spec).next()?;
    if pool.kind(expr) != NodeKind::LiteralExpr {
        return None;
    }
    pool.get(expr)
        .children
        .iter()
        .filter_map(Child::token)
        .find_map(|tok| match tok.token {
            Token::IntLit(n) if n >= 0 => Some(n as usize),
            _ => None,
        })
}

fn qualifier_of(pool: &AstPool, id: NodeId) -> Option<QualifierKind> {
    let node = pool.child_of_kind(id, NodeKind::Qualifier)?;
    match first_token_term(pool, node) {
        Some(TermKind::Const) => Some(QualifierKind::Const),
        Some(TermKind::Uniform) => Some(QualifierKind::Uniform),
        Some(TermKind::Attribute) => Some(QualifierKind::Attribute),
        Some(TermKind::Varying) => Some(QualifierKind::Varying),
        _ => None,
    }
}

fn analyze_var_decl(id: NodeId, ctx: &mut Context) {
    let ty = resolve_type_spec(id, ctx);
    let ty = apply_array_specs(id, ty, ctx);
    let qualifier = qualifier_of(&ctx.pool, id);
    let name = ctx
        .pool
        .child_ident(id)
        .expect("declaration has a name")
        .to_string();

    let info = VarInfo {
        ty: ty.clone(),
        qualifier,
        is_global: ctx.current_fn.is_none(),
    };
    if let Err(error) = ctx.scopes.declare_var(&name, info) {
        let span = ctx.pool.get(id).span.clone();
        ctx.error(error, span);
    }
    ctx.pool.get_mut(id).derived = Derived::Var(VarSig {
        name,
        ty,
        qualifier,
    });
}

fn analyze_struct_member(id: NodeId, ctx: &mut Context) {
    let ty = resolve_type_spec(id, ctx);
    let ty = apply_array_specs(id, ty, ctx);
    let name = ctx
        .pool
        .child_ident(id)
        .expect("struct member has a name")
        .to_string();
    ctx.pool.get_mut(id).derived = Derived::Var(VarSig {
        name,
        ty,
        qualifier: None,
    });
}

fn analyze_struct_def(id: NodeId, ctx: &mut Context) {
    let name = ctx
        .pool
        .child_ident(id)
        .expect("struct has a name")
        .to_string();
    let fields = match ctx.pool.child_of_kind(id, NodeKind::ItemList) {
        Some(list) => ctx
            .pool
            .list_items(list)
            .into_iter()
            .filter_map(|member| match &ctx.pool.get(member).derived {
                Derived::Var(sig) => Some((sig.name.clone(), sig.ty.clone())),
                _ => None,
            })
            .collect(),
        None => Vec::new(),
    };
    if let Err(error) = ctx.scopes.declare_struct(&name, StructInfo { fields }) {
        let span = ctx.pool.get(id).span.clone();
        ctx.error(error, span);
    }
}

fn analyze_param(id: NodeId, ctx: &mut Context) {
    let ty = resolve_type_spec(id, ctx);
    let ty = apply_array_specs(id, ty, ctx);
    let name = ctx
        .pool
        .child_ident(id)
        .expect("parameter has a name")
        .to_string();
    ctx.pool.get_mut(id).derived = Derived::Var(VarSig {
        name,
        ty,
        qualifier: None,
    });
}

fn analyze_fn_header(id: NodeId, ctx: &mut Context) {
    let ret = resolve_type_spec(id, ctx);
    let name = ctx
        .pool
        .child_ident(id)
        .expect("function has a name")
        .to_string();
    let params: Vec<VarSig> = match ctx.pool.child_of_kind(id, NodeKind::ItemList) {
        Some(list) => ctx
            .pool
            .list_items(list)
            .into_iter()
            .filter_map(|param| match &ctx.pool.get(param).derived {
                Derived::Var(sig) => Some(sig.clone()),
                _ => None,
            })
            .collect(),
        None => Vec::new(),
    };

    let sig = FnSig {
        name,
        ret,
        params,
        returns_value: false,
    };
    if let Err(error) = ctx.scopes.declare_fn(sig.clone()) {
        let span = ctx.pool.get(id).span.clone();
        ctx.error(error, span);
    }

    // parameters live in a fresh scope covering the body; popped when the
    // definition reduces.
    ctx.scopes.push();
    for param in &sig.params {
        let info = VarInfo {
            ty: param.ty.clone(),
            qualifier: None,
            is_global: false,
        };
        if let Err(error) = ctx.scopes.declare_var(&param.name, info) {
            let span = ctx.pool.get(id).span.clone();
            ctx.error(error, span);
        }
    }
    ctx.current_fn = Some(sig.clone());
    ctx.pool.get_mut(id).derived = Derived::Fn(sig);
}

fn analyze_fn_def(id: NodeId, ctx: &mut Context) {
    ctx.scopes.pop();
    let sig = match ctx.current_fn.take() {
        Some(sig) => sig,
        None => return,
    };
    let span = ctx.pool.get(id).span.clone();
    match &sig.ret {
        Some(Type::Void) => {
            if sig.returns_value {
                ctx.error(SemanticError::UnexpectedReturn(sig.name.clone()), span);
            }
        }
        Some(_) => {
            if !sig.returns_value {
                ctx.error(SemanticError::MissingReturn(sig.name.clone()), span);
            }
        }
        None => {}
    }
    ctx.pool.get_mut(id).derived = Derived::Fn(sig);
}

fn analyze_return(id: NodeId, ctx: &mut Context) {
    let has_value = ctx.pool.child_nodes(id).next().is_some();
    if has_value {
        if let Some(current) = ctx.current_fn.as_mut() {
            current.returns_value = true;
        }
    }
}

fn analyze_ident(id: NodeId, ctx: &mut Context) {
    let name = ctx
        .pool
        .child_ident(id)
        .expect("identifier expression")
        .to_string();
    let (ty, target) = if let Some(info) = ctx.scopes.lookup_var(&name) {
        let target = if info.is_global {
            IdentTarget::Global {
                qualifier: info.qualifier,
            }
        } else {
            IdentTarget::Local
        };
        (info.ty.clone(), target)
    } else if let Some(ty) = builtin_var(&name) {
        (Some(ty.clone()), IdentTarget::BuiltinVar)
    } else {
        let span = ctx.pool.get(id).span.clone();
        ctx.error(SemanticError::UndeclaredIdentifier(name), span);
        (None, IdentTarget::Unresolved)
    };
    ctx.pool.get_mut(id).derived = Derived::Ident { ty, target };
}

fn analyze_literal(id: NodeId, ctx: &mut Context) {
    let ty = first_token_term(&ctx.pool, id).and_then(|term| match term {
        TermKind::IntLit => Some(Type::Int),
        TermKind::FloatLit => Some(Type::Float),
        TermKind::True | TermKind::False => Some(Type::Bool),
        _ => None,
    });
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_paren(id: NodeId, ctx: &mut Context) {
    let ty = ctx
        .pool
        .child_nodes(id)
        .next()
        .and_then(|inner| expr_type_of(&ctx.pool, inner));
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_unary(id: NodeId, ctx: &mut Context) {
    let operand = ctx
        .pool
        .child_nodes(id)
        .next()
        .and_then(|inner| expr_type_of(&ctx.pool, inner));
    let ty = match first_token_term(&ctx.pool, id) {
        Some(TermKind::Bang) => Some(Type::Bool),
        _ => operand,
    };
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_postfix_op(id: NodeId, ctx: &mut Context) {
    let ty = ctx
        .pool
        .child_nodes(id)
        .next()
        .and_then(|inner| expr_type_of(&ctx.pool, inner));
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_binary(id: NodeId, ctx: &mut Context) {
    let mut operands = ctx.pool.child_nodes(id);
    let left = operands.next().and_then(|n| expr_type_of(&ctx.pool, n));
    let right = operands.next().and_then(|n| expr_type_of(&ctx.pool, n));
    drop(operands);
    let ty = match first_token_term(&ctx.pool, id) {
        // comparison and logical operators always yield bool.
        Some(
            TermKind::AndAnd
            | TermKind::OrOr
            | TermKind::EqualEqual
            | TermKind::NotEqual
            | TermKind::LessThan
            | TermKind::LessThanEqual
            | TermKind::GreaterThan
            | TermKind::GreaterThanEqual,
        ) => Some(Type::Bool),
        // arithmetic preserves the operand type when both sides agree; a
        // mismatch stays unresolved and is left to the downstream GPU compiler.
        _ => match (left, right) {
            (Some(l), Some(r)) if l == r => Some(l),
            _ => None,
        },
    };
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_assign(id: NodeId, ctx: &mut Context) {
    let mut operands = ctx.pool.child_nodes(id);
    let lhs = operands.next().and_then(|n| expr_type_of(&ctx.pool, n));
    let rhs = operands.next().and_then(|n| expr_type_of(&ctx.pool, n));
    drop(operands);
    ctx.pool.get_mut(id).derived = Derived::Expr(lhs.or(rhs));
}

fn analyze_ternary(id: NodeId, ctx: &mut Context) {
    let mut operands = ctx.pool.child_nodes(id);
    let _cond = operands.next();
    let then_ty = operands.next().and_then(|n| expr_type_of(&ctx.pool, n));
    let else_ty = operands.next().and_then(|n| expr_type_of(&ctx.pool, n));
    drop(operands);
    let ty = match (then_ty, else_ty) {
        (Some(a), Some(b)) if a == b => Some(a),
        _ => None,
    };
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_member(id: NodeId, ctx: &mut Context) {
    let base = ctx
        .pool
        .child_nodes(id)
        .next()
        .and_then(|n| expr_type_of(&ctx.pool, n));
    let member = ctx.pool.child_ident(id).unwrap_or_default().to_string();
    let ty = match base {
        Some(Type::Struct(name)) => ctx
            .scopes
            .lookup_struct(&name)
            .and_then(|info| info.field(&member).cloned())
            .flatten(),
        Some(ty) => ty.swizzle(&member),
        None => None,
    };
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_index(id: NodeId, ctx: &mut Context) {
    let ty = ctx
        .pool
        .child_nodes(id)
        .next()
        .and_then(|n| expr_type_of(&ctx.pool, n))
        .and_then(|base| base.element());
    ctx.pool.get_mut(id).derived = Derived::Expr(ty);
}

fn analyze_call(id: NodeId, ctx: &mut Context) {
    let args: Vec<Option<Type>> = match ctx.pool.child_of_kind(id, NodeKind::ItemList) {
        Some(list) => ctx
            .pool
            .list_items(list)
            .into_iter()
            .map(|arg| expr_type_of(&ctx.pool, arg))
            .collect(),
        None => Vec::new(),
    };
    let spec = ctx
        .pool
        .child_of_kind(id, NodeKind::TypeSpec)
        .expect("call has a callee");
    let callee_ty = match &ctx.pool.get(spec).derived {
        Derived::Type(ty) => ty.clone(),
        _ => None,
    };
    let name = type_spec_name(&ctx.pool, spec);

    let (ty, target) = match callee_ty {
        // constructor call: vec4(...), mat3(...), or a declared struct type.
        // argument shapes are left to the downstream GPU compiler.
        Some(Type::Void) => {
            let span = ctx.pool.get(id).span.clone();
            ctx.error(
                SemanticError::NoMatchingOverload(name, describe_args(&args)),
                span,
            );
            (None, CallTarget::Unresolved)
        }
        Some(ty) => (Some(ty.clone()), CallTarget::Constructor(ty)),
        None => {
            let concrete: Option<Vec<Type>> = args.iter().cloned().collect();
            let builtin = concrete
                .as_deref()
                .and_then(|tys| resolve_builtin(&name, tys));
            if let Some(ret) = builtin {
                (Some(ret), CallTarget::Builtin)
            } else if let Some(sig) = resolve_user_overload(&name, &args, ctx) {
                (sig.ret.clone(), CallTarget::User(sig.key()))
            } else {
                let span = ctx.pool.get(id).span.clone();
                ctx.error(
                    SemanticError::NoMatchingOverload(name, describe_args(&args)),
                    span,
                );
                (None, CallTarget::Unresolved)
            }
        }
    };
    ctx.pool.get_mut(id).derived = Derived::Call { ty, target };
}

fn describe_args(args: &[Option<Type>]) -> String {
    args.iter()
        .map(|ty| match ty {
            Some(ty) => ty.to_string(),
            None => "?".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// exact arity + type match against the visible overload set.
fn resolve_user_overload(name: &str, args: &[Option<Type>], ctx: &Context) -> Option<FnSig> {
    let overloads = ctx.scopes.lookup_fn_overloads(name)?;
    overloads
        .iter()
        .find(|sig| {
            sig.params.len() == args.len()
                && sig
                    .params
                    .iter()
                    .zip(args)
                    .all(|(param, arg)| match (&param.ty, arg) {
                        (Some(p), Some(a)) => p == a,
                        _ => false,
                    })
        })
        .cloned()
}
