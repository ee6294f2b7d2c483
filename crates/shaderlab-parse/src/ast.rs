//! The syntax tree built by the shift-reduce parser.
//!
//! Unlike a typed tree, every construct is a [`SyntaxNode`] tagged with a
//! [`NodeKind`] and holding an ordered list of children (tokens or other nodes).
//! Nodes live in an [`AstPool`] that is cleared and reused across compilations;
//! kind-specific derived data is reset when a slot is reused, so no compilation
//! can observe stale state from a previous one.

use derive_more::From;

use crate::sema::types::Type;
use crate::span::Span;
use crate::token::Token;

/// Non-terminal tag of a [`SyntaxNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ShaderProgram,
    SubShader,
    Pass,
    UsePass,
    StageEntry,
    TagsBlock,
    TagPair,
    TagValue,
    PropertiesBlock,
    PropertyDecl,
    PropertyDefault,
    PropertyNum,
    RenderStateBlock,
    RenderStateItem,
    RenderStateValue,
    StructDef,
    StructMember,
    FnDef,
    FnHeader,
    Param,
    VarDecl,
    VarDeclStmt,
    Qualifier,
    TypeSpec,
    ArraySpec,
    ItemList,
    ScopeBegin,
    ForBegin,
    CompoundStmt,
    ExprStmt,
    IfStmt,
    ForStmt,
    ForInit,
    ExprOpt,
    WhileStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    DiscardStmt,
    MacroDirective,
    AssignExpr,
    TernaryExpr,
    BinaryExpr,
    UnaryExpr,
    PostfixOp,
    MemberExpr,
    IndexExpr,
    CallExpr,
    ParenExpr,
    IdentExpr,
    LiteralExpr,
}

/// Index of a node in its [`AstPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenChild {
    pub token: Token,
    pub span: Span,
}

/// A child of a node: either a shifted token or a previously reduced node.
#[derive(Clone, Debug, PartialEq, From)]
pub enum Child {
    Token(TokenChild),
    Node(NodeId),
}

impl Child {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Child::Node(id) => Some(*id),
            Child::Token(_) => None,
        }
    }
    pub fn token(&self) -> Option<&TokenChild> {
        match self {
            Child::Token(tok) => Some(tok),
            Child::Node(_) => None,
        }
    }
}

/// Variable signature derived for declarations, parameters and struct members.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarSig {
    pub name: String,
    pub ty: Option<Type>,
    pub qualifier: Option<QualifierKind>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualifierKind {
    Const,
    Uniform,
    Attribute,
    Varying,
}

/// Function signature derived when a function header reduces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FnSig {
    pub name: String,
    pub ret: Option<Type>,
    pub params: Vec<VarSig>,
    /// a value-carrying `return` was seen in the body.
    pub returns_value: bool,
}

impl FnSig {
    /// stable key for overload identity and call-site resolution.
    pub fn key(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| match &p.ty {
                Some(ty) => ty.to_string(),
                None => "?".to_string(),
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.name, params)
    }
}

/// Where an identifier expression resolved to.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum IdentTarget {
    #[default]
    Unresolved,
    Local,
    Global {
        qualifier: Option<QualifierKind>,
    },
    BuiltinVar,
}

/// What a call expression resolved to.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CallTarget {
    #[default]
    Unresolved,
    Builtin,
    Constructor(Type),
    User(String),
}

/// Kind-specific data computed by the semantic hooks. Reset by [`SyntaxNode::init`]
/// whenever a pool slot is reused.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Derived {
    #[default]
    None,
    /// resolved type of a `TypeSpec` node.
    Type(Option<Type>),
    /// cached result type of an expression node.
    Expr(Option<Type>),
    /// identifier expression: cached type plus resolution target.
    Ident {
        ty: Option<Type>,
        target: IdentTarget,
    },
    /// call expression: cached type plus resolution target.
    Call {
        ty: Option<Type>,
        target: CallTarget,
    },
    Var(VarSig),
    Fn(FnSig),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<Child>,
    pub derived: Derived,
}

impl SyntaxNode {
    /// reset a pooled slot before reuse.
    fn init(&mut self, kind: NodeKind, span: Span) {
        self.kind = kind;
        self.span = span;
        self.children.clear();
        self.derived = Derived::None;
    }

    /// cached expression type, for any expression node kind.
    pub fn expr_type(&self) -> Option<Type> {
        match &self.derived {
            Derived::Expr(ty) => ty.clone(),
            Derived::Ident { ty, .. } => ty.clone(),
            Derived::Call { ty, .. } => ty.clone(),
            _ => None,
        }
    }
}

/// Pool of syntax nodes, reused across compilations. One compilation exclusively
/// owns the pool between [`AstPool::reset`] and its completion.
#[derive(Default)]
pub struct AstPool {
    nodes: Vec<SyntaxNode>,
    live: usize,
}

impl AstPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// clear all nodes while keeping slot allocations for reuse.
    pub fn reset(&mut self) {
        self.live = 0;
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn alloc(&mut self, kind: NodeKind, children: Vec<Child>, span: Span) -> NodeId {
        let id = NodeId(self.live as u32);
        if self.live < self.nodes.len() {
            let slot = &mut self.nodes[self.live];
            slot.init(kind, span);
            slot.children = children;
        } else {
            self.nodes.push(SyntaxNode {
                kind,
                span,
                children,
                derived: Derived::None,
            });
        }
        self.live += 1;
        id
    }

    pub fn get(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SyntaxNode {
        &mut self.nodes[id.index()]
    }

    // -- view helpers used by the semantic hooks and downstream passes --

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).kind
    }

    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.get(id).children.iter().filter_map(Child::node)
    }

    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.child_nodes(id).find(|&c| self.kind(c) == kind)
    }

    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.child_nodes(id)
            .filter(|&c| self.kind(c) == kind)
            .collect()
    }

    /// first identifier token among direct children.
    pub fn child_ident(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .children
            .iter()
            .filter_map(Child::token)
            .find_map(|tok| tok.token.ident())
    }

    /// first string literal token among direct children.
    pub fn child_string(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .children
            .iter()
            .filter_map(Child::token)
            .find_map(|tok| tok.token.string())
    }

    /// flatten a left-recursive `ItemList` chain into the items in source order.
    pub fn list_items(&self, id: NodeId) -> Vec<NodeId> {
        let mut items = Vec::new();
        self.collect_list(id, &mut items);
        items
    }

    fn collect_list(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.child_nodes(id) {
            if self.kind(child) == NodeKind::ItemList {
                self.collect_list(child, out);
            } else {
                out.push(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_reuses_slots_and_resets_derived_state() {
        let mut pool = AstPool::new();
        let id = pool.alloc(NodeKind::IdentExpr, Vec::new(), Span::new(0..1));
        pool.get_mut(id).derived = Derived::Expr(Some(Type::Float));

        pool.reset();
        assert!(pool.is_empty());
        let id2 = pool.alloc(NodeKind::LiteralExpr, Vec::new(), Span::new(4..5));
        assert_eq!(id, id2);
        assert_eq!(pool.get(id2).kind, NodeKind::LiteralExpr);
        assert_eq!(pool.get(id2).derived, Derived::None);
        assert!(pool.get(id2).children.is_empty());
    }
}
