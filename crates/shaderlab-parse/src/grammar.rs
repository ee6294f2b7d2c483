//! The declarative production set of the shaderlab grammar.
//!
//! Productions are plain data; [`crate::lalr`] compiles them once, at first use,
//! into the LALR(1) action/goto automaton shared by every compilation.

use crate::ast::NodeKind;
use crate::token::TermKind;

/// A grammar symbol: terminal or non-terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    T(TermKind),
    N(NonTerm),
}

/// Syntactic categories of the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum NonTerm {
    Goal,
    ShaderProgram,
    ShaderItems,
    ShaderItem,
    GlobalDecl,
    PropertiesBlock,
    PropertyList,
    PropertyDecl,
    PropertyDefault,
    PropertyNum,
    PropertyNumList,
    SubShaderBlock,
    SubShaderItems,
    SubShaderItem,
    PassBlock,
    PassItems,
    PassItem,
    UsePassDecl,
    StageEntry,
    TagsBlock,
    TagList,
    TagPair,
    TagValue,
    RenderStateBlock,
    StateKw,
    RenderStateItems,
    RenderStateItem,
    RenderStateValue,
    StructDef,
    StructMembers,
    StructMember,
    FnDef,
    FnHeader,
    ParamList,
    Param,
    VarDecl,
    VarDeclStmt,
    Qualifier,
    TypeSpec,
    ArraySpecs,
    ArraySpec,
    CompoundStmt,
    ScopeLBrace,
    ForBegin,
    StmtList,
    Stmt,
    ExprStmt,
    IfStmt,
    ForStmt,
    ForInit,
    ExprOpt,
    WhileStmt,
    ReturnStmt,
    MacroStmt,
    Expr,
    AssignExpr,
    AssignOp,
    CondExpr,
    OrExpr,
    AndExpr,
    EqExpr,
    RelExpr,
    AddExpr,
    MulExpr,
    UnaryExpr,
    PostfixExpr,
    CallExpr,
    ArgList,
    Primary,
}

impl NonTerm {
    pub const COUNT: usize = NonTerm::Primary as usize + 1;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// What a reduction pushes back on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Build {
    /// forward the single popped child unchanged. Keeps unit chains like
    /// `AddExpr -> MulExpr` from allocating wrapper nodes.
    PassThrough,
    /// allocate a node of this kind over the popped children and run its
    /// semantic hook.
    Node(NodeKind),
}

#[derive(Clone, Debug)]
pub struct Production {
    pub goal: NonTerm,
    pub rhs: Vec<Symbol>,
    pub build: Build,
}

/// index of the augmented start production in [`productions`].
pub const AUGMENTED: usize = 0;

pub fn productions() -> Vec<Production> {
    use Build::{Node, PassThrough as Fwd};
    use NodeKind as K;
    use NonTerm::*;
    use Symbol::N as n;
    use TermKind::*;

    fn t(term: TermKind) -> Symbol {
        Symbol::T(term)
    }

    let mut rules: Vec<Production> = Vec::new();
    let mut rule = |goal: NonTerm, rhs: &[Symbol], build: Build| {
        rules.push(Production {
            goal,
            rhs: rhs.to_vec(),
            build,
        });
    };

    // augmented start symbol; must stay first.
    rule(Goal, &[n(ShaderProgram)], Fwd);

    // shader structure
    rule(
        ShaderProgram,
        &[t(Shader), t(StringLit), n(ScopeLBrace), n(ShaderItems), t(BraceRight)],
        Node(K::ShaderProgram),
    );
    rule(ShaderItems, &[], Node(K::ItemList));
    rule(ShaderItems, &[n(ShaderItems), n(ShaderItem)], Node(K::ItemList));
    rule(ShaderItem, &[n(PropertiesBlock)], Fwd);
    rule(ShaderItem, &[n(SubShaderBlock)], Fwd);
    rule(ShaderItem, &[n(GlobalDecl)], Fwd);
    rule(GlobalDecl, &[n(StructDef)], Fwd);
    rule(GlobalDecl, &[n(FnDef)], Fwd);
    rule(GlobalDecl, &[n(VarDeclStmt)], Fwd);
    rule(GlobalDecl, &[n(RenderStateBlock)], Fwd);
    rule(GlobalDecl, &[n(MacroStmt)], Fwd);

    rule(
        SubShaderBlock,
        &[t(SubShader), t(StringLit), n(ScopeLBrace), n(SubShaderItems), t(BraceRight)],
        Node(K::SubShader),
    );
    rule(SubShaderItems, &[], Node(K::ItemList));
    rule(
        SubShaderItems,
        &[n(SubShaderItems), n(SubShaderItem)],
        Node(K::ItemList),
    );
    rule(SubShaderItem, &[n(TagsBlock)], Fwd);
    rule(SubShaderItem, &[n(PassBlock)], Fwd);
    rule(SubShaderItem, &[n(UsePassDecl)], Fwd);
    rule(SubShaderItem, &[n(GlobalDecl)], Fwd);

    rule(
        PassBlock,
        &[t(Pass), t(StringLit), n(ScopeLBrace), n(PassItems), t(BraceRight)],
        Node(K::Pass),
    );
    rule(PassItems, &[], Node(K::ItemList));
    rule(PassItems, &[n(PassItems), n(PassItem)], Node(K::ItemList));
    rule(PassItem, &[n(TagsBlock)], Fwd);
    rule(PassItem, &[n(StageEntry)], Fwd);
    rule(PassItem, &[n(GlobalDecl)], Fwd);

    rule(UsePassDecl, &[t(UsePass), t(StringLit)], Node(K::UsePass));

    rule(
        StageEntry,
        &[t(VertexShader), t(Equal), t(Ident), t(Semicolon)],
        Node(K::StageEntry),
    );
    rule(
        StageEntry,
        &[t(FragmentShader), t(Equal), t(Ident), t(Semicolon)],
        Node(K::StageEntry),
    );

    // tags
    rule(TagsBlock, &[t(Tags), t(BraceLeft), t(BraceRight)], Node(K::TagsBlock));
    rule(
        TagsBlock,
        &[t(Tags), t(BraceLeft), n(TagList), t(BraceRight)],
        Node(K::TagsBlock),
    );
    rule(TagList, &[n(TagPair)], Node(K::ItemList));
    rule(TagList, &[n(TagList), t(Comma), n(TagPair)], Node(K::ItemList));
    rule(TagPair, &[t(Ident), t(Equal), n(TagValue)], Node(K::TagPair));
    rule(TagValue, &[t(StringLit)], Node(K::TagValue));
    rule(TagValue, &[t(IntLit)], Node(K::TagValue));
    rule(TagValue, &[t(FloatLit)], Node(K::TagValue));
    rule(TagValue, &[t(True)], Node(K::TagValue));
    rule(TagValue, &[t(False)], Node(K::TagValue));

    // editor properties
    rule(
        PropertiesBlock,
        &[t(EditorProperties), t(BraceLeft), t(BraceRight)],
        Node(K::PropertiesBlock),
    );
    rule(
        PropertiesBlock,
        &[t(EditorProperties), t(BraceLeft), n(PropertyList), t(BraceRight)],
        Node(K::PropertiesBlock),
    );
    rule(PropertyList, &[n(PropertyDecl)], Node(K::ItemList));
    rule(
        PropertyList,
        &[n(PropertyList), n(PropertyDecl)],
        Node(K::ItemList),
    );
    rule(
        PropertyDecl,
        &[t(Ident), t(ParenLeft), t(StringLit), t(Comma), t(Ident), t(ParenRight), t(Semicolon)],
        Node(K::PropertyDecl),
    );
    rule(
        PropertyDecl,
        &[
            t(Ident),
            t(ParenLeft),
            t(StringLit),
            t(Comma),
            t(Ident),
            t(ParenRight),
            t(Equal),
            n(PropertyDefault),
            t(Semicolon),
        ],
        Node(K::PropertyDecl),
    );
    rule(PropertyDefault, &[n(PropertyNum)], Node(K::PropertyDefault));
    rule(PropertyDefault, &[t(StringLit)], Node(K::PropertyDefault));
    rule(PropertyDefault, &[t(True)], Node(K::PropertyDefault));
    rule(PropertyDefault, &[t(False)], Node(K::PropertyDefault));
    rule(
        PropertyDefault,
        &[t(ParenLeft), n(PropertyNumList), t(ParenRight)],
        Node(K::PropertyDefault),
    );
    rule(PropertyNum, &[t(IntLit)], Node(K::PropertyNum));
    rule(PropertyNum, &[t(FloatLit)], Node(K::PropertyNum));
    rule(PropertyNum, &[t(Minus), t(IntLit)], Node(K::PropertyNum));
    rule(PropertyNum, &[t(Minus), t(FloatLit)], Node(K::PropertyNum));
    rule(PropertyNumList, &[n(PropertyNum)], Node(K::ItemList));
    rule(
        PropertyNumList,
        &[n(PropertyNumList), t(Comma), n(PropertyNum)],
        Node(K::ItemList),
    );

    // render state blocks
    rule(StateKw, &[t(BlendState)], Fwd);
    rule(StateKw, &[t(DepthState)], Fwd);
    rule(StateKw, &[t(StencilState)], Fwd);
    rule(StateKw, &[t(RasterState)], Fwd);
    rule(
        RenderStateBlock,
        &[n(StateKw), t(BraceLeft), n(RenderStateItems), t(BraceRight)],
        Node(K::RenderStateBlock),
    );
    rule(
        RenderStateBlock,
        &[n(StateKw), t(Ident), t(BraceLeft), n(RenderStateItems), t(BraceRight)],
        Node(K::RenderStateBlock),
    );
    rule(
        RenderStateBlock,
        &[n(StateKw), t(Equal), t(Ident), t(Semicolon)],
        Node(K::RenderStateBlock),
    );
    rule(RenderStateItems, &[], Node(K::ItemList));
    rule(
        RenderStateItems,
        &[n(RenderStateItems), n(RenderStateItem)],
        Node(K::ItemList),
    );
    rule(
        RenderStateItem,
        &[t(Ident), t(Equal), n(RenderStateValue), t(Semicolon)],
        Node(K::RenderStateItem),
    );
    rule(RenderStateValue, &[t(IntLit)], Node(K::RenderStateValue));
    rule(RenderStateValue, &[t(FloatLit)], Node(K::RenderStateValue));
    rule(RenderStateValue, &[t(StringLit)], Node(K::RenderStateValue));
    rule(RenderStateValue, &[t(True)], Node(K::RenderStateValue));
    rule(RenderStateValue, &[t(False)], Node(K::RenderStateValue));
    rule(RenderStateValue, &[t(Ident)], Node(K::RenderStateValue));
    rule(
        RenderStateValue,
        &[t(Ident), t(Period), t(Ident)],
        Node(K::RenderStateValue),
    );

    // struct definitions
    rule(
        StructDef,
        &[t(Struct), t(Ident), t(BraceLeft), n(StructMembers), t(BraceRight), t(Semicolon)],
        Node(K::StructDef),
    );
    rule(StructMembers, &[], Node(K::ItemList));
    rule(
        StructMembers,
        &[n(StructMembers), n(StructMember)],
        Node(K::ItemList),
    );
    rule(
        StructMember,
        &[n(TypeSpec), t(Ident), t(Semicolon)],
        Node(K::StructMember),
    );
    rule(
        StructMember,
        &[n(TypeSpec), t(Ident), n(ArraySpecs), t(Semicolon)],
        Node(K::StructMember),
    );

    // functions
    rule(FnDef, &[n(FnHeader), n(CompoundStmt)], Node(K::FnDef));
    rule(
        FnHeader,
        &[n(TypeSpec), t(Ident), t(ParenLeft), t(ParenRight)],
        Node(K::FnHeader),
    );
    rule(
        FnHeader,
        &[n(TypeSpec), t(Ident), t(ParenLeft), n(ParamList), t(ParenRight)],
        Node(K::FnHeader),
    );
    rule(ParamList, &[n(Param)], Node(K::ItemList));
    rule(ParamList, &[n(ParamList), t(Comma), n(Param)], Node(K::ItemList));
    rule(Param, &[n(TypeSpec), t(Ident)], Node(K::Param));
    rule(Param, &[n(TypeSpec), t(Ident), n(ArraySpecs)], Node(K::Param));

    // variable declarations
    rule(VarDeclStmt, &[n(VarDecl), t(Semicolon)], Node(K::VarDeclStmt));
    rule(VarDecl, &[n(TypeSpec), t(Ident)], Node(K::VarDecl));
    rule(VarDecl, &[n(TypeSpec), t(Ident), n(ArraySpecs)], Node(K::VarDecl));
    rule(
        VarDecl,
        &[n(TypeSpec), t(Ident), t(Equal), n(AssignExpr)],
        Node(K::VarDecl),
    );
    rule(
        VarDecl,
        &[n(TypeSpec), t(Ident), n(ArraySpecs), t(Equal), n(AssignExpr)],
        Node(K::VarDecl),
    );
    rule(VarDecl, &[n(Qualifier), n(TypeSpec), t(Ident)], Node(K::VarDecl));
    rule(
        VarDecl,
        &[n(Qualifier), n(TypeSpec), t(Ident), n(ArraySpecs)],
        Node(K::VarDecl),
    );
    rule(
        VarDecl,
        &[n(Qualifier), n(TypeSpec), t(Ident), t(Equal), n(AssignExpr)],
        Node(K::VarDecl),
    );
    rule(
        VarDecl,
        &[n(Qualifier), n(TypeSpec), t(Ident), n(ArraySpecs), t(Equal), n(AssignExpr)],
        Node(K::VarDecl),
    );
    rule(Qualifier, &[t(Const)], Node(K::Qualifier));
    rule(Qualifier, &[t(Uniform)], Node(K::Qualifier));
    rule(Qualifier, &[t(Attribute)], Node(K::Qualifier));
    rule(Qualifier, &[t(Varying)], Node(K::Qualifier));

    rule(TypeSpec, &[t(Void)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Float)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Int)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Bool)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Vec2)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Vec3)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Vec4)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Mat2)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Mat3)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Mat4)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Sampler2D)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(SamplerCube)], Node(K::TypeSpec));
    rule(TypeSpec, &[t(Ident)], Node(K::TypeSpec));

    rule(ArraySpecs, &[n(ArraySpec)], Node(K::ItemList));
    rule(ArraySpecs, &[n(ArraySpecs), n(ArraySpec)], Node(K::ItemList));
    rule(
        ArraySpec,
        &[t(BracketLeft), n(CondExpr), t(BracketRight)],
        Node(K::ArraySpec),
    );

    // statements
    rule(ScopeLBrace, &[t(BraceLeft)], Node(K::ScopeBegin));
    rule(
        CompoundStmt,
        &[n(ScopeLBrace), t(BraceRight)],
        Node(K::CompoundStmt),
    );
    rule(
        CompoundStmt,
        &[n(ScopeLBrace), n(StmtList), t(BraceRight)],
        Node(K::CompoundStmt),
    );
    rule(StmtList, &[n(Stmt)], Node(K::ItemList));
    rule(StmtList, &[n(StmtList), n(Stmt)], Node(K::ItemList));
    rule(Stmt, &[n(CompoundStmt)], Fwd);
    rule(Stmt, &[n(VarDeclStmt)], Fwd);
    rule(Stmt, &[n(ExprStmt)], Fwd);
    rule(Stmt, &[n(IfStmt)], Fwd);
    rule(Stmt, &[n(ForStmt)], Fwd);
    rule(Stmt, &[n(WhileStmt)], Fwd);
    rule(Stmt, &[n(ReturnStmt)], Fwd);
    rule(Stmt, &[t(Break), t(Semicolon)], Node(K::BreakStmt));
    rule(Stmt, &[t(Continue), t(Semicolon)], Node(K::ContinueStmt));
    rule(Stmt, &[t(Discard), t(Semicolon)], Node(K::DiscardStmt));
    rule(Stmt, &[n(MacroStmt)], Fwd);
    rule(ExprStmt, &[n(Expr), t(Semicolon)], Node(K::ExprStmt));
    rule(ExprStmt, &[t(Semicolon)], Node(K::ExprStmt));
    rule(
        IfStmt,
        &[t(If), t(ParenLeft), n(Expr), t(ParenRight), n(Stmt)],
        Node(K::IfStmt),
    );
    rule(
        IfStmt,
        &[t(If), t(ParenLeft), n(Expr), t(ParenRight), n(Stmt), t(Else), n(Stmt)],
        Node(K::IfStmt),
    );
    rule(ForBegin, &[t(For)], Node(K::ForBegin));
    rule(
        ForStmt,
        &[
            n(ForBegin),
            t(ParenLeft),
            n(ForInit),
            n(ExprOpt),
            t(Semicolon),
            n(ExprOpt),
            t(ParenRight),
            n(Stmt),
        ],
        Node(K::ForStmt),
    );
    rule(ForInit, &[n(VarDecl), t(Semicolon)], Node(K::ForInit));
    rule(ForInit, &[n(Expr), t(Semicolon)], Node(K::ForInit));
    rule(ForInit, &[t(Semicolon)], Node(K::ForInit));
    rule(ExprOpt, &[], Node(K::ExprOpt));
    rule(ExprOpt, &[n(Expr)], Fwd);
    rule(
        WhileStmt,
        &[t(While), t(ParenLeft), n(Expr), t(ParenRight), n(Stmt)],
        Node(K::WhileStmt),
    );
    rule(ReturnStmt, &[t(Return), t(Semicolon)], Node(K::ReturnStmt));
    rule(
        ReturnStmt,
        &[t(Return), n(Expr), t(Semicolon)],
        Node(K::ReturnStmt),
    );
    rule(MacroStmt, &[t(MacroDefine)], Node(K::MacroDirective));
    rule(MacroStmt, &[t(MacroUndef)], Node(K::MacroDirective));
    rule(MacroStmt, &[t(MacroIf)], Node(K::MacroDirective));
    rule(MacroStmt, &[t(MacroIfdef)], Node(K::MacroDirective));
    rule(MacroStmt, &[t(MacroIfndef)], Node(K::MacroDirective));
    rule(MacroStmt, &[t(MacroElif)], Node(K::MacroDirective));
    rule(MacroStmt, &[t(MacroElse)], Node(K::MacroDirective));
    rule(MacroStmt, &[t(MacroEndif)], Node(K::MacroDirective));

    // expressions, layered by precedence
    rule(Expr, &[n(AssignExpr)], Fwd);
    rule(AssignExpr, &[n(CondExpr)], Fwd);
    rule(
        AssignExpr,
        &[n(UnaryExpr), n(AssignOp), n(AssignExpr)],
        Node(K::AssignExpr),
    );
    rule(AssignOp, &[t(Equal)], Fwd);
    rule(AssignOp, &[t(PlusEqual)], Fwd);
    rule(AssignOp, &[t(MinusEqual)], Fwd);
    rule(AssignOp, &[t(TimesEqual)], Fwd);
    rule(AssignOp, &[t(DivisionEqual)], Fwd);
    rule(CondExpr, &[n(OrExpr)], Fwd);
    rule(
        CondExpr,
        &[n(OrExpr), t(Question), n(Expr), t(Colon), n(CondExpr)],
        Node(K::TernaryExpr),
    );
    rule(OrExpr, &[n(AndExpr)], Fwd);
    rule(OrExpr, &[n(OrExpr), t(OrOr), n(AndExpr)], Node(K::BinaryExpr));
    rule(AndExpr, &[n(EqExpr)], Fwd);
    rule(AndExpr, &[n(AndExpr), t(AndAnd), n(EqExpr)], Node(K::BinaryExpr));
    rule(EqExpr, &[n(RelExpr)], Fwd);
    rule(EqExpr, &[n(EqExpr), t(EqualEqual), n(RelExpr)], Node(K::BinaryExpr));
    rule(EqExpr, &[n(EqExpr), t(NotEqual), n(RelExpr)], Node(K::BinaryExpr));
    rule(RelExpr, &[n(AddExpr)], Fwd);
    rule(RelExpr, &[n(RelExpr), t(LessThan), n(AddExpr)], Node(K::BinaryExpr));
    rule(
        RelExpr,
        &[n(RelExpr), t(LessThanEqual), n(AddExpr)],
        Node(K::BinaryExpr),
    );
    rule(
        RelExpr,
        &[n(RelExpr), t(GreaterThan), n(AddExpr)],
        Node(K::BinaryExpr),
    );
    rule(
        RelExpr,
        &[n(RelExpr), t(GreaterThanEqual), n(AddExpr)],
        Node(K::BinaryExpr),
    );
    rule(AddExpr, &[n(MulExpr)], Fwd);
    rule(AddExpr, &[n(AddExpr), t(Plus), n(MulExpr)], Node(K::BinaryExpr));
    rule(AddExpr, &[n(AddExpr), t(Minus), n(MulExpr)], Node(K::BinaryExpr));
    rule(MulExpr, &[n(UnaryExpr)], Fwd);
    rule(MulExpr, &[n(MulExpr), t(Star), n(UnaryExpr)], Node(K::BinaryExpr));
    rule(
        MulExpr,
        &[n(MulExpr), t(ForwardSlash), n(UnaryExpr)],
        Node(K::BinaryExpr),
    );
    rule(MulExpr, &[n(MulExpr), t(Modulo), n(UnaryExpr)], Node(K::BinaryExpr));
    rule(UnaryExpr, &[n(PostfixExpr)], Fwd);
    rule(UnaryExpr, &[t(Bang), n(UnaryExpr)], Node(K::UnaryExpr));
    rule(UnaryExpr, &[t(Minus), n(UnaryExpr)], Node(K::UnaryExpr));
    rule(UnaryExpr, &[t(Plus), n(UnaryExpr)], Node(K::UnaryExpr));
    rule(UnaryExpr, &[t(PlusPlus), n(UnaryExpr)], Node(K::UnaryExpr));
    rule(UnaryExpr, &[t(MinusMinus), n(UnaryExpr)], Node(K::UnaryExpr));
    rule(PostfixExpr, &[n(Primary)], Fwd);
    rule(PostfixExpr, &[n(CallExpr)], Fwd);
    rule(
        PostfixExpr,
        &[n(PostfixExpr), t(Period), t(Ident)],
        Node(K::MemberExpr),
    );
    rule(
        PostfixExpr,
        &[n(PostfixExpr), t(BracketLeft), n(Expr), t(BracketRight)],
        Node(K::IndexExpr),
    );
    rule(PostfixExpr, &[n(PostfixExpr), t(PlusPlus)], Node(K::PostfixOp));
    rule(PostfixExpr, &[n(PostfixExpr), t(MinusMinus)], Node(K::PostfixOp));
    rule(
        CallExpr,
        &[n(TypeSpec), t(ParenLeft), t(ParenRight)],
        Node(K::CallExpr),
    );
    rule(
        CallExpr,
        &[n(TypeSpec), t(ParenLeft), n(ArgList), t(ParenRight)],
        Node(K::CallExpr),
    );
    rule(ArgList, &[n(AssignExpr)], Node(K::ItemList));
    rule(ArgList, &[n(ArgList), t(Comma), n(AssignExpr)], Node(K::ItemList));
    rule(Primary, &[t(Ident)], Node(K::IdentExpr));
    rule(Primary, &[t(IntLit)], Node(K::LiteralExpr));
    rule(Primary, &[t(FloatLit)], Node(K::LiteralExpr));
    rule(Primary, &[t(True)], Node(K::LiteralExpr));
    rule(Primary, &[t(False)], Node(K::LiteralExpr));
    rule(Primary, &[t(ParenLeft), n(Expr), t(ParenRight)], Node(K::ParenExpr));

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_rules_have_one_symbol() {
        for (i, prod) in productions().iter().enumerate() {
            if prod.build == Build::PassThrough {
                assert_eq!(prod.rhs.len(), 1, "production {i} ({:?})", prod.goal);
            }
        }
    }

    #[test]
    fn augmented_production_is_first() {
        let prods = productions();
        assert_eq!(prods[AUGMENTED].goal, NonTerm::Goal);
        assert_eq!(prods[AUGMENTED].rhs, vec![Symbol::N(NonTerm::ShaderProgram)]);
    }
}
