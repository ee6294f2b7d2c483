//! The code generator.
//!
//! A visitor dispatched by node kind walks the reachable entry-point body and
//! emits target source. Every reference to an attribute, varying or global met
//! along the way is recorded (idempotently) into a per-generation referenced
//! set; the declaration block is assembled afterwards from **only** the
//! referenced declarations, so unreachable code never appears in the output.
//! Struct-typed attribute and varying blocks are expanded member-by-member,
//! since not every target dialect supports aggregate vertex inputs.

use std::collections::{HashMap, HashSet};

use shaderlab_parse::ast::{
    AstPool, CallTarget, Child, Derived, FnSig, IdentTarget, NodeId, NodeKind, QualifierKind,
    VarSig,
};
use shaderlab_parse::lexer::scan_idents;
use shaderlab_parse::sema::is_expr_kind;
use shaderlab_parse::sema::types::Type;
use shaderlab_parse::token::Token;

use crate::error::{Error, GenerationError};

/// Output dialect. Selects qualifier spelling, version header and the
/// polyfills applied during generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetDialect {
    #[default]
    Gles100,
    Gles300,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    Vertex,
    Fragment,
}

/// Declarations visible to one pass: shader globals, then sub-shader globals,
/// then pass items, in source order. Later levels shadow earlier ones.
pub(crate) struct DeclIndex {
    fns: Vec<(NodeId, FnSig)>,
    fn_by_key: HashMap<String, NodeId>,
    globals: Vec<(NodeId, VarSig)>,
    structs: Vec<(NodeId, String)>,
    struct_by_name: HashMap<String, NodeId>,
    macros: Vec<NodeId>,
}

impl DeclIndex {
    pub(crate) fn new(pool: &AstPool, levels: &[&[NodeId]]) -> Self {
        let mut index = Self {
            fns: Vec::new(),
            fn_by_key: HashMap::new(),
            globals: Vec::new(),
            structs: Vec::new(),
            struct_by_name: HashMap::new(),
            macros: Vec::new(),
        };
        for &item in levels.iter().copied().flatten() {
            match pool.kind(item) {
                NodeKind::FnDef => {
                    if let Some(sig) = fn_sig_of(pool, item) {
                        index.fn_by_key.insert(sig.key(), item);
                        index.fns.push((item, sig));
                    }
                }
                NodeKind::VarDeclStmt => {
                    let Some(decl) = pool.child_of_kind(item, NodeKind::VarDecl) else {
                        continue;
                    };
                    if let Derived::Var(sig) = &pool.get(decl).derived {
                        index.globals.push((decl, sig.clone()));
                    }
                }
                NodeKind::StructDef => {
                    let name = pool.child_ident(item).unwrap_or_default().to_string();
                    index.struct_by_name.insert(name.clone(), item);
                    index.structs.push((item, name));
                }
                NodeKind::MacroDirective => index.macros.push(item),
                _ => {}
            }
        }
        index
    }

    fn entry_fn(&self, name: &str) -> Option<NodeId> {
        // innermost declaration wins, matching scope resolution.
        self.fns
            .iter()
            .rev()
            .find(|(_, sig)| sig.name == name && sig.params.is_empty())
            .map(|(id, _)| *id)
    }

    fn global_named(&self, name: &str) -> bool {
        self.globals.iter().any(|(_, sig)| sig.name == name)
    }
}

fn fn_sig_of(pool: &AstPool, fn_def: NodeId) -> Option<FnSig> {
    if let Derived::Fn(sig) = &pool.get(fn_def).derived {
        return Some(sig.clone());
    }
    let header = pool.child_of_kind(fn_def, NodeKind::FnHeader)?;
    match &pool.get(header).derived {
        Derived::Fn(sig) => Some(sig.clone()),
        _ => None,
    }
}

/// generate one stage's source for a pass.
pub(crate) fn generate(
    pool: &AstPool,
    decls: &DeclIndex,
    pass_name: &str,
    entry: &str,
    stage: Stage,
    dialect: TargetDialect,
) -> Result<String, Error> {
    let entry_id = decls
        .entry_fn(entry)
        .ok_or_else(|| Error::EntryPointNotFound {
            pass: pass_name.to_string(),
            name: entry.to_string(),
        })?;

    let mut gen = Generator {
        pool,
        decls,
        dialect,
        stage,
        referenced_globals: HashSet::new(),
        referenced_members: HashSet::new(),
        referenced_structs: HashSet::new(),
        used_builtin_fns: HashSet::new(),
        used_builtin_vars: HashSet::new(),
        pending_fns: Vec::new(),
    };

    // a directive payload may mention globals; those references keep the
    // declarations alive even when no statement mentions them.
    for &directive in &decls.macros {
        for child in &pool.get(directive).children {
            if let Child::Token(tok) = child {
                if let Some(payload) = tok.token.directive_payload() {
                    for ident in scan_idents(payload) {
                        if decls.global_named(&ident) {
                            gen.referenced_globals.insert(ident);
                        }
                    }
                }
            }
        }
    }

    // generate function bodies first; declarations referenced while doing so
    // are emitted next, which may in turn reference more functions (a global
    // initializer calling a helper), so iterate until nothing new appears.
    let mut fn_texts: HashMap<NodeId, String> = HashMap::new();
    let mut global_texts: HashMap<String, String> = HashMap::new();
    let mut struct_texts: HashMap<String, String> = HashMap::new();
    gen.pending_fns.push(entry_id);
    loop {
        let mut progressed = false;
        while let Some(fn_id) = gen.pending_fns.pop() {
            if fn_texts.contains_key(&fn_id) {
                continue;
            }
            let text = gen.gen_fn_def(fn_id, fn_id == entry_id)?;
            fn_texts.insert(fn_id, text);
            progressed = true;
        }
        // reversed so an inner declaration shadowing an outer name wins.
        for (decl, sig) in decls.globals.iter().rev() {
            if global_texts.contains_key(&sig.name) || !gen.is_global_referenced(&sig.name) {
                continue;
            }
            let text = gen.gen_global_decl(*decl, sig)?;
            global_texts.insert(sig.name.clone(), text);
            progressed = true;
        }
        for (def, name) in decls.structs.iter().rev() {
            if struct_texts.contains_key(name) || !gen.referenced_structs.contains(name) {
                continue;
            }
            let text = gen.gen_struct_def(*def)?;
            struct_texts.insert(name.clone(), text);
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    // assemble: header, polyfills, macros, structs, declarations, functions.
    // each block keeps source declaration order.
    let mut out = String::new();
    if dialect == TargetDialect::Gles300 {
        out.push_str("#version 300 es\n");
    }
    match stage {
        Stage::Vertex => out.push_str("precision highp float;\n"),
        Stage::Fragment => out.push_str("precision mediump float;\n"),
    }
    if dialect == TargetDialect::Gles300 {
        if gen.used_builtin_fns.contains("texture2D") {
            out.push_str("#define texture2D texture\n");
        }
        if gen.used_builtin_fns.contains("textureCube") {
            out.push_str("#define textureCube texture\n");
        }
        if stage == Stage::Fragment && gen.used_builtin_vars.contains("gl_FragColor") {
            out.push_str("out highp vec4 glFragColor;\n#define gl_FragColor glFragColor\n");
        }
    }
    for &directive in &decls.macros {
        for child in &pool.get(directive).children {
            if let Child::Token(tok) = child {
                out.push_str(&tok.token.text());
                out.push('\n');
            }
        }
    }
    let mut printed: HashSet<&str> = HashSet::new();
    for (_, name) in &decls.structs {
        if !printed.insert(name.as_str()) {
            continue;
        }
        if let Some(text) = struct_texts.get(name) {
            out.push_str(text);
        }
    }
    printed.clear();
    for (_, sig) in &decls.globals {
        if !printed.insert(sig.name.as_str()) {
            continue;
        }
        if let Some(text) = global_texts.get(&sig.name) {
            out.push_str(text);
        }
    }
    for (fn_id, _) in &decls.fns {
        if let Some(text) = fn_texts.get(fn_id) {
            out.push_str(text);
        }
    }
    Ok(out)
}

struct Generator<'p> {
    pool: &'p AstPool,
    decls: &'p DeclIndex,
    dialect: TargetDialect,
    stage: Stage,
    /// globals referenced as a whole.
    referenced_globals: HashSet<String>,
    /// (global, member) pairs of flattened struct attributes/varyings.
    referenced_members: HashSet<(String, String)>,
    referenced_structs: HashSet<String>,
    used_builtin_fns: HashSet<String>,
    used_builtin_vars: HashSet<String>,
    pending_fns: Vec<NodeId>,
}

impl<'p> Generator<'p> {
    fn is_global_referenced(&self, name: &str) -> bool {
        self.referenced_globals.contains(name)
            || self
                .referenced_members
                .iter()
                .any(|(base, _)| base == name)
    }

    fn qualifier_text(&self, qualifier: QualifierKind) -> &'static str {
        match (qualifier, self.dialect, self.stage) {
            (QualifierKind::Const, _, _) => "const",
            (QualifierKind::Uniform, _, _) => "uniform",
            (QualifierKind::Attribute, TargetDialect::Gles100, _) => "attribute",
            (QualifierKind::Attribute, TargetDialect::Gles300, _) => "in",
            (QualifierKind::Varying, TargetDialect::Gles100, _) => "varying",
            (QualifierKind::Varying, TargetDialect::Gles300, Stage::Vertex) => "out",
            (QualifierKind::Varying, TargetDialect::Gles300, Stage::Fragment) => "in",
        }
    }

    /// type spelling of a `TypeSpec` node; using a struct type marks its
    /// definition as referenced.
    fn type_spec_text(&mut self, spec: NodeId) -> String {
        if let Derived::Type(Some(Type::Struct(name))) = &self.pool.get(spec).derived {
            self.referenced_structs.insert(name.clone());
        }
        self.pool
            .get(spec)
            .children
            .iter()
            .filter_map(Child::token)
            .map(|tok| tok.token.text())
            .next()
            .unwrap_or_default()
    }

    fn first_token(&self, id: NodeId) -> Option<&Token> {
        self.pool
            .get(id)
            .children
            .iter()
            .filter_map(Child::token)
            .map(|tok| &tok.token)
            .next()
    }

    // -- functions --

    fn gen_fn_def(&mut self, fn_def: NodeId, as_main: bool) -> Result<String, Error> {
        let header = self
            .pool
            .child_of_kind(fn_def, NodeKind::FnHeader)
            .ok_or(GenerationError::NoHandler(NodeKind::FnDef))?;
        let body = self
            .pool
            .child_of_kind(fn_def, NodeKind::CompoundStmt)
            .ok_or(GenerationError::NoHandler(NodeKind::FnDef))?;
        let proto = self.gen_fn_proto(header, as_main)?;
        let body = self.gen_compound(body, 0)?;
        Ok(format!("{proto} {body}\n"))
    }

    /// the prototype part of a definition: `float square(float x)`.
    fn gen_fn_proto(&mut self, header: NodeId, as_main: bool) -> Result<String, Error> {
        let ret_spec = self
            .pool
            .child_of_kind(header, NodeKind::TypeSpec)
            .ok_or(GenerationError::NoHandler(NodeKind::FnHeader))?;
        let ret = self.type_spec_text(ret_spec);
        let name = if as_main {
            "main".to_string()
        } else {
            self.pool
                .child_ident(header)
                .unwrap_or_default()
                .to_string()
        };
        let params = match self.pool.child_of_kind(header, NodeKind::ItemList) {
            Some(list) => {
                let rendered: Result<Vec<String>, Error> = self
                    .pool
                    .list_items(list)
                    .into_iter()
                    .map(|param| self.gen_param(param))
                    .collect();
                rendered?.join(", ")
            }
            None => String::new(),
        };
        Ok(format!("{ret} {name}({params})"))
    }

    fn gen_param(&mut self, param: NodeId) -> Result<String, Error> {
        let spec = self
            .pool
            .child_of_kind(param, NodeKind::TypeSpec)
            .ok_or(GenerationError::NoHandler(NodeKind::Param))?;
        let ty = self.type_spec_text(spec);
        let name = self.pool.child_ident(param).unwrap_or_default().to_string();
        let arrays = self.gen_array_specs(param)?;
        Ok(format!("{ty} {name}{arrays}"))
    }

    fn gen_array_specs(&mut self, parent: NodeId) -> Result<String, Error> {
        let Some(list) = self.pool.child_of_kind(parent, NodeKind::ItemList) else {
            return Ok(String::new());
        };
        let mut out = String::new();
        for spec in self.pool.list_items(list) {
            let inner = self
                .pool
                .child_nodes(spec)
                .next()
                .ok_or(GenerationError::NoHandler(NodeKind::ArraySpec))?;
            out.push('[');
            out.push_str(&self.gen_expr(inner)?);
            out.push(']');
        }
        Ok(out)
    }

    // -- statements --

    fn pad(indent: usize) -> String {
        "  ".repeat(indent)
    }

    fn gen_compound(&mut self, compound: NodeId, indent: usize) -> Result<String, Error> {
        let mut out = String::from("{\n");
        if let Some(list) = self.pool.child_of_kind(compound, NodeKind::ItemList) {
            for stmt in self.pool.list_items(list) {
                out.push_str(&self.gen_stmt(stmt, indent + 1)?);
            }
        }
        out.push_str(&Self::pad(indent));
        out.push('}');
        Ok(out)
    }

    /// statement-position child: inline a compound, nest anything else.
    fn gen_branch(&mut self, stmt: NodeId, indent: usize) -> Result<String, Error> {
        if self.pool.kind(stmt) == NodeKind::CompoundStmt {
            Ok(format!("{}\n", self.gen_compound(stmt, indent)?))
        } else {
            Ok(format!("\n{}", self.gen_stmt(stmt, indent + 1)?))
        }
    }

    fn gen_stmt(&mut self, stmt: NodeId, indent: usize) -> Result<String, Error> {
        let pad = Self::pad(indent);
        match self.pool.kind(stmt) {
            NodeKind::CompoundStmt => Ok(format!("{pad}{}\n", self.gen_compound(stmt, indent)?)),
            NodeKind::VarDeclStmt => {
                let decl = self
                    .pool
                    .child_of_kind(stmt, NodeKind::VarDecl)
                    .ok_or(GenerationError::NoHandler(NodeKind::VarDeclStmt))?;
                Ok(format!("{pad}{};\n", self.gen_var_decl(decl)?))
            }
            NodeKind::ExprStmt => match self.pool.child_nodes(stmt).next() {
                Some(expr) => Ok(format!("{pad}{};\n", self.gen_expr(expr)?)),
                None => Ok(format!("{pad};\n")),
            },
            NodeKind::ReturnStmt => match self.pool.child_nodes(stmt).next() {
                Some(expr) => Ok(format!("{pad}return {};\n", self.gen_expr(expr)?)),
                None => Ok(format!("{pad}return;\n")),
            },
            NodeKind::BreakStmt => Ok(format!("{pad}break;\n")),
            NodeKind::ContinueStmt => Ok(format!("{pad}continue;\n")),
            NodeKind::DiscardStmt => Ok(format!("{pad}discard;\n")),
            NodeKind::IfStmt => {
                let nodes: Vec<NodeId> = self.pool.child_nodes(stmt).collect();
                let mut nodes = nodes.into_iter();
                let cond = nodes.next().ok_or(GenerationError::NoHandler(NodeKind::IfStmt))?;
                let then = nodes.next().ok_or(GenerationError::NoHandler(NodeKind::IfStmt))?;
                let cond = self.gen_expr(cond)?;
                let mut out = format!("{pad}if ({cond}) {}", self.gen_branch(then, indent)?);
                if let Some(other) = nodes.next() {
                    // splice the else onto the closing line of the then-branch.
                    if out.ends_with('\n') {
                        out.pop();
                    }
                    out.push_str(&format!(" else {}", self.gen_branch(other, indent)?));
                }
                Ok(out)
            }
            NodeKind::WhileStmt => {
                let nodes: Vec<NodeId> = self.pool.child_nodes(stmt).collect();
                let mut nodes = nodes.into_iter();
                let cond = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::WhileStmt))?;
                let body = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::WhileStmt))?;
                let cond = self.gen_expr(cond)?;
                Ok(format!("{pad}while ({cond}) {}", self.gen_branch(body, indent)?))
            }
            NodeKind::ForStmt => self.gen_for(stmt, indent),
            NodeKind::MacroDirective => match self.first_token(stmt) {
                // directives sit at column zero, outside the indentation.
                Some(token) => Ok(format!("{}\n", token.text())),
                None => Err(GenerationError::NoHandler(NodeKind::MacroDirective).into()),
            },
            kind => Err(GenerationError::NoHandler(kind).into()),
        }
    }

    fn gen_for(&mut self, stmt: NodeId, indent: usize) -> Result<String, Error> {
        let pad = Self::pad(indent);
        let nodes: Vec<NodeId> = self.pool.child_nodes(stmt).collect();
        let mut nodes = nodes.into_iter();
        let _begin = nodes.next();
        let init = nodes.next().ok_or(GenerationError::NoHandler(NodeKind::ForStmt))?;
        let cond = nodes.next().ok_or(GenerationError::NoHandler(NodeKind::ForStmt))?;
        let update = nodes.next().ok_or(GenerationError::NoHandler(NodeKind::ForStmt))?;
        let body = nodes.next().ok_or(GenerationError::NoHandler(NodeKind::ForStmt))?;

        let init = match self.pool.child_nodes(init).next() {
            Some(node) if self.pool.kind(node) == NodeKind::VarDecl => {
                format!("{};", self.gen_var_decl(node)?)
            }
            Some(node) => format!("{};", self.gen_expr(node)?),
            None => ";".to_string(),
        };
        let cond = self.gen_opt_expr(cond)?;
        let update = self.gen_opt_expr(update)?;
        let body = self.gen_branch(body, indent)?;
        Ok(format!("{pad}for ({init} {cond}; {update}) {body}"))
    }

    fn gen_opt_expr(&mut self, node: NodeId) -> Result<String, Error> {
        if self.pool.kind(node) == NodeKind::ExprOpt {
            Ok(String::new())
        } else {
            self.gen_expr(node)
        }
    }

    // -- declarations --

    fn gen_var_decl(&mut self, decl: NodeId) -> Result<String, Error> {
        let sig = match &self.pool.get(decl).derived {
            Derived::Var(sig) => sig.clone(),
            _ => return Err(GenerationError::NoHandler(NodeKind::VarDecl).into()),
        };
        let spec = self
            .pool
            .child_of_kind(decl, NodeKind::TypeSpec)
            .ok_or(GenerationError::NoHandler(NodeKind::VarDecl))?;
        let mut out = String::new();
        if let Some(qualifier) = sig.qualifier {
            out.push_str(self.qualifier_text(qualifier));
            out.push(' ');
        }
        out.push_str(&self.type_spec_text(spec));
        out.push(' ');
        out.push_str(&sig.name);
        out.push_str(&self.gen_array_specs(decl)?);
        if let Some(init) = self.var_decl_initializer(decl) {
            out.push_str(" = ");
            out.push_str(&self.gen_expr(init)?);
        }
        Ok(out)
    }

    fn var_decl_initializer(&self, decl: NodeId) -> Option<NodeId> {
        self.pool
            .child_nodes(decl)
            .find(|&child| is_expr_kind(self.pool.kind(child)))
    }

    /// a referenced global declaration. Struct-typed attributes and varyings
    /// are expanded member-by-member instead of kept aggregate.
    fn gen_global_decl(&mut self, decl: NodeId, sig: &VarSig) -> Result<String, Error> {
        let flatten = matches!(
            sig.qualifier,
            Some(QualifierKind::Attribute | QualifierKind::Varying)
        );
        if let (true, Some(Type::Struct(struct_name))) = (flatten, &sig.ty) {
            return self.gen_flattened_global(sig, struct_name.clone());
        }
        Ok(format!("{};\n", self.gen_var_decl(decl)?))
    }

    fn gen_flattened_global(&mut self, sig: &VarSig, struct_name: String) -> Result<String, Error> {
        let Some(&def) = self.decls.struct_by_name.get(&struct_name) else {
            return Ok(String::new());
        };
        let whole = self.referenced_globals.contains(&sig.name);
        let qualifier = sig
            .qualifier
            .map(|q| self.qualifier_text(q))
            .unwrap_or_default();
        let mut out = String::new();
        for member in self.struct_fields(def) {
            let keep = whole
                || self
                    .referenced_members
                    .contains(&(sig.name.clone(), member.name.clone()));
            let Some(ty) = member.ty else { continue };
            if keep {
                out.push_str(&format!("{qualifier} {ty} {}_{};\n", sig.name, member.name));
            }
        }
        Ok(out)
    }

    fn struct_fields(&self, def: NodeId) -> Vec<VarSig> {
        match self.pool.child_of_kind(def, NodeKind::ItemList) {
            Some(list) => self
                .pool
                .list_items(list)
                .into_iter()
                .filter_map(|member| match &self.pool.get(member).derived {
                    Derived::Var(sig) => Some(sig.clone()),
                    _ => None,
                })
                .collect(),
            None => Vec::new(),
        }
    }

    fn gen_struct_def(&mut self, def: NodeId) -> Result<String, Error> {
        let name = self.pool.child_ident(def).unwrap_or_default().to_string();
        let mut out = format!("struct {name} {{\n");
        if let Some(list) = self.pool.child_of_kind(def, NodeKind::ItemList) {
            for member in self.pool.list_items(list) {
                let spec = self
                    .pool
                    .child_of_kind(member, NodeKind::TypeSpec)
                    .ok_or(GenerationError::NoHandler(NodeKind::StructMember))?;
                let ty = self.type_spec_text(spec);
                let member_name = self
                    .pool
                    .child_ident(member)
                    .unwrap_or_default()
                    .to_string();
                let arrays = self.gen_array_specs(member)?;
                out.push_str(&format!("  {ty} {member_name}{arrays};\n"));
            }
        }
        out.push_str("};\n");
        Ok(out)
    }

    // -- expressions --

    fn gen_expr(&mut self, expr: NodeId) -> Result<String, Error> {
        match self.pool.kind(expr) {
            NodeKind::IdentExpr => self.gen_ident(expr),
            NodeKind::LiteralExpr => Ok(self
                .first_token(expr)
                .map(Token::text)
                .unwrap_or_default()),
            NodeKind::ParenExpr => {
                let inner = self
                    .pool
                    .child_nodes(expr)
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::ParenExpr))?;
                Ok(format!("({})", self.gen_expr(inner)?))
            }
            NodeKind::UnaryExpr => {
                let operand = self
                    .pool
                    .child_nodes(expr)
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::UnaryExpr))?;
                let op = self.first_token(expr).map(Token::text).unwrap_or_default();
                Ok(format!("{op}{}", self.gen_expr(operand)?))
            }
            NodeKind::PostfixOp => {
                let operand = self
                    .pool
                    .child_nodes(expr)
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::PostfixOp))?;
                let op = self.first_token(expr).map(Token::text).unwrap_or_default();
                Ok(format!("{}{op}", self.gen_expr(operand)?))
            }
            NodeKind::BinaryExpr | NodeKind::AssignExpr => {
                let nodes: Vec<NodeId> = self.pool.child_nodes(expr).collect();
                let mut nodes = nodes.into_iter();
                let left = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::BinaryExpr))?;
                let right = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::BinaryExpr))?;
                let op = self.first_token(expr).map(Token::text).unwrap_or_default();
                Ok(format!(
                    "{} {op} {}",
                    self.gen_expr(left)?,
                    self.gen_expr(right)?
                ))
            }
            NodeKind::TernaryExpr => {
                let nodes: Vec<NodeId> = self.pool.child_nodes(expr).collect();
                let mut nodes = nodes.into_iter();
                let cond = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::TernaryExpr))?;
                let then = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::TernaryExpr))?;
                let other = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::TernaryExpr))?;
                Ok(format!(
                    "{} ? {} : {}",
                    self.gen_expr(cond)?,
                    self.gen_expr(then)?,
                    self.gen_expr(other)?
                ))
            }
            NodeKind::MemberExpr => self.gen_member(expr),
            NodeKind::IndexExpr => {
                let nodes: Vec<NodeId> = self.pool.child_nodes(expr).collect();
                let mut nodes = nodes.into_iter();
                let base = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::IndexExpr))?;
                let index = nodes
                    .next()
                    .ok_or(GenerationError::NoHandler(NodeKind::IndexExpr))?;
                Ok(format!(
                    "{}[{}]",
                    self.gen_expr(base)?,
                    self.gen_expr(index)?
                ))
            }
            NodeKind::CallExpr => self.gen_call(expr),
            // trivial kinds have no dedicated visitor: their children's
            // generated text concatenates in order.
            NodeKind::TypeSpec
            | NodeKind::Qualifier
            | NodeKind::ScopeBegin
            | NodeKind::ArraySpec
            | NodeKind::ExprOpt
            | NodeKind::ItemList => self.gen_concat(expr),
            kind => Err(GenerationError::NoHandler(kind).into()),
        }
    }

    fn gen_concat(&mut self, id: NodeId) -> Result<String, Error> {
        let children = self.pool.get(id).children.clone();
        let mut out = String::new();
        for child in children {
            match child {
                Child::Token(tok) => out.push_str(&tok.token.text()),
                Child::Node(node) => out.push_str(&self.gen_expr(node)?),
            }
        }
        Ok(out)
    }

    fn gen_ident(&mut self, expr: NodeId) -> Result<String, Error> {
        let name = self.pool.child_ident(expr).unwrap_or_default().to_string();
        match &self.pool.get(expr).derived {
            Derived::Ident {
                target: IdentTarget::Global { .. },
                ..
            } => {
                self.referenced_globals.insert(name.clone());
            }
            Derived::Ident {
                target: IdentTarget::BuiltinVar,
                ..
            } => {
                self.used_builtin_vars.insert(name.clone());
            }
            _ => {}
        }
        Ok(name)
    }

    fn gen_member(&mut self, expr: NodeId) -> Result<String, Error> {
        let base = self
            .pool
            .child_nodes(expr)
            .next()
            .ok_or(GenerationError::NoHandler(NodeKind::MemberExpr))?;
        let member = self.pool.child_ident(expr).unwrap_or_default().to_string();

        // a struct-typed attribute/varying access becomes a reference to the
        // flattened member variable.
        if self.pool.kind(base) == NodeKind::IdentExpr {
            if let Derived::Ident {
                ty: Some(Type::Struct(_)),
                target:
                    IdentTarget::Global {
                        qualifier: Some(QualifierKind::Attribute | QualifierKind::Varying),
                    },
            } = &self.pool.get(base).derived
            {
                let base_name = self.pool.child_ident(base).unwrap_or_default().to_string();
                self.referenced_members
                    .insert((base_name.clone(), member.clone()));
                return Ok(format!("{base_name}_{member}"));
            }
        }
        Ok(format!("{}.{member}", self.gen_expr(base)?))
    }

    fn gen_call(&mut self, expr: NodeId) -> Result<String, Error> {
        let spec = self
            .pool
            .child_of_kind(expr, NodeKind::TypeSpec)
            .ok_or(GenerationError::NoHandler(NodeKind::CallExpr))?;
        let callee = self.type_spec_text(spec);
        match &self.pool.get(expr).derived {
            Derived::Call {
                target: CallTarget::User(key),
                ..
            } => {
                if let Some(&target) = self.decls.fn_by_key.get(key) {
                    self.pending_fns.push(target);
                }
            }
            Derived::Call {
                target: CallTarget::Builtin,
                ..
            } => {
                self.used_builtin_fns.insert(callee.clone());
            }
            Derived::Call {
                target: CallTarget::Constructor(Type::Struct(name)),
                ..
            } => {
                self.referenced_structs.insert(name.clone());
            }
            _ => {}
        }
        let args = match self.pool.child_of_kind(expr, NodeKind::ItemList) {
            Some(list) => {
                let rendered: Result<Vec<String>, Error> = self
                    .pool
                    .list_items(list)
                    .into_iter()
                    .map(|arg| self.gen_expr(arg))
                    .collect();
                rendered?.join(", ")
            }
            None => String::new(),
        };
        Ok(format!("{callee}({args})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_default_is_gles100() {
        assert_eq!(TargetDialect::default(), TargetDialect::Gles100);
    }
}
