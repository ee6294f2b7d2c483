//! The shader data model: Shader → SubShader → Pass, with tags, render-state
//! declarations, editor properties and stage entry points.
//!
//! Built once per parse from the syntax tree, immutable afterwards. The hosting
//! render engine consumes this table; none of it is emitted into GPU source
//! except through the code generator.

use shaderlab_parse::ast::{AstPool, Child, NodeId, NodeKind};
use shaderlab_parse::token::{TermKind, Token};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    Str(String),
    Number(f32),
    Bool(bool),
}

pub type Tags = Vec<(String, TagValue)>;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyType {
    Float,
    Int,
    Bool,
    Color,
    Vector2,
    Vector3,
    Vector4,
    Texture2D,
    TextureCube,
    Custom(String),
}

impl PropertyType {
    fn from_name(name: &str) -> Self {
        match name {
            "Float" => PropertyType::Float,
            "Int" => PropertyType::Int,
            "Bool" => PropertyType::Bool,
            "Color" => PropertyType::Color,
            "Vector2" => PropertyType::Vector2,
            "Vector3" => PropertyType::Vector3,
            "Vector4" => PropertyType::Vector4,
            "Texture2D" => PropertyType::Texture2D,
            "TextureCube" => PropertyType::TextureCube,
            other => PropertyType::Custom(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    Number(f32),
    Tuple(Vec<f32>),
    Str(String),
    Bool(bool),
}

/// One `EditorProperties` entry: `name("display", Type) = default;`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub name: String,
    pub display_name: String,
    pub ty: PropertyType,
    pub default: Option<PropertyValue>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderStateKind {
    Blend,
    Depth,
    Stencil,
    Raster,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderStateValue {
    Number(f32),
    Bool(bool),
    /// an engine-side enum constant, like `BlendFactor.SourceAlpha`.
    Enum(String),
    Str(String),
}

/// A render-state declaration: inline anonymous, a named declaration, or a
/// reference to a previously declared named state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderState {
    pub kind: RenderStateKind,
    pub name: Option<String>,
    pub reference: Option<String>,
    pub properties: Vec<(String, RenderStateValue)>,
}

// -- internal view of the parsed shader, node ids kept for code generation --

pub(crate) struct ShaderAst {
    pub name: String,
    pub properties: Vec<Property>,
    pub render_states: Vec<RenderState>,
    pub globals: Vec<NodeId>,
    pub sub_shaders: Vec<SubShaderAst>,
}

pub(crate) struct SubShaderAst {
    pub name: String,
    pub tags: Tags,
    pub render_states: Vec<RenderState>,
    pub globals: Vec<NodeId>,
    pub passes: Vec<PassAst>,
}

pub(crate) enum PassAst {
    Source(SourcePass),
    Use(String),
}

pub(crate) struct SourcePass {
    pub name: String,
    pub tags: Tags,
    pub render_states: Vec<RenderState>,
    pub items: Vec<NodeId>,
    pub vertex_entry: Option<String>,
    pub fragment_entry: Option<String>,
}

fn token_children(pool: &AstPool, id: NodeId) -> impl Iterator<Item = &Token> {
    pool.get(id)
        .children
        .iter()
        .filter_map(Child::token)
        .map(|tok| &tok.token)
}

fn parse_tag_value(pool: &AstPool, id: NodeId) -> TagValue {
    match token_children(pool, id).next() {
        Some(Token::StringLit(s)) => TagValue::Str(s.clone()),
        Some(Token::IntLit(n)) => TagValue::Number(*n as f32),
        Some(Token::FloatLit(n)) => TagValue::Number(*n),
        Some(Token::KwTrue) => TagValue::Bool(true),
        Some(Token::KwFalse) => TagValue::Bool(false),
        _ => TagValue::Bool(false),
    }
}

fn parse_tags(pool: &AstPool, block: NodeId) -> Tags {
    let Some(list) = pool.child_of_kind(block, NodeKind::ItemList) else {
        return Vec::new();
    };
    pool.list_items(list)
        .into_iter()
        .filter(|&pair| pool.kind(pair) == NodeKind::TagPair)
        .filter_map(|pair| {
            let key = pool.child_ident(pair)?.to_string();
            let value = pool.child_of_kind(pair, NodeKind::TagValue)?;
            Some((key, parse_tag_value(pool, value)))
        })
        .collect()
}

fn parse_property_num(pool: &AstPool, num: NodeId) -> f32 {
    let mut sign = 1.0;
    let mut value = 0.0;
    for token in token_children(pool, num) {
        match token {
            Token::SymMinus => sign = -1.0,
            Token::IntLit(n) => value = *n as f32,
            Token::FloatLit(n) => value = *n,
            _ => {}
        }
    }
    sign * value
}

fn parse_property_default(pool: &AstPool, node: NodeId) -> PropertyValue {
    if let Some(num) = pool.child_of_kind(node, NodeKind::PropertyNum) {
        return PropertyValue::Number(parse_property_num(pool, num));
    }
    if let Some(list) = pool.child_of_kind(node, NodeKind::ItemList) {
        let values = pool
            .list_items(list)
            .into_iter()
            .map(|num| parse_property_num(pool, num))
            .collect();
        return PropertyValue::Tuple(values);
    }
    match token_children(pool, node).find(|t| !matches!(t, Token::SymParenLeft)) {
        Some(Token::StringLit(s)) => PropertyValue::Str(s.clone()),
        Some(Token::KwTrue) => PropertyValue::Bool(true),
        Some(Token::KwFalse) => PropertyValue::Bool(false),
        _ => PropertyValue::Bool(false),
    }
}

fn parse_property(pool: &AstPool, decl: NodeId) -> Option<Property> {
    let mut idents = token_children(pool, decl).filter_map(Token::ident);
    let name = idents.next()?.to_string();
    let ty = PropertyType::from_name(idents.next()?);
    let display_name = pool.child_string(decl).unwrap_or_default().to_string();
    let default = pool
        .child_of_kind(decl, NodeKind::PropertyDefault)
        .map(|node| parse_property_default(pool, node));
    Some(Property {
        name,
        display_name,
        ty,
        default,
    })
}

fn parse_properties(pool: &AstPool, block: NodeId) -> Vec<Property> {
    let Some(list) = pool.child_of_kind(block, NodeKind::ItemList) else {
        return Vec::new();
    };
    pool.list_items(list)
        .into_iter()
        .filter_map(|decl| parse_property(pool, decl))
        .collect()
}

fn parse_render_state_value(pool: &AstPool, node: NodeId) -> RenderStateValue {
    let tokens: Vec<&Token> = token_children(pool, node).collect();
    match tokens.as_slice() {
        [Token::IntLit(n)] => RenderStateValue::Number(*n as f32),
        [Token::FloatLit(n)] => RenderStateValue::Number(*n),
        [Token::KwTrue] => RenderStateValue::Bool(true),
        [Token::KwFalse] => RenderStateValue::Bool(false),
        [Token::StringLit(s)] => RenderStateValue::Str(s.clone()),
        [Token::Ident(name)] => RenderStateValue::Enum(name.clone()),
        [Token::Ident(scope), Token::SymPeriod, Token::Ident(name)] => {
            RenderStateValue::Enum(format!("{scope}.{name}"))
        }
        _ => RenderStateValue::Bool(false),
    }
}

fn parse_render_state(pool: &AstPool, block: NodeId) -> RenderState {
    let kind = match token_children(pool, block).next() {
        Some(Token::KwBlendState) => RenderStateKind::Blend,
        Some(Token::KwDepthState) => RenderStateKind::Depth,
        Some(Token::KwStencilState) => RenderStateKind::Stencil,
        _ => RenderStateKind::Raster,
    };
    let ident = pool.child_ident(block).map(str::to_string);
    match pool.child_of_kind(block, NodeKind::ItemList) {
        Some(list) => {
            let properties = pool
                .list_items(list)
                .into_iter()
                .filter_map(|item| {
                    let key = pool.child_ident(item)?.to_string();
                    let value = pool.child_of_kind(item, NodeKind::RenderStateValue)?;
                    Some((key, parse_render_state_value(pool, value)))
                })
                .collect();
            RenderState {
                kind,
                name: ident,
                reference: None,
                properties,
            }
        }
        // `BlendState = name;` references a previously declared named state.
        None => RenderState {
            kind,
            name: None,
            reference: ident,
            properties: Vec::new(),
        },
    }
}

fn is_codegen_item(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::StructDef | NodeKind::FnDef | NodeKind::VarDeclStmt | NodeKind::MacroDirective
    )
}

fn parse_pass(pool: &AstPool, pass: NodeId) -> SourcePass {
    let name = pool.child_string(pass).unwrap_or_default().to_string();
    let mut out = SourcePass {
        name,
        tags: Vec::new(),
        render_states: Vec::new(),
        items: Vec::new(),
        vertex_entry: None,
        fragment_entry: None,
    };
    let Some(list) = pool.child_of_kind(pass, NodeKind::ItemList) else {
        return out;
    };
    for item in pool.list_items(list) {
        match pool.kind(item) {
            NodeKind::TagsBlock => out.tags.extend(parse_tags(pool, item)),
            NodeKind::RenderStateBlock => out.render_states.push(parse_render_state(pool, item)),
            NodeKind::StageEntry => {
                let entry = pool.child_ident(item).map(str::to_string);
                match token_children(pool, item).next().map(Token::term) {
                    Some(TermKind::VertexShader) => out.vertex_entry = entry,
                    Some(TermKind::FragmentShader) => out.fragment_entry = entry,
                    _ => {}
                }
            }
            kind if is_codegen_item(kind) => out.items.push(item),
            _ => {}
        }
    }
    out
}

fn parse_sub_shader(pool: &AstPool, sub: NodeId) -> SubShaderAst {
    let name = pool.child_string(sub).unwrap_or_default().to_string();
    let mut out = SubShaderAst {
        name,
        tags: Vec::new(),
        render_states: Vec::new(),
        globals: Vec::new(),
        passes: Vec::new(),
    };
    let Some(list) = pool.child_of_kind(sub, NodeKind::ItemList) else {
        return out;
    };
    for item in pool.list_items(list) {
        match pool.kind(item) {
            NodeKind::TagsBlock => out.tags.extend(parse_tags(pool, item)),
            NodeKind::RenderStateBlock => out.render_states.push(parse_render_state(pool, item)),
            NodeKind::Pass => out.passes.push(PassAst::Source(parse_pass(pool, item))),
            NodeKind::UsePass => {
                let path = pool.child_string(item).unwrap_or_default().to_string();
                out.passes.push(PassAst::Use(path));
            }
            kind if is_codegen_item(kind) => out.globals.push(item),
            _ => {}
        }
    }
    out
}

/// build the shader data model from an accepted parse.
pub(crate) fn build(pool: &AstPool, root: NodeId) -> ShaderAst {
    debug_assert_eq!(pool.kind(root), NodeKind::ShaderProgram);
    let name = pool.child_string(root).unwrap_or_default().to_string();
    let mut shader = ShaderAst {
        name,
        properties: Vec::new(),
        render_states: Vec::new(),
        globals: Vec::new(),
        sub_shaders: Vec::new(),
    };
    let Some(list) = pool.child_of_kind(root, NodeKind::ItemList) else {
        return shader;
    };
    for item in pool.list_items(list) {
        match pool.kind(item) {
            NodeKind::PropertiesBlock => shader.properties.extend(parse_properties(pool, item)),
            NodeKind::RenderStateBlock => {
                shader.render_states.push(parse_render_state(pool, item))
            }
            NodeKind::SubShader => shader.sub_shaders.push(parse_sub_shader(pool, item)),
            kind if is_codegen_item(kind) => shader.globals.push(item),
            _ => {}
        }
    }
    shader
}
