//! Prefer using [`Parser::parse_str`][crate::Parser::parse_str]. You shouldn't need to
//! manipulate tokens directly unless you are extending the grammar.

use crate::error::LexicalError;
use logos::{FilterResult, Logos};
use std::fmt::Display;

fn lex_block_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), LexicalError> {
    let mut depth = 1;
    while depth > 0 {
        let rem = lex.remainder();
        if rem.is_empty() {
            return FilterResult::Error(LexicalError::UnterminatedComment);
        } else if rem.starts_with("/*") {
            lex.bump(2);
            depth += 1;
        } else if rem.starts_with("*/") {
            lex.bump(2);
            depth -= 1;
        } else {
            lex.bump(1);
        }
    }
    FilterResult::Skip
}

fn lex_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexicalError> {
    let slice = lex.slice();
    Ok(slice[1..slice.len() - 1].to_string())
}

fn lex_unterminated_string(_: &mut logos::Lexer<Token>) -> Result<String, LexicalError> {
    Err(LexicalError::UnterminatedString)
}

fn lex_int(lex: &mut logos::Lexer<Token>) -> Option<i32> {
    lexical::parse(lex.slice()).ok()
}

fn lex_float(lex: &mut logos::Lexer<Token>) -> Option<f32> {
    lexical::parse(lex.slice()).ok()
}

/// strips the directive keyword and surrounding blanks from a one-line macro directive.
fn directive_payload(lex: &mut logos::Lexer<Token>, kw_len: usize) -> String {
    lex.slice()[kw_len..].trim().to_string()
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(
    skip r"\s+",
    skip r"//[^\n]*",
    error = LexicalError)]
pub enum Token {
    // comments. This variant is never produced.
    #[token("/*", lex_block_comment, priority = 3)]
    Ignored,

    // syntactic tokens
    #[token("&&")]
    SymAndAnd,
    #[token("||")]
    SymOrOr,
    #[token("!")]
    SymBang,
    #[token("{")]
    SymBraceLeft,
    #[token("}")]
    SymBraceRight,
    #[token("[")]
    SymBracketLeft,
    #[token("]")]
    SymBracketRight,
    #[token("(")]
    SymParenLeft,
    #[token(")")]
    SymParenRight,
    #[token(":")]
    SymColon,
    #[token(";")]
    SymSemicolon,
    #[token(",")]
    SymComma,
    #[token(".")]
    SymPeriod,
    #[token("?")]
    SymQuestion,
    #[token("=")]
    SymEqual,
    #[token("==")]
    SymEqualEqual,
    #[token("!=")]
    SymNotEqual,
    #[token("<")]
    SymLessThan,
    #[token("<=")]
    SymLessThanEqual,
    #[token(">")]
    SymGreaterThan,
    #[token(">=")]
    SymGreaterThanEqual,
    #[token("+")]
    SymPlus,
    #[token("++")]
    SymPlusPlus,
    #[token("-")]
    SymMinus,
    #[token("--")]
    SymMinusMinus,
    #[token("*")]
    SymStar,
    #[token("/")]
    SymForwardSlash,
    #[token("%")]
    SymModulo,
    #[token("+=")]
    SymPlusEqual,
    #[token("-=")]
    SymMinusEqual,
    #[token("*=")]
    SymTimesEqual,
    #[token("/=")]
    SymDivisionEqual,

    // shader-description keywords
    #[token("Shader")]
    KwShader,
    #[token("SubShader")]
    KwSubShader,
    #[token("Pass")]
    KwPass,
    #[token("Tags")]
    KwTags,
    #[token("EditorProperties")]
    KwEditorProperties,
    #[token("UsePass")]
    KwUsePass,
    #[token("VertexShader")]
    KwVertexShader,
    #[token("FragmentShader")]
    KwFragmentShader,
    #[token("BlendState")]
    KwBlendState,
    #[token("DepthState")]
    KwDepthState,
    #[token("StencilState")]
    KwStencilState,
    #[token("RasterState")]
    KwRasterState,

    // statement keywords
    #[token("struct")]
    KwStruct,
    #[token("const")]
    KwConst,
    #[token("uniform")]
    KwUniform,
    #[token("attribute")]
    KwAttribute,
    #[token("varying")]
    KwVarying,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("for")]
    KwFor,
    #[token("while")]
    KwWhile,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,
    #[token("return")]
    KwReturn,
    #[token("discard")]
    KwDiscard,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,

    // type keywords
    #[token("void")]
    KwVoid,
    #[token("float")]
    KwFloat,
    #[token("int")]
    KwInt,
    #[token("bool")]
    KwBool,
    #[token("vec2")]
    KwVec2,
    #[token("vec3")]
    KwVec3,
    #[token("vec4")]
    KwVec4,
    #[token("mat2")]
    KwMat2,
    #[token("mat3")]
    KwMat3,
    #[token("mat4")]
    KwMat4,
    #[token("sampler2D")]
    KwSampler2D,
    #[token("samplerCube")]
    KwSamplerCube,

    // in-body macro directives. the directive line is captured whole; the payload is
    // re-emitted verbatim by the code generator.
    #[regex(r"#define[ \t][^\n]*", |lex| directive_payload(lex, 7))]
    MacroDefine(String),
    #[regex(r"#undef[ \t][^\n]*", |lex| directive_payload(lex, 6))]
    MacroUndef(String),
    #[regex(r"#if[ \t][^\n]*", |lex| directive_payload(lex, 3))]
    MacroIf(String),
    #[regex(r"#ifdef[ \t][^\n]*", |lex| directive_payload(lex, 6))]
    MacroIfdef(String),
    #[regex(r"#ifndef[ \t][^\n]*", |lex| directive_payload(lex, 7))]
    MacroIfndef(String),
    #[regex(r"#elif[ \t][^\n]*", |lex| directive_payload(lex, 5))]
    MacroElif(String),
    #[token("#else")]
    MacroElse,
    #[token("#endif")]
    MacroEndif,

    #[regex(r"[_a-zA-Z][_a-zA-Z0-9]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),
    #[regex(r"0|[1-9][0-9]*", lex_int)]
    IntLit(i32),
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", lex_float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", lex_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", lex_float)]
    FloatLit(f32),
    #[regex(r#""[^"\n]*""#, lex_string)]
    #[regex(r#""[^"\n]*"#, lex_unterminated_string)]
    StringLit(String),
}

/// Terminal identity of a [`Token`], with payloads erased. This is what the grammar
/// tables are keyed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TermKind {
    AndAnd,
    OrOr,
    Bang,
    BraceLeft,
    BraceRight,
    BracketLeft,
    BracketRight,
    ParenLeft,
    ParenRight,
    Colon,
    Semicolon,
    Comma,
    Period,
    Question,
    Equal,
    EqualEqual,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Plus,
    PlusPlus,
    Minus,
    MinusMinus,
    Star,
    ForwardSlash,
    Modulo,
    PlusEqual,
    MinusEqual,
    TimesEqual,
    DivisionEqual,
    Shader,
    SubShader,
    Pass,
    Tags,
    EditorProperties,
    UsePass,
    VertexShader,
    FragmentShader,
    BlendState,
    DepthState,
    StencilState,
    RasterState,
    Struct,
    Const,
    Uniform,
    Attribute,
    Varying,
    If,
    Else,
    For,
    While,
    Break,
    Continue,
    Return,
    Discard,
    True,
    False,
    Void,
    Float,
    Int,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,
    MacroDefine,
    MacroUndef,
    MacroIf,
    MacroIfdef,
    MacroIfndef,
    MacroElif,
    MacroElse,
    MacroEndif,
    Ident,
    IntLit,
    FloatLit,
    StringLit,
    Eof,
}

impl TermKind {
    pub const COUNT: usize = TermKind::Eof as usize + 1;

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Token {
    pub fn term(&self) -> TermKind {
        match self {
            Token::Ignored => unreachable!(),
            Token::SymAndAnd => TermKind::AndAnd,
            Token::SymOrOr => TermKind::OrOr,
            Token::SymBang => TermKind::Bang,
            Token::SymBraceLeft => TermKind::BraceLeft,
            Token::SymBraceRight => TermKind::BraceRight,
            Token::SymBracketLeft => TermKind::BracketLeft,
            Token::SymBracketRight => TermKind::BracketRight,
            Token::SymParenLeft => TermKind::ParenLeft,
            Token::SymParenRight => TermKind::ParenRight,
            Token::SymColon => TermKind::Colon,
            Token::SymSemicolon => TermKind::Semicolon,
            Token::SymComma => TermKind::Comma,
            Token::SymPeriod => TermKind::Period,
            Token::SymQuestion => TermKind::Question,
            Token::SymEqual => TermKind::Equal,
            Token::SymEqualEqual => TermKind::EqualEqual,
            Token::SymNotEqual => TermKind::NotEqual,
            Token::SymLessThan => TermKind::LessThan,
            Token::SymLessThanEqual => TermKind::LessThanEqual,
            Token::SymGreaterThan => TermKind::GreaterThan,
            Token::SymGreaterThanEqual => TermKind::GreaterThanEqual,
            Token::SymPlus => TermKind::Plus,
            Token::SymPlusPlus => TermKind::PlusPlus,
            Token::SymMinus => TermKind::Minus,
            Token::SymMinusMinus => TermKind::MinusMinus,
            Token::SymStar => TermKind::Star,
            Token::SymForwardSlash => TermKind::ForwardSlash,
            Token::SymModulo => TermKind::Modulo,
            Token::SymPlusEqual => TermKind::PlusEqual,
            Token::SymMinusEqual => TermKind::MinusEqual,
            Token::SymTimesEqual => TermKind::TimesEqual,
            Token::SymDivisionEqual => TermKind::DivisionEqual,
            Token::KwShader => TermKind::Shader,
            Token::KwSubShader => TermKind::SubShader,
            Token::KwPass => TermKind::Pass,
            Token::KwTags => TermKind::Tags,
            Token::KwEditorProperties => TermKind::EditorProperties,
            Token::KwUsePass => TermKind::UsePass,
            Token::KwVertexShader => TermKind::VertexShader,
            Token::KwFragmentShader => TermKind::FragmentShader,
            Token::KwBlendState => TermKind::BlendState,
            Token::KwDepthState => TermKind::DepthState,
            Token::KwStencilState => TermKind::StencilState,
            Token::KwRasterState => TermKind::RasterState,
            Token::KwStruct => TermKind::Struct,
            Token::KwConst => TermKind::Const,
            Token::KwUniform => TermKind::Uniform,
            Token::KwAttribute => TermKind::Attribute,
            Token::KwVarying => TermKind::Varying,
            Token::KwIf => TermKind::If,
            Token::KwElse => TermKind::Else,
            Token::KwFor => TermKind::For,
            Token::KwWhile => TermKind::While,
            Token::KwBreak => TermKind::Break,
            Token::KwContinue => TermKind::Continue,
            Token::KwReturn => TermKind::Return,
            Token::KwDiscard => TermKind::Discard,
            Token::KwTrue => TermKind::True,
            Token::KwFalse => TermKind::False,
            Token::KwVoid => TermKind::Void,
            Token::KwFloat => TermKind::Float,
            Token::KwInt => TermKind::Int,
            Token::KwBool => TermKind::Bool,
            Token::KwVec2 => TermKind::Vec2,
            Token::KwVec3 => TermKind::Vec3,
            Token::KwVec4 => TermKind::Vec4,
            Token::KwMat2 => TermKind::Mat2,
            Token::KwMat3 => TermKind::Mat3,
            Token::KwMat4 => TermKind::Mat4,
            Token::KwSampler2D => TermKind::Sampler2D,
            Token::KwSamplerCube => TermKind::SamplerCube,
            Token::MacroDefine(_) => TermKind::MacroDefine,
            Token::MacroUndef(_) => TermKind::MacroUndef,
            Token::MacroIf(_) => TermKind::MacroIf,
            Token::MacroIfdef(_) => TermKind::MacroIfdef,
            Token::MacroIfndef(_) => TermKind::MacroIfndef,
            Token::MacroElif(_) => TermKind::MacroElif,
            Token::MacroElse => TermKind::MacroElse,
            Token::MacroEndif => TermKind::MacroEndif,
            Token::Ident(_) => TermKind::Ident,
            Token::IntLit(_) => TermKind::IntLit,
            Token::FloatLit(_) => TermKind::FloatLit,
            Token::StringLit(_) => TermKind::StringLit,
        }
    }

    /// the exact source text the code generator re-emits for this token.
    pub fn text(&self) -> String {
        match self {
            Token::Ignored => unreachable!(),
            Token::SymAndAnd => "&&".to_string(),
            Token::SymOrOr => "||".to_string(),
            Token::SymBang => "!".to_string(),
            Token::SymBraceLeft => "{".to_string(),
            Token::SymBraceRight => "}".to_string(),
            Token::SymBracketLeft => "[".to_string(),
            Token::SymBracketRight => "]".to_string(),
            Token::SymParenLeft => "(".to_string(),
            Token::SymParenRight => ")".to_string(),
            Token::SymColon => ":".to_string(),
            Token::SymSemicolon => ";".to_string(),
            Token::SymComma => ",".to_string(),
            Token::SymPeriod => ".".to_string(),
            Token::SymQuestion => "?".to_string(),
            Token::SymEqual => "=".to_string(),
            Token::SymEqualEqual => "==".to_string(),
            Token::SymNotEqual => "!=".to_string(),
            Token::SymLessThan => "<".to_string(),
            Token::SymLessThanEqual => "<=".to_string(),
            Token::SymGreaterThan => ">".to_string(),
            Token::SymGreaterThanEqual => ">=".to_string(),
            Token::SymPlus => "+".to_string(),
            Token::SymPlusPlus => "++".to_string(),
            Token::SymMinus => "-".to_string(),
            Token::SymMinusMinus => "--".to_string(),
            Token::SymStar => "*".to_string(),
            Token::SymForwardSlash => "/".to_string(),
            Token::SymModulo => "%".to_string(),
            Token::SymPlusEqual => "+=".to_string(),
            Token::SymMinusEqual => "-=".to_string(),
            Token::SymTimesEqual => "*=".to_string(),
            Token::SymDivisionEqual => "/=".to_string(),
            Token::KwShader => "Shader".to_string(),
            Token::KwSubShader => "SubShader".to_string(),
            Token::KwPass => "Pass".to_string(),
            Token::KwTags => "Tags".to_string(),
            Token::KwEditorProperties => "EditorProperties".to_string(),
            Token::KwUsePass => "UsePass".to_string(),
            Token::KwVertexShader => "VertexShader".to_string(),
            Token::KwFragmentShader => "FragmentShader".to_string(),
            Token::KwBlendState => "BlendState".to_string(),
            Token::KwDepthState => "DepthState".to_string(),
            Token::KwStencilState => "StencilState".to_string(),
            Token::KwRasterState => "RasterState".to_string(),
            Token::KwStruct => "struct".to_string(),
            Token::KwConst => "const".to_string(),
            Token::KwUniform => "uniform".to_string(),
            Token::KwAttribute => "attribute".to_string(),
            Token::KwVarying => "varying".to_string(),
            Token::KwIf => "if".to_string(),
            Token::KwElse => "else".to_string(),
            Token::KwFor => "for".to_string(),
            Token::KwWhile => "while".to_string(),
            Token::KwBreak => "break".to_string(),
            Token::KwContinue => "continue".to_string(),
            Token::KwReturn => "return".to_string(),
            Token::KwDiscard => "discard".to_string(),
            Token::KwTrue => "true".to_string(),
            Token::KwFalse => "false".to_string(),
            Token::KwVoid => "void".to_string(),
            Token::KwFloat => "float".to_string(),
            Token::KwInt => "int".to_string(),
            Token::KwBool => "bool".to_string(),
            Token::KwVec2 => "vec2".to_string(),
            Token::KwVec3 => "vec3".to_string(),
            Token::KwVec4 => "vec4".to_string(),
            Token::KwMat2 => "mat2".to_string(),
            Token::KwMat3 => "mat3".to_string(),
            Token::KwMat4 => "mat4".to_string(),
            Token::KwSampler2D => "sampler2D".to_string(),
            Token::KwSamplerCube => "samplerCube".to_string(),
            Token::MacroDefine(s) => format!("#define {s}"),
            Token::MacroUndef(s) => format!("#undef {s}"),
            Token::MacroIf(s) => format!("#if {s}"),
            Token::MacroIfdef(s) => format!("#ifdef {s}"),
            Token::MacroIfndef(s) => format!("#ifndef {s}"),
            Token::MacroElif(s) => format!("#elif {s}"),
            Token::MacroElse => "#else".to_string(),
            Token::MacroEndif => "#endif".to_string(),
            Token::Ident(s) => s.clone(),
            Token::IntLit(n) => n.to_string(),
            Token::FloatLit(n) => {
                // keep a trailing ".0" so re-emitted literals stay floats downstream.
                let text = n.to_string();
                if text.contains('.') || text.contains('e') {
                    text
                } else {
                    format!("{text}.0")
                }
            }
            Token::StringLit(s) => format!("\"{s}\""),
        }
    }

    /// raw line payload of a macro directive token.
    pub fn directive_payload(&self) -> Option<&str> {
        match self {
            Token::MacroDefine(s)
            | Token::MacroUndef(s)
            | Token::MacroIf(s)
            | Token::MacroIfdef(s)
            | Token::MacroIfndef(s)
            | Token::MacroElif(s) => Some(s),
            _ => None,
        }
    }

    /// lexeme of identifier tokens.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// lexeme of string literal tokens.
    pub fn string(&self) -> Option<&str> {
        match self {
            Token::StringLit(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier `{s}`"),
            Token::StringLit(s) => write!(f, "string \"{s}\""),
            other => f.write_str(&other.text()),
        }
    }
}

impl Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TermKind::AndAnd => "`&&`",
            TermKind::OrOr => "`||`",
            TermKind::Bang => "`!`",
            TermKind::BraceLeft => "`{`",
            TermKind::BraceRight => "`}`",
            TermKind::BracketLeft => "`[`",
            TermKind::BracketRight => "`]`",
            TermKind::ParenLeft => "`(`",
            TermKind::ParenRight => "`)`",
            TermKind::Colon => "`:`",
            TermKind::Semicolon => "`;`",
            TermKind::Comma => "`,`",
            TermKind::Period => "`.`",
            TermKind::Question => "`?`",
            TermKind::Equal => "`=`",
            TermKind::EqualEqual => "`==`",
            TermKind::NotEqual => "`!=`",
            TermKind::LessThan => "`<`",
            TermKind::LessThanEqual => "`<=`",
            TermKind::GreaterThan => "`>`",
            TermKind::GreaterThanEqual => "`>=`",
            TermKind::Plus => "`+`",
            TermKind::PlusPlus => "`++`",
            TermKind::Minus => "`-`",
            TermKind::MinusMinus => "`--`",
            TermKind::Star => "`*`",
            TermKind::ForwardSlash => "`/`",
            TermKind::Modulo => "`%`",
            TermKind::PlusEqual => "`+=`",
            TermKind::MinusEqual => "`-=`",
            TermKind::TimesEqual => "`*=`",
            TermKind::DivisionEqual => "`/=`",
            TermKind::Shader => "`Shader`",
            TermKind::SubShader => "`SubShader`",
            TermKind::Pass => "`Pass`",
            TermKind::Tags => "`Tags`",
            TermKind::EditorProperties => "`EditorProperties`",
            TermKind::UsePass => "`UsePass`",
            TermKind::VertexShader => "`VertexShader`",
            TermKind::FragmentShader => "`FragmentShader`",
            TermKind::BlendState => "`BlendState`",
            TermKind::DepthState => "`DepthState`",
            TermKind::StencilState => "`StencilState`",
            TermKind::RasterState => "`RasterState`",
            TermKind::Struct => "`struct`",
            TermKind::Const => "`const`",
            TermKind::Uniform => "`uniform`",
            TermKind::Attribute => "`attribute`",
            TermKind::Varying => "`varying`",
            TermKind::If => "`if`",
            TermKind::Else => "`else`",
            TermKind::For => "`for`",
            TermKind::While => "`while`",
            TermKind::Break => "`break`",
            TermKind::Continue => "`continue`",
            TermKind::Return => "`return`",
            TermKind::Discard => "`discard`",
            TermKind::True => "`true`",
            TermKind::False => "`false`",
            TermKind::Void => "`void`",
            TermKind::Float => "`float`",
            TermKind::Int => "`int`",
            TermKind::Bool => "`bool`",
            TermKind::Vec2 => "`vec2`",
            TermKind::Vec3 => "`vec3`",
            TermKind::Vec4 => "`vec4`",
            TermKind::Mat2 => "`mat2`",
            TermKind::Mat3 => "`mat3`",
            TermKind::Mat4 => "`mat4`",
            TermKind::Sampler2D => "`sampler2D`",
            TermKind::SamplerCube => "`samplerCube`",
            TermKind::MacroDefine => "`#define`",
            TermKind::MacroUndef => "`#undef`",
            TermKind::MacroIf => "`#if`",
            TermKind::MacroIfdef => "`#ifdef`",
            TermKind::MacroIfndef => "`#ifndef`",
            TermKind::MacroElif => "`#elif`",
            TermKind::MacroElse => "`#else`",
            TermKind::MacroEndif => "`#endif`",
            TermKind::Ident => "identifier",
            TermKind::IntLit => "integer literal",
            TermKind::FloatLit => "float literal",
            TermKind::StringLit => "string literal",
            TermKind::Eof => "end of file",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source).map(|tok| tok.unwrap()).collect()
    }

    #[test]
    fn numbers_with_exponent() {
        assert_eq!(
            lex("1 2.5 .5 1e3 2.5e-2"),
            vec![
                Token::IntLit(1),
                Token::FloatLit(2.5),
                Token::FloatLit(0.5),
                Token::FloatLit(1e3),
                Token::FloatLit(2.5e-2),
            ]
        );
    }

    #[test]
    fn booleans_are_keywords() {
        assert_eq!(lex("true falsey"), vec![Token::KwTrue, Token::Ident("falsey".to_string())]);
    }

    #[test]
    fn nested_block_comments() {
        assert_eq!(lex("a /* x /* y */ z */ b").len(), 2);
    }

    #[test]
    fn unterminated_comment_fails_at_start() {
        let mut lexer = Token::lexer("ok /* never closed");
        assert_eq!(lexer.next(), Some(Ok(Token::Ident("ok".to_string()))));
        assert_eq!(lexer.next(), Some(Err(LexicalError::UnterminatedComment)));
        assert_eq!(lexer.span().start, 3);
    }

    #[test]
    fn unterminated_string_fails_at_start() {
        let mut lexer = Token::lexer("\"oops\nnext");
        assert_eq!(lexer.next(), Some(Err(LexicalError::UnterminatedString)));
        assert_eq!(lexer.span().start, 0);
    }

    #[test]
    fn directive_lines_capture_payload() {
        assert_eq!(
            lex("#define USE_FOG 1\n#ifdef USE_FOG\n#endif"),
            vec![
                Token::MacroDefine("USE_FOG 1".to_string()),
                Token::MacroIfdef("USE_FOG".to_string()),
                Token::MacroEndif,
            ]
        );
    }
}
