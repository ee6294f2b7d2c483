//! A [`SpannedError`] is the error type returned by `Parser::parse*` functions.
//! Semantic diagnostics are collected on the [`Context`][crate::sema::Context]
//! instead of aborting the parse.

use std::fmt::Display;

use annotate_snippets::*;
use itertools::Itertools;
use thiserror::Error;

use crate::{span::Span, token::TermKind};

/// Lexical errors abort the compilation at the offending character.
#[derive(Error, Clone, Debug, Default, PartialEq)]
pub enum LexicalError {
    #[default]
    #[error("unrecognized character")]
    UnrecognizedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid numeric literal")]
    InvalidNumber,
}

/// Syntax and lexical failures. Both are fatal: no recovery is attempted and the
/// first error wins.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("{0}")]
    Lexical(#[from] LexicalError),
    #[error("unexpected {found}, expected {}", .expected.iter().format(", "))]
    Syntax {
        found: TermKind,
        expected: Vec<TermKind>,
    },
}

/// Semantic errors are collected in a batch; a non-empty batch still fails the
/// compilation.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SemanticError {
    #[error("undeclared identifier `{0}`")]
    UndeclaredIdentifier(String),
    #[error("`{0}` is already declared in this scope")]
    DuplicateDeclaration(String),
    #[error("no matching overload for call to `{0}({1})`")]
    NoMatchingOverload(String, String),
    #[error("function `{0}` must return a value")]
    MissingReturn(String),
    #[error("void function `{0}` cannot return a value")]
    UnexpectedReturn(String),
    #[error("arrays of arrays are not supported")]
    ArrayOfArray,
}

/// A semantic error annotated with the source range it applies to.
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticDiagnostic {
    pub error: SemanticError,
    pub span: Span,
}

impl Display for SemanticDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// An owned parse failure with its source range.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{error}")]
pub struct Error {
    pub error: ParseError,
    pub span: Span,
}

impl Error {
    pub fn new(error: ParseError, span: Span) -> Self {
        Self { error, span }
    }

    /// borrow the source to render a snippet pointing at the failure.
    pub fn with_source<'s>(self, source: &'s str) -> SpannedError<'s> {
        SpannedError::new(self, source)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpannedError<'s> {
    inner: Error,
    source: &'s str,
}

impl<'s> SpannedError<'s> {
    pub(crate) fn new(inner: Error, source: &'s str) -> Self {
        Self { inner, source }
    }

    pub fn into_owned(self) -> Error {
        self.inner
    }
}

impl<'s> std::error::Error for SpannedError<'s> {}

impl<'s> Display for SpannedError<'s> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = self.inner.error.to_string();
        let mut span = self.inner.span.range();
        if span.start == span.end {
            // zero-width spans render poorly; widen to one char when possible.
            span.end = (span.start + 1..)
                .find(|e| *e >= self.source.len() || self.source.is_char_boundary(*e))
                .unwrap_or(span.start)
                .min(self.source.len());
        }
        let message = Level::Error.title(&title).snippet(
            Snippet::source(self.source)
                .fold(true)
                .annotation(Level::Error.span(span).label("while parsing this token")),
        );
        let renderer = Renderer::styled();
        let rendered = renderer.render(message);
        write!(f, "{}", rendered)
    }
}
