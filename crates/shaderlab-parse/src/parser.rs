//! The [`Parser`] drives the shared LALR(1) automaton over a token stream and
//! builds the syntax tree bottom-up.
//!
//! Each step consults the action table for (state, lookahead) and either
//! shifts, reduces (invoking the production's build rule, which allocates the
//! node and immediately runs its semantic hook), accepts, or fails. A missing
//! table entry is a syntax error at the offending token's range: no recovery is
//! attempted, one syntax error fails the whole compilation.

use itertools::Itertools;

use crate::ast::{Child, NodeId, TokenChild};
use crate::error::{Error, ParseError, SpannedError};
use crate::grammar::Build;
use crate::lalr::{automaton, Action};
use crate::lexer::tokenize;
use crate::sema::{analyze, Context};
use crate::span::Span;
use crate::token::{TermKind, Token};

/// The parser state machine. Every step moves from [`ParserStep::Start`] to
/// exactly one of the other states; `Accepted` and `Error` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserStep {
    Start,
    Shifting,
    Reducing,
    Accepted,
    Error,
}

pub struct Parser;

impl Parser {
    /// classify the step the automaton would take from `state` on `lookahead`.
    pub fn step(state: u32, lookahead: TermKind) -> ParserStep {
        match automaton().actions[state as usize].get(&lookahead) {
            Some(Action::Shift(_)) => ParserStep::Shifting,
            Some(Action::Reduce(_)) => ParserStep::Reducing,
            Some(Action::Accept) => ParserStep::Accepted,
            None => ParserStep::Error,
        }
    }

    /// Parse a full shader source. Lexical and syntax errors return `Err`;
    /// semantic errors accumulate on `ctx.diagnostics` and must be checked by
    /// the caller once parsing succeeds.
    pub fn parse_str<'s>(source: &'s str, ctx: &mut Context) -> Result<NodeId, SpannedError<'s>> {
        let tokens = tokenize(source).map_err(|e| e.with_source(source))?;
        Self::parse_tokens(tokens, ctx).map_err(|e| e.with_source(source))
    }

    pub fn parse_tokens(
        tokens: Vec<(Token, Span)>,
        ctx: &mut Context,
    ) -> Result<NodeId, Error> {
        let aut = automaton();
        let eof_at = tokens.last().map(|(_, span)| span.end).unwrap_or(0);

        let mut states: Vec<u32> = vec![0];
        let mut stack: Vec<Child> = Vec::new();
        let mut tokens = tokens.into_iter().peekable();

        loop {
            let state = *states.last().expect("state stack is never empty") as usize;
            let (term, la_span) = match tokens.peek() {
                Some((token, span)) => (token.term(), span.clone()),
                None => (TermKind::Eof, Span::empty_at(eof_at)),
            };

            match aut.actions[state].get(&term).copied() {
                Some(Action::Shift(next)) => {
                    let (token, span) = tokens.next().expect("shift implies a token");
                    stack.push(Child::Token(TokenChild { token, span }));
                    states.push(next);
                }
                Some(Action::Reduce(prod)) => {
                    let prod = &aut.productions[prod as usize];
                    let arity = prod.rhs.len();
                    let children = stack.split_off(stack.len() - arity);
                    states.truncate(states.len() - arity);

                    let child = match prod.build {
                        Build::PassThrough => children
                            .into_iter()
                            .exactly_one()
                            .expect("pass-through productions have one symbol"),
                        Build::Node(kind) => {
                            let span = cover_span(&children, ctx, la_span.start);
                            let id = ctx.pool.alloc(kind, children, span);
                            analyze(id, ctx);
                            Child::Node(id)
                        }
                    };

                    let exposed = *states.last().expect("state stack is never empty") as usize;
                    let goto = *aut.gotos[exposed]
                        .get(&prod.goal)
                        .expect("goto follows every reduce");
                    stack.push(child);
                    states.push(goto);
                }
                Some(Action::Accept) => {
                    let root = stack
                        .pop()
                        .and_then(|child| child.node())
                        .expect("accept leaves the root node on the stack");
                    return Ok(root);
                }
                None => {
                    let expected = aut.actions[state].keys().copied().sorted().collect();
                    return Err(Error::new(
                        ParseError::Syntax {
                            found: term,
                            expected,
                        },
                        la_span,
                    ));
                }
            }
        }
    }
}

/// span covering all children; an empty production gets a zero-width span at
/// the lookahead position.
fn cover_span(children: &[Child], ctx: &Context, fallback: usize) -> Span {
    let span_of = |child: &Child| match child {
        Child::Token(tok) => tok.span.clone(),
        Child::Node(id) => ctx.pool.get(*id).span.clone(),
    };
    match (children.first(), children.last()) {
        (Some(first), Some(last)) => span_of(first).extend(&span_of(last)),
        _ => Span::empty_at(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::error::SemanticError;

    const MINIMAL: &str = r#"
        Shader "Minimal" {
            SubShader "Default" {
                Pass "Forward" {
                    void vert() { gl_Position = vec4(0.0); }
                    void frag() { gl_FragColor = vec4(1.0); }
                    VertexShader = vert;
                    FragmentShader = frag;
                }
            }
        }
    "#;

    fn parse_ok(source: &str) -> (Context, NodeId) {
        let mut ctx = Context::new();
        let root = Parser::parse_str(source, &mut ctx)
            .map_err(|e| e.to_string())
            .expect("parse error");
        (ctx, root)
    }

    /// parse and return the collected semantic errors.
    fn semantic_errors(source: &str) -> Vec<SemanticError> {
        let (ctx, _) = parse_ok(source);
        ctx.diagnostics.into_iter().map(|d| d.error).collect()
    }

    fn pass_wrap(body: &str) -> String {
        format!(
            r#"Shader "T" {{ SubShader "S" {{ Pass "P" {{ {body} }} }} }}"#
        )
    }

    #[test]
    fn step_classification() {
        assert_eq!(Parser::step(0, TermKind::Shader), ParserStep::Shifting);
        assert_eq!(Parser::step(0, TermKind::Semicolon), ParserStep::Error);
    }

    #[test]
    fn minimal_shader_parses() {
        let (ctx, root) = parse_ok(MINIMAL);
        assert_eq!(ctx.pool.kind(root), NodeKind::ShaderProgram);
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn syntax_error_aborts_without_recovery() {
        let mut ctx = Context::new();
        let result = Parser::parse_str(r#"Shader "X" { SubShader }"#, &mut ctx);
        assert!(result.is_err());
    }

    #[test]
    fn child_spans_nest_inside_parent_spans() {
        let (ctx, root) = parse_ok(MINIMAL);
        fn check(ctx: &Context, id: crate::ast::NodeId) {
            let parent = ctx.pool.get(id).span.range();
            let mut last_start = parent.start;
            for child in ctx.pool.child_nodes(id) {
                let span = ctx.pool.get(child).span.range();
                assert!(span.start >= last_start && span.end <= parent.end);
                last_start = span.start;
                check(ctx, child);
            }
        }
        check(&ctx, root);
    }

    #[test]
    fn undeclared_identifier_is_reported() {
        let errors = semantic_errors(&pass_wrap(
            "void frag() { gl_FragColor = vec4(undefinedVar); }",
        ));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::UndeclaredIdentifier(name) if name == "undefinedVar")));
    }

    #[test]
    fn duplicate_declaration_in_one_scope_is_reported() {
        let errors = semantic_errors(&pass_wrap("void f() { float x; float x; }"));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::DuplicateDeclaration(name) if name == "x")));
    }

    #[test]
    fn shadowing_an_outer_scope_is_legal() {
        let errors = semantic_errors(&pass_wrap("void f() { float x; { float x; } }"));
        assert!(errors.is_empty());
    }

    #[test]
    fn sibling_blocks_do_not_share_locals() {
        let errors = semantic_errors(&pass_wrap(
            "void f() { { float hidden; } { float y = hidden; } }",
        ));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::UndeclaredIdentifier(name) if name == "hidden")));
    }

    #[test]
    fn locals_die_when_the_block_closes() {
        let errors = semantic_errors(&pass_wrap(
            "void f() { { float inner; } inner = 1.0; }",
        ));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::UndeclaredIdentifier(name) if name == "inner")));
    }

    #[test]
    fn overloads_resolve_by_exact_signature() {
        let errors = semantic_errors(&pass_wrap(
            "float pick(float x) { return x; }
             vec2 pick(vec2 x) { return x; }
             void f() { vec2 v = pick(vec2(1.0, 2.0)); float s = pick(1.0); }",
        ));
        assert!(errors.is_empty());
    }

    #[test]
    fn unmatched_overload_is_reported() {
        let errors = semantic_errors(&pass_wrap(
            "float pick(float x) { return x; }
             void f() { float s = pick(1.0, 2.0); }",
        ));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::NoMatchingOverload(name, _) if name == "pick")));
    }

    #[test]
    fn duplicate_overload_signature_is_reported() {
        let errors = semantic_errors(&pass_wrap(
            "float pick(float x) { return x; }
             float pick(float y) { return y + 1.0; }",
        ));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::DuplicateDeclaration(name) if name == "pick")));
    }

    #[test]
    fn missing_return_in_non_void_function() {
        let errors = semantic_errors(&pass_wrap("float f() { float x = 1.0; }"));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::MissingReturn(name) if name == "f")));
    }

    #[test]
    fn value_return_in_void_function() {
        let errors = semantic_errors(&pass_wrap("void f() { return 1.0; }"));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::UnexpectedReturn(name) if name == "f")));
    }

    #[test]
    fn bare_return_in_void_function_is_fine() {
        let errors = semantic_errors(&pass_wrap("void f() { return; }"));
        assert!(errors.is_empty());
    }

    #[test]
    fn array_of_array_is_rejected() {
        let errors = semantic_errors(&pass_wrap("void f() { float xs[2][3]; }"));
        assert!(errors.iter().any(|e| matches!(e, SemanticError::ArrayOfArray)));
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        // must parse; the else belongs to the inner if.
        let errors = semantic_errors(&pass_wrap(
            "void f() { if (true) if (false) discard; else return; }",
        ));
        assert!(errors.is_empty());
    }

    #[test]
    fn builtin_generics_reject_mixed_vector_sizes() {
        let errors = semantic_errors(&pass_wrap(
            "void f() { vec2 a = vec2(1.0, 2.0); vec3 b = vec3(1.0, 2.0, 3.0); vec2 c = max(a, b); }",
        ));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SemanticError::NoMatchingOverload(name, _) if name == "max")));
    }

    #[test]
    fn for_loops_and_macros_parse() {
        let errors = semantic_errors(&pass_wrap(
            "#define STEPS 4
             void f() {
                 float acc = 0.0;
                 for (int i = 0; i < 4; ++i) { acc += 1.0; }
                 #ifdef STEPS
                 acc *= 2.0;
                 #endif
             }",
        ));
        assert!(errors.is_empty());
    }
}
