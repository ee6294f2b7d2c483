//! A lexer, table-driven LALR(1) parser and reduce-time semantic analyzer for
//! shaderlab sources.
//!
//! # Parsing a source file
//!
//! ```rust
//! use shaderlab_parse::{Context, Parser};
//!
//! let source = r#"
//! Shader "Demo" {
//!     SubShader "Default" {
//!         Pass "Forward" {
//!             void vert() { gl_Position = vec4(0.0); }
//!             void frag() { gl_FragColor = vec4(1.0); }
//!             VertexShader = vert;
//!             FragmentShader = frag;
//!         }
//!     }
//! }
//! "#;
//! let mut ctx = Context::new();
//! let root = Parser::parse_str(source, &mut ctx).map_err(|e| e.to_string()).unwrap();
//! assert!(ctx.diagnostics.is_empty());
//! # let _ = root;
//! ```
//!
//! Semantic analysis runs bottom-up at reduce time: scoping, typing and
//! overload resolution happen while the tree is still being built. Semantic
//! errors collect on the [`Context`] as a batch; lexical and syntax errors fail
//! immediately.
//!
//! The grammar automaton is compiled from the declarative production list in
//! [`grammar`] on first use and shared, read-only, by every compilation in the
//! process. The node pool on the [`Context`] is reused across compilations:
//! call [`Context::reset`] before each one.

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lalr;
pub mod lexer;
pub mod parser;
pub mod sema;
pub mod span;
pub mod token;

pub use error::Error;
pub use parser::Parser;
pub use sema::Context;
