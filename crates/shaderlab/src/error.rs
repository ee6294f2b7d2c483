//! The compile error taxonomy.
//!
//! Lexical and syntax errors fail fast with a single span. Semantic errors
//! arrive as a batch collected across the whole analysis. Generation errors
//! with no user-facing cause ([`GenerationError::NoHandler`]) indicate a
//! compiler defect, not bad input. A failed compilation never yields partial
//! output.

use std::fmt::Display;

use annotate_snippets::*;
use itertools::Itertools;
use shaderlab_parse::ast::NodeKind;
use shaderlab_parse::error::SemanticDiagnostic;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Preprocess(#[from] PreprocessError),
    #[error("{0}")]
    Parse(#[from] shaderlab_parse::Error),
    #[error("{0}")]
    Semantic(#[from] SemanticReport),
    #[error("pass `{pass}` does not declare a {stage} entry point")]
    MissingStageEntry { pass: String, stage: &'static str },
    #[error("pass `{pass}`: no function `{name}` with no parameters to use as entry point")]
    EntryPointNotFound { pass: String, name: String },
    #[error("{0}")]
    Generation(#[from] GenerationError),
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PreprocessError {
    #[error("unknown include fragment `{0}`")]
    UnknownFragment(String),
    #[error("circular include of fragment `{0}`")]
    CircularInclude(String),
    #[error("malformed include directive, expected `#include <name>`")]
    MalformedInclude,
}

/// A defect in the compiler itself: reaching a node the generator has no
/// handler for. User input can never trigger this.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("no code generator registered for node kind {0:?}")]
    NoHandler(NodeKind),
}

/// The batch of semantic diagnostics of one failed compilation, in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticReport(pub Vec<SemanticDiagnostic>);

impl std::error::Error for SemanticReport {}

impl Display for SemanticReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} semantic error{}: {}",
            self.0.len(),
            if self.0.len() == 1 { "" } else { "s" },
            self.0.iter().map(|d| d.error.to_string()).format("; ")
        )
    }
}

impl SemanticReport {
    /// render every diagnostic as an annotated snippet over the compiled source.
    pub fn render(&self, source: &str) -> String {
        let title = format!(
            "compilation failed with {} semantic error{}",
            self.0.len(),
            if self.0.len() == 1 { "" } else { "s" }
        );
        let labels = self
            .0
            .iter()
            .map(|diag| diag.error.to_string())
            .collect_vec();
        let mut snippet = Snippet::source(source).fold(true);
        for (diag, label) in self.0.iter().zip(&labels) {
            let mut range = diag.span.range();
            range.end = range.end.min(source.len());
            range.start = range.start.min(range.end);
            snippet = snippet.annotation(Level::Error.span(range).label(label));
        }
        let message = Level::Error.title(&title).snippet(snippet);
        let rendered = Renderer::styled().render(message).to_string();
        rendered
    }
}
