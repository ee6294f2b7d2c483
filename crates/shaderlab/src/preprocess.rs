//! `#include <name>` expansion against the fragment registry.
//!
//! Expansion is textual and runs before lexing, so an included fragment is
//! observed by the lexer exactly as if it had been written inline. Expansion is
//! recursive; the include stack detects cycles, so a self-including fragment
//! fails with a circular-include diagnostic instead of looping.

use std::collections::HashMap;

use crate::error::PreprocessError;

/// Registry of named source fragments available to `#include`. Typically
/// process-wide and filled once by the hosting engine at startup.
#[derive(Default)]
pub struct SourceRegistry {
    fragments: HashMap<String, String>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.fragments.insert(name.into(), source.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// replace every `#include <name>` with its registered fragment, recursively.
    pub fn expand(&self, source: &str) -> Result<String, PreprocessError> {
        let mut stack = Vec::new();
        self.expand_inner(source, &mut stack)
    }

    fn expand_inner(
        &self,
        text: &str,
        stack: &mut Vec<String>,
    ) -> Result<String, PreprocessError> {
        const DIRECTIVE: &str = "#include";
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(pos) = rest.find(DIRECTIVE) {
            out.push_str(&rest[..pos]);
            let after = rest[pos + DIRECTIVE.len()..].trim_start_matches([' ', '\t']);
            let body = after
                .strip_prefix('<')
                .ok_or(PreprocessError::MalformedInclude)?;
            let end = body.find('>').ok_or(PreprocessError::MalformedInclude)?;
            let name = &body[..end];
            if stack.iter().any(|entry| entry == name) {
                return Err(PreprocessError::CircularInclude(name.to_string()));
            }
            let fragment = self
                .fragments
                .get(name)
                .ok_or_else(|| PreprocessError::UnknownFragment(name.to_string()))?;
            stack.push(name.to_string());
            let expanded = self.expand_inner(fragment, stack)?;
            stack.pop();
            out.push_str(&expanded);
            rest = &body[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_expands_inline() {
        let mut registry = SourceRegistry::new();
        registry.register("common", "const float PI = 3.14159;");
        let out = registry
            .expand("#include <common>\nfloat x;")
            .unwrap();
        assert_eq!(out, "const float PI = 3.14159;\nfloat x;");
    }

    #[test]
    fn nested_includes_expand_recursively() {
        let mut registry = SourceRegistry::new();
        registry.register("a", "#include <b> A");
        registry.register("b", "B");
        assert_eq!(registry.expand("#include <a>").unwrap(), "B A");
    }

    #[test]
    fn self_include_is_a_cycle() {
        let mut registry = SourceRegistry::new();
        registry.register("loop", "#include <loop>");
        assert!(matches!(
            registry.expand("#include <loop>"),
            Err(PreprocessError::CircularInclude(name)) if name == "loop"
        ));
    }

    #[test]
    fn mutual_includes_are_a_cycle() {
        let mut registry = SourceRegistry::new();
        registry.register("a", "#include <b>");
        registry.register("b", "#include <a>");
        assert!(matches!(
            registry.expand("#include <a>"),
            Err(PreprocessError::CircularInclude(_))
        ));
    }

    #[test]
    fn unknown_fragment_is_reported() {
        let registry = SourceRegistry::new();
        assert!(matches!(
            registry.expand("#include <missing>"),
            Err(PreprocessError::UnknownFragment(name)) if name == "missing"
        ));
    }

    #[test]
    fn repeated_non_cyclic_includes_are_fine() {
        let mut registry = SourceRegistry::new();
        registry.register("x", "X");
        assert_eq!(registry.expand("#include <x> #include <x>").unwrap(), "X X");
    }
}
