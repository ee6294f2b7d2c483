//! Turns source text into a token stream with byte spans.

use logos::Logos;

use crate::error::{Error, ParseError};
use crate::span::Span;
use crate::token::Token;

/// Tokenize a whole source. Whitespace and comments are discarded. The first
/// lexical error aborts the scan.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, Error> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(error) => return Err(Error::new(ParseError::Lexical(error), span)),
        }
    }
    Ok(tokens)
}

/// Best-effort scan of a raw macro directive payload for the identifiers it
/// mentions. Unlexable fragments are skipped, not reported: the payload is
/// re-emitted verbatim for the downstream GPU preprocessor either way.
pub fn scan_idents(text: &str) -> Vec<String> {
    Token::lexer(text)
        .flatten()
        .filter_map(|token| token.ident().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_cover_the_lexeme() {
        let tokens = tokenize("vec2 uv;").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].1.range(), 0..4);
        assert_eq!(tokens[1].1.range(), 5..7);
        assert_eq!(tokens[2].1.range(), 7..8);
    }

    #[test]
    fn lexical_error_is_fatal() {
        assert!(tokenize("float a = 1.0; $").is_err());
    }

    #[test]
    fn payload_ident_scan() {
        assert_eq!(
            scan_idents("FOG_COLOR * 0.5 + offset"),
            vec!["FOG_COLOR".to_string(), "offset".to_string()]
        );
    }
}
