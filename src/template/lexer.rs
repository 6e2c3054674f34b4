//! Lexer for directive prefixes using logos
//!
//! Only the text between `$` and `{` is lexed; literal template text never
//! goes through here. Whitespace is not skipped: a prefix containing spaces
//! is not a prefix.

use logos::Logos;

use super::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Navigation keywords
    #[token("source", ignore(case))]
    Source,
    #[token("target", ignore(case))]
    Target,
    #[token("parent", ignore(case))]
    Parent,
    #[token("mfolder", ignore(case))]
    ModelFolder,
    #[token("vfolder", ignore(case))]
    ViewFolder,
    #[token("view", ignore(case))]
    View,
    #[token("model", ignore(case))]
    Model,

    #[token(":")]
    Colon,

    // Relationship keywords are plain identifiers, validated by the parser
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),
}

/// Lex a prefix into tokens with spans
///
/// Fails with the span of the first character that is not part of a token.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, Span> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| tok.map(|t| (t, span.clone())).map_err(|_| span))
        .collect()
}
