//! Raw tokenization of markup fragments.
//!
//! The lexer stays deliberately coarse: anything between `<` and `>` is one
//! `Tag` token, classified later by the parser. This keeps the logos
//! definitions free of tag-grammar details and puts all classification in
//! one place.

use crate::reader::ParseError;
use logos::Logos;

/// Raw markup tokens.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Anything between `<` and `>`, open/close/self-closing alike.
    #[regex(r"<[^<>]+>")]
    Tag,

    /// A named or numeric character reference.
    #[regex(r"&[a-zA-Z][a-zA-Z0-9]*;|&#[0-9]+;|&#x[0-9a-fA-F]+;")]
    Entity,

    /// A bare ampersand that starts no entity; kept as literal text.
    #[token("&")]
    Ampersand,

    /// A run of plain text.
    #[regex(r"[^<&]+")]
    Text,
}

/// Tokenize a markup fragment, returning tokens with their source spans.
///
/// A byte the lexer cannot place — in practice an unescaped `<` with no
/// matching `>` — is an error, not a text run: the reader only accepts
/// fragments whose text is entity-escaped.
pub fn tokenize(source: &str) -> Result<Vec<(Token, logos::Span)>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(ParseError::InvalidToken {
                    at: lexer.span().start,
                })
            }
        }
    }

    Ok(tokens)
}
