//! Tokenizer for Scheme manifest documents.
//!
//! Unlike a compiler lexer, nothing is skipped here: whitespace runs and
//! comments are tokens in their own right, because the printer has to
//! reproduce them byte-for-byte.

use logos::Logos;
use thiserror::Error;

/// The kind of token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[token("(")]
    Open,

    #[token(")")]
    Close,

    /// Datum prefix: quote, quasiquote, unquote, or unquote-splicing.
    #[token("'")]
    #[token("`")]
    #[token(",@")]
    #[token(",")]
    QuoteMark,

    /// String literal including the surrounding double quotes.
    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    /// Line comment, up to but not including the newline.
    #[regex(r";[^\n]*")]
    Comment,

    /// A run of whitespace, newlines included.
    #[regex(r"[ \t\r\n]+")]
    Space,

    /// Any other run of non-delimiter characters.
    #[regex(r#"[^ \t\r\n()'`,";]+"#)]
    Atom,
}

/// A token paired with its raw source text and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal at byte {0}")]
    UnterminatedString(usize),
    #[error("unexpected character at byte {0}")]
    UnexpectedChar(usize),
}

/// Tokenize a whole document. Fails on the first unrecognized input.
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    for (result, span) in TokenKind::lexer(input).spanned() {
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                lexeme: input[span.clone()].to_owned(),
                offset: span.start,
            }),
            Err(()) => {
                // The only way a `"` reaches the error path is a string
                // that never closes.
                if input[span.start..].starts_with('"') {
                    return Err(LexError::UnterminatedString(span.start));
                }
                return Err(LexError::UnexpectedChar(span.start));
            }
        }
    }
    Ok(tokens)
}
