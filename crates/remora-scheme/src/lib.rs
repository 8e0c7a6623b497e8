//! Round-trip Scheme document handling for remora.
//!
//! This crate defines the structural layer: a trivia-preserving lexer
//! and parser (`parse_document`), the raw-text node tree (`Document`,
//! `Node`), and the `specifications->manifest` set transform
//! (`EditSet`, `edit_document`). Printing an unedited tree reproduces
//! the source byte-for-byte; editing touches only the one operand list.

pub mod edit;
pub mod lexer;
pub mod node;
pub mod parser;

pub use edit::{edit_document, manifest_specifications, EditError, EditSet, MANIFEST_HEAD};
pub use lexer::{lex, LexError, Token, TokenKind};
pub use node::{Document, Node};
pub use parser::{parse_document, SchemeError};
