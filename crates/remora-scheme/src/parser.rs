//! Token-to-tree parser for Scheme manifest documents.

use crate::lexer::{lex, LexError, Token, TokenKind};
use crate::node::{Document, Node};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemeError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("unexpected ')' at byte {0}")]
    UnexpectedClose(usize),
    #[error("unterminated list opened at byte {0}")]
    UnterminatedList(usize),
    #[error("datum prefix '{mark}' at byte {offset} is not followed by a datum")]
    DanglingQuote { mark: String, offset: usize },
}

/// Parse a whole document, keeping comments and whitespace as nodes.
pub fn parse_document(input: &str) -> Result<Document, SchemeError> {
    let tokens = lex(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut nodes = Vec::new();
    while let Some(node) = parser.parse_node()? {
        nodes.push(node);
    }
    Ok(Document { nodes })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    /// Parse the next node, trivia included. `None` at end of input.
    fn parse_node(&mut self) -> Result<Option<Node>, SchemeError> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        match token.kind {
            TokenKind::Close => Err(SchemeError::UnexpectedClose(token.offset)),
            _ => self.parse_any().map(Some),
        }
    }

    fn parse_any(&mut self) -> Result<Node, SchemeError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Atom => Ok(Node::Atom(token.lexeme)),
            TokenKind::Str => Ok(Node::Str(token.lexeme)),
            TokenKind::Comment => Ok(Node::Comment(token.lexeme)),
            TokenKind::Space => Ok(Node::Space(token.lexeme)),
            TokenKind::Open => self.parse_list(token.offset),
            TokenKind::QuoteMark => self.parse_quoted(token),
            TokenKind::Close => Err(SchemeError::UnexpectedClose(token.offset)),
        }
    }

    fn parse_list(&mut self, open_offset: usize) -> Result<Node, SchemeError> {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                None => return Err(SchemeError::UnterminatedList(open_offset)),
                Some(token) if token.kind == TokenKind::Close => {
                    self.bump();
                    return Ok(Node::List(children));
                }
                Some(_) => children.push(self.parse_any()?),
            }
        }
    }

    fn parse_quoted(&mut self, mark: Token) -> Result<Node, SchemeError> {
        let mut trivia = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(SchemeError::DanglingQuote {
                        mark: mark.lexeme,
                        offset: mark.offset,
                    })
                }
                Some(token) if token.kind == TokenKind::Close => {
                    return Err(SchemeError::DanglingQuote {
                        mark: mark.lexeme,
                        offset: mark.offset,
                    })
                }
                Some(token)
                    if matches!(token.kind, TokenKind::Space | TokenKind::Comment) =>
                {
                    trivia.push(self.parse_any()?);
                }
                Some(_) => {
                    let datum = self.parse_any()?;
                    return Ok(Node::Quoted {
                        mark: mark.lexeme,
                        trivia,
                        datum: Box::new(datum),
                    });
                }
            }
        }
    }
}
