//! The tagged node tree describing a parsed document.
//!
//! Every variant keeps its raw source text, so printing an unmodified
//! tree reproduces the parsed input exactly. Semantic content (atoms,
//! strings, lists) and trivia (comments, whitespace) are distinct
//! variants so transforms can thread trivia through untouched.

/// One structural node of a Scheme document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A bare symbol, number, keyword, or other non-string datum, verbatim.
    Atom(String),
    /// A string literal, verbatim including the surrounding quotes.
    Str(String),
    /// A line comment, verbatim, without the terminating newline.
    Comment(String),
    /// A run of whitespace, verbatim.
    Space(String),
    /// A prefixed datum such as `'(...)`. Trivia between the mark and the
    /// datum is preserved in `trivia`.
    Quoted {
        mark: String,
        trivia: Vec<Node>,
        datum: Box<Node>,
    },
    /// A parenthesized form.
    List(Vec<Node>),
}

impl Node {
    /// Build a string-literal node from a decoded value.
    pub fn string(value: &str) -> Self {
        let mut raw = String::with_capacity(value.len() + 2);
        raw.push('"');
        for c in value.chars() {
            match c {
                '"' => raw.push_str("\\\""),
                '\\' => raw.push_str("\\\\"),
                other => raw.push(other),
            }
        }
        raw.push('"');
        Node::Str(raw)
    }

    /// Decoded value of a string-literal node, `None` for any other kind.
    pub fn string_value(&self) -> Option<String> {
        let Node::Str(raw) = self else {
            return None;
        };
        let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(other) => {
                        // Unknown escape: keep it verbatim.
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                }
            } else {
                out.push(c);
            }
        }
        Some(out)
    }

    /// Whether this node is comment or whitespace trivia.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Node::Comment(_) | Node::Space(_))
    }

    pub(crate) fn write(&self, out: &mut String) {
        match self {
            Node::Atom(raw) | Node::Str(raw) | Node::Comment(raw) | Node::Space(raw) => {
                out.push_str(raw);
            }
            Node::Quoted {
                mark,
                trivia,
                datum,
            } => {
                out.push_str(mark);
                for t in trivia {
                    t.write(out);
                }
                datum.write(out);
            }
            Node::List(children) => {
                out.push('(');
                for child in children {
                    child.write(out);
                }
                out.push(')');
            }
        }
    }
}

/// An ordered sequence of top-level nodes read from one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    /// Print the document back to text. For a tree that was not modified
    /// this is byte-identical to the parsed input.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write(&mut out);
        }
        out
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
