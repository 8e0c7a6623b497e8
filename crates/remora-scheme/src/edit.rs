//! Set edits over the `specifications->manifest` form.
//!
//! The transform is purely structural: nothing is resolved, and every
//! byte outside the one operand list survives untouched.

use crate::node::{Document, Node};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Head symbol of the form whose operand list is edited.
pub const MANIFEST_HEAD: &str = "specifications->manifest";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("malformed package operation '{token}': unknown operator '{operator}' (expected '+' or '-')")]
    MalformedOperation { token: String, operator: char },
    #[error("malformed package operation: empty token")]
    EmptyOperation,
}

/// Additions and removals derived from `+spec` / `-spec` tokens.
///
/// Additions keep their command-line order; removals are a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSet {
    pub additions: Vec<String>,
    pub removals: BTreeSet<String>,
}

impl EditSet {
    /// Parse operator-prefixed tokens. Any token that starts with neither
    /// `+` nor `-` fails the whole parse; no partial edit set is produced.
    pub fn parse<I, S>(tokens: I) -> Result<Self, EditError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut edits = EditSet::default();
        for token in tokens {
            let token = token.as_ref();
            let mut chars = token.chars();
            match chars.next() {
                Some('+') => edits.additions.push(chars.as_str().to_owned()),
                Some('-') => {
                    edits.removals.insert(chars.as_str().to_owned());
                }
                Some(operator) => {
                    return Err(EditError::MalformedOperation {
                        token: token.to_owned(),
                        operator,
                    })
                }
                None => return Err(EditError::EmptyOperation),
            }
        }
        Ok(edits)
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// Apply an edit set to the first `specifications->manifest` form found
/// in the document. Returns `true` if such a form was present.
///
/// A document without the form is a valid no-op: the tree is left as
/// parsed and prints byte-identically.
pub fn edit_document(document: &mut Document, edits: &EditSet) -> bool {
    for node in &mut document.nodes {
        if edit_node(node, edits) {
            return true;
        }
    }
    debug!("document has no {MANIFEST_HEAD} form; passing through unchanged");
    false
}

fn edit_node(node: &mut Node, edits: &EditSet) -> bool {
    match node {
        Node::List(children) => {
            if is_manifest_form(children) {
                if let Some(specs) = operand_list_mut(children) {
                    let rebuilt = rebuild_operand_list(std::mem::take(specs), edits);
                    *specs = rebuilt;
                    return true;
                }
            }
            children.iter_mut().any(|child| edit_node(child, edits))
        }
        Node::Quoted { datum, .. } => edit_node(datum, edits),
        _ => false,
    }
}

fn is_manifest_form(children: &[Node]) -> bool {
    children
        .iter()
        .find(|n| !n.is_trivia())
        .is_some_and(|head| matches!(head, Node::Atom(a) if a == MANIFEST_HEAD))
}

/// The operand of the manifest form: the list inside the first quoted
/// datum following the head symbol.
fn operand_list_mut(children: &mut [Node]) -> Option<&mut Vec<Node>> {
    let mut semantic = children.iter_mut().filter(|n| !n.is_trivia());
    let _head = semantic.next()?;
    match semantic.next()? {
        Node::Quoted { datum, .. } => match datum.as_mut() {
            Node::List(specs) => Some(specs),
            _ => None,
        },
        _ => None,
    }
}

/// Rebuild the operand list: surviving entries keep their layout,
/// removed entries take one adjacent whitespace run with them, and
/// additions are appended after the last surviving entry. Duplicates
/// between survivors and additions are kept as-is.
fn rebuild_operand_list(children: Vec<Node>, edits: &EditSet) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    let mut iter = children.into_iter().peekable();

    while let Some(child) = iter.next() {
        let removed = child
            .string_value()
            .is_some_and(|value| edits.removals.contains(&value));
        if !removed {
            out.push(child);
            continue;
        }

        // Prefer consuming the whitespace before the entry, but never the
        // run that terminates a comment line.
        let after_comment = out.len() >= 2 && matches!(out[out.len() - 2], Node::Comment(_));
        if matches!(out.last(), Some(Node::Space(_))) && !after_comment {
            out.pop();
        } else if matches!(iter.peek(), Some(Node::Space(_))) {
            iter.next();
        }
    }

    let insert_at = out
        .iter()
        .rposition(|n| !n.is_trivia())
        .map_or(0, |pos| pos + 1);
    let mut has_prev = insert_at > 0;
    let mut appended = Vec::with_capacity(edits.additions.len() * 2);
    for addition in &edits.additions {
        if has_prev {
            appended.push(Node::Space(" ".to_owned()));
        }
        appended.push(Node::string(addition));
        has_prev = true;
    }
    out.splice(insert_at..insert_at, appended);
    out
}

/// Read the current specification strings from a parsed document, in
/// order. `None` when the document has no manifest form.
pub fn manifest_specifications(document: &Document) -> Option<Vec<String>> {
    fn visit(node: &Node) -> Option<Vec<String>> {
        match node {
            Node::List(children) => {
                if is_manifest_form(children) {
                    let mut semantic = children.iter().filter(|n| !n.is_trivia());
                    let _head = semantic.next()?;
                    if let Node::Quoted { datum, .. } = semantic.next()? {
                        if let Node::List(specs) = datum.as_ref() {
                            return Some(
                                specs.iter().filter_map(Node::string_value).collect(),
                            );
                        }
                    }
                    return None;
                }
                children.iter().find_map(visit)
            }
            Node::Quoted { datum, .. } => visit(datum),
            _ => None,
        }
    }
    document.nodes.iter().find_map(visit)
}
