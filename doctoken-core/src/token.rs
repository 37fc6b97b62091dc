//! Token kinds - the unit of the pull-based stream.
//!
//! This is the token vocabulary of a generic streaming text parser, so a
//! consumer written against one can read a document tree unchanged.
//! Structure is represented by start/end pairs.
//!
//! For documents: StartObject, (FieldName, value token)..., EndObject
//! For arrays: StartArray, value tokens..., EndArray
//!
//! A value token for a container is its start token; the container's
//! children and end token follow.

use std::fmt;

use phf::phf_map;

use crate::error::{Result, TraversalError};
use crate::node::Node;

/// Stream token kinds.
///
/// ## Token Sequences
///
/// Document `{"a": [1, 2], "b": null}` emits:
/// ```text
/// StartObject
/// FieldName           // "a"
/// StartArray
/// ValueNumberInt      // 1
/// ValueNumberInt      // 2
/// EndArray
/// FieldName           // "b"
/// ValueNull
/// EndObject
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ========== Structure ==========
    FieldName,
    StartObject,
    EndObject,
    StartArray,
    EndArray,

    // ========== Values ==========
    ValueNull,
    ValueString,
    ValueNumberInt,
    ValueNumberFloat,
    ValueTrue,
    ValueFalse,

    /// Extended scalar with no native token (identifiers, references,
    /// instants, uuids, binary). Inspect the node to decode it.
    ValueEmbeddedObject,
}

static TOKEN_NAMES: phf::Map<&'static str, TokenKind> = phf_map! {
    "FieldName" => TokenKind::FieldName,
    "StartObject" => TokenKind::StartObject,
    "EndObject" => TokenKind::EndObject,
    "StartArray" => TokenKind::StartArray,
    "EndArray" => TokenKind::EndArray,
    "ValueNull" => TokenKind::ValueNull,
    "ValueString" => TokenKind::ValueString,
    "ValueNumberInt" => TokenKind::ValueNumberInt,
    "ValueNumberFloat" => TokenKind::ValueNumberFloat,
    "ValueTrue" => TokenKind::ValueTrue,
    "ValueFalse" => TokenKind::ValueFalse,
    "ValueEmbeddedObject" => TokenKind::ValueEmbeddedObject,
};

impl TokenKind {
    /// Stable name of this kind (the variant name).
    pub fn name(self) -> &'static str {
        match self {
            Self::FieldName => "FieldName",
            Self::StartObject => "StartObject",
            Self::EndObject => "EndObject",
            Self::StartArray => "StartArray",
            Self::EndArray => "EndArray",
            Self::ValueNull => "ValueNull",
            Self::ValueString => "ValueString",
            Self::ValueNumberInt => "ValueNumberInt",
            Self::ValueNumberFloat => "ValueNumberFloat",
            Self::ValueTrue => "ValueTrue",
            Self::ValueFalse => "ValueFalse",
            Self::ValueEmbeddedObject => "ValueEmbeddedObject",
        }
    }

    /// Look up a kind by its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        TOKEN_NAMES.get(name).copied()
    }

    /// Check if this is a structure start (has a matching end).
    #[inline]
    pub fn is_structure_start(self) -> bool {
        matches!(self, Self::StartObject | Self::StartArray)
    }

    /// Check if this is a structure end.
    #[inline]
    pub fn is_structure_end(self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }

    /// Check if this is a scalar value token.
    #[inline]
    pub fn is_scalar_value(self) -> bool {
        matches!(
            self,
            Self::ValueNull
                | Self::ValueString
                | Self::ValueNumberInt
                | Self::ValueNumberFloat
                | Self::ValueTrue
                | Self::ValueFalse
                | Self::ValueEmbeddedObject
        )
    }

    /// Check if this is a numeric value token.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::ValueNumberInt | Self::ValueNumberFloat)
    }

    /// The end token closing this start token.
    pub fn matching_end(self) -> Option<TokenKind> {
        match self {
            Self::StartObject => Some(Self::EndObject),
            Self::StartArray => Some(Self::EndArray),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a node into exactly one token kind.
///
/// Arms are checked in order: null, array, document, float-like numbers,
/// integral numbers, booleans, strings, embedded objects. Numbers go by
/// runtime variant, not by value: `Double(3.0)` is a float.
///
/// Kinds outside that set fail with [`TraversalError::UnclassifiableNode`].
pub fn classify(node: &Node) -> Result<TokenKind> {
    let kind = match node {
        Node::Null => TokenKind::ValueNull,
        Node::Array(_) => TokenKind::StartArray,
        Node::Document(_) => TokenKind::StartObject,
        Node::Double(_) | Node::Decimal128(_) => TokenKind::ValueNumberFloat,
        Node::Int32(_) | Node::Int64(_) => TokenKind::ValueNumberInt,
        Node::Boolean(true) => TokenKind::ValueTrue,
        Node::Boolean(false) => TokenKind::ValueFalse,
        Node::String(_) => TokenKind::ValueString,
        Node::ObjectId(_)
        | Node::DbRef(_)
        | Node::DateTime(_)
        | Node::Uuid(_)
        | Node::Binary(_) => TokenKind::ValueEmbeddedObject,
        Node::Regex { .. }
        | Node::JavaScript(_)
        | Node::Symbol(_)
        | Node::MinKey
        | Node::MaxKey => {
            return Err(TraversalError::UnclassifiableNode { kind: node.kind() });
        }
    };
    Ok(kind)
}
