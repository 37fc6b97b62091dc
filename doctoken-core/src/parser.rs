//! Pull parser over a document tree.
//!
//! [`TreeParser`] drives a [`CursorStack`]: it asks the top cursor for the
//! next token, descends when a container opens, and pops back to the parent
//! when a container runs out. The caller sees the same token stream a text
//! parser would produce for the equivalent document.
//!
//! ```
//! use doctoken_core::{Document, Node, TokenKind, TreeParser};
//!
//! let mut doc = Document::new();
//! doc.insert("a", 1);
//! let tree = Node::Document(doc);
//!
//! let mut parser = TreeParser::new(&tree).unwrap();
//! assert_eq!(parser.next_token().unwrap(), Some(TokenKind::StartObject));
//! assert_eq!(parser.next_token().unwrap(), Some(TokenKind::FieldName));
//! assert_eq!(parser.current_name(), Some("a"));
//! assert_eq!(parser.next_token().unwrap(), Some(TokenKind::ValueNumberInt));
//! assert_eq!(parser.i64_value(), Some(1));
//! assert_eq!(parser.next_token().unwrap(), Some(TokenKind::EndObject));
//! assert_eq!(parser.next_token().unwrap(), None);
//! ```

use std::borrow::Cow;
use std::iter::FusedIterator;

use tracing::{debug, trace, warn};

use crate::config::TraversalConfig;
use crate::cursor::{Cursor, CursorStack};
use crate::error::{Result, TraversalError};
use crate::node::{Node, NodeKind};
use crate::token::TokenKind;

/// Streaming token parser over a borrowed tree.
///
/// The first token is the root container's start token; the last is its end
/// token. After that, and after [`close`](Self::close) or any error,
/// [`next_token`](Self::next_token) returns `Ok(None)`.
#[derive(Debug)]
pub struct TreeParser<'t> {
    root: &'t Node,
    config: TraversalConfig,
    stack: CursorStack<'t>,
    /// Root start token, handed out by the first call.
    pending: Option<TokenKind>,
    /// End token for a container whose start was just returned but whose
    /// children have not been entered yet.
    open_container: Option<TokenKind>,
    current: Option<TokenKind>,
    at_root_start: bool,
    closed: bool,
}

impl<'t> TreeParser<'t> {
    /// Create a parser with the default configuration.
    ///
    /// The root must be an array or a document.
    pub fn new(root: &'t Node) -> Result<Self> {
        Self::with_config(root, TraversalConfig::default())
    }

    pub fn with_config(root: &'t Node, config: TraversalConfig) -> Result<Self> {
        if config.max_depth == 0 {
            return Err(TraversalError::DepthLimitExceeded { limit: 0 });
        }
        let cursor = Cursor::root(root)?;
        let pending = Some(cursor.start_token());
        Ok(TreeParser {
            root,
            config,
            stack: CursorStack::new(cursor),
            pending,
            open_container: None,
            current: None,
            at_root_start: false,
            closed: false,
        })
    }

    /// Advance to the next token.
    ///
    /// An error closes the parser.
    pub fn next_token(&mut self) -> Result<Option<TokenKind>> {
        match self.advance() {
            Ok(token) => {
                self.current = token;
                Ok(token)
            }
            Err(err) => {
                warn!(target: "doctoken::parser", error = %err, depth = self.stack.depth(), "traversal aborted");
                self.close();
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<TokenKind>> {
        self.at_root_start = false;
        if self.closed {
            return Ok(None);
        }
        if let Some(token) = self.pending.take() {
            self.at_root_start = true;
            return Ok(Some(token));
        }
        if let Some(end) = self.open_container.take() {
            if self.stack.depth() >= self.config.max_depth {
                return Err(TraversalError::DepthLimitExceeded {
                    limit: self.config.max_depth,
                });
            }
            let Some(top) = self.stack.top() else {
                return Ok(None);
            };
            if !top.current_has_children() {
                debug!(target: "doctoken::parser", token = %end, "empty container, not descending");
                return Ok(Some(end));
            }
            let child = top.descend()?;
            self.stack.push(child);
            trace!(target: "doctoken::parser", depth = self.stack.depth(), "push");
        }
        self.step()
    }

    fn step(&mut self) -> Result<Option<TokenKind>> {
        let Some(top) = self.stack.top_mut() else {
            self.closed = true;
            return Ok(None);
        };
        match top.next_token()? {
            Some(token) => {
                self.open_container = token.matching_end();
                Ok(Some(token))
            }
            None => {
                let end = top.end_token();
                self.stack.pop();
                trace!(target: "doctoken::parser", depth = self.stack.depth(), "pop");
                Ok(Some(end))
            }
        }
    }

    /// The token returned by the last successful [`next_token`](Self::next_token).
    #[inline]
    pub fn current_token(&self) -> Option<TokenKind> {
        self.current
    }

    /// Field name in scope for the current token.
    ///
    /// For `FieldName` this is the name itself; for a value inside a
    /// document, the field holding it; for an end token, the field holding
    /// the container just closed.
    pub fn current_name(&self) -> Option<&'t str> {
        self.current?;
        self.stack.top()?.current_name()
    }

    /// The node the current value or start token describes.
    ///
    /// `None` for `FieldName` and end tokens.
    pub fn current_node(&self) -> Option<&'t Node> {
        match self.current? {
            TokenKind::FieldName | TokenKind::EndObject | TokenKind::EndArray => None,
            _ if self.at_root_start => Some(self.root),
            _ => self.stack.top()?.current_node(),
        }
    }

    /// Textual form of the current token.
    ///
    /// Strings and field names are borrowed from the tree. Numbers, booleans,
    /// null and structure tokens get their usual text. Embedded objects have
    /// text only for ids (hex) and uuids (hyphenated).
    pub fn text(&self) -> Option<Cow<'t, str>> {
        let token = self.current?;
        let text = match token {
            TokenKind::FieldName => Cow::Borrowed(self.current_name()?),
            TokenKind::StartObject => Cow::Borrowed("{"),
            TokenKind::EndObject => Cow::Borrowed("}"),
            TokenKind::StartArray => Cow::Borrowed("["),
            TokenKind::EndArray => Cow::Borrowed("]"),
            TokenKind::ValueNull => Cow::Borrowed("null"),
            TokenKind::ValueTrue => Cow::Borrowed("true"),
            TokenKind::ValueFalse => Cow::Borrowed("false"),
            TokenKind::ValueString => Cow::Borrowed(self.current_node()?.as_str()?),
            TokenKind::ValueNumberInt | TokenKind::ValueNumberFloat => {
                match self.current_node()? {
                    Node::Int32(i) => Cow::Owned(i.to_string()),
                    Node::Int64(i) => Cow::Owned(i.to_string()),
                    Node::Double(d) => Cow::Owned(d.to_string()),
                    _ => return None,
                }
            }
            TokenKind::ValueEmbeddedObject => match self.current_node()? {
                Node::ObjectId(oid) => Cow::Owned(oid.to_string()),
                Node::Uuid(uuid) => Cow::Owned(uuid.to_string()),
                _ => return None,
            },
        };
        Some(text)
    }

    /// Integer value of a `ValueNumberInt` token.
    pub fn i64_value(&self) -> Option<i64> {
        if self.current? != TokenKind::ValueNumberInt {
            return None;
        }
        self.current_node()?.as_i64()
    }

    /// Integer value of a `ValueNumberInt` token, if it fits in 32 bits.
    pub fn i32_value(&self) -> Option<i32> {
        self.i64_value().and_then(|v| i32::try_from(v).ok())
    }

    /// Floating value of a numeric token. Integers widen; decimals have no
    /// binary floating form and give `None`.
    pub fn f64_value(&self) -> Option<f64> {
        if !self.current?.is_numeric() {
            return None;
        }
        self.current_node()?.as_f64()
    }

    /// Value of a `ValueTrue` / `ValueFalse` token.
    pub fn bool_value(&self) -> Option<bool> {
        match self.current? {
            TokenKind::ValueTrue => Some(true),
            TokenKind::ValueFalse => Some(false),
            _ => None,
        }
    }

    /// The node behind a `ValueEmbeddedObject` token.
    pub fn embedded_object(&self) -> Option<&'t Node> {
        if self.current? != TokenKind::ValueEmbeddedObject {
            return None;
        }
        self.current_node()
    }

    /// Runtime kind behind a `ValueEmbeddedObject` token, so a converter can
    /// dispatch without matching the node itself.
    pub fn embedded_kind(&self) -> Option<NodeKind> {
        self.embedded_object().map(Node::kind)
    }

    /// If the current token opens a container, move to its matching end
    /// token without visiting the children. Otherwise do nothing.
    pub fn skip_children(&mut self) {
        let Some(start) = self.current else {
            return;
        };
        let Some(end) = start.matching_end() else {
            return;
        };
        if self.at_root_start {
            // The root cursor is already on the stack.
            self.stack.pop();
            self.at_root_start = false;
        } else if self.open_container.take().is_none() {
            return;
        }
        trace!(target: "doctoken::parser", token = %end, "skip children");
        self.current = Some(end);
    }

    /// Number of open cursors, root included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Stop the traversal and release every cursor.
    pub fn close(&mut self) {
        if !self.closed {
            trace!(target: "doctoken::parser", "close");
        }
        self.closed = true;
        self.stack.clear();
        self.pending = None;
        self.open_container = None;
        self.current = None;
        self.at_root_start = false;
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The tree being traversed.
    pub fn root(&self) -> &'t Node {
        self.root
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }
}

impl<'t> Iterator for TreeParser<'t> {
    type Item = Result<TokenKind>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl FusedIterator for TreeParser<'_> {}

/// Collect the full token stream for a tree.
pub fn tokens(root: &Node) -> Result<Vec<TokenKind>> {
    TreeParser::new(root)?.collect()
}

// ============================================================================
// Tests
// ============================================================================
