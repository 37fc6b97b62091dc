//! Nesting contexts for walking a tree one token at a time.
//!
//! A [`Cursor`] covers the children of one container. It advances lazily,
//! one step per [`Cursor::next_token`] call, and never revisits a child.
//! Descending into a child container produces a new cursor whose parent is
//! recorded as a [`ContextId`] - an index into the [`CursorStack`] that owns
//! both. No cursor points at another; the stack is the only owner.
//!
//! ```text
//! CursorStack
//!   [0] Document cursor   parent: None        <- root
//!   [1] Array cursor      parent: Some([0])
//!   [2] Document cursor   parent: Some([1])   <- top (current)
//! ```
//!
//! Cursors borrow the tree for `'t`, so the tree cannot change while a
//! traversal is in flight.

use tracing::trace;

use crate::error::{Result, TraversalError};
use crate::node::{Document, Keys, Node};
use crate::token::{classify, TokenKind};

// ============================================================================
// ContextId
// ============================================================================

/// Position of a cursor in its [`CursorStack`].
///
/// Equal to the cursor's nesting depth: the root is 0, its children 1, and
/// so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u32);

impl ContextId {
    /// The root cursor's id.
    pub const ROOT: ContextId = ContextId(0);

    fn child(self) -> Self {
        ContextId(self.0 + 1)
    }

    /// Index into the owning stack.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Traversal state for one container.
#[derive(Debug)]
pub enum Cursor<'t> {
    Array(ArrayCursor<'t>),
    Document(DocumentCursor<'t>),
}

impl<'t> Cursor<'t> {
    /// Build the root cursor over a container node.
    ///
    /// Fails with [`TraversalError::InvalidTraversal`] for scalars.
    pub fn root(node: &'t Node) -> Result<Self> {
        Self::over(node, ContextId::ROOT, None)
    }

    fn over(node: &'t Node, id: ContextId, parent: Option<ContextId>) -> Result<Self> {
        match node {
            Node::Array(items) => Ok(Cursor::Array(ArrayCursor::new(items, id, parent))),
            Node::Document(doc) => Ok(Cursor::Document(DocumentCursor::new(doc, id, parent))),
            other => Err(TraversalError::InvalidTraversal {
                found: Some(other.kind()),
            }),
        }
    }

    /// Advance by one step.
    ///
    /// Returns `Ok(None)` once the container is exhausted, and keeps doing
    /// so on every later call. An unclassifiable child is reported as an
    /// error; the cursor has still moved past it.
    pub fn next_token(&mut self) -> Result<Option<TokenKind>> {
        match self {
            Cursor::Array(c) => c.next_token(),
            Cursor::Document(c) => c.next_token(),
        }
    }

    /// Token that opens this container.
    pub fn start_token(&self) -> TokenKind {
        match self {
            Cursor::Array(_) => TokenKind::StartArray,
            Cursor::Document(_) => TokenKind::StartObject,
        }
    }

    /// Token that closes this container.
    pub fn end_token(&self) -> TokenKind {
        match self {
            Cursor::Array(_) => TokenKind::EndArray,
            Cursor::Document(_) => TokenKind::EndObject,
        }
    }

    /// Most recent field name. Always `None` for arrays.
    pub fn current_name(&self) -> Option<&'t str> {
        match self {
            Cursor::Array(_) => None,
            Cursor::Document(c) => c.current_name(),
        }
    }

    /// The child most recently reached by [`next_token`](Self::next_token).
    pub fn current_node(&self) -> Option<&'t Node> {
        match self {
            Cursor::Array(c) => c.current_node(),
            Cursor::Document(c) => c.current_node(),
        }
    }

    /// Check whether the current node is worth descending into.
    ///
    /// True for non-empty containers and every non-null scalar. False when
    /// there is no current node, for null, and for empty containers.
    pub fn current_has_children(&self) -> bool {
        match self.current_node() {
            None | Some(Node::Null) => false,
            Some(Node::Array(items)) => !items.is_empty(),
            Some(Node::Document(doc)) => !doc.is_empty(),
            Some(_) => true,
        }
    }

    /// Create a cursor over the current node's children.
    ///
    /// The current node must be an array or a document. Anything else is a
    /// driver bug and fails with [`TraversalError::InvalidTraversal`].
    pub fn descend(&self) -> Result<Cursor<'t>> {
        let node = self
            .current_node()
            .ok_or(TraversalError::InvalidTraversal { found: None })?;
        let id = self.id();
        let child = Self::over(node, id.child(), Some(id))?;
        trace!(
            target: "doctoken::cursor",
            depth = child.depth(),
            kind = %node.kind(),
            "descend"
        );
        Ok(child)
    }

    /// This cursor's id in its stack.
    pub fn id(&self) -> ContextId {
        match self {
            Cursor::Array(c) => c.id,
            Cursor::Document(c) => c.id,
        }
    }

    /// The owning parent's id, `None` for the root.
    pub fn parent(&self) -> Option<ContextId> {
        match self {
            Cursor::Array(c) => c.parent,
            Cursor::Document(c) => c.parent,
        }
    }

    /// Nesting depth; 0 for the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.id().index()
    }

    /// Zero-based position of the current child, `None` before the first.
    ///
    /// For documents a field name and its value share one index.
    pub fn index(&self) -> Option<usize> {
        match self {
            Cursor::Array(c) => c.index,
            Cursor::Document(c) => c.index,
        }
    }

    /// Check if this cursor covers an array.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Cursor::Array(_))
    }

    /// Check if this cursor covers a document.
    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self, Cursor::Document(_))
    }
}

// ============================================================================
// ArrayCursor
// ============================================================================

/// Forward-only walk over an array's elements.
#[derive(Debug)]
pub struct ArrayCursor<'t> {
    id: ContextId,
    parent: Option<ContextId>,
    contents: std::slice::Iter<'t, Node>,
    current: Option<&'t Node>,
    index: Option<usize>,
}

impl<'t> ArrayCursor<'t> {
    fn new(items: &'t [Node], id: ContextId, parent: Option<ContextId>) -> Self {
        ArrayCursor {
            id,
            parent,
            contents: items.iter(),
            current: None,
            index: None,
        }
    }

    fn next_token(&mut self) -> Result<Option<TokenKind>> {
        let Some(node) = self.contents.next() else {
            self.current = None;
            trace!(target: "doctoken::cursor", depth = self.id.index(), "array exhausted");
            return Ok(None);
        };
        self.current = Some(node);
        self.index = Some(self.index.map_or(0, |i| i + 1));
        classify(node).map(Some)
    }

    fn current_node(&self) -> Option<&'t Node> {
        self.current
    }
}

// ============================================================================
// DocumentCursor
// ============================================================================

/// Walk over a document's entries, alternating field name and value.
#[derive(Debug)]
pub struct DocumentCursor<'t> {
    id: ContextId,
    parent: Option<ContextId>,
    document: &'t Document,
    fields: Keys<'t>,
    current_name: Option<&'t str>,
    /// True when the next step yields a field name rather than a value.
    need_field: bool,
    index: Option<usize>,
}

impl<'t> DocumentCursor<'t> {
    fn new(document: &'t Document, id: ContextId, parent: Option<ContextId>) -> Self {
        DocumentCursor {
            id,
            parent,
            document,
            fields: document.keys(),
            current_name: None,
            need_field: true,
            index: None,
        }
    }

    fn next_token(&mut self) -> Result<Option<TokenKind>> {
        if self.need_field {
            let Some(name) = self.fields.next() else {
                self.current_name = None;
                trace!(target: "doctoken::cursor", depth = self.id.index(), "document exhausted");
                return Ok(None);
            };
            self.need_field = false;
            self.current_name = Some(name);
            self.index = Some(self.index.map_or(0, |i| i + 1));
            return Ok(Some(TokenKind::FieldName));
        }
        self.need_field = true;
        let node = self
            .current_node()
            .ok_or(TraversalError::InvalidTraversal { found: None })?;
        classify(node).map(Some)
    }

    fn current_name(&self) -> Option<&'t str> {
        self.current_name
    }

    // Looked up on every call rather than cached.
    fn current_node(&self) -> Option<&'t Node> {
        let document: &'t Document = self.document;
        self.current_name.and_then(|name| document.get(name))
    }
}

// ============================================================================
// CursorStack
// ============================================================================

/// Owner of every live cursor in one traversal.
///
/// Cursor `i` sits at index `i`; the top is the innermost open container.
#[derive(Debug)]
pub struct CursorStack<'t> {
    cursors: Vec<Cursor<'t>>,
}

impl<'t> CursorStack<'t> {
    /// Create a stack holding just the root cursor.
    pub fn new(root: Cursor<'t>) -> Self {
        debug_assert_eq!(root.parent(), None, "root cursor must not have a parent");
        let mut cursors = Vec::with_capacity(16);
        cursors.push(root);
        CursorStack { cursors }
    }

    /// Push a cursor produced by the top cursor's `descend`.
    pub fn push(&mut self, cursor: Cursor<'t>) -> ContextId {
        debug_assert_eq!(
            cursor.parent(),
            self.top().map(Cursor::id),
            "pushed cursor must be a child of the top cursor"
        );
        let id = cursor.id();
        self.cursors.push(cursor);
        id
    }

    /// Remove and return the top cursor.
    pub fn pop(&mut self) -> Option<Cursor<'t>> {
        self.cursors.pop()
    }

    /// The innermost open cursor.
    #[inline]
    pub fn top(&self) -> Option<&Cursor<'t>> {
        self.cursors.last()
    }

    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut Cursor<'t>> {
        self.cursors.last_mut()
    }

    /// Get a cursor by id, if it is still on the stack.
    pub fn get(&self, id: ContextId) -> Option<&Cursor<'t>> {
        self.cursors.get(id.index())
    }

    /// The parent of `cursor`, if it is still on the stack.
    pub fn parent_of(&self, cursor: &Cursor<'t>) -> Option<&Cursor<'t>> {
        cursor.parent().and_then(|id| self.get(id))
    }

    /// Walk the parent chain upward from `id`, excluding `id` itself.
    pub fn ancestors(&self, id: ContextId) -> impl Iterator<Item = &Cursor<'t>> + '_ {
        let mut next = self.get(id).and_then(Cursor::parent);
        std::iter::from_fn(move || {
            let cursor = self.get(next?)?;
            next = cursor.parent();
            Some(cursor)
        })
    }

    /// Number of cursors on the stack.
    #[inline]
    pub fn depth(&self) -> usize {
        self.cursors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Drop every cursor.
    pub fn clear(&mut self) {
        self.cursors.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
