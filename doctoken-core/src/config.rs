//! Traversal configuration.

/// Nesting limit document databases enforce on stored documents.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Options for a [`TreeParser`](crate::parser::TreeParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Maximum number of simultaneously open containers, root included.
    pub max_depth: usize,
}

impl TraversalConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
