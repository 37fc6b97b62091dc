//! doctoken Core
//!
//! Pull-based token streams over in-memory document trees.
//! A tree that a database driver has already decoded is replayed as the
//! token sequence a streaming text parser would emit for the same document,
//! so token-driven consumers can read it without a serialize/parse round
//! trip.
//!
//! # Architecture
//!
//! - **node.rs** - Document tree: Node, Document, extended scalars
//! - **token.rs** - TokenKind and the node classifier
//! - **cursor.rs** - Per-container traversal state and the cursor stack
//! - **parser.rs** - TreeParser, the driver that turns cursors into a stream
//! - **config.rs** - Traversal limits
//! - **error.rs** - TraversalError

pub mod config;
pub mod cursor;
pub mod error;
pub mod node;
pub mod parser;
pub mod token;

pub use config::TraversalConfig;
pub use cursor::{ContextId, Cursor, CursorStack};
pub use error::{Result, TraversalError};
pub use node::{
    Binary, BinarySubtype, DateTime, DbRef, Decimal128, Document, Node, NodeKind, ObjectId, Uuid,
};
pub use parser::{tokens, TreeParser};
pub use token::{classify, TokenKind};
