//! In-memory document tree.
//!
//! This is the shape a binary document-database driver hands back after
//! decoding: nested documents, nested arrays, and a fixed set of scalar and
//! extended-value kinds. The tree is fully materialized; nothing here reads
//! or writes bytes.
//!
//! Documents keep their keys in insertion order. That order is what the
//! token stream reports, so it must survive every operation on `Document`.

use std::fmt;

use indexmap::IndexMap;

// ============================================================================
// Node
// ============================================================================

/// A value in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Explicit null.
    Null,

    /// Ordered sequence of values.
    Array(Vec<Node>),

    /// Nested document with unique, ordered keys.
    Document(Document),

    /// 32-bit integer.
    Int32(i32),

    /// 64-bit integer.
    Int64(i64),

    /// 64-bit binary floating point.
    Double(f64),

    /// 128-bit decimal floating point, kept as its raw encoding.
    Decimal128(Decimal128),

    /// Boolean.
    Boolean(bool),

    /// UTF-8 string.
    String(String),

    /// Opaque bytes tagged with a subtype.
    Binary(Binary),

    /// Database-assigned 12-byte identifier.
    ObjectId(ObjectId),

    /// Typed reference to a document in another collection.
    DbRef(DbRef),

    /// UTC instant, milliseconds since the Unix epoch.
    DateTime(DateTime),

    /// 128-bit unique identifier.
    Uuid(Uuid),

    // ========== Kinds with no token mapping ==========
    //
    // The wire format can carry these, so the tree can hold them, but the
    // token stream has nothing to surface them as. Classifying one is an
    // error.

    /// Regular expression with its option flags.
    Regex { pattern: String, options: String },

    /// JavaScript source.
    JavaScript(String),

    /// Deprecated symbol type.
    Symbol(String),

    /// Sorts below every other value.
    MinKey,

    /// Sorts above every other value.
    MaxKey,
}

/// Fieldless discriminant of [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Array,
    Document,
    Int32,
    Int64,
    Double,
    Decimal128,
    Boolean,
    String,
    Binary,
    ObjectId,
    DbRef,
    DateTime,
    Uuid,
    Regex,
    JavaScript,
    Symbol,
    MinKey,
    MaxKey,
}

impl NodeKind {
    /// Human-readable name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Array => "array",
            Self::Document => "document",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::Decimal128 => "decimal128",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Binary => "binary",
            Self::ObjectId => "objectId",
            Self::DbRef => "dbRef",
            Self::DateTime => "dateTime",
            Self::Uuid => "uuid",
            Self::Regex => "regex",
            Self::JavaScript => "javascript",
            Self::Symbol => "symbol",
            Self::MinKey => "minKey",
            Self::MaxKey => "maxKey",
        }
    }

    /// Check if this kind is an array or a document.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Document)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Node {
    /// Get the node's kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Array(_) => NodeKind::Array,
            Node::Document(_) => NodeKind::Document,
            Node::Int32(_) => NodeKind::Int32,
            Node::Int64(_) => NodeKind::Int64,
            Node::Double(_) => NodeKind::Double,
            Node::Decimal128(_) => NodeKind::Decimal128,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::String(_) => NodeKind::String,
            Node::Binary(_) => NodeKind::Binary,
            Node::ObjectId(_) => NodeKind::ObjectId,
            Node::DbRef(_) => NodeKind::DbRef,
            Node::DateTime(_) => NodeKind::DateTime,
            Node::Uuid(_) => NodeKind::Uuid,
            Node::Regex { .. } => NodeKind::Regex,
            Node::JavaScript(_) => NodeKind::JavaScript,
            Node::Symbol(_) => NodeKind::Symbol,
            Node::MinKey => NodeKind::MinKey,
            Node::MaxKey => NodeKind::MaxKey,
        }
    }

    /// Check if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Check if this is an array or a document.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Document(_))
    }

    /// Number of direct children for containers, `None` for everything else.
    #[inline]
    pub fn child_count(&self) -> Option<usize> {
        match self {
            Node::Array(items) => Some(items.len()),
            Node::Document(doc) => Some(doc.len()),
            _ => None,
        }
    }

    /// Try to get as a document.
    #[inline]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Node::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Try to get as an array.
    #[inline]
    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as a 64-bit integer (either integral width).
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Int32(i) => Some(i64::from(*i)),
            Node::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as a double. Integers widen; decimals do not convert.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Double(d) => Some(*d),
            Node::Int32(i) => Some(f64::from(*i)),
            Node::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Boolean(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int32(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int64(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Double(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(value)
    }
}

impl From<Document> for Node {
    fn from(value: Document) -> Self {
        Node::Document(value)
    }
}

impl From<Binary> for Node {
    fn from(value: Binary) -> Self {
        Node::Binary(value)
    }
}

impl From<ObjectId> for Node {
    fn from(value: ObjectId) -> Self {
        Node::ObjectId(value)
    }
}

impl From<DbRef> for Node {
    fn from(value: DbRef) -> Self {
        Node::DbRef(value)
    }
}

impl From<DateTime> for Node {
    fn from(value: DateTime) -> Self {
        Node::DateTime(value)
    }
}

impl From<Uuid> for Node {
    fn from(value: Uuid) -> Self {
        Node::Uuid(value)
    }
}

impl From<Decimal128> for Node {
    fn from(value: Decimal128) -> Self {
        Node::Decimal128(value)
    }
}

// ============================================================================
// Document
// ============================================================================

/// String-keyed map with unique keys in insertion order.
///
/// Lookups are hashed. Re-inserting an existing key replaces the value in
/// place and keeps the key's original position. Equality is order-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: IndexMap<String, Node>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get a value by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.entries.keys(),
        }
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the document has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut doc = Document::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

/// Iterator over a document's keys, in insertion order.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    inner: indexmap::map::Keys<'a, String, Node>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

// ============================================================================
// Extended scalars
// ============================================================================

/// 12-byte database identifier.
///
/// The first four bytes are a big-endian creation time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parse 24 hex digits (either case).
    pub fn parse_str(s: &str) -> Option<Self> {
        let s = s.as_bytes();
        if s.len() != 24 {
            return None;
        }
        let mut bytes = [0u8; 12];
        for (i, pair) in s.chunks_exact(2).enumerate() {
            bytes[i] = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
        }
        Some(ObjectId(bytes))
    }

    /// Creation time, seconds since the Unix epoch.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// 128-bit unique identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uuid([u8; 16]);

impl Uuid {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Uuid(bytes)
    }

    pub fn bytes(&self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for Uuid {
    /// Hyphenated lower-case form: `8-4-4-4-12`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// UTC instant with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime(i64);

impl DateTime {
    pub fn from_millis(millis: i64) -> Self {
        DateTime(millis)
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }
}

/// IEEE 754-2008 128-bit decimal, raw little-endian encoding.
///
/// No arithmetic is provided; the tree only carries the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128([u8; 16]);

impl Decimal128 {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Decimal128(bytes)
    }

    pub fn bytes(&self) -> [u8; 16] {
        self.0
    }
}

/// Binary subtype tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinarySubtype(pub u8);

impl BinarySubtype {
    pub const GENERIC: Self = BinarySubtype(0x00);
    pub const FUNCTION: Self = BinarySubtype(0x01);
    pub const UUID: Self = BinarySubtype(0x04);
    pub const MD5: Self = BinarySubtype(0x05);
    pub const USER_DEFINED: Self = BinarySubtype(0x80);
}

/// Opaque byte payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub subtype: BinarySubtype,
    pub bytes: Vec<u8>,
}

impl Binary {
    /// Binary with the generic subtype.
    pub fn generic(bytes: impl Into<Vec<u8>>) -> Self {
        Binary {
            subtype: BinarySubtype::GENERIC,
            bytes: bytes.into(),
        }
    }
}

/// Reference to a document in another collection (and optionally another
/// database).
#[derive(Debug, Clone, PartialEq)]
pub struct DbRef {
    pub collection: String,
    pub id: Box<Node>,
    pub database: Option<String>,
}

impl DbRef {
    pub fn new(collection: impl Into<String>, id: impl Into<Node>) -> Self {
        DbRef {
            collection: collection.into(),
            id: Box::new(id.into()),
            database: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
