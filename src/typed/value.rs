use super::node::{Document, Element};
use crate::annotation::Literal;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Item types that can flow between extraction and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    String,
    UntypedAtomic,
    AnyUri,
    Boolean,
    Integer,
    Decimal,
    Double,
    Float,
    Date,
    DateTime,
    Time,
    Duration,
    Base64Binary,
    HexBinary,
    QName,
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    Item,
}

const ITEM_TYPE_NAMES: &[(&str, ItemType)] = &[
    ("xs:string", ItemType::String),
    ("xs:untypedAtomic", ItemType::UntypedAtomic),
    ("xs:anyURI", ItemType::AnyUri),
    ("xs:boolean", ItemType::Boolean),
    ("xs:integer", ItemType::Integer),
    ("xs:decimal", ItemType::Decimal),
    ("xs:double", ItemType::Double),
    ("xs:float", ItemType::Float),
    ("xs:date", ItemType::Date),
    ("xs:dateTime", ItemType::DateTime),
    ("xs:time", ItemType::Time),
    ("xs:duration", ItemType::Duration),
    ("xs:base64Binary", ItemType::Base64Binary),
    ("xs:hexBinary", ItemType::HexBinary),
    ("xs:QName", ItemType::QName),
    ("document-node()", ItemType::Document),
    ("element()", ItemType::Element),
    ("attribute()", ItemType::Attribute),
    ("text()", ItemType::Text),
    ("comment()", ItemType::Comment),
    ("item()", ItemType::Item),
];

impl ItemType {
    /// Explicit lookup by lexical name; `None` for anything not in the table.
    pub fn from_name(name: &str) -> Option<Self> {
        ITEM_TYPE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, t)| *t)
    }

    pub fn name(&self) -> &'static str {
        ITEM_TYPE_NAMES
            .iter()
            .find(|(_, t)| t == self)
            .map(|(n, _)| *n)
            .unwrap_or("item()")
    }

    /// Types whose values are plain lexical text and may be written as literals.
    pub fn is_atomic_literal(&self) -> bool {
        matches!(
            self,
            ItemType::String
                | ItemType::UntypedAtomic
                | ItemType::AnyUri
                | ItemType::Boolean
                | ItemType::Integer
                | ItemType::Decimal
                | ItemType::Double
                | ItemType::Float
        )
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, ItemType::Base64Binary | ItemType::HexBinary)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shared handle on a request-owned byte stream.
///
/// Cloning the handle never copies or reads the underlying bytes.
#[derive(Clone)]
pub struct BinaryStream(Arc<Mutex<Box<dyn Read + Send>>>);

impl BinaryStream {
    pub fn new<R: Read + Send + 'static>(reader: R) -> Self {
        Self(Arc::new(Mutex::new(Box::new(reader))))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(io::Cursor::new(bytes))
    }

    /// True when both handles wrap the very same stream instance.
    pub fn same_stream(&self, other: &BinaryStream) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Drain the remaining bytes into `sink`.
    pub fn copy_to(&self, sink: &mut dyn Write) -> io::Result<u64> {
        let mut reader = self.0.lock();
        io::copy(&mut *reader, sink)
    }

    pub fn read_to_end(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.0.lock().read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl fmt::Debug for BinaryStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryStream")
            .field("handles", &Arc::strong_count(&self.0))
            .finish()
    }
}

/// Natural representation of an item's value.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Binary(BinaryStream),
    Element(Element),
    Document(Document),
}

/// Immutable (type, value) pair.
#[derive(Debug, Clone)]
pub struct TypedValue {
    item_type: ItemType,
    value: Value,
}

impl TypedValue {
    pub fn string(text: impl Into<String>) -> Self {
        Self::atomic(ItemType::String, text)
    }

    /// Atomic value of any type in its lexical form.
    pub fn atomic(item_type: ItemType, lexical: impl Into<String>) -> Self {
        Self {
            item_type,
            value: Value::Text(lexical.into()),
        }
    }

    pub fn base64_binary(stream: BinaryStream) -> Self {
        Self {
            item_type: ItemType::Base64Binary,
            value: Value::Binary(stream),
        }
    }

    pub fn element(element: Element) -> Self {
        Self {
            item_type: ItemType::Element,
            value: Value::Element(element),
        }
    }

    pub fn document(document: Document) -> Self {
        Self {
            item_type: ItemType::Document,
            value: Value::Document(document),
        }
    }

    /// Value carrying the literal's own type and lexical form.
    pub fn from_literal(literal: &Literal) -> Self {
        Self::atomic(literal.item_type, literal.value.clone())
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&BinaryStream> {
        match &self.value {
            Value::Binary(s) => Some(s),
            _ => None,
        }
    }
}

/// A typed value bound to one function argument.
#[derive(Debug, Clone)]
pub struct TypedArgumentValue {
    pub argument_name: String,
    pub value: TypedValue,
}
