//! # Typed Module
//!
//! Values that flow between request extraction and response serialization.
//!
//! ## Overview
//!
//! Every item is a [`TypedValue`]: an [`ItemType`] tag plus the value in its natural
//! representation. Atomic values keep their lexical form as text, binary values wrap a
//! request-owned [`BinaryStream`], and nodes use the small tree model in this module
//! ([`Element`], [`Document`], [`Node`]).
//!
//! Values are plain immutable data built through factory functions:
//!
//! ```rust
//! use xqrest::typed::{ItemType, TypedValue};
//!
//! let v = TypedValue::string("hello");
//! assert_eq!(v.item_type(), ItemType::String);
//! assert_eq!(v.as_text(), Some("hello"));
//! ```
//!
//! A function's result is a [`ResultSequence`], consumed exactly once by the
//! serializer.

mod node;
mod value;

pub use node::{attribute, Attribute, Document, Element, Node, QName};
pub use value::{BinaryStream, ItemType, TypedArgumentValue, TypedValue, Value};

/// Ordered output of one function invocation.
pub type ResultSequence = Vec<TypedValue>;
