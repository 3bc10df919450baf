//! # Streaming Document Writer
//!
//! [`XmlWriter`] is the sink the envelope handler, the node body serializer and the
//! exception serializer emit markup into: elements, attributes and character data in
//! document order. [`QuickXmlWriter`] is the `quick-xml` backed implementation.
//!
//! ```rust
//! use xqrest::typed::{Element, QName};
//! use xqrest::writer::{write_element, QuickXmlWriter, XmlWriter};
//! use xqrest::serialization::{SerializationProperties, SerializationProperty};
//!
//! let mut props = SerializationProperties::new();
//! props.set(SerializationProperty::OmitXmlDeclaration, "yes");
//! let mut w = QuickXmlWriter::new(Vec::new(), &props);
//! w.start_document().unwrap();
//! write_element(&mut w, &Element::new(QName::local("a")).with_text("x")).unwrap();
//! w.end_document().unwrap();
//! assert_eq!(String::from_utf8(w.into_inner().unwrap()).unwrap(), "<a>x</a>");
//! ```

mod quick;

pub use quick::QuickXmlWriter;

use crate::serialization::SerializationProperties;
use crate::typed::{Attribute, Document, Element, Node, QName};
use std::io;

/// Streaming markup sink.
pub trait XmlWriter {
    /// Takes effect for the next document.
    fn set_properties(&mut self, properties: &SerializationProperties);
    fn start_document(&mut self) -> io::Result<()>;
    fn start_element(&mut self, name: &QName, attributes: &[Attribute]) -> io::Result<()>;
    fn characters(&mut self, text: &str) -> io::Result<()>;
    fn comment(&mut self, text: &str) -> io::Result<()>;
    fn end_element(&mut self) -> io::Result<()>;
    fn end_document(&mut self) -> io::Result<()>;
}

/// Stream an element tree.
pub fn write_element(writer: &mut dyn XmlWriter, element: &Element) -> io::Result<()> {
    writer.start_element(&element.name, &element.attributes)?;
    write_nodes(writer, &element.children)?;
    writer.end_element()
}

/// Stream the children of a document node (without start/end document events).
pub fn write_document(writer: &mut dyn XmlWriter, document: &Document) -> io::Result<()> {
    write_nodes(writer, &document.children)
}

fn write_nodes(writer: &mut dyn XmlWriter, nodes: &[Node]) -> io::Result<()> {
    for node in nodes {
        match node {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer.characters(t)?,
            Node::Comment(c) => writer.comment(c)?,
        }
    }
    Ok(())
}
