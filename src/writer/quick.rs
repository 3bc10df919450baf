use super::XmlWriter;
use crate::namespace::preferred_prefix;
use crate::runtime_config::{output_encoding, DEFAULT_ENCODING};
use crate::serialization::{SerializationProperties, SerializationProperty};
use crate::typed::{Attribute, QName};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{self, Write};

/// Namespace bindings declared on one open element.
type Scope = Vec<(String, String)>;

/// [`XmlWriter`] over any `Write` sink.
///
/// Honors `indent` (two spaces), `omit-xml-declaration` and `standalone`. Bytes are
/// always UTF-8 and the declaration says so whatever `encoding` asks for. Namespaces are declared on
/// the first element that uses them.
pub struct QuickXmlWriter<W: Write> {
    sink: Option<W>,
    writer: Option<Writer<W>>,
    properties: SerializationProperties,
    open: Vec<String>,
    scopes: Vec<Scope>,
    generated: usize,
}

impl<W: Write> QuickXmlWriter<W> {
    pub fn new(sink: W, properties: &SerializationProperties) -> Self {
        Self {
            sink: Some(sink),
            writer: None,
            properties: properties.clone(),
            open: Vec::new(),
            scopes: Vec::new(),
            generated: 0,
        }
    }

    /// The sink, once the document has been written (or before it started).
    pub fn into_inner(self) -> Option<W> {
        match self.writer {
            Some(w) => Some(w.into_inner()),
            None => self.sink,
        }
    }

    fn active(&mut self) -> io::Result<&mut Writer<W>> {
        self.writer.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "start_document has not been called")
        })
    }

    fn in_scope(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|s| s.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    fn prefix_for(&mut self, name: &QName, is_attribute: bool) -> String {
        let Some(ns) = name.namespace() else {
            return String::new();
        };
        if let Some(p) = name.prefix.as_deref().filter(|p| !p.is_empty()) {
            return p.to_string();
        }
        if !is_attribute {
            return String::new();
        }
        // attributes need a prefix to be namespaced
        match preferred_prefix(ns) {
            Some(p) => p.to_string(),
            None => {
                self.generated += 1;
                format!("ns{}", self.generated)
            }
        }
    }

    /// Lexical name for `name`, recording any declaration it needs in `scope`.
    fn bind(&mut self, name: &QName, is_attribute: bool, scope: &mut Scope) -> String {
        let prefix = self.prefix_for(name, is_attribute);
        let uri = name.namespace().unwrap_or("");
        let declared = scope
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, u)| u.as_str())
            .or_else(|| self.in_scope(&prefix));
        // un-prefixed attributes are never in the default namespace
        let needs_decl = !(is_attribute && prefix.is_empty()) && declared.unwrap_or("") != uri;
        if needs_decl {
            scope.push((prefix.clone(), uri.to_string()));
        }
        if prefix.is_empty() {
            name.local_name.clone()
        } else {
            format!("{}:{}", prefix, name.local_name)
        }
    }
}

impl<W: Write> XmlWriter for QuickXmlWriter<W> {
    fn set_properties(&mut self, properties: &SerializationProperties) {
        self.properties = properties.clone();
    }

    fn start_document(&mut self) -> io::Result<()> {
        let sink = self.sink.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "document already started")
        })?;
        let mut writer = if self.properties.flag(SerializationProperty::Indent) {
            Writer::new_with_indent(sink, b' ', 2)
        } else {
            Writer::new(sink)
        };
        if !self.properties.flag(SerializationProperty::OmitXmlDeclaration) {
            let encoding = output_encoding(
                self.properties
                    .get(SerializationProperty::Encoding)
                    .unwrap_or(DEFAULT_ENCODING),
            );
            let standalone = self
                .properties
                .get(SerializationProperty::Standalone)
                .filter(|s| matches!(*s, "yes" | "no"));
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), standalone)))?;
        }
        self.writer = Some(writer);
        Ok(())
    }

    fn start_element(&mut self, name: &QName, attributes: &[Attribute]) -> io::Result<()> {
        self.active()?;
        let mut scope = Scope::new();
        let element_name = self.bind(name, false, &mut scope);
        let attrs: Vec<(String, &str)> = attributes
            .iter()
            .map(|a| (self.bind(&a.name, true, &mut scope), a.value.as_str()))
            .collect();

        let mut start = BytesStart::new(element_name.clone());
        for (prefix, uri) in &scope {
            let decl = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", prefix)
            };
            start.push_attribute((decl.as_str(), uri.as_str()));
        }
        for (attr_name, value) in &attrs {
            start.push_attribute((attr_name.as_str(), *value));
        }

        self.active()?.write_event(Event::Start(start))?;
        self.open.push(element_name);
        self.scopes.push(scope);
        Ok(())
    }

    fn characters(&mut self, text: &str) -> io::Result<()> {
        self.active()?.write_event(Event::Text(BytesText::new(text)))
    }

    fn comment(&mut self, text: &str) -> io::Result<()> {
        let safe = text.replace("--", "- -");
        self.active()?
            .write_event(Event::Comment(BytesText::from_escaped(safe)))
    }

    fn end_element(&mut self) -> io::Result<()> {
        let name = self.open.pop().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "end_element without open element")
        })?;
        self.scopes.pop();
        self.active()?.write_event(Event::End(BytesEnd::new(name)))
    }

    fn end_document(&mut self) -> io::Result<()> {
        if !self.open.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} element(s) left open at end of document", self.open.len()),
            ));
        }
        self.active()?.get_mut().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{rest, REST_NS};
    use crate::typed::attribute;

    fn compact() -> SerializationProperties {
        let mut p = SerializationProperties::new();
        p.set(SerializationProperty::OmitXmlDeclaration, "yes");
        p
    }

    fn finish(w: QuickXmlWriter<Vec<u8>>) -> String {
        String::from_utf8(w.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_namespace_declared_once() {
        let mut w = QuickXmlWriter::new(Vec::new(), &compact());
        w.start_document().unwrap();
        w.start_element(&rest("response"), &[]).unwrap();
        w.start_element(&rest("inner"), &[]).unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();
        w.end_document().unwrap();
        assert_eq!(
            finish(w),
            format!(r#"<rest:response xmlns:rest="{}"><rest:inner></rest:inner></rest:response>"#, REST_NS)
        );
    }

    #[test]
    fn test_default_namespace_and_escaping() {
        let mut w = QuickXmlWriter::new(Vec::new(), &compact());
        w.start_document().unwrap();
        let name = QName::namespaced("urn:a", "doc");
        w.start_element(&name, &[attribute(QName::local("q"), "a\"b")]).unwrap();
        w.characters("1 < 2 & 3").unwrap();
        w.end_element().unwrap();
        w.end_document().unwrap();
        assert_eq!(
            finish(w),
            r#"<doc xmlns="urn:a" q="a&quot;b">1 &lt; 2 &amp; 3</doc>"#
        );
    }

    #[test]
    fn test_declaration_uses_encoding() {
        let mut w = QuickXmlWriter::new(Vec::new(), &SerializationProperties::new());
        w.start_document().unwrap();
        w.start_element(&QName::local("a"), &[]).unwrap();
        w.end_element().unwrap();
        w.end_document().unwrap();
        assert!(finish(w).starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }

    #[test]
    fn test_declaration_never_claims_other_encoding() {
        let mut props = SerializationProperties::new();
        props.set(SerializationProperty::Encoding, "ISO-8859-1");
        let mut w = QuickXmlWriter::new(Vec::new(), &props);
        w.start_document().unwrap();
        w.start_element(&QName::local("n"), &[]).unwrap();
        w.characters("\u{e9}").unwrap();
        w.end_element().unwrap();
        w.end_document().unwrap();
        let out = finish(w);
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(out.as_bytes().windows(2).any(|b| b == [0xc3, 0xa9]));
    }

    #[test]
    fn test_unbalanced_calls_fail() {
        let mut w = QuickXmlWriter::new(Vec::new(), &compact());
        assert!(w.start_element(&QName::local("a"), &[]).is_err());
        w.start_document().unwrap();
        assert!(w.end_element().is_err());
        w.start_element(&QName::local("a"), &[]).unwrap();
        assert!(w.end_document().is_err());
    }
}
