use super::error::ServiceSerializationError;
use super::method::SerializationMethod;
use super::properties::{SerializationProperties, SerializationProperty};
use super::serializer::BodySerializer;
use crate::runtime_config::{output_encoding, DEFAULT_MEDIA_TYPE};
use crate::server::HttpResponse;
use crate::typed::{Element, ItemType, TypedValue, Value};
use crate::writer::{write_document, write_element, QuickXmlWriter, XmlWriter};
use base64::Engine;
use serde_json::{Map, Value as JsonValue};
use std::io::Write;

/// Default [`BodySerializer`]: raw bytes for binary items, markup, JSON or text for
/// everything else, streamed straight into the response body.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamingBodySerializer;

impl StreamingBodySerializer {
    pub fn new() -> Self {
        Self
    }
}

impl BodySerializer for StreamingBodySerializer {
    fn serialize_binary_body(
        &self,
        value: TypedValue,
        response: &mut dyn HttpResponse,
    ) -> Result<(), ServiceSerializationError> {
        let item_type = value.item_type();
        match (item_type, value.into_value()) {
            (ItemType::Base64Binary | ItemType::HexBinary, Value::Binary(stream)) => {
                stream.copy_to(response.body())?;
            }
            (ItemType::Base64Binary, Value::Text(lexical)) => {
                let compact: String = lexical.split_whitespace().collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| ServiceSerializationError::with_source("Invalid xs:base64Binary body", e))?;
                response.body().write_all(&bytes)?;
            }
            (ItemType::HexBinary, Value::Text(lexical)) => {
                let bytes = hex::decode(lexical.trim())
                    .map_err(|e| ServiceSerializationError::with_source("Invalid xs:hexBinary body", e))?;
                response.body().write_all(&bytes)?;
            }
            (other, _) => {
                return Err(ServiceSerializationError::new(format!(
                    "Binary serialization requires xs:base64Binary or xs:hexBinary, got {}",
                    other
                )))
            }
        }
        Ok(())
    }

    fn serialize_node_body(
        &self,
        value: TypedValue,
        response: &mut dyn HttpResponse,
        properties: &SerializationProperties,
    ) -> Result<(), ServiceSerializationError> {
        let method = SerializationMethod::lookup(properties.get(SerializationProperty::Method));
        if response.content_type().is_none() {
            if let Some(media_type) = node_media_type(method, properties) {
                let content_type = match properties.get(SerializationProperty::Encoding) {
                    Some(enc) => format!("{}; charset={}", media_type, output_encoding(enc)),
                    None => media_type.to_string(),
                };
                response.set_content_type(&content_type);
            }
        }

        match method {
            Some(SerializationMethod::Json) => write_json(value, response.body(), properties),
            Some(SerializationMethod::Text) => write_text(value, response.body()),
            Some(SerializationMethod::Html) | Some(SerializationMethod::Html5) => {
                let mut html = properties.clone();
                html.set(SerializationProperty::OmitXmlDeclaration, "yes");
                if method == Some(SerializationMethod::Html5) {
                    response.body().write_all(b"<!DOCTYPE html>\n")?;
                }
                write_markup(value, response.body(), &html)
            }
            _ => write_markup(value, response.body(), properties),
        }
    }
}

/// Media type for a node body. The text method replaces the markup default with
/// `text/plain`; an explicit media type always wins.
fn node_media_type<'a>(
    method: Option<SerializationMethod>,
    properties: &'a SerializationProperties,
) -> Option<&'a str> {
    let media_type = properties.get(SerializationProperty::MediaType);
    match (method, media_type) {
        (Some(SerializationMethod::Text), None | Some(DEFAULT_MEDIA_TYPE)) => Some("text/plain"),
        _ => media_type,
    }
}

fn lexical_text(value: Value) -> Result<String, ServiceSerializationError> {
    Ok(match value {
        Value::Text(t) => t,
        Value::Element(e) => e.text_content(),
        Value::Document(d) => d
            .document_element()
            .map(Element::text_content)
            .unwrap_or_default(),
        Value::Binary(stream) => {
            base64::engine::general_purpose::STANDARD.encode(stream.read_to_end()?)
        }
    })
}

fn write_text(value: TypedValue, sink: &mut dyn Write) -> Result<(), ServiceSerializationError> {
    sink.write_all(lexical_text(value.into_value())?.as_bytes())?;
    Ok(())
}

fn write_markup(
    value: TypedValue,
    sink: &mut dyn Write,
    properties: &SerializationProperties,
) -> Result<(), ServiceSerializationError> {
    let mut writer = QuickXmlWriter::new(sink, properties);
    writer.start_document()?;
    match value.into_value() {
        Value::Element(e) => write_element(&mut writer, &e)?,
        Value::Document(d) => write_document(&mut writer, &d)?,
        other => writer.characters(&lexical_text(other)?)?,
    }
    writer.end_document()?;
    Ok(())
}

fn write_json(
    value: TypedValue,
    sink: &mut dyn Write,
    properties: &SerializationProperties,
) -> Result<(), ServiceSerializationError> {
    let json = match value.into_value() {
        // atomic results are already serialized JSON text
        Value::Text(t) => {
            sink.write_all(t.as_bytes())?;
            return Ok(());
        }
        Value::Element(e) => element_to_json(&e),
        Value::Document(d) => d
            .document_element()
            .map(element_to_json)
            .unwrap_or(JsonValue::Null),
        Value::Binary(stream) => JsonValue::String(
            base64::engine::general_purpose::STANDARD.encode(stream.read_to_end()?),
        ),
    };
    let written = if properties.flag(SerializationProperty::Indent) {
        serde_json::to_writer_pretty(&mut *sink, &json)
    } else {
        serde_json::to_writer(&mut *sink, &json)
    };
    written.map_err(|e| ServiceSerializationError::with_source("Failed to write JSON body", e))
}

/// `{ "root": ... }` with the root converted by [`element_content_to_json`].
pub fn element_to_json(element: &Element) -> JsonValue {
    let mut root = Map::new();
    root.insert(element.name.local_name.clone(), element_content_to_json(element));
    JsonValue::Object(root)
}

/// Leaf elements become strings; otherwise attributes map to `@name`, child elements
/// to their local name (arrays when repeated) and direct text to `#text`.
pub fn element_content_to_json(element: &Element) -> JsonValue {
    let children: Vec<&Element> = element.child_elements().collect();
    if element.attributes.is_empty() && children.is_empty() {
        return JsonValue::String(element.text_content());
    }

    let mut obj = Map::new();
    for attr in &element.attributes {
        obj.insert(
            format!("@{}", attr.name.local_name),
            JsonValue::String(attr.value.clone()),
        );
    }
    for child in children {
        let converted = element_content_to_json(child);
        match obj.get_mut(&child.name.local_name) {
            Some(JsonValue::Array(items)) => items.push(converted),
            Some(existing) => {
                let first = existing.take();
                *existing = JsonValue::Array(vec![first, converted]);
            }
            None => {
                obj.insert(child.name.local_name.clone(), converted);
            }
        }
    }
    let direct_text: String = element
        .children
        .iter()
        .filter_map(|n| match n {
            crate::typed::Node::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect();
    if !direct_text.trim().is_empty() {
        obj.insert("#text".to_string(), JsonValue::String(direct_text));
    }
    JsonValue::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::BufferedResponse;
    use crate::typed::{BinaryStream, QName};
    use serde_json::json;

    fn props(method: Option<&str>) -> SerializationProperties {
        let mut p = SerializationProperties::new();
        p.set(SerializationProperty::OmitXmlDeclaration, "yes");
        if let Some(m) = method {
            p.set(SerializationProperty::Method, m);
        }
        p
    }

    #[test]
    fn test_binary_stream_is_drained() {
        let stream = BinaryStream::from_bytes(vec![0, 159, 146, 150]);
        let mut res = BufferedResponse::new();
        StreamingBodySerializer
            .serialize_binary_body(TypedValue::base64_binary(stream.clone()), &mut res)
            .unwrap();
        assert_eq!(res.body_bytes(), &[0, 159, 146, 150]);
        assert!(stream.read_to_end().unwrap().is_empty());
    }

    #[test]
    fn test_binary_lexical_forms() {
        let mut res = BufferedResponse::new();
        StreamingBodySerializer
            .serialize_binary_body(TypedValue::atomic(ItemType::Base64Binary, "aGk="), &mut res)
            .unwrap();
        StreamingBodySerializer
            .serialize_binary_body(TypedValue::atomic(ItemType::HexBinary, "2121"), &mut res)
            .unwrap();
        assert_eq!(res.body_bytes(), b"hi!!");
    }

    #[test]
    fn test_binary_rejects_other_types() {
        let mut res = BufferedResponse::new();
        let err = StreamingBodySerializer
            .serialize_binary_body(TypedValue::string("x"), &mut res)
            .unwrap_err();
        assert!(err.to_string().contains("xs:string"));
    }

    #[test]
    fn test_markup_sets_media_type_when_unset() {
        let mut p = props(None);
        p.set(SerializationProperty::MediaType, "application/atom+xml");
        p.set(SerializationProperty::Encoding, "UTF-8");
        let mut res = BufferedResponse::new();
        let doc = Element::new(QName::local("feed")).with_text("x");
        StreamingBodySerializer
            .serialize_node_body(TypedValue::element(doc), &mut res, &p)
            .unwrap();
        assert_eq!(res.body_text(), "<feed>x</feed>");
        assert_eq!(res.header("content-type"), Some("application/atom+xml; charset=UTF-8"));
    }

    #[test]
    fn test_html5_doctype() {
        let mut res = BufferedResponse::new();
        let page = Element::new(QName::local("html"));
        StreamingBodySerializer
            .serialize_node_body(TypedValue::element(page), &mut res, &props(Some("html5")))
            .unwrap();
        assert_eq!(res.body_text(), "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn test_json_conversion() {
        let e = Element::new(QName::local("user"))
            .with_attribute("id", "1")
            .with_child(Element::new(QName::local("role")).with_text("a"))
            .with_child(Element::new(QName::local("role")).with_text("b"))
            .with_child(Element::new(QName::local("name")).with_text("Ada"));
        assert_eq!(
            element_to_json(&e),
            json!({ "user": { "@id": "1", "role": ["a", "b"], "name": "Ada" } })
        );
    }

    #[test]
    fn test_json_atomic_written_verbatim() {
        let mut res = BufferedResponse::new();
        StreamingBodySerializer
            .serialize_node_body(TypedValue::string(r#"{"ok":true}"#), &mut res, &props(Some("json")))
            .unwrap();
        assert_eq!(res.body_text(), r#"{"ok":true}"#);
    }

    #[test]
    fn test_text_method() {
        let mut res = BufferedResponse::new();
        let e = Element::new(QName::local("p")).with_text("plain");
        StreamingBodySerializer
            .serialize_node_body(TypedValue::element(e), &mut res, &props(Some("text")))
            .unwrap();
        assert_eq!(res.body_text(), "plain");
        assert_eq!(res.header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_text_method_media_type() {
        let mut p = props(Some("text"));
        p.set(SerializationProperty::MediaType, DEFAULT_MEDIA_TYPE);
        p.set(SerializationProperty::Encoding, "ISO-8859-1");
        let mut res = BufferedResponse::new();
        StreamingBodySerializer
            .serialize_node_body(TypedValue::string("hi"), &mut res, &p)
            .unwrap();
        assert_eq!(res.header("content-type"), Some("text/plain; charset=UTF-8"));

        p.set(SerializationProperty::MediaType, "text/csv");
        let mut res = BufferedResponse::new();
        StreamingBodySerializer
            .serialize_node_body(TypedValue::string("a,b"), &mut res, &p)
            .unwrap();
        assert_eq!(res.header("content-type"), Some("text/csv; charset=UTF-8"));
    }
}
