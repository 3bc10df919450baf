use xqrest::annotation::SerializationAnnotation;
use xqrest::namespace::{http, output, rest};
use xqrest::runtime_config::SerializationDefaults;
use xqrest::serialization::{
    derive_properties, SerializationProperty, ServiceSerializer,
};
use xqrest::server::{BufferedResponse, HttpResponse};
use xqrest::typed::{BinaryStream, Document, Element, ItemType, QName, TypedValue};

fn defaults() -> SerializationDefaults {
    SerializationDefaults::default()
}

fn serialize(items: Vec<TypedValue>, annotations: &[SerializationAnnotation]) -> BufferedResponse {
    let defaults = defaults();
    let mut response = BufferedResponse::new();
    ServiceSerializer::streaming(&defaults)
        .serialize(items, annotations, &mut response)
        .expect("serialization succeeds");
    response
}

fn envelope(children: Vec<Element>) -> Element {
    children
        .into_iter()
        .fold(Element::new(rest("response")), Element::with_child)
}

#[test]
fn test_committed_response_is_left_alone() {
    let defaults = defaults();
    let mut response = BufferedResponse::new();
    response.set_status(202, None);
    response.commit();
    ServiceSerializer::streaming(&defaults)
        .serialize(
            vec![TypedValue::string("late")],
            &[SerializationAnnotation::method("json")],
            &mut response,
        )
        .unwrap();
    assert_eq!(response.status(), 202);
    assert!(response.body_bytes().is_empty());
    assert_eq!(response.content_type(), None);
}

#[test]
fn test_xml_body_with_declaration_and_default_content_type() {
    let item = Element::new(QName::local("greeting")).with_text("hi");
    let response = serialize(
        vec![TypedValue::element(item)],
        &[SerializationAnnotation::method("xml"), SerializationAnnotation::indent(false)],
    );
    assert_eq!(response.header("content-type"), Some("application/xml; charset=UTF-8"));
    assert_eq!(
        response.body_text(),
        r#"<?xml version="1.0" encoding="UTF-8"?><greeting>hi</greeting>"#
    );
}

#[test]
fn test_envelope_status_headers_and_method() {
    let env = envelope(vec![
        Element::new(http("response"))
            .with_attribute("status", "201")
            .with_attribute("reason", "Created")
            .with_child(
                Element::new(http("header"))
                    .with_attribute("name", "Location")
                    .with_attribute("value", "/items/9"),
            ),
        Element::new(output("serialization-parameters"))
            .with_child(Element::new(output("method")).with_attribute("value", "json")),
    ]);
    let response = serialize(
        vec![
            TypedValue::document(Document::new(env)),
            TypedValue::string(r#"{"id":9}"#),
        ],
        &[SerializationAnnotation::method("xml")],
    );
    assert_eq!(response.status(), 201);
    assert_eq!(response.reason(), "Created");
    assert_eq!(response.header("location"), Some("/items/9"));
    assert_eq!(response.header("content-type"), Some("application/json; charset=UTF-8"));
    assert_eq!(response.body_text(), r#"{"id":9}"#);
}

#[test]
fn test_envelope_without_body_item() {
    let env = envelope(vec![Element::new(http("response")).with_attribute("status", "204")]);
    let response = serialize(vec![TypedValue::element(env)], &[]);
    assert_eq!(response.status(), 204);
    assert!(response.body_bytes().is_empty());
}

#[test]
fn test_lookalike_root_is_serialized_as_body() {
    let item = Element::new(QName::namespaced("urn:other", "response")).with_text("x");
    let response = serialize(
        vec![TypedValue::element(item)],
        &[SerializationAnnotation::method("xml"), SerializationAnnotation::indent(false)],
    );
    assert_eq!(response.status(), 200);
    assert!(response.body_text().ends_with(r#"<response xmlns="urn:other">x</response>"#));
}

#[test]
fn test_html_content_type() {
    let page = Element::new(QName::local("html"))
        .with_child(Element::new(QName::local("body")).with_text("ok"));
    let response = serialize(
        vec![TypedValue::element(page)],
        &[SerializationAnnotation::method("html"), SerializationAnnotation::indent(false)],
    );
    assert_eq!(response.header("content-type"), Some("text/html; charset=UTF-8"));
    assert_eq!(response.body_text(), "<html><body>ok</body></html>");
}

#[test]
fn test_unrecognized_method_falls_back_to_node_serialization() {
    let response = serialize(
        vec![TypedValue::string("a,b,c")],
        &[
            SerializationAnnotation::method("csv"),
            SerializationAnnotation::media_type("text/csv"),
        ],
    );
    assert_eq!(response.header("content-type"), Some("text/csv; charset=UTF-8"));
    assert!(response.body_text().ends_with("a,b,c"));
}

#[test]
fn test_binary_stream_written_raw() {
    let bytes = vec![0xde, 0xad, 0xbe, 0xef];
    let response = serialize(
        vec![TypedValue::base64_binary(BinaryStream::from_bytes(bytes.clone()))],
        &[
            SerializationAnnotation::method("binary"),
            SerializationAnnotation::media_type("application/octet-stream"),
        ],
    );
    assert_eq!(response.body_bytes(), bytes.as_slice());
    assert_eq!(response.content_type(), None);
}

#[test]
fn test_hex_binary_lexical_value() {
    let response = serialize(
        vec![TypedValue::atomic(ItemType::HexBinary, "CAFE")],
        &[SerializationAnnotation::method("binary")],
    );
    assert_eq!(response.body_bytes(), &[0xca, 0xfe]);
}

#[test]
fn test_binary_method_rejects_non_binary_item() {
    let defaults = defaults();
    let mut response = BufferedResponse::new();
    let err = ServiceSerializer::streaming(&defaults)
        .serialize(
            vec![TypedValue::string("not bytes")],
            &[SerializationAnnotation::method("binary")],
            &mut response,
        )
        .unwrap_err();
    assert!(err.message().contains("xs:base64Binary"));
}

#[test]
fn test_extra_items_are_not_serialized() {
    let response = serialize(
        vec![TypedValue::string("first"), TypedValue::string("second")],
        &[SerializationAnnotation::method("text")],
    );
    assert_eq!(response.body_text(), "first");
}

#[test]
fn test_json_element_conversion() {
    let item = Element::new(QName::local("pet"))
        .with_attribute("id", "3")
        .with_child(Element::new(QName::local("tag")).with_text("a"))
        .with_child(Element::new(QName::local("tag")).with_text("b"));
    let response = serialize(
        vec![TypedValue::element(item)],
        &[SerializationAnnotation::method("json"), SerializationAnnotation::indent(false)],
    );
    let body: serde_json::Value = serde_json::from_str(&response.body_text()).unwrap();
    assert_eq!(body, serde_json::json!({"pet": {"@id": "3", "tag": ["a", "b"]}}));
}

#[test]
fn test_derived_properties_leave_defaults_untouched() {
    let defaults = defaults();
    let props = derive_properties(
        &defaults,
        &[
            SerializationAnnotation::method("xml"),
            SerializationAnnotation::method("json"),
        ],
    );
    assert_eq!(props.get(SerializationProperty::Method), Some("json"));
    assert_eq!(props.get(SerializationProperty::MediaType), Some("application/xml"));
    assert_eq!(defaults, SerializationDefaults::default());
    assert_eq!(defaults.properties().get(SerializationProperty::Method), None);
}

#[test]
fn test_non_utf8_encoding_is_not_claimed() {
    let defaults = SerializationDefaults::from_yaml_str("encoding: ISO-8859-1\nindent: false\n")
        .expect("valid yaml");
    let mut response = BufferedResponse::new();
    ServiceSerializer::streaming(&defaults)
        .serialize(
            vec![TypedValue::element(Element::new(QName::local("n")).with_text("\u{e9}"))],
            &[
                SerializationAnnotation::method("xml"),
                SerializationAnnotation::encoding("ISO-8859-1"),
            ],
            &mut response,
        )
        .unwrap();
    assert_eq!(response.header("content-type"), Some("application/xml; charset=UTF-8"));
    assert!(response.body_text().starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(response.body_bytes().windows(2).any(|b| b == [0xc3, 0xa9]));
}

#[test]
fn test_text_method_is_plain_text() {
    let response = serialize(
        vec![TypedValue::string("hello")],
        &[SerializationAnnotation::method("text")],
    );
    assert_eq!(response.header("content-type"), Some("text/plain; charset=UTF-8"));
    assert_eq!(response.body_text(), "hello");
}
