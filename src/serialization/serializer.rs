use super::body::StreamingBodySerializer;
use super::envelope::{is_envelope, ResponseEnvelopeHandler};
use super::error::ServiceSerializationError;
use super::exception::{serialize_exception, ErrorReport};
use super::method::SerializationMethod;
use super::properties::{derive_properties, SerializationProperties, SerializationProperty};
use crate::annotation::SerializationAnnotation;
use crate::runtime_config::SerializationDefaults;
use crate::server::HttpResponse;
use crate::typed::{Element, ItemType, TypedValue, Value};
use crate::writer::XmlWriter;
use tracing::{debug, warn};

/// Writes one body item onto the response.
///
/// The serializer picks the binary path only when the `method` property is exactly
/// `binary`; everything else goes through the node path.
pub trait BodySerializer {
    /// Write raw bytes of an `xs:base64Binary` or `xs:hexBinary` item. A wrapped
    /// stream must be consumed before returning.
    fn serialize_binary_body(
        &self,
        value: TypedValue,
        response: &mut dyn HttpResponse,
    ) -> Result<(), ServiceSerializationError>;

    /// Render an item as markup or text honoring the property table.
    fn serialize_node_body(
        &self,
        value: TypedValue,
        response: &mut dyn HttpResponse,
        properties: &SerializationProperties,
    ) -> Result<(), ServiceSerializationError>;
}

/// Turns a function's result sequence into an HTTP response.
pub struct ServiceSerializer<'a, B: BodySerializer = StreamingBodySerializer> {
    defaults: &'a SerializationDefaults,
    body: B,
    envelope: ResponseEnvelopeHandler,
}

impl<'a> ServiceSerializer<'a, StreamingBodySerializer> {
    /// Serializer writing bodies with [`StreamingBodySerializer`].
    pub fn streaming(defaults: &'a SerializationDefaults) -> Self {
        Self::new(defaults, StreamingBodySerializer::new())
    }
}

impl<'a, B: BodySerializer> ServiceSerializer<'a, B> {
    /// Serializer over `defaults` that hands response bodies to `body`.
    ///
    /// `defaults` are only read; every invocation derives its own property table.
    pub fn new(defaults: &'a SerializationDefaults, body: B) -> Self {
        Self {
            defaults,
            body,
            envelope: ResponseEnvelopeHandler::new(),
        }
    }

    pub fn defaults(&self) -> &SerializationDefaults {
        self.defaults
    }

    pub fn body_serializer(&self) -> &B {
        &self.body
    }

    /// Serialize `result` onto `response`.
    ///
    /// A committed response is left alone. When the first item is a `rest:response`
    /// envelope (directly or as a document's root element) its directives are applied
    /// and the second item, if any, becomes the body; otherwise the first item is the
    /// body. Further items are not serialized.
    pub fn serialize<I>(
        &self,
        result: I,
        annotations: &[SerializationAnnotation],
        response: &mut dyn HttpResponse,
    ) -> Result<(), ServiceSerializationError>
    where
        I: IntoIterator<Item = TypedValue>,
    {
        // the function may already have streamed its own body
        if response.is_committed() {
            debug!("Response already committed, skipping serialization");
            return Ok(());
        }

        let mut items = result.into_iter();
        let Some(first) = items.next() else {
            return Ok(());
        };

        let mut properties = derive_properties(self.defaults, annotations);

        let body = match envelope_candidate(&first).filter(|e| is_envelope(e)) {
            Some(envelope) => {
                debug!("rest:response envelope detected");
                self.envelope.process(envelope, &mut properties, response);
                items.next()
            }
            None => Some(first),
        };

        if let Some(body) = body {
            self.serialize_body(body, response, &properties)?;
        }

        let dropped = items.count();
        if dropped > 0 {
            warn!(
                dropped_items = dropped,
                "Result sequence has more items than a single body; extra items not serialized"
            );
        }
        Ok(())
    }

    /// Select the content type from the `method` property and dispatch.
    pub fn serialize_body(
        &self,
        value: TypedValue,
        response: &mut dyn HttpResponse,
        properties: &SerializationProperties,
    ) -> Result<(), ServiceSerializationError> {
        let declared = properties.get(SerializationProperty::Method);
        let method = SerializationMethod::lookup(declared);
        if method == Some(SerializationMethod::Unrecognized) {
            debug!(
                method = declared.unwrap_or(""),
                "Unrecognized serialization method, using node serialization"
            );
        }

        if let Some(content_type) = method.and_then(|m| m.content_type(self.defaults)) {
            response.set_content_type(&content_type);
        }

        if method == Some(SerializationMethod::Binary) {
            self.body.serialize_binary_body(value, response)
        } else {
            self.body.serialize_node_body(value, response, properties)
        }
    }

    /// Structured document for an unexpected failure.
    pub fn serialize_exception(
        &self,
        report: &ErrorReport,
        writer: &mut dyn XmlWriter,
    ) -> Result<(), ServiceSerializationError> {
        serialize_exception(self.defaults, report, writer)
    }
}

/// Root element of a document item, or the item itself if it is an element.
fn envelope_candidate(item: &TypedValue) -> Option<&Element> {
    match (item.item_type(), item.value()) {
        (ItemType::Document, Value::Document(doc)) => doc.document_element(),
        (ItemType::Element, Value::Element(e)) => Some(e),
        _ => None,
    }
}
