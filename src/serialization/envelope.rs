use super::properties::{SerializationProperties, SerializationProperty};
use crate::namespace::{HTTP_NS, OUTPUT_NS, REST_NS};
use crate::server::HttpResponse;
use crate::typed::Element;
use tracing::{debug, warn};

/// True for the reserved `rest:response` control element.
pub fn is_envelope(element: &Element) -> bool {
    element.name.matches(REST_NS, "response")
}

/// Applies the directives of a `rest:response` element to the live response and the
/// invocation's property table:
///
/// ```xml
/// <rest:response>
///   <http:response status="404" reason="Gone fishing">
///     <http:header name="Cache-Control" value="no-cache"/>
///   </http:response>
///   <output:serialization-parameters>
///     <output:method value="json"/>
///   </output:serialization-parameters>
/// </rest:response>
/// ```
///
/// Anything not recognized is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseEnvelopeHandler;

impl ResponseEnvelopeHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn process(
        &self,
        envelope: &Element,
        properties: &mut SerializationProperties,
        response: &mut dyn HttpResponse,
    ) {
        for child in envelope.child_elements() {
            if child.name.matches(HTTP_NS, "response") {
                self.apply_http_response(child, response);
            } else if child.name.matches(OUTPUT_NS, "serialization-parameters") {
                self.apply_serialization_parameters(child, properties);
            } else {
                debug!(element = %child.name, "Ignoring unknown envelope directive");
            }
        }
    }

    fn apply_http_response(&self, element: &Element, response: &mut dyn HttpResponse) {
        if let Some(raw) = element.attribute("status") {
            match raw.trim().parse::<u16>() {
                Ok(status) if (100..=999).contains(&status) => {
                    debug!(status, "Envelope sets response status");
                    response.set_status(status, element.attribute("reason"));
                }
                _ => warn!(status = %raw, "Ignoring invalid envelope status"),
            }
        }

        for header in element.child_elements() {
            if !header.name.matches(HTTP_NS, "header") {
                debug!(element = %header.name, "Ignoring unknown http:response child");
                continue;
            }
            match (header.attribute("name"), header.attribute("value")) {
                (Some(name), Some(value)) => response.set_header(name, value),
                _ => warn!("Ignoring http:header without name and value"),
            }
        }
    }

    fn apply_serialization_parameters(
        &self,
        element: &Element,
        properties: &mut SerializationProperties,
    ) {
        for param in element.child_elements() {
            let property = param
                .name
                .namespace()
                .filter(|ns| *ns == OUTPUT_NS)
                .and_then(|_| SerializationProperty::from_name(&param.name.local_name));
            match (property, param.attribute("value")) {
                (Some(property), Some(value)) => {
                    debug!(property = %property, value = %value, "Envelope overrides serialization property");
                    properties.set(property, value);
                }
                _ => debug!(element = %param.name, "Ignoring unknown serialization parameter"),
            }
        }
    }
}
