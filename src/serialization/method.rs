use crate::runtime_config::{output_encoding, SerializationDefaults};

/// Output method named by the `method` property.
///
/// Anything outside the lookup table is [`SerializationMethod::Unrecognized`]; that
/// is a supported outcome, not an error: the body falls through to node
/// serialization with no content-type override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationMethod {
    Xml,
    Xhtml,
    Html,
    Html5,
    Text,
    Json,
    Binary,
    Unrecognized,
}

const METHOD_NAMES: &[(&str, SerializationMethod)] = &[
    ("xml", SerializationMethod::Xml),
    ("xhtml", SerializationMethod::Xhtml),
    ("html", SerializationMethod::Html),
    ("html5", SerializationMethod::Html5),
    ("text", SerializationMethod::Text),
    ("json", SerializationMethod::Json),
    ("binary", SerializationMethod::Binary),
];

impl SerializationMethod {
    /// Case-sensitive lookup; `None` when no method is declared at all.
    pub fn lookup(value: Option<&str>) -> Option<Self> {
        let value = value?;
        Some(
            METHOD_NAMES
                .iter()
                .find(|(n, _)| *n == value)
                .map(|(_, m)| *m)
                .unwrap_or(SerializationMethod::Unrecognized),
        )
    }

    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            SerializationMethod::Xml
                | SerializationMethod::Xhtml
                | SerializationMethod::Html
                | SerializationMethod::Html5
        )
    }

    /// Content type to set before the body is written, if this method dictates one.
    pub fn content_type(&self, defaults: &SerializationDefaults) -> Option<String> {
        match self {
            SerializationMethod::Xml | SerializationMethod::Xhtml => {
                Some(defaults.default_content_type())
            }
            SerializationMethod::Html | SerializationMethod::Html5 => {
                Some(format!("text/html; charset={}", output_encoding(&defaults.encoding)))
            }
            SerializationMethod::Json => {
                Some(format!("application/json; charset={}", output_encoding(&defaults.encoding)))
            }
            SerializationMethod::Text
            | SerializationMethod::Binary
            | SerializationMethod::Unrecognized => None,
        }
    }
}
