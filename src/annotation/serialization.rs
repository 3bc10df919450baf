use crate::serialization::SerializationProperty;

/// Declared output directive such as `%output:method("json")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationAnnotation {
    pub property: SerializationProperty,
    pub value: String,
}

impl SerializationAnnotation {
    pub fn new(property: SerializationProperty, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }

    pub fn method(value: impl Into<String>) -> Self {
        Self::new(SerializationProperty::Method, value)
    }

    pub fn media_type(value: impl Into<String>) -> Self {
        Self::new(SerializationProperty::MediaType, value)
    }

    pub fn encoding(value: impl Into<String>) -> Self {
        Self::new(SerializationProperty::Encoding, value)
    }

    pub fn indent(yes: bool) -> Self {
        Self::new(SerializationProperty::Indent, if yes { "yes" } else { "no" })
    }
}
