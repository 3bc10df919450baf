use crate::annotation::SerializationAnnotation;
use crate::runtime_config::SerializationDefaults;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Closed set of serialization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SerializationProperty {
    AllowDuplicateNames,
    ByteOrderMark,
    CdataSectionElements,
    DoctypePublic,
    DoctypeSystem,
    Encoding,
    EscapeUriAttributes,
    HtmlVersion,
    IncludeContentType,
    Indent,
    ItemSeparator,
    JsonNodeOutputMethod,
    MediaType,
    Method,
    NormalizationForm,
    OmitXmlDeclaration,
    Standalone,
    SuppressIndentation,
    UndeclarePrefixes,
    UseCharacterMaps,
    Version,
}

const ALL_PROPERTIES: [SerializationProperty; 21] = [
    SerializationProperty::AllowDuplicateNames,
    SerializationProperty::ByteOrderMark,
    SerializationProperty::CdataSectionElements,
    SerializationProperty::DoctypePublic,
    SerializationProperty::DoctypeSystem,
    SerializationProperty::Encoding,
    SerializationProperty::EscapeUriAttributes,
    SerializationProperty::HtmlVersion,
    SerializationProperty::IncludeContentType,
    SerializationProperty::Indent,
    SerializationProperty::ItemSeparator,
    SerializationProperty::JsonNodeOutputMethod,
    SerializationProperty::MediaType,
    SerializationProperty::Method,
    SerializationProperty::NormalizationForm,
    SerializationProperty::OmitXmlDeclaration,
    SerializationProperty::Standalone,
    SerializationProperty::SuppressIndentation,
    SerializationProperty::UndeclarePrefixes,
    SerializationProperty::UseCharacterMaps,
    SerializationProperty::Version,
];

impl SerializationProperty {
    /// Lookup by parameter name, e.g. `media-type`.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_PROPERTIES.iter().copied().find(|p| p.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SerializationProperty::AllowDuplicateNames => "allow-duplicate-names",
            SerializationProperty::ByteOrderMark => "byte-order-mark",
            SerializationProperty::CdataSectionElements => "cdata-section-elements",
            SerializationProperty::DoctypePublic => "doctype-public",
            SerializationProperty::DoctypeSystem => "doctype-system",
            SerializationProperty::Encoding => "encoding",
            SerializationProperty::EscapeUriAttributes => "escape-uri-attributes",
            SerializationProperty::HtmlVersion => "html-version",
            SerializationProperty::IncludeContentType => "include-content-type",
            SerializationProperty::Indent => "indent",
            SerializationProperty::ItemSeparator => "item-separator",
            SerializationProperty::JsonNodeOutputMethod => "json-node-output-method",
            SerializationProperty::MediaType => "media-type",
            SerializationProperty::Method => "method",
            SerializationProperty::NormalizationForm => "normalization-form",
            SerializationProperty::OmitXmlDeclaration => "omit-xml-declaration",
            SerializationProperty::Standalone => "standalone",
            SerializationProperty::SuppressIndentation => "suppress-indentation",
            SerializationProperty::UndeclarePrefixes => "undeclare-prefixes",
            SerializationProperty::UseCharacterMaps => "use-character-maps",
            SerializationProperty::Version => "version",
        }
    }
}

impl fmt::Display for SerializationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-invocation serialization property table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializationProperties {
    values: BTreeMap<SerializationProperty, String>,
}

impl SerializationProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: SerializationProperty) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    /// Overwrite by key.
    pub fn set(&mut self, property: SerializationProperty, value: impl Into<String>) {
        self.values.insert(property, value.into());
    }

    pub fn remove(&mut self, property: SerializationProperty) -> Option<String> {
        self.values.remove(&property)
    }

    /// `yes`/`true`/`1` as true; anything else, or absent, as false.
    pub fn flag(&self, property: SerializationProperty) -> bool {
        matches!(
            self.get(property).map(str::trim),
            Some("yes") | Some("true") | Some("1")
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (SerializationProperty, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Copy of the defaults with every declared annotation applied in declaration order.
pub fn derive_properties(
    defaults: &SerializationDefaults,
    annotations: &[SerializationAnnotation],
) -> SerializationProperties {
    let mut props = defaults.properties();
    for annotation in annotations {
        props.set(annotation.property, annotation.value.as_str());
    }
    debug!(
        annotations = annotations.len(),
        method = props.get(SerializationProperty::Method).unwrap_or(""),
        "Serialization properties derived"
    );
    props
}
