//! # Parameter Extraction
//!
//! One extractor per request facet (form, query, header, cookie, path, matrix). Each
//! pulls a single named value out of the request and turns it into a
//! [`TypedArgumentValue`] for the function argument named by its [`ParameterMapping`].
//!
//! ## Coercion rules
//!
//! | Raw value | Result |
//! |-----------|--------|
//! | absent, default allowed | the declared default literal, with the literal's own type |
//! | absent, no default allowed | [`ExtractError::Missing`] |
//! | text | `xs:string` |
//! | binary stream | `xs:base64Binary` wrapping the same stream (no copy) |
//! | repeated name | [`ExtractError::MultipleValues`] (not supported) |
//! | anything else | `Ok(None)`: no typed value produced |
//!
//! ```rust
//! use xqrest::annotation::{FunctionArgument, Literal, ParameterMapping, ParameterSource};
//! use xqrest::extract::{extractor_for, ParameterExtractor};
//! use xqrest::server::ParsedRequest;
//! use xqrest::typed::ItemType;
//!
//! let arg = FunctionArgument::new("q", ItemType::String);
//! let mapping = ParameterMapping::new(ParameterSource::Query, "q", &arg, Some(Literal::string("*")));
//! let request = ParsedRequest::new(http::Method::GET, "/search");
//! let value = extractor_for(mapping).extract(&request).unwrap().unwrap();
//! assert_eq!(value.value.as_text(), Some("*"));
//! ```

mod form;
mod sources;

pub use form::FormParameterExtractor;
pub use sources::{
    CookieParameterExtractor, HeaderParameterExtractor, MatrixParameterExtractor,
    PathParameterExtractor, QueryParameterExtractor,
};

use crate::annotation::{ParameterMapping, ParameterSource};
use crate::server::{HttpRequest, ParamValue};
use crate::typed::{TypedArgumentValue, TypedValue};
use std::fmt;
use tracing::debug;

/// Per-request extraction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Absent from the request and the source cannot supply a default.
    Missing {
        /// Facet that was searched
        source: ParameterSource,
        /// Request-side parameter name
        parameter: String,
    },
    /// The name carried more than one value.
    MultipleValues {
        source: ParameterSource,
        parameter: String,
        /// Number of values found, always at least two
        count: usize,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Missing { source, parameter } => {
                write!(f, "{} '{}' is missing and has no default", source, parameter)
            }
            ExtractError::MultipleValues {
                source,
                parameter,
                count,
            } => write!(
                f,
                "{} '{}' has {} values; multi-valued parameters are not supported",
                source, parameter, count
            ),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Derives one function argument from one request facet.
pub trait ParameterExtractor: Send + Sync {
    fn mapping(&self) -> &ParameterMapping;

    /// Raw value for the mapping's parameter name in this extractor's facet.
    fn lookup(&self, request: &dyn HttpRequest) -> Option<ParamValue>;

    fn can_provide_default(&self) -> bool {
        self.mapping().source().can_provide_default()
    }

    /// `Ok(None)` means the raw value had a shape no typed value can be built from,
    /// which is distinct from a default having been produced.
    fn extract(
        &self,
        request: &dyn HttpRequest,
    ) -> Result<Option<TypedArgumentValue>, ExtractError> {
        let mapping = self.mapping();
        let value = coerce(mapping, self.lookup(request), self.can_provide_default())?;
        Ok(value.map(|value| TypedArgumentValue {
            argument_name: mapping.function_argument_name().to_string(),
            value,
        }))
    }
}

fn coerce(
    mapping: &ParameterMapping,
    raw: Option<ParamValue>,
    can_default: bool,
) -> Result<Option<TypedValue>, ExtractError> {
    match raw {
        None => match mapping.default_value() {
            Some(literal) if can_default => {
                debug!(
                    parameter = %mapping.parameter_name(),
                    default_type = %literal.item_type,
                    "Parameter absent, using default"
                );
                Ok(Some(TypedValue::from_literal(literal)))
            }
            _ => Err(ExtractError::Missing {
                source: mapping.source(),
                parameter: mapping.parameter_name().to_string(),
            }),
        },
        Some(ParamValue::Text(text)) => Ok(Some(TypedValue::string(text))),
        Some(ParamValue::Binary(stream)) => Ok(Some(TypedValue::base64_binary(stream))),
        Some(ParamValue::Multiple(values)) => Err(ExtractError::MultipleValues {
            source: mapping.source(),
            parameter: mapping.parameter_name().to_string(),
            count: values.len(),
        }),
        Some(ParamValue::Structured(_)) => {
            debug!(
                parameter = %mapping.parameter_name(),
                "Parameter value has no typed representation"
            );
            Ok(None)
        }
    }
}

/// Extractor matching the mapping's source.
pub fn extractor_for(mapping: ParameterMapping) -> Box<dyn ParameterExtractor> {
    match mapping.source() {
        ParameterSource::Form => Box::new(FormParameterExtractor::new(mapping)),
        ParameterSource::Query => Box::new(QueryParameterExtractor::new(mapping)),
        ParameterSource::Header => Box::new(HeaderParameterExtractor::new(mapping)),
        ParameterSource::Cookie => Box::new(CookieParameterExtractor::new(mapping)),
        ParameterSource::Path => Box::new(PathParameterExtractor::new(mapping)),
        ParameterSource::Matrix => Box::new(MatrixParameterExtractor::new(mapping)),
    }
}

/// Run every extractor against `request`, in order.
///
/// Extractors that produce no typed value contribute nothing to the list.
pub fn extract_arguments(
    extractors: &[Box<dyn ParameterExtractor>],
    request: &dyn HttpRequest,
) -> Result<Vec<TypedArgumentValue>, ExtractError> {
    let mut arguments = Vec::with_capacity(extractors.len());
    for extractor in extractors {
        if let Some(argument) = extractor.extract(request)? {
            arguments.push(argument);
        }
    }
    Ok(arguments)
}
