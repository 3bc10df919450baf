//! # Annotation Module
//!
//! Validated descriptors produced from a function's declarative annotations.
//!
//! Parameter annotations (`%rest:form-param`, `%rest:query-param`, `%rest:header-param`,
//! `%rest:cookie-param`, `%rest:matrix-param`, `%rest:path`) become
//! [`ParameterMapping`]s. Validation happens once at binding-setup time; each failure
//! carries a stable [`ErrorCode`] that tooling can match on.
//!
//! ```rust
//! use xqrest::annotation::{FunctionArgument, Literal, ParameterMapping, ParameterSource};
//! use xqrest::typed::ItemType;
//!
//! let args = [FunctionArgument::new("name", ItemType::String)];
//! let mapping = ParameterMapping::from_annotation(
//!     ParameterSource::Form,
//!     &[Literal::string("user"), Literal::string("{$name}"), Literal::string("anonymous")],
//!     &args,
//! ).unwrap();
//! assert_eq!(mapping.function_argument_name(), "name");
//! ```
//!
//! Serialization annotations (`%output:method` and friends) are kept as an ordered list
//! of [`SerializationAnnotation`]s and applied in declaration order.

mod errors;
mod mapping;
mod serialization;

pub use errors::{error_code, AnnotationError, AnnotationErrorKind, ErrorCode};
pub use mapping::{FunctionArgument, Literal, ParameterMapping, ParameterSource};
pub use serialization::SerializationAnnotation;
