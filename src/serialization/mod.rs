//! # Result Serialization
//!
//! Turns the sequence returned by a resource function into an HTTP response.
//!
//! 1. A response the function already committed is left untouched.
//! 2. Serialization properties are derived from the configured defaults and the
//!    function's declared serialization annotations, in order.
//! 3. If the first item is a `rest:response` envelope, its status, headers and
//!    serialization parameters are applied and the second item becomes the body.
//! 4. The `method` property selects the content type and the binary or node path.
//!
//! ```rust
//! use xqrest::annotation::SerializationAnnotation;
//! use xqrest::runtime_config::SerializationDefaults;
//! use xqrest::serialization::ServiceSerializer;
//! use xqrest::server::BufferedResponse;
//! use xqrest::typed::TypedValue;
//!
//! let defaults = SerializationDefaults::default();
//! let mut response = BufferedResponse::new();
//! ServiceSerializer::streaming(&defaults)
//!     .serialize(
//!         vec![TypedValue::string(r#"{"id":1}"#)],
//!         &[SerializationAnnotation::method("json")],
//!         &mut response,
//!     )
//!     .unwrap();
//! assert_eq!(response.header("content-type"), Some("application/json; charset=UTF-8"));
//! assert_eq!(response.body_text(), r#"{"id":1}"#);
//! ```

mod body;
mod envelope;
mod error;
mod exception;
mod method;
mod properties;
mod serializer;

pub use body::{element_content_to_json, element_to_json, StreamingBodySerializer};
pub use envelope::{is_envelope, ResponseEnvelopeHandler};
pub use error::ServiceSerializationError;
pub use exception::{serialize_exception, write_exception_response, ErrorReport, StackFrame};
pub use method::SerializationMethod;
pub use properties::{derive_properties, SerializationProperties, SerializationProperty};
pub use serializer::{BodySerializer, ServiceSerializer};
