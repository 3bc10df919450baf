//! # xqrest
//!
//! **xqrest** is the request-binding and response-serialization layer for annotated
//! REST resource functions. A resource function declares what it wants from the
//! request (`%rest:query-param("q", "{$q}", "*")`, `%rest:header-param(...)`, ...) and
//! how its result should be written (`%output:method("json")`, ...). This crate turns
//! those declarations into typed function arguments on the way in and an HTTP
//! response on the way out.
//!
//! ## Architecture
//!
//! - **[`typed`]** - Typed values (`ItemType` + value), binary streams and a small node tree
//! - **[`annotation`]** - Validated parameter mappings, serialization annotations and error codes
//! - **[`server`]** - The request/response abstractions plus an `http`-crate backed implementation
//! - **[`extract`]** - One parameter extractor per request facet
//! - **[`serialization`]** - Property derivation, `rest:response` envelopes, body and exception serialization
//! - **[`writer`]** - Streaming markup writer used for node bodies and exception documents
//! - **[`runtime_config`]** - Immutable serialization defaults loaded from the environment or YAML
//! - **[`logging`]** - `tracing-subscriber` setup for hosts without their own subscriber
//!
//! ### Invocation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Req as server::parse_request
//!     participant Ext as extract::ParameterExtractor
//!     participant Fn as Resource function
//!     participant Ser as serialization::ServiceSerializer
//!     participant Res as server::HttpResponse
//!
//!     Host->>Req: http::Request<Vec<u8>>
//!     Req-->>Host: ParsedRequest
//!     loop each ParameterMapping
//!         Host->>Ext: extract(&request)
//!         Ext-->>Host: Option<TypedArgumentValue>
//!     end
//!     Host->>Fn: invoke(arguments)
//!     Fn-->>Host: ResultSequence
//!     Host->>Ser: serialize(result, annotations, response)
//!     Ser->>Res: status / headers / content type
//!     Ser->>Res: body bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use xqrest::annotation::{FunctionArgument, Literal, ParameterMapping, ParameterSource, SerializationAnnotation};
//! use xqrest::extract::{extract_arguments, extractor_for};
//! use xqrest::runtime_config::SerializationDefaults;
//! use xqrest::serialization::ServiceSerializer;
//! use xqrest::server::{parse_request, BufferedResponse};
//! use xqrest::typed::{Element, QName, TypedValue};
//!
//! let args = [FunctionArgument::new("q", xqrest::typed::ItemType::String)];
//! let mapping = ParameterMapping::from_annotation(
//!     ParameterSource::Query,
//!     &[Literal::string("q"), Literal::string("{$q}")],
//!     &args,
//! ).unwrap();
//!
//! let http_req = http::Request::get("/search?q=rust").body(Vec::new()).unwrap();
//! let request = parse_request(http_req);
//! let values = extract_arguments(&[extractor_for(mapping)], &request).unwrap();
//! assert_eq!(values[0].value.as_text(), Some("rust"));
//!
//! let result = vec![TypedValue::element(Element::new(QName::local("hits")).with_text("3"))];
//! let defaults = SerializationDefaults::default();
//! let mut response = BufferedResponse::new();
//! ServiceSerializer::streaming(&defaults)
//!     .serialize(result, &[SerializationAnnotation::method("json")], &mut response)
//!     .unwrap();
//! assert_eq!(response.body_text(), "{\n  \"hits\": \"3\"\n}");
//! ```

pub mod annotation;
pub mod extract;
pub mod logging;
pub mod namespace;
pub mod runtime_config;
pub mod serialization;
pub mod server;
pub mod typed;
pub mod writer;
