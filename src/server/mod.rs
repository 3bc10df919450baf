//! Request and response facets.
//!
//! The extractors only see a request through [`HttpRequest`] and the serializer only
//! writes through [`HttpResponse`]. [`ParsedRequest`] and [`BufferedResponse`] are the
//! in-process implementations built on the `http` crate types.

pub mod request;
pub mod response;

pub use request::{parse_request, HttpRequest, ParamValue, ParamVec, ParsedRequest};
pub use response::{BufferedResponse, HttpResponse};
