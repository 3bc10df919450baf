//! Reserved namespaces and their conventional prefixes.

use crate::typed::QName;

pub const REST_NS: &str = "http://exquery.org/ns/restxq";
pub const REST_PREFIX: &str = "rest";

pub const REST_ERROR_NS: &str = "http://exquery.org/ns/restxq/error";
pub const REST_ERROR_PREFIX: &str = "rqerr";

pub const HTTP_NS: &str = "http://expath.org/ns/http-client";
pub const HTTP_PREFIX: &str = "http";

pub const OUTPUT_NS: &str = "http://www.w3.org/2010/xslt-xquery-serialization";
pub const OUTPUT_PREFIX: &str = "output";

/// Conventional prefix for a reserved namespace.
pub fn preferred_prefix(namespace: &str) -> Option<&'static str> {
    match namespace {
        REST_NS => Some(REST_PREFIX),
        REST_ERROR_NS => Some(REST_ERROR_PREFIX),
        HTTP_NS => Some(HTTP_PREFIX),
        OUTPUT_NS => Some(OUTPUT_PREFIX),
        _ => None,
    }
}

pub fn rest(local_name: &str) -> QName {
    QName::prefixed(REST_NS, REST_PREFIX, local_name)
}

pub fn rest_error(local_name: &str) -> QName {
    QName::prefixed(REST_ERROR_NS, REST_ERROR_PREFIX, local_name)
}

pub fn http(local_name: &str) -> QName {
    QName::prefixed(HTTP_NS, HTTP_PREFIX, local_name)
}

pub fn output(local_name: &str) -> QName {
    QName::prefixed(OUTPUT_NS, OUTPUT_PREFIX, local_name)
}
