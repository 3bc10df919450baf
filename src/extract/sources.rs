use super::ParameterExtractor;
use crate::annotation::ParameterMapping;
use crate::server::{HttpRequest, ParamValue};

/// `%rest:query-param`
#[derive(Debug, Clone)]
pub struct QueryParameterExtractor {
    mapping: ParameterMapping,
}

impl QueryParameterExtractor {
    pub fn new(mapping: ParameterMapping) -> Self {
        Self { mapping }
    }
}

impl ParameterExtractor for QueryParameterExtractor {
    fn mapping(&self) -> &ParameterMapping {
        &self.mapping
    }

    fn lookup(&self, request: &dyn HttpRequest) -> Option<ParamValue> {
        request.query_param(self.mapping.parameter_name())
    }
}

/// `%rest:header-param`; header names match case-insensitively.
#[derive(Debug, Clone)]
pub struct HeaderParameterExtractor {
    mapping: ParameterMapping,
}

impl HeaderParameterExtractor {
    pub fn new(mapping: ParameterMapping) -> Self {
        Self { mapping }
    }
}

impl ParameterExtractor for HeaderParameterExtractor {
    fn mapping(&self) -> &ParameterMapping {
        &self.mapping
    }

    fn lookup(&self, request: &dyn HttpRequest) -> Option<ParamValue> {
        request.header(self.mapping.parameter_name())
    }
}

/// `%rest:cookie-param`
#[derive(Debug, Clone)]
pub struct CookieParameterExtractor {
    mapping: ParameterMapping,
}

impl CookieParameterExtractor {
    pub fn new(mapping: ParameterMapping) -> Self {
        Self { mapping }
    }
}

impl ParameterExtractor for CookieParameterExtractor {
    fn mapping(&self) -> &ParameterMapping {
        &self.mapping
    }

    fn lookup(&self, request: &dyn HttpRequest) -> Option<ParamValue> {
        request.cookie(self.mapping.parameter_name())
    }
}

/// URI template parameter of `%rest:path`. A template match either exists or the
/// route did not match, so there is never a default.
#[derive(Debug, Clone)]
pub struct PathParameterExtractor {
    mapping: ParameterMapping,
}

impl PathParameterExtractor {
    pub fn new(mapping: ParameterMapping) -> Self {
        Self { mapping }
    }
}

impl ParameterExtractor for PathParameterExtractor {
    fn mapping(&self) -> &ParameterMapping {
        &self.mapping
    }

    fn lookup(&self, request: &dyn HttpRequest) -> Option<ParamValue> {
        request.path_param(self.mapping.parameter_name())
    }

    fn can_provide_default(&self) -> bool {
        false
    }
}

/// `%rest:matrix-param`
#[derive(Debug, Clone)]
pub struct MatrixParameterExtractor {
    mapping: ParameterMapping,
}

impl MatrixParameterExtractor {
    pub fn new(mapping: ParameterMapping) -> Self {
        Self { mapping }
    }
}

impl ParameterExtractor for MatrixParameterExtractor {
    fn mapping(&self) -> &ParameterMapping {
        &self.mapping
    }

    fn lookup(&self, request: &dyn HttpRequest) -> Option<ParamValue> {
        request.matrix_param(self.mapping.parameter_name())
    }
}
