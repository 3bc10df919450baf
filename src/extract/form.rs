use super::ParameterExtractor;
use crate::annotation::ParameterMapping;
use crate::server::{HttpRequest, ParamValue};

/// `%rest:form-param`: urlencoded body fields, binary parts, and (as servlet
/// containers merge them) query parameters.
#[derive(Debug, Clone)]
pub struct FormParameterExtractor {
    mapping: ParameterMapping,
}

impl FormParameterExtractor {
    pub fn new(mapping: ParameterMapping) -> Self {
        Self { mapping }
    }
}

impl ParameterExtractor for FormParameterExtractor {
    fn mapping(&self) -> &ParameterMapping {
        &self.mapping
    }

    fn lookup(&self, request: &dyn HttpRequest) -> Option<ParamValue> {
        request.form_param(self.mapping.parameter_name())
    }

    fn can_provide_default(&self) -> bool {
        true
    }
}
