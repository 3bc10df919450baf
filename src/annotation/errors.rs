use super::mapping::ParameterSource;
use std::fmt;

/// Stable, externally visible error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    pub code: &'static str,
    pub description: &'static str,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

/// The six binding-setup failures every parameter annotation can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationErrorKind {
    InvalidAnnotationParams,
    InvalidParameterName,
    InvalidFunctionArgumentName,
    InvalidDefaultValue,
    InvalidDefaultValueType,
    InvalidAnnotationParamSyntax,
}

impl AnnotationErrorKind {
    fn index(&self) -> usize {
        match self {
            AnnotationErrorKind::InvalidAnnotationParams => 0,
            AnnotationErrorKind::InvalidParameterName => 1,
            AnnotationErrorKind::InvalidFunctionArgumentName => 2,
            AnnotationErrorKind::InvalidDefaultValue => 3,
            AnnotationErrorKind::InvalidDefaultValueType => 4,
            AnnotationErrorKind::InvalidAnnotationParamSyntax => 5,
        }
    }
}

const fn code(code: &'static str, description: &'static str) -> ErrorCode {
    ErrorCode { code, description }
}

// Ordered as AnnotationErrorKind::index.
const QUERY_CODES: [ErrorCode; 6] = [
    code("RQST0008", "Query parameter annotation must have two or three parameters"),
    code("RQST0009", "Query parameter name is invalid"),
    code("RQST0010", "Query parameter function argument name is invalid"),
    code("RQST0011", "Query parameter default value is not castable to the argument type"),
    code("RQST0012", "Query parameter default value must be an atomic literal"),
    code("RQST0013", "Query parameter function argument must be of the form {$name}"),
];

const FORM_CODES: [ErrorCode; 6] = [
    code("RQST0014", "Form parameter annotation must have two or three parameters"),
    code("RQST0015", "Form parameter name is invalid"),
    code("RQST0016", "Form parameter function argument name is invalid"),
    code("RQST0017", "Form parameter default value is not castable to the argument type"),
    code("RQST0018", "Form parameter default value must be an atomic literal"),
    code("RQST0019", "Form parameter function argument must be of the form {$name}"),
];

const HEADER_CODES: [ErrorCode; 6] = [
    code("RQST0020", "Header parameter annotation must have two or three parameters"),
    code("RQST0021", "Header parameter name is invalid"),
    code("RQST0022", "Header parameter function argument name is invalid"),
    code("RQST0023", "Header parameter default value is not castable to the argument type"),
    code("RQST0024", "Header parameter default value must be an atomic literal"),
    code("RQST0025", "Header parameter function argument must be of the form {$name}"),
];

const COOKIE_CODES: [ErrorCode; 6] = [
    code("RQST0026", "Cookie parameter annotation must have two or three parameters"),
    code("RQST0027", "Cookie parameter name is invalid"),
    code("RQST0028", "Cookie parameter function argument name is invalid"),
    code("RQST0029", "Cookie parameter default value is not castable to the argument type"),
    code("RQST0030", "Cookie parameter default value must be an atomic literal"),
    code("RQST0031", "Cookie parameter function argument must be of the form {$name}"),
];

const MATRIX_CODES: [ErrorCode; 6] = [
    code("RQST0032", "Matrix parameter annotation must have two or three parameters"),
    code("RQST0033", "Matrix parameter name is invalid"),
    code("RQST0034", "Matrix parameter function argument name is invalid"),
    code("RQST0035", "Matrix parameter default value is not castable to the argument type"),
    code("RQST0036", "Matrix parameter default value must be an atomic literal"),
    code("RQST0037", "Matrix parameter function argument must be of the form {$name}"),
];

const PATH_CODES: [ErrorCode; 6] = [
    code("RQST0038", "Path parameter annotation must have exactly two parameters"),
    code("RQST0039", "Path parameter name is invalid"),
    code("RQST0040", "Path parameter function argument name is invalid"),
    code("RQST0041", "Path parameter default value is not castable to the argument type"),
    code("RQST0042", "Path parameter default value must be an atomic literal"),
    code("RQST0043", "Path parameter function argument must be of the form {$name}"),
];

/// Code table lookup for a source/kind pair.
pub fn error_code(source: ParameterSource, kind: AnnotationErrorKind) -> ErrorCode {
    let table = match source {
        ParameterSource::Query => &QUERY_CODES,
        ParameterSource::Form => &FORM_CODES,
        ParameterSource::Header => &HEADER_CODES,
        ParameterSource::Cookie => &COOKIE_CODES,
        ParameterSource::Matrix => &MATRIX_CODES,
        ParameterSource::Path => &PATH_CODES,
    };
    table[kind.index()]
}

/// Binding-setup failure raised while validating a parameter annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationError {
    pub kind: AnnotationErrorKind,
    pub code: ErrorCode,
    pub detail: String,
}

impl AnnotationError {
    pub fn new(source: ParameterSource, kind: AnnotationErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            code: error_code(source, kind),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.detail)
    }
}

impl std::error::Error for AnnotationError {}
