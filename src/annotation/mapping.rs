use super::errors::{AnnotationError, AnnotationErrorKind};
use crate::typed::ItemType;
use std::fmt;
use tracing::debug;

/// Typed literal as written in an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub item_type: ItemType,
    pub value: String,
}

impl Literal {
    pub fn new(item_type: ItemType, value: impl Into<String>) -> Self {
        Self {
            item_type,
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ItemType::String, value)
    }
}

/// Request facet a parameter annotation reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSource {
    Form,
    Query,
    Header,
    Cookie,
    Path,
    Matrix,
}

impl ParameterSource {
    pub fn annotation_name(&self) -> &'static str {
        match self {
            ParameterSource::Form => "rest:form-param",
            ParameterSource::Query => "rest:query-param",
            ParameterSource::Header => "rest:header-param",
            ParameterSource::Cookie => "rest:cookie-param",
            ParameterSource::Path => "rest:path",
            ParameterSource::Matrix => "rest:matrix-param",
        }
    }

    /// Whether an absent value may fall back to a declared default.
    pub fn can_provide_default(&self) -> bool {
        !matches!(self, ParameterSource::Path)
    }
}

impl fmt::Display for ParameterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.annotation_name())
    }
}

/// Argument declared in a function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionArgument {
    pub name: String,
    pub item_type: ItemType,
}

impl FunctionArgument {
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            item_type,
        }
    }
}

/// Immutable binding between a request parameter and a function argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMapping {
    source: ParameterSource,
    parameter_name: String,
    function_argument_name: String,
    argument_type: ItemType,
    default_value: Option<Literal>,
}

impl ParameterMapping {
    /// Build a mapping that is already known to be valid.
    pub fn new(
        source: ParameterSource,
        parameter_name: impl Into<String>,
        argument: &FunctionArgument,
        default_value: Option<Literal>,
    ) -> Self {
        Self {
            source,
            parameter_name: parameter_name.into(),
            function_argument_name: argument.name.clone(),
            argument_type: argument.item_type,
            default_value,
        }
    }

    /// Validate the literal parameters of an annotation such as
    /// `%rest:form-param("name", "{$name}", "anonymous")` against the
    /// function's declared arguments.
    pub fn from_annotation(
        source: ParameterSource,
        literals: &[Literal],
        arguments: &[FunctionArgument],
    ) -> Result<Self, AnnotationError> {
        let err = |kind, detail: String| AnnotationError::new(source, kind, detail);

        let max = if source.can_provide_default() { 3 } else { 2 };
        if literals.len() < 2 || literals.len() > max {
            return Err(err(
                AnnotationErrorKind::InvalidAnnotationParams,
                format!("{} takes 2 to {} parameters, got {}", source, max, literals.len()),
            ));
        }

        let name = &literals[0];
        if name.item_type != ItemType::String || !is_valid_parameter_name(&name.value) {
            return Err(err(
                AnnotationErrorKind::InvalidParameterName,
                format!("'{}' is not a valid parameter name", name.value),
            ));
        }

        let target = &literals[1];
        let arg_name = parse_argument_reference(&target.value)
            .filter(|_| target.item_type == ItemType::String)
            .ok_or_else(|| {
                err(
                    AnnotationErrorKind::InvalidAnnotationParamSyntax,
                    format!("'{}' must be of the form {{$name}}", target.value),
                )
            })?;
        let argument = arguments
            .iter()
            .find(|a| a.name == arg_name)
            .ok_or_else(|| {
                err(
                    AnnotationErrorKind::InvalidFunctionArgumentName,
                    format!("function has no argument named ${}", arg_name),
                )
            })?;

        let default_value = match literals.get(2) {
            None => None,
            Some(default) => {
                if !default.item_type.is_atomic_literal() {
                    return Err(err(
                        AnnotationErrorKind::InvalidDefaultValueType,
                        format!("default of type {} is not an atomic literal", default.item_type),
                    ));
                }
                if !is_castable(&default.value, argument.item_type) {
                    return Err(err(
                        AnnotationErrorKind::InvalidDefaultValue,
                        format!(
                            "default '{}' cannot be cast to {}",
                            default.value, argument.item_type
                        ),
                    ));
                }
                Some(default.clone())
            }
        };

        debug!(
            source = %source,
            parameter = %name.value,
            argument = %argument.name,
            has_default = default_value.is_some(),
            "Parameter mapping validated"
        );

        Ok(Self::new(source, name.value.clone(), argument, default_value))
    }

    pub fn source(&self) -> ParameterSource {
        self.source
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn function_argument_name(&self) -> &str {
        &self.function_argument_name
    }

    pub fn argument_type(&self) -> ItemType {
        self.argument_type
    }

    pub fn default_value(&self) -> Option<&Literal> {
        self.default_value.as_ref()
    }
}

fn is_valid_parameter_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| !c.is_whitespace() && !c.is_control())
}

/// `{$name}` -> `name`
fn parse_argument_reference(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix("{$")?.strip_suffix('}')?.trim();
    let mut chars = inner.chars();
    let first = chars.next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    chars
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .then_some(inner)
}

fn is_castable(lexical: &str, target: ItemType) -> bool {
    let v = lexical.trim();
    match target {
        ItemType::Integer => {
            let digits = v.strip_prefix(['+', '-']).unwrap_or(v);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        ItemType::Decimal => {
            let digits = v.strip_prefix(['+', '-']).unwrap_or(v);
            !digits.is_empty()
                && digits.chars().any(|c| c.is_ascii_digit())
                && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
                && digits.matches('.').count() <= 1
        }
        ItemType::Double | ItemType::Float => {
            matches!(v, "INF" | "-INF" | "+INF" | "NaN") || v.parse::<f64>().is_ok()
        }
        ItemType::Boolean => matches!(v, "true" | "false" | "1" | "0"),
        ItemType::String
        | ItemType::UntypedAtomic
        | ItemType::AnyUri
        | ItemType::Item => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::errors::AnnotationErrorKind as Kind;

    fn args() -> Vec<FunctionArgument> {
        vec![
            FunctionArgument::new("name", ItemType::String),
            FunctionArgument::new("count", ItemType::Integer),
        ]
    }

    fn kind_of(source: ParameterSource, literals: &[Literal]) -> Kind {
        ParameterMapping::from_annotation(source, literals, &args())
            .unwrap_err()
            .kind
    }

    #[test]
    fn test_valid_mapping_with_default() {
        let m = ParameterMapping::from_annotation(
            ParameterSource::Form,
            &[
                Literal::string("n"),
                Literal::string("{$count}"),
                Literal::new(ItemType::Integer, "10"),
            ],
            &args(),
        )
        .unwrap();
        assert_eq!(m.parameter_name(), "n");
        assert_eq!(m.function_argument_name(), "count");
        assert_eq!(m.argument_type(), ItemType::Integer);
        assert_eq!(m.default_value(), Some(&Literal::new(ItemType::Integer, "10")));
    }

    #[test]
    fn test_invalid_param_count() {
        assert_eq!(
            kind_of(ParameterSource::Form, &[Literal::string("n")]),
            Kind::InvalidAnnotationParams
        );
        // path parameters never take a default
        assert_eq!(
            kind_of(
                ParameterSource::Path,
                &[Literal::string("n"), Literal::string("{$name}"), Literal::string("x")]
            ),
            Kind::InvalidAnnotationParams
        );
    }

    #[test]
    fn test_invalid_names_and_syntax() {
        assert_eq!(
            kind_of(ParameterSource::Query, &[Literal::string("a b"), Literal::string("{$name}")]),
            Kind::InvalidParameterName
        );
        assert_eq!(
            kind_of(ParameterSource::Query, &[Literal::string("a"), Literal::string("$name")]),
            Kind::InvalidAnnotationParamSyntax
        );
        assert_eq!(
            kind_of(ParameterSource::Query, &[Literal::string("a"), Literal::string("{$missing}")]),
            Kind::InvalidFunctionArgumentName
        );
    }

    #[test]
    fn test_invalid_defaults() {
        assert_eq!(
            kind_of(
                ParameterSource::Cookie,
                &[
                    Literal::string("a"),
                    Literal::string("{$count}"),
                    Literal::string("ten")
                ]
            ),
            Kind::InvalidDefaultValue
        );
        assert_eq!(
            kind_of(
                ParameterSource::Cookie,
                &[
                    Literal::string("a"),
                    Literal::string("{$name}"),
                    Literal::new(ItemType::Element, "<x/>")
                ]
            ),
            Kind::InvalidDefaultValueType
        );
    }

    #[test]
    fn test_castability() {
        assert!(is_castable("-12", ItemType::Integer));
        assert!(!is_castable("1.5", ItemType::Integer));
        assert!(is_castable("1.5", ItemType::Decimal));
        assert!(!is_castable("1.5.1", ItemType::Decimal));
        assert!(is_castable("1e3", ItemType::Double));
        assert!(is_castable("INF", ItemType::Float));
        assert!(is_castable("0", ItemType::Boolean));
        assert!(!is_castable("yes", ItemType::Boolean));
        assert!(!is_castable("x", ItemType::Base64Binary));
    }
}
