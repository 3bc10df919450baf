use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure while turning a result into a response body.
#[derive(Debug)]
pub struct ServiceSerializationError {
    message: String,
    source: Option<BoxError>,
}

impl ServiceSerializationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Composite message: `<context>: <cause>`.
    pub fn with_source<E>(context: impl fmt::Display, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: format!("{}: {}", context, source),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ServiceSerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceSerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for ServiceSerializationError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source("I/O error while serializing response", err)
    }
}
