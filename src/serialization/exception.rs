use super::error::ServiceSerializationError;
use crate::namespace::{rest, rest_error};
use crate::runtime_config::SerializationDefaults;
use crate::server::HttpResponse;
use crate::typed::{attribute, QName};
use crate::writer::{QuickXmlWriter, XmlWriter};
use std::error::Error;
use std::fmt;
use std::io;
use tracing::error;

/// One frame of an [`ErrorReport`], innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Source file of the frame
    pub file: String,
    /// Enclosing type or module path
    pub class: String,
    /// Function name
    pub method: String,
    /// 1-based line number, 0 when unknown
    pub line: u32,
}

impl StackFrame {
    pub fn new(
        file: impl Into<String>,
        class: impl Into<String>,
        method: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            file: file.into(),
            class: class.into(),
            method: method.into(),
            line,
        }
    }
}

/// An unexpected failure ready to be rendered as a response document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Error type name, rendered before the message
    pub kind: String,
    pub message: String,
    /// Innermost frame first
    pub frames: Vec<StackFrame>,
}

impl ErrorReport {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            frames: Vec::new(),
        }
    }

    /// Kind is the error's type path; no frames are captured.
    pub fn from_error<E: Error + 'static>(err: &E) -> Self {
        Self::new(std::any::type_name::<E>(), err.to_string())
    }

    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Emit `rest:response/rqerr:exception/rqerr:message` for `report`, with one
/// `rqerr:stack` element per frame following the message text.
pub fn serialize_exception(
    defaults: &SerializationDefaults,
    report: &ErrorReport,
    writer: &mut dyn XmlWriter,
) -> Result<(), ServiceSerializationError> {
    writer.set_properties(&defaults.properties());
    write_report(report, writer).map_err(|e| {
        ServiceSerializationError::with_source(
            format!(
                "Error while serializing XML for exception '{}:{}'",
                report.kind, report.message
            ),
            e,
        )
    })
}

fn write_report(report: &ErrorReport, writer: &mut dyn XmlWriter) -> io::Result<()> {
    writer.start_document()?;
    writer.start_element(&rest("response"), &[])?;
    writer.start_element(&rest_error("exception"), &[])?;
    writer.start_element(&rest_error("message"), &[])?;
    writer.characters(&report.to_string())?;

    let stack = rest_error("stack");
    for frame in &report.frames {
        let attributes = [
            attribute(QName::local("file"), frame.file.as_str()),
            attribute(QName::local("class"), frame.class.as_str()),
            attribute(QName::local("method"), frame.method.as_str()),
            attribute(QName::local("line"), frame.line.to_string()),
        ];
        writer.start_element(&stack, &attributes)?;
        writer.end_element()?;
    }

    writer.end_element()?;
    writer.end_element()?;
    writer.end_element()?;
    writer.end_document()
}

/// Replace the response with a 500 whose body is the exception document.
///
/// Any partially written body is discarded first. A committed response can no
/// longer be replaced and yields an error instead.
pub fn write_exception_response(
    defaults: &SerializationDefaults,
    report: &ErrorReport,
    response: &mut dyn HttpResponse,
) -> Result<(), ServiceSerializationError> {
    error!(kind = %report.kind, message = %report.message, "Service failed, writing exception response");
    if response.is_committed() {
        return Err(ServiceSerializationError::new(format!(
            "Response already committed; cannot write exception '{}'",
            report
        )));
    }
    response.reset_body();
    response.set_status(500, None);
    response.set_content_type(&defaults.default_content_type());
    let mut writer = QuickXmlWriter::new(response.body(), &defaults.properties());
    serialize_exception(defaults, report, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::SerializationProperties;
    use crate::typed::Attribute;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        fail_on_characters: bool,
    }

    impl XmlWriter for Recorder {
        fn set_properties(&mut self, _properties: &SerializationProperties) {}
        fn start_document(&mut self) -> io::Result<()> {
            self.events.push("start-doc".into());
            Ok(())
        }
        fn start_element(&mut self, name: &QName, attributes: &[Attribute]) -> io::Result<()> {
            let attrs: Vec<String> = attributes
                .iter()
                .map(|a| format!("{}={}", a.name.local_name, a.value))
                .collect();
            self.events.push(format!("<{} {}", name.lexical(), attrs.join(" ")));
            Ok(())
        }
        fn characters(&mut self, text: &str) -> io::Result<()> {
            if self.fail_on_characters {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.events.push(format!("text {}", text));
            Ok(())
        }
        fn comment(&mut self, _text: &str) -> io::Result<()> {
            Ok(())
        }
        fn end_element(&mut self) -> io::Result<()> {
            self.events.push(">".into());
            Ok(())
        }
        fn end_document(&mut self) -> io::Result<()> {
            self.events.push("end-doc".into());
            Ok(())
        }
    }

    fn stacks(events: &[String]) -> Vec<&String> {
        events.iter().filter(|e| e.starts_with("<rqerr:stack")).collect()
    }

    #[test]
    fn test_no_frames() {
        let mut rec = Recorder::default();
        let report = ErrorReport::new("app::StoreError", "disk full");
        serialize_exception(&SerializationDefaults::default(), &report, &mut rec).unwrap();
        assert_eq!(
            rec.events.iter().filter(|e| e.starts_with("<rqerr:message")).count(),
            1
        );
        assert!(rec.events.contains(&"text app::StoreError: disk full".to_string()));
        assert!(stacks(&rec.events).is_empty());
        assert_eq!(rec.events.last().map(String::as_str), Some("end-doc"));
    }

    #[test]
    fn test_frames_in_order() {
        let mut rec = Recorder::default();
        let report = ErrorReport::new("k", "m")
            .with_frame(StackFrame::new("a.rs", "A", "inner", 10))
            .with_frame(StackFrame::new("b.rs", "B", "outer", 207));
        serialize_exception(&SerializationDefaults::default(), &report, &mut rec).unwrap();
        assert_eq!(
            stacks(&rec.events),
            vec![
                "<rqerr:stack file=a.rs class=A method=inner line=10",
                "<rqerr:stack file=b.rs class=B method=outer line=207",
            ]
        );
    }

    #[test]
    fn test_write_failure_is_wrapped() {
        let mut rec = Recorder {
            fail_on_characters: true,
            ..Default::default()
        };
        let err = serialize_exception(
            &SerializationDefaults::default(),
            &ErrorReport::new("k", "boom"),
            &mut rec,
        )
        .unwrap_err();
        assert!(err.message().starts_with("Error while serializing XML for exception 'k:boom'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_error_uses_type_path() {
        let io_err = io::Error::new(io::ErrorKind::Other, "nope");
        let report = ErrorReport::from_error(&io_err);
        assert!(report.kind.starts_with("std::io::"));
        assert_eq!(report.message, "nope");
        assert!(report.frames.is_empty());
    }
}
