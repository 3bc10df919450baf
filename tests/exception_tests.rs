use std::io::{self, Read, Write};
use xqrest::annotation::SerializationAnnotation;
use xqrest::namespace::{REST_ERROR_NS, REST_NS};
use xqrest::runtime_config::SerializationDefaults;
use xqrest::serialization::{
    write_exception_response, ErrorReport, ServiceSerializer, StackFrame,
};
use xqrest::server::{BufferedResponse, HttpResponse};
use xqrest::typed::{BinaryStream, TypedValue};

/// Yields one chunk, then fails like a dropped upstream connection.
struct BrokenUpload {
    sent: bool,
}

impl Read for BrokenUpload {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.sent {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "upstream reset"));
        }
        self.sent = true;
        let chunk = b"PARTIAL";
        buf[..chunk.len()].copy_from_slice(chunk);
        Ok(chunk.len())
    }
}

fn render(report: &ErrorReport) -> BufferedResponse {
    let mut response = BufferedResponse::new();
    write_exception_response(&SerializationDefaults::default(), report, &mut response)
        .expect("exception document written");
    response
}

#[test]
fn test_exception_without_frames() {
    let response = render(&ErrorReport::new("store::Unavailable", "backend offline"));
    let body = response.body_text();

    assert_eq!(response.status(), 500);
    assert_eq!(response.content_type().as_deref(), Some("application/xml; charset=UTF-8"));
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(body.contains(&format!(r#"<rest:response xmlns:rest="{}">"#, REST_NS)));
    assert!(body.contains(&format!(r#"<rqerr:exception xmlns:rqerr="{}">"#, REST_ERROR_NS)));
    assert_eq!(body.matches("<rqerr:message>").count(), 1);
    assert!(body.contains("store::Unavailable: backend offline"));
    assert_eq!(body.matches("<rqerr:stack ").count(), 0);
}

#[test]
fn test_exception_frames_in_order_with_all_attributes() {
    let report = ErrorReport::new("io", "broken <pipe>")
        .with_frame(StackFrame::new("writer.rs", "Writer", "flush", 42))
        .with_frame(StackFrame::new("service.rs", "Service", "call", 7));
    let body = render(&report).body_text();

    assert_eq!(body.matches("<rqerr:stack ").count(), 2);
    let first = body
        .find(r#"<rqerr:stack file="writer.rs" class="Writer" method="flush" line="42">"#)
        .expect("inner frame");
    let second = body
        .find(r#"<rqerr:stack file="service.rs" class="Service" method="call" line="7">"#)
        .expect("outer frame");
    assert!(first < second);
    assert!(body.contains("io: broken &lt;pipe&gt;"));
}

#[test]
fn test_report_from_error() {
    let err = std::fmt::Error;
    let report = ErrorReport::from_error(&err);
    assert!(report.kind.ends_with("Error"));
    assert_eq!(report.to_string(), format!("{}: {}", report.kind, err));
}

#[test]
fn test_exception_replaces_partial_body() {
    let defaults = SerializationDefaults::default();
    let mut response = BufferedResponse::new();
    let upload = BinaryStream::new(BrokenUpload { sent: false });
    let err = ServiceSerializer::streaming(&defaults)
        .serialize(
            vec![TypedValue::base64_binary(upload)],
            &[SerializationAnnotation::method("binary")],
            &mut response,
        )
        .unwrap_err();
    assert!(response.body_text().contains("PARTIAL"));

    let report = ErrorReport::new("xqrest::serialization", err.message());
    write_exception_response(&defaults, &report, &mut response).unwrap();
    let body = response.body_text();
    assert_eq!(response.status(), 500);
    assert!(body.starts_with("<?xml"));
    assert!(!body.contains("PARTIAL"));
}

#[test]
fn test_exception_on_committed_response_is_an_error() {
    let mut response = BufferedResponse::new();
    response.set_status(200, None);
    response.body().write_all(b"done").unwrap();
    response.commit();
    let err = write_exception_response(
        &SerializationDefaults::default(),
        &ErrorReport::new("late", "too late"),
        &mut response,
    )
    .unwrap_err();
    assert!(err.message().contains("committed"));
    assert_eq!(response.status(), 200);
    assert_eq!(response.body_text(), "done");
}
