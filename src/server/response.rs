use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use std::io::Write;
use tracing::warn;

/// Response operations used while serializing a function's result.
pub trait HttpResponse {
    /// True once body bytes have been flushed to the client.
    fn is_committed(&self) -> bool;
    fn set_status(&mut self, status: u16, reason: Option<&str>);
    fn set_header(&mut self, name: &str, value: &str);
    fn set_content_type(&mut self, content_type: &str);
    fn content_type(&self) -> Option<String>;
    fn body(&mut self) -> &mut dyn Write;
    /// Discard body bytes written so far. Only meaningful while uncommitted.
    fn reset_body(&mut self);
}

fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// In-memory response that is turned into an `http::Response` once complete.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: u16,
    reason: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    committed: bool,
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            reason: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            committed: false,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Explicit reason phrase, or the canonical one for the status.
    pub fn reason(&self) -> &str {
        self.reason
            .as_deref()
            .unwrap_or_else(|| status_reason(self.status))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Mark the body as flushed; later serialization becomes a no-op.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    pub fn into_http(self) -> Result<http::Response<Vec<u8>>, http::Error> {
        let mut builder = http::Response::builder().status(self.status);
        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers;
        }
        builder.body(self.body)
    }
}

impl HttpResponse for BufferedResponse {
    fn is_committed(&self) -> bool {
        self.committed
    }

    fn set_status(&mut self, status: u16, reason: Option<&str>) {
        self.status = status;
        self.reason = reason.map(str::to_string);
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                self.headers.insert(n, v);
            }
            _ => warn!(header = %name, "Ignoring invalid response header"),
        }
    }

    fn set_content_type(&mut self, content_type: &str) {
        match HeaderValue::from_str(content_type) {
            Ok(v) => {
                self.headers.insert(CONTENT_TYPE, v);
            }
            Err(_) => warn!(content_type = %content_type, "Ignoring invalid content type"),
        }
    }

    fn content_type(&self) -> Option<String> {
        self.header(CONTENT_TYPE.as_str()).map(str::to_string)
    }

    fn body(&mut self) -> &mut dyn Write {
        &mut self.body
    }

    fn reset_body(&mut self) {
        self.body.clear();
    }
}
