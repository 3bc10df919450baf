use crate::typed::BinaryStream;
use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{debug, info};

/// Name/value pairs kept in arrival order; repeated names are preserved.
pub type ParamVec = SmallVec<[(String, String); 8]>;

/// Shape of a raw value found in one request facet.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// A single textual value, already percent-decoded.
    Text(String),
    /// A binary form part, shared with the request rather than copied.
    Binary(BinaryStream),
    /// The same name appeared more than once.
    Multiple(Vec<ParamValue>),
    /// A decoded JSON body member that is not a string.
    Structured(serde_json::Value),
}

/// Request facets consumed by the parameter extractors.
///
/// Every lookup returns `None` when the name is absent.
pub trait HttpRequest {
    fn form_param(&self, name: &str) -> Option<ParamValue>;
    fn query_param(&self, name: &str) -> Option<ParamValue>;
    fn header(&self, name: &str) -> Option<ParamValue>;
    fn cookie(&self, name: &str) -> Option<ParamValue>;
    fn path_param(&self, name: &str) -> Option<ParamValue>;
    fn matrix_param(&self, name: &str) -> Option<ParamValue>;
}

/// Parsed HTTP request data.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys, repeated headers preserved)
    pub headers: ParamVec,
    /// Parsed cookies from Cookie headers
    pub cookies: ParamVec,
    /// Parsed query string parameters
    pub query_params: ParamVec,
    /// `;name=value` parameters found in path segments
    pub matrix_params: ParamVec,
    /// Fields of an `application/x-www-form-urlencoded` body
    pub form_fields: ParamVec,
    /// Parsed JSON body (if content-type is application/json)
    pub body: Option<serde_json::Value>,
    /// Binary form parts, attached by the container
    pub files: HashMap<String, BinaryStream>,
    /// URI template matches, attached by the router
    pub path_params: HashMap<String, String>,
}

impl ParsedRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: ParamVec::new(),
            cookies: ParamVec::new(),
            query_params: ParamVec::new(),
            matrix_params: ParamVec::new(),
            form_fields: ParamVec::new(),
            body: None,
            files: HashMap::new(),
            path_params: HashMap::new(),
        }
    }

    pub fn with_file(mut self, name: impl Into<String>, stream: BinaryStream) -> Self {
        self.files.insert(name.into(), stream);
        self
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    pub fn with_form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_fields.push((name.into(), value.into()));
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }
}

fn texts<'a>(pairs: &'a ParamVec, name: &'a str) -> impl Iterator<Item = ParamValue> + 'a {
    pairs
        .iter()
        .filter(move |(k, _)| k == name)
        .map(|(_, v)| ParamValue::Text(v.clone()))
}

/// Collapse gathered values: none is absent, one is itself, more is `Multiple`.
fn collapse(mut values: Vec<ParamValue>) -> Option<ParamValue> {
    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(ParamValue::Multiple(values)),
    }
}

/// Collapse all values recorded for `name` into one [`ParamValue`].
fn lookup(pairs: &ParamVec, name: &str) -> Option<ParamValue> {
    collapse(texts(pairs, name).collect())
}

/// JSON member `name` of an object body. An array of strings counts as one value
/// per element.
fn json_member(body: &serde_json::Value, name: &str) -> Option<ParamValue> {
    use serde_json::Value;
    match body.as_object()?.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(ParamValue::Text(s.clone())),
        Value::Array(items) if items.iter().all(|i| i.is_string()) => collapse(
            items
                .iter()
                .filter_map(|i| i.as_str())
                .map(|s| ParamValue::Text(s.to_string()))
                .collect(),
        ),
        other => Some(ParamValue::Structured(other.clone())),
    }
}

impl HttpRequest for ParsedRequest {
    /// Binary parts, body fields and the query string together: the container does
    /// not distinguish URI parameters from body parameters, so a name present in
    /// more than one of them is multi-valued.
    fn form_param(&self, name: &str) -> Option<ParamValue> {
        let mut values: Vec<ParamValue> = Vec::new();
        if let Some(stream) = self.files.get(name) {
            values.push(ParamValue::Binary(stream.clone()));
        }
        values.extend(texts(&self.form_fields, name));
        match self.body.as_ref().and_then(|b| json_member(b, name)) {
            Some(ParamValue::Multiple(items)) => values.extend(items),
            Some(value) => values.push(value),
            None => {}
        }
        values.extend(texts(&self.query_params, name));
        collapse(values)
    }

    fn query_param(&self, name: &str) -> Option<ParamValue> {
        lookup(&self.query_params, name)
    }

    fn header(&self, name: &str) -> Option<ParamValue> {
        lookup(&self.headers, &name.to_ascii_lowercase())
    }

    fn cookie(&self, name: &str) -> Option<ParamValue> {
        lookup(&self.cookies, name)
    }

    fn path_param(&self, name: &str) -> Option<ParamValue> {
        self.path_params
            .get(name)
            .map(|v| ParamValue::Text(v.clone()))
    }

    fn matrix_param(&self, name: &str) -> Option<ParamValue> {
        lookup(&self.matrix_params, name)
    }
}

/// Parse `name=value` pairs out of every `Cookie` header.
pub fn parse_cookies(headers: &ParamVec) -> ParamVec {
    headers
        .iter()
        .filter(|(k, _)| k == "cookie")
        .flat_map(|(_, c)| c.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim().to_string();
            Some((name, value))
        })
        .collect()
}

/// URL-decoded pairs of a query string or urlencoded body.
pub fn parse_query_params(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Matrix parameters from every path segment, e.g. `/cars;color=red/2024;seats=4`.
pub fn parse_matrix_params(path: &str) -> ParamVec {
    let decode = |s: &str| {
        urlencoding::decode(s)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| s.to_string())
    };
    path.split('/')
        .flat_map(|segment| segment.split(';').skip(1))
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut parts = p.splitn(2, '=');
            let name = decode(parts.next().unwrap_or(""));
            let value = decode(parts.next().unwrap_or(""));
            (name, value)
        })
        .collect()
}

/// Parse an incoming HTTP request into a [`ParsedRequest`].
pub fn parse_request(req: http::Request<Vec<u8>>) -> ParsedRequest {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();

    let headers: ParamVec = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                String::from_utf8_lossy(value.as_bytes()).to_string(),
            )
        })
        .collect();
    debug!(header_count = headers.len(), "Headers extracted");

    let cookies = parse_cookies(&headers);
    let query_params = parts.uri.query().map(parse_query_params).unwrap_or_default();
    let matrix_params = parse_matrix_params(&path);
    debug!(
        cookie_count = cookies.len(),
        query_count = query_params.len(),
        matrix_count = matrix_params.len(),
        "Request parameters parsed"
    );

    let content_type = headers
        .iter()
        .find(|(k, _)| k == "content-type")
        .map(|(_, v)| v.to_ascii_lowercase())
        .unwrap_or_default();

    let mut form_fields = ParamVec::new();
    let mut json_body = None;
    if !body.is_empty() {
        if content_type.starts_with("application/x-www-form-urlencoded") {
            form_fields = url::form_urlencoded::parse(&body)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
        } else if content_type.contains("json") {
            json_body = serde_json::from_slice(&body).ok();
            if json_body.is_none() {
                debug!(body_size_bytes = body.len(), "JSON body parse failed");
            }
        }
    }

    info!(
        method = %parts.method,
        path = %path,
        form_fields = form_fields.len(),
        json_body = json_body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method: parts.method,
        path,
        headers,
        cookies,
        query_params,
        matrix_params,
        form_fields,
        body: json_body,
        files: HashMap::new(),
        path_params: HashMap::new(),
    }
}
