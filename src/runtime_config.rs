//! # Runtime Configuration Module
//!
//! Process-wide serialization defaults.
//!
//! ## Overview
//!
//! Every invocation starts from the same immutable defaults: the media type, encoding and
//! indentation used when a function declares nothing else. They are built once at startup
//! and passed by reference into every property derivation; nothing ever mutates them.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XQREST_DEFAULT_MEDIA_TYPE` | `application/xml` | Media type of node bodies |
//! | `XQREST_DEFAULT_ENCODING` | `UTF-8` | Character encoding; only UTF-8 is written |
//! | `XQREST_DEFAULT_INDENT` | `yes` | Indent markup output (`yes`/`no`/`true`/`false`) |
//!
//! ## Usage
//!
//! ```rust
//! use xqrest::runtime_config::SerializationDefaults;
//!
//! let defaults = SerializationDefaults::default();
//! assert_eq!(defaults.default_content_type(), "application/xml; charset=UTF-8");
//! ```
//!
//! The same settings can come from a YAML file:
//!
//! ```yaml
//! media_type: application/xml
//! encoding: UTF-8
//! indent: false
//! ```

use crate::serialization::{SerializationProperties, SerializationProperty};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_MEDIA_TYPE: &str = "application/xml";
pub const DEFAULT_ENCODING: &str = "UTF-8";

static GLOBAL_DEFAULTS: Lazy<SerializationDefaults> = Lazy::new(SerializationDefaults::from_env);

/// Immutable serialization defaults shared by every request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SerializationDefaults {
    pub media_type: String,
    pub encoding: String,
    pub indent: bool,
}

impl Default for SerializationDefaults {
    fn default() -> Self {
        Self {
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            indent: true,
        }
    }
}

/// Encoding the output is actually written in.
///
/// Bodies are always UTF-8 bytes, so any other requested encoding is reported as
/// UTF-8 in declarations and `charset` parameters.
pub fn output_encoding(requested: &str) -> &'static str {
    if !is_utf8(requested) {
        debug!(requested = %requested, "Unsupported encoding requested, writing UTF-8");
    }
    DEFAULT_ENCODING
}

/// True for the spellings of UTF-8 this crate accepts.
pub fn is_utf8(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case("utf-8") || name.eq_ignore_ascii_case("utf8")
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

impl SerializationDefaults {
    /// Load defaults from environment variables.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self::checked(Self {
            media_type: env::var("XQREST_DEFAULT_MEDIA_TYPE").unwrap_or(base.media_type),
            encoding: env::var("XQREST_DEFAULT_ENCODING").unwrap_or(base.encoding),
            indent: env::var("XQREST_DEFAULT_INDENT")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(base.indent),
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map(Self::checked)
            .context("Failed to parse serialization defaults")
    }

    /// Replace an unsupported encoding with UTF-8.
    fn checked(mut self) -> Self {
        if !is_utf8(&self.encoding) {
            warn!(
                requested = %self.encoding,
                "Unsupported default encoding, output is written as UTF-8"
            );
            self.encoding = DEFAULT_ENCODING.to_string();
        }
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&text)
    }

    /// Instance built from the environment on first use.
    pub fn global() -> &'static SerializationDefaults {
        &GLOBAL_DEFAULTS
    }

    /// `media-type; charset=encoding`
    pub fn default_content_type(&self) -> String {
        format!("{}; charset={}", self.media_type, output_encoding(&self.encoding))
    }

    /// Fresh property table seeded with these defaults.
    pub fn properties(&self) -> SerializationProperties {
        let mut props = SerializationProperties::new();
        props.set(
            SerializationProperty::Indent,
            if self.indent { "yes" } else { "no" },
        );
        props.set(SerializationProperty::Encoding, output_encoding(&self.encoding));
        props.set(SerializationProperty::MediaType, self.media_type.as_str());
        props
    }
}
