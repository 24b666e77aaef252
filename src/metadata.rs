//! Per-request description handed from the resource layer to the client.

use crate::config::parse_header;
use http::{HeaderMap, Method};
use std::fmt;

/// Method, path and extra headers for a single HTTP request.
///
/// The path is kept as a list of segments rather than a string so that
/// identifiers are percent-encoded as exactly one segment when the client
/// joins them onto the base URL.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// Path segments relative to the base URL, unencoded.
    pub segments: Vec<String>,

    /// Headers for this request only, applied after the client defaults.
    pub headers: HeaderMap,
}

impl RequestMetadata {
    /// Creates metadata from a `/`-separated path such as `"/books/42"`.
    ///
    /// Empty segments are dropped, so leading and trailing slashes are
    /// ignored. Use [`RequestMetadata::segment`] for values that may contain
    /// a `/` of their own.
    pub fn new(method: Method, path: impl AsRef<str>) -> Self {
        let segments = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        Self {
            method,
            segments,
            headers: HeaderMap::new(),
        }
    }

    /// Appends one path segment verbatim.
    pub fn segment(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// The unencoded path, for logging.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}
