//! Immutable client configuration.

use crate::{Error, Result};
use http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// Environment variable conventionally holding the backend base URL.
pub const DEFAULT_BASE_URL_ENV: &str = "BOOKSHELF_API_URL";

/// Base URL plus the headers sent with every request.
///
/// Built once and then shared read-only by every clone of a
/// [`Client`](crate::Client). The default header map always starts with
/// `Content-Type: application/json`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    default_headers: HeaderMap,
}

impl ClientConfig {
    /// Parses `base_url` and installs the JSON content type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL does not parse and
    /// [`Error::Configuration`] if it cannot have path segments appended
    /// (e.g. `mailto:` URLs).
    ///
    /// ```
    /// use bookshelf_client::ClientConfig;
    ///
    /// let config = ClientConfig::new("http://127.0.0.1:8001/api").unwrap();
    /// assert_eq!(config.base_url().path(), "/api");
    /// assert_eq!(config.default_headers()["content-type"], "application/json");
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "Base URL cannot have paths appended: {}",
                base_url
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            base_url,
            default_headers,
        })
    }

    /// Reads the base URL from the environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the variable is unset or not
    /// unicode, and the errors of [`ClientConfig::new`] otherwise.
    pub fn from_env(var: &str) -> Result<Self> {
        let value = std::env::var(var).map_err(|e| {
            Error::Configuration(format!("Cannot read base URL from ${}: {}", var, e))
        })?;
        Self::new(value)
    }

    /// Adds or replaces a default header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    pub(crate) fn extend_headers(&mut self, headers: HeaderMap) {
        for (name, value) in headers {
            if let Some(name) = name {
                self.default_headers.insert(name, value);
            }
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Resolves path segments against the base URL, keeping the base path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty, `.` or `..` segment.
    /// URL normalization would drop or collapse those (even percent-encoded),
    /// turning `/books/..` into `/books`.
    pub(crate) fn resolve<I, S>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                let segment = segment.as_ref();
                if matches!(segment, "" | "." | "..") {
                    return Err(Error::Configuration(format!(
                        "Path segment {:?} cannot be sent as a single segment",
                        segment
                    )));
                }
                path.push(segment);
            }
        }
        Ok(url)
    }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name)
        .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
    Ok((name, value))
}
