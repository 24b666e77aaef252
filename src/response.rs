//! Successful response wrapper.
//!
//! [`Response`] carries the decoded payload alongside the raw body, status,
//! headers and latency of the round trip that produced it.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful (2xx) response from the backend.
///
/// Dereferences to the decoded payload, so `response.data` and `*response`
/// are interchangeable.
///
/// # Examples
///
/// ```no_run
/// use bookshelf_client::Client;
///
/// # async fn example() -> Result<(), bookshelf_client::Error> {
/// let client = Client::builder()
///     .base_url("http://127.0.0.1:8001/api")?
///     .build()?;
///
/// let response = client.books().get(42).await?;
///
/// println!("Book: {}", response.data["title"]);
/// println!("Status: {} in {:?}", response.status, response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response payload.
    pub data: T,

    /// The response body exactly as received.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the payload, keeping the transport details.
    ///
    /// ```
    /// # use bookshelf_client::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     serde_json::json!({"id": "42", "title": "Dune"}),
    ///     r#"{"id":"42","title":"Dune"}"#.to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(5),
    /// );
    ///
    /// let title = response.map(|book| book["title"].as_str().unwrap_or_default().to_owned());
    /// assert_eq!(title.data, "Dune");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Consumes the response, returning only the payload.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns a header value by name, if present and valid UTF-8.
    ///
    /// ```
    /// # use bookshelf_client::Response;
    /// # use http::{HeaderMap, HeaderValue, StatusCode};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new((), String::new(), StatusCode::NO_CONTENT, headers, Duration::ZERO);
    /// assert_eq!(response.header("content-type"), Some("application/json"));
    /// assert_eq!(response.header("x-missing"), None);
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
