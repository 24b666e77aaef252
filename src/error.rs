//! Error types for bookshelf API calls.
//!
//! Every failure is returned to the caller as-is. The client never retries and
//! never recovers locally, so the variants here map one-to-one onto what went
//! wrong during a single round trip.

use http::{HeaderMap, StatusCode};

/// The error type for every bookshelf API call.
///
/// # Examples
///
/// ```no_run
/// use bookshelf_client::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("http://127.0.0.1:8001/api")?
///     .build()?;
///
/// match client.books().get("42").await {
///     Ok(book) => println!("Book: {}", book.data),
///     Err(e) if e.is_not_found() => eprintln!("no such book"),
///     Err(Error::HttpStatus { status, body, .. }) => {
///         eprintln!("HTTP error {}: {}", status, body);
///     }
///     Err(Error::Transport(e)) => eprintln!("backend unreachable: {}", e),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No response was received (connection refused, DNS failure, etc.).
    ///
    /// Wraps the underlying `reqwest::Error`. This is distinct from
    /// [`Error::HttpStatus`], which means the backend did answer.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status code.
    ///
    /// # Fields
    ///
    /// * `status` - The HTTP status code
    /// * `body` - The raw response body
    /// * `headers` - The response headers
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// A 2xx response body did not decode into the requested type.
    #[error("Failed to deserialize response (status {status}): {message}")]
    Deserialization {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body that failed to deserialize
        body: String,
        /// The serde error message
        message: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// Invalid client configuration, such as a missing base URL or a bad header.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if a response was received.
    ///
    /// ```
    /// use bookshelf_client::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::HttpStatus {
    ///     status: StatusCode::NOT_FOUND,
    ///     body: "missing".to_string(),
    ///     headers: http::HeaderMap::new(),
    /// };
    /// assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    /// assert!(Error::Configuration("x".into()).status().is_none());
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Deserialization { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::HttpStatus { body, .. } => Some(body),
            Error::Deserialization { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns `true` if no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Returns `true` for a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::HttpStatus { status, .. } if *status == StatusCode::NOT_FOUND
        )
    }
}

/// A specialized `Result` type for bookshelf API calls.
pub type Result<T> = std::result::Result<T, Error>;
