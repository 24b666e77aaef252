//! Shared HTTP client for the bookshelf backend.
//!
//! The [`Client`] type issues requests. Use [`ClientBuilder`] to configure and
//! create one.

use crate::{
    config::{parse_header, ClientConfig},
    metadata::RequestMetadata,
    Error, Response, Result,
};
use http::{HeaderMap, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// An HTTP client bound to one backend.
///
/// Clones are cheap and share both the connection pool and the immutable
/// [`ClientConfig`]. Each call is a single request/response round trip with no
/// retries, so concurrent calls are independent of one another.
///
/// # Examples
///
/// ```no_run
/// use bookshelf_client::Client;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), bookshelf_client::Error> {
/// let client = Client::builder()
///     .base_url("http://127.0.0.1:8001/api")?
///     .build()?;
///
/// let books = client.books().list().await?;
/// println!("Books: {}", books.data);
///
/// let created = client.categories().create(&json!({"title": "Sci-Fi"})).await?;
/// println!("Created category {}", created.data["id"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Issues one request and decodes the response body.
    ///
    /// An empty 2xx body decodes as JSON `null`, so `Res` may be `()` or an
    /// `Option` for endpoints that answer with no content.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bookshelf_client::{Client, metadata::RequestMetadata};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), bookshelf_client::Error> {
    /// let client = Client::builder()
    ///     .base_url("http://127.0.0.1:8001/api")?
    ///     .build()?;
    ///
    /// let metadata = RequestMetadata::new(Method::GET, "/books").segment("42");
    /// let book = client.call::<(), serde_json::Value>(metadata, None).await?;
    /// println!("{}", book.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let raw = self.send(metadata, body).await?;
        let to_decode = if raw.raw_body.trim().is_empty() {
            "null"
        } else {
            raw.raw_body.as_str()
        };

        match serde_json::from_str::<Res>(to_decode) {
            Ok(data) => Ok(raw.map(|()| data)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw.raw_body,
                    "Failed to deserialize response"
                );

                Err(Error::Deserialization {
                    status: raw.status,
                    body: raw.raw_body,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Issues one request without decoding the response body.
    ///
    /// Non-2xx statuses still fail with [`Error::HttpStatus`]. The body of a
    /// successful response is available as [`Response::raw_body`].
    pub async fn send<Req>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<()>>
    where
        Req: Serialize + ?Sized,
    {
        let start_time = Instant::now();

        let response = match self.execute_request(&metadata, body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %metadata.method,
                    path = %metadata.path(),
                    "Request failed"
                );
                return Err(e);
            }
        };

        self.read_response(response, start_time).await
    }

    async fn execute_request<Req>(
        &self,
        metadata: &RequestMetadata,
        body: Option<&Req>,
    ) -> Result<reqwest::Response>
    where
        Req: Serialize + ?Sized,
    {
        let url = self.inner.config.resolve(&metadata.segments)?;

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            "Executing HTTP request"
        );

        // Per-request headers replace defaults of the same name instead of adding a second value.
        let mut headers = self.inner.config.default_headers().clone();
        for (name, value) in &metadata.headers {
            headers.insert(name, value.clone());
        }

        let mut request = self
            .inner
            .http_client
            .request(metadata.method.clone(), url)
            .headers(headers);

        if let Some(body) = body {
            let json =
                serde_json::to_value(body).map_err(|e| Error::Serialization(e.to_string()))?;
            request = request.json(&json);
        }

        Ok(request.send().await?)
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
        start_time: Instant,
    ) -> Result<Response<()>> {
        let status = response.status();
        let headers = response.headers().clone();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "Received HTTP response"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.is_client_error() {
                tracing::error!(status = status.as_u16(), response = %body, "Client error (4xx)");
            } else if status.is_server_error() {
                tracing::warn!(status = status.as_u16(), response = %body, "Server error (5xx)");
            }

            return Err(Error::HttpStatus {
                status,
                body,
                headers,
            });
        }

        let raw_body = response.text().await?;
        Ok(Response::new((), raw_body, status, headers, start_time.elapsed()))
    }

    /// Makes a GET request to the given path.
    pub async fn get<Res>(&self, path: impl AsRef<str>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.call::<(), Res>(metadata, None).await
    }

    /// Makes a POST request to the given path with a JSON body.
    pub async fn post<Req, Res>(&self, path: impl AsRef<str>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::POST, path);
        self.call(metadata, Some(body)).await
    }

    /// Makes a PUT request to the given path with a JSON body.
    pub async fn put<Req, Res>(&self, path: impl AsRef<str>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::PUT, path);
        self.call(metadata, Some(body)).await
    }

    /// Makes a DELETE request to the given path. No body is sent.
    pub async fn delete<Res>(&self, path: impl AsRef<str>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::DELETE, path);
        self.call::<(), Res>(metadata, None).await
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use bookshelf_client::{ClientBuilder, DEFAULT_BASE_URL_ENV};
///
/// # fn example() -> Result<(), bookshelf_client::Error> {
/// let client = ClientBuilder::new()
///     .base_url_from_env(DEFAULT_BASE_URL_ENV)?
///     .default_header("Accept-Language", "es")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    extra_headers: HeaderMap,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with no base URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for all requests.
    ///
    /// Any path on the URL (such as `/api`) is kept as a prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.config = Some(ClientConfig::new(url)?);
        Ok(self)
    }

    /// Reads the base URL from the environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or holds an invalid URL.
    pub fn base_url_from_env(mut self, var: &str) -> Result<Self> {
        self.config = Some(ClientConfig::from_env(var)?);
        Ok(self)
    }

    /// Uses a prebuilt configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        // Applied in `build`, so the order relative to `base_url` doesn't matter.
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.extra_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the configured `Client`.
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided.
    pub fn build(self) -> Result<Client> {
        let mut config = self
            .config
            .ok_or_else(|| Error::Configuration("Base URL is required".to_string()))?;

        config.extend_headers(self.extra_headers);

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                config,
            }),
        })
    }
}
