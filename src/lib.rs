//! # bookshelf-client - typed access to the bookshelf REST API
//!
//! An async client for a backend that manages books, authors and categories.
//! Every collection gets the same five operations (list, get, create, update,
//! delete) through one generic [`ResourceService`]. Authors additionally
//! expose the `/authors/nationalities` listing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookshelf_client::Client;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bookshelf_client::Error> {
//!     let client = Client::builder()
//!         .base_url("http://127.0.0.1:8001/api")?
//!         .build()?;
//!
//!     // GET /api/books/42
//!     let book = client.books().get(42).await?;
//!     println!("Title: {}", book.data["title"]);
//!
//!     // POST /api/categories
//!     let created = client
//!         .categories()
//!         .create(&json!({"title": "Sci-Fi"}))
//!         .await?;
//!     println!("Created category {} ({})", created.data["id"], created.status);
//!
//!     // DELETE /api/authors/3
//!     client.authors().delete(3).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - Records are opaque [`serde_json::Value`]s, forwarded and returned unchanged.
//! - Each operation is exactly one HTTP round trip: no retries, no caching.
//! - Non-2xx responses fail with [`Error::HttpStatus`]; requests that never got
//!   a response fail with [`Error::Transport`].
//! - Requests and responses are logged through `tracing`.

mod client;
pub mod config;
mod error;
pub mod metadata;
mod resource;
mod response;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, DEFAULT_BASE_URL_ENV};
pub use error::{Error, Result};
pub use resource::{Authors, Books, Categories, Record, Resource, ResourceService};
pub use response::Response;
