//! Generic CRUD operations over the backend's resource collections.
//!
//! A [`Resource`] names one collection path. [`ResourceService`] provides the
//! same five operations for every collection, so books, authors and categories
//! share one implementation and differ only in their path segment.

use crate::{metadata::RequestMetadata, Client, Response, Result};
use http::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// An opaque JSON record. Its shape is defined entirely by the backend.
pub type Record = serde_json::Value;

/// A REST collection reachable at `/{COLLECTION}` with members at
/// `/{COLLECTION}/{id}`.
///
/// Implement this for your own marker type to get typed records, or to reach
/// another collection on the same backend:
///
/// ```
/// use bookshelf_client::Resource;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Publisher {
///     id: u64,
///     name: String,
/// }
///
/// struct Publishers;
///
/// impl Resource for Publishers {
///     const COLLECTION: &'static str = "publishers";
///     type Record = Publisher;
///     type Collection = Vec<Publisher>;
/// }
/// ```
pub trait Resource {
    /// The collection's path segment, without slashes.
    const COLLECTION: &'static str;

    /// Payload of a single member, as sent and received.
    type Record: Serialize + DeserializeOwned;

    /// Payload returned when listing the collection.
    type Collection: DeserializeOwned;
}

/// The `/books` collection.
#[derive(Debug, Clone, Copy)]
pub struct Books;

/// The `/authors` collection.
#[derive(Debug, Clone, Copy)]
pub struct Authors;

/// The `/categories` collection.
#[derive(Debug, Clone, Copy)]
pub struct Categories;

impl Resource for Books {
    const COLLECTION: &'static str = "books";
    type Record = Record;
    type Collection = serde_json::Value;
}

impl Resource for Authors {
    const COLLECTION: &'static str = "authors";
    type Record = Record;
    type Collection = serde_json::Value;
}

impl Resource for Categories {
    const COLLECTION: &'static str = "categories";
    type Record = Record;
    type Collection = serde_json::Value;
}

/// List, get, create, update and delete for one [`Resource`].
///
/// Each operation is exactly one request through the shared [`Client`]. A
/// service is a cheap handle; obtain one with [`Client::books`],
/// [`Client::authors`], [`Client::categories`] or [`Client::resource`].
pub struct ResourceService<R> {
    client: Client,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceService")
            .field("collection", &R::COLLECTION)
            .finish()
    }
}

impl<R: Resource> ResourceService<R> {
    /// Creates a service for `R` that issues its requests through `client`.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn collection(method: Method) -> RequestMetadata {
        RequestMetadata::new(method, "").segment(R::COLLECTION)
    }

    fn member(method: Method, id: impl fmt::Display) -> RequestMetadata {
        Self::collection(method).segment(id)
    }

    /// `GET /{collection}`
    pub async fn list(&self) -> Result<Response<R::Collection>> {
        self.client
            .call::<(), _>(Self::collection(Method::GET), None)
            .await
    }

    /// `GET /{collection}/{id}`
    ///
    /// Ids that would not survive as a single path segment (`""`, `"."`,
    /// `".."`) fail with [`Error::Configuration`](crate::Error::Configuration)
    /// before anything is sent. The same holds for `update` and `delete`.
    ///
    /// A missing record is reported as [`Error::HttpStatus`](crate::Error::HttpStatus)
    /// with status 404.
    pub async fn get(&self, id: impl fmt::Display) -> Result<Response<R::Record>> {
        self.client
            .call::<(), _>(Self::member(Method::GET, id), None)
            .await
    }

    /// `POST /{collection}` with `record` as the body.
    pub async fn create(&self, record: &R::Record) -> Result<Response<R::Record>> {
        self.client
            .call(Self::collection(Method::POST), Some(record))
            .await
    }

    /// `PUT /{collection}/{id}` with `record` as the body.
    pub async fn update(
        &self,
        id: impl fmt::Display,
        record: &R::Record,
    ) -> Result<Response<R::Record>> {
        self.client
            .call(Self::member(Method::PUT, id), Some(record))
            .await
    }

    /// `DELETE /{collection}/{id}`, sent without a body.
    ///
    /// Whatever acknowledgement the backend returns is left in
    /// [`Response::raw_body`].
    pub async fn delete(&self, id: impl fmt::Display) -> Result<Response<()>> {
        self.client
            .send::<()>(Self::member(Method::DELETE, id), None)
            .await
    }
}

impl ResourceService<Authors> {
    /// `GET /authors/nationalities`
    pub async fn list_nationalities(&self) -> Result<Response<serde_json::Value>> {
        let metadata = Self::collection(Method::GET).segment("nationalities");
        self.client.call::<(), _>(metadata, None).await
    }
}

impl Client {
    /// Operations on any collection.
    pub fn resource<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(self.clone())
    }

    /// Operations on `/books`.
    pub fn books(&self) -> ResourceService<Books> {
        self.resource()
    }

    /// Operations on `/authors`, including `/authors/nationalities`.
    pub fn authors(&self) -> ResourceService<Authors> {
        self.resource()
    }

    /// Operations on `/categories`.
    pub fn categories(&self) -> ResourceService<Categories> {
        self.resource()
    }
}
