//! Resource factories.
//!
//! Each factory borrows the `Client` and turns resource operations into
//! `Request`s plus the `RequestContext` they need. All execution goes through
//! the client, so factories hold no state of their own beyond their path.

mod api_keys;
mod assets;
mod content_types;
mod entries;
mod locales;
mod roles;
mod spaces;
mod webhooks;

pub use api_keys::ApiKeys;
pub use assets::Assets;
pub use content_types::ContentTypes;
pub use entries::Entries;
pub use locales::Locales;
pub use roles::Roles;
pub use spaces::Spaces;
pub use webhooks::Webhooks;

use serde_json::Value;

use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::{Query, Request};
use crate::response::Response;

/// CRUD and state transitions of one collection endpoint, e.g. `/{space}/entries`
pub(crate) struct Endpoint<'a> {
    client: &'a Client,
    path: String,
}

impl<'a> Endpoint<'a> {
    pub(crate) fn new(client: &'a Client, path: String) -> Endpoint<'a> {
        Endpoint { client, path }
    }

    /// Endpoint of a collection that lives inside a space
    pub(crate) fn in_space(client: &'a Client, space_id: &str, collection: &str) -> Endpoint<'a> {
        Endpoint::new(client, format!("/{space_id}/{collection}"))
    }

    pub(crate) fn client(&self) -> &'a Client {
        self.client
    }

    pub(crate) fn collection_request(&self, query: Query) -> Request {
        Request::new(self.path.clone()).with_query(query)
    }

    pub(crate) fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    pub(crate) fn all(&self, query: Query) -> Result<Response, ClientError> {
        self.client
            .get(&self.collection_request(query), RequestContext::new())
    }

    pub(crate) fn find(&self, id: &str) -> Result<Response, ClientError> {
        self.client
            .get(&Request::new(self.item_path(id)), RequestContext::new())
    }

    /// Create with a server generated id
    pub(crate) fn create(&self, body: Value, context: RequestContext) -> Result<Response, ClientError> {
        self.client
            .post(&Request::new(self.path.clone()).with_body(body), context)
    }

    /// Create with a client chosen id
    pub(crate) fn create_with_id(
        &self,
        id: &str,
        body: Value,
        context: RequestContext,
    ) -> Result<Response, ClientError> {
        self.client
            .put(&Request::new(self.item_path(id)).with_body(body), context)
    }

    pub(crate) fn update(&self, id: &str, version: u64, body: Value) -> Result<Response, ClientError> {
        self.client.put(
            &Request::new(self.item_path(id)).with_body(body),
            RequestContext::new().with_version(version),
        )
    }

    pub(crate) fn destroy(&self, id: &str) -> Result<Response, ClientError> {
        self.client
            .delete(&Request::new(self.item_path(id)), RequestContext::new())
    }

    /// Enter a state such as `published` or `archived`; the PUT has no body
    pub(crate) fn enter_state(&self, id: &str, state: &str, version: u64) -> Result<Response, ClientError> {
        self.client.put(
            &Request::new(format!("{}/{}", self.item_path(id), state)),
            RequestContext::new().with_version(version).with_zero_length(),
        )
    }

    /// Leave a state such as `published` or `archived`
    pub(crate) fn leave_state(
        &self,
        id: &str,
        state: &str,
        version: Option<u64>,
    ) -> Result<Response, ClientError> {
        let context = match version {
            Some(version) => RequestContext::new().with_version(version),
            None => RequestContext::new(),
        };
        self.client
            .delete(&Request::new(format!("{}/{}", self.item_path(id), state)), context)
    }
}
