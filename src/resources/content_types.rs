use serde_json::Value;
use tracing::warn;

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::{Query, Request};
use crate::response::{Resource, ResourceKind, Response, ResponseObject};

/// Content types of a space.
///
/// Every content type this factory receives from the API, whether fetched,
/// created, updated or activated, is registered in the client's dynamic entry
/// cache so entries can be wrapped without a full reload.
pub struct ContentTypes<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> ContentTypes<'a> {
    pub(crate) fn new(client: &'a Client, space_id: &str) -> ContentTypes<'a> {
        ContentTypes {
            endpoint: Endpoint::in_space(client, space_id, "content_types"),
        }
    }

    pub fn all_request(&self, query: Query) -> Request {
        self.endpoint.collection_request(query)
    }

    pub fn all(&self, query: Query) -> Result<Response, ClientError> {
        self.fetch(&self.all_request(query))
    }

    /// GET any content type request, e.g. a following page of `all`
    pub fn fetch(&self, request: &Request) -> Result<Response, ClientError> {
        let response = self
            .endpoint
            .client()
            .get(request, RequestContext::new())?;
        self.register(&response);
        Ok(response)
    }

    pub fn find(&self, content_type_id: &str) -> Result<Response, ClientError> {
        let response = self.endpoint.find(content_type_id)?;
        self.register(&response);
        Ok(response)
    }

    /// Create a content type from `body` (name, displayField, fields)
    pub fn create(&self, body: Value) -> Result<Response, ClientError> {
        let response = self.endpoint.create(body, RequestContext::new())?;
        self.register(&response);
        Ok(response)
    }

    pub fn create_with_id(&self, content_type_id: &str, body: Value) -> Result<Response, ClientError> {
        let response = self
            .endpoint
            .create_with_id(content_type_id, body, RequestContext::new())?;
        self.register(&response);
        Ok(response)
    }

    pub fn update(&self, content_type_id: &str, version: u64, body: Value) -> Result<Response, ClientError> {
        let response = self.endpoint.update(content_type_id, version, body)?;
        self.register(&response);
        Ok(response)
    }

    pub fn destroy(&self, content_type_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(content_type_id)
    }

    pub fn activate(&self, content_type_id: &str, version: u64) -> Result<Response, ClientError> {
        let response = self
            .endpoint
            .enter_state(content_type_id, "published", version)?;
        self.register(&response);
        Ok(response)
    }

    pub fn deactivate(&self, content_type_id: &str) -> Result<Response, ClientError> {
        self.endpoint
            .leave_state(content_type_id, "published", None)
    }

    /// Cache the descriptor of every content type in `response`. A content
    /// type whose fields cannot be read is left out of the cache.
    fn register(&self, response: &Response) {
        let content_types: Vec<&Resource> = match &response.object {
            ResponseObject::Resource(resource) => vec![resource],
            ResponseObject::Collection(collection) => collection.items.iter().collect(),
            _ => return,
        };

        let client = self.endpoint.client();
        for content_type in content_types
            .into_iter()
            .filter(|item| item.kind == ResourceKind::ContentType)
        {
            if let Err(e) = client.register_content_type(content_type) {
                warn!(
                    "Skipping content type {:?} for the dynamic entry cache: {}",
                    content_type.id(),
                    e
                );
            }
        }
    }
}
