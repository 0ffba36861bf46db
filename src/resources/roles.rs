use serde_json::Value;

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::Query;
use crate::response::Response;

/// Roles and their policies. Bodies are passed through unchanged.
pub struct Roles<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Roles<'a> {
    pub(crate) fn new(client: &'a Client, space_id: &str) -> Roles<'a> {
        Roles {
            endpoint: Endpoint::in_space(client, space_id, "roles"),
        }
    }

    pub fn all(&self) -> Result<Response, ClientError> {
        self.endpoint.all(Query::new())
    }

    pub fn find(&self, role_id: &str) -> Result<Response, ClientError> {
        self.endpoint.find(role_id)
    }

    pub fn create(&self, body: Value) -> Result<Response, ClientError> {
        self.endpoint.create(body, RequestContext::new())
    }

    pub fn update(&self, role_id: &str, version: u64, body: Value) -> Result<Response, ClientError> {
        self.endpoint.update(role_id, version, body)
    }

    pub fn destroy(&self, role_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(role_id)
    }
}
