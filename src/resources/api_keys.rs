use serde_json::json;

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::Query;
use crate::response::Response;

/// Delivery API keys of a space
pub struct ApiKeys<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> ApiKeys<'a> {
    pub(crate) fn new(client: &'a Client, space_id: &str) -> ApiKeys<'a> {
        ApiKeys {
            endpoint: Endpoint::in_space(client, space_id, "api_keys"),
        }
    }

    pub fn all(&self) -> Result<Response, ClientError> {
        self.endpoint.all(Query::new())
    }

    pub fn find(&self, api_key_id: &str) -> Result<Response, ClientError> {
        self.endpoint.find(api_key_id)
    }

    pub fn create(&self, name: &str, description: Option<&str>) -> Result<Response, ClientError> {
        let body = match description {
            Some(description) => json!({ "name": name, "description": description }),
            None => json!({ "name": name }),
        };
        self.endpoint.create(body, RequestContext::new())
    }

    pub fn destroy(&self, api_key_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(api_key_id)
    }
}
