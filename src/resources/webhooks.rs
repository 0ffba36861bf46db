use serde_json::Value;

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::Query;
use crate::response::Response;

pub struct Webhooks<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a Client, space_id: &str) -> Webhooks<'a> {
        Webhooks {
            endpoint: Endpoint::in_space(client, space_id, "webhook_definitions"),
        }
    }

    pub fn all(&self) -> Result<Response, ClientError> {
        self.endpoint.all(Query::new())
    }

    pub fn find(&self, webhook_id: &str) -> Result<Response, ClientError> {
        self.endpoint.find(webhook_id)
    }

    /// Create a webhook calling `url`. Other attributes (name, topics,
    /// credentials) are taken from `attributes` when it is an object.
    pub fn create(&self, url: &str, attributes: Value) -> Result<Response, ClientError> {
        let mut body = match attributes {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        body.insert("url".to_string(), Value::String(url.to_string()));
        self.endpoint
            .create(Value::Object(body), RequestContext::new())
    }

    pub fn update(&self, webhook_id: &str, version: u64, body: Value) -> Result<Response, ClientError> {
        self.endpoint.update(webhook_id, version, body)
    }

    pub fn destroy(&self, webhook_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(webhook_id)
    }
}
