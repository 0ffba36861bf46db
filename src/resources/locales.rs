use serde_json::{json, Value};

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::Query;
use crate::response::Response;

pub struct Locales<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Locales<'a> {
    pub(crate) fn new(client: &'a Client, space_id: &str) -> Locales<'a> {
        Locales {
            endpoint: Endpoint::in_space(client, space_id, "locales"),
        }
    }

    pub fn all(&self) -> Result<Response, ClientError> {
        self.endpoint.all(Query::new())
    }

    pub fn find(&self, locale_id: &str) -> Result<Response, ClientError> {
        self.endpoint.find(locale_id)
    }

    pub fn create(&self, name: &str, code: &str) -> Result<Response, ClientError> {
        self.endpoint
            .create(json!({ "name": name, "code": code }), RequestContext::new())
    }

    pub fn update(&self, locale_id: &str, version: u64, body: Value) -> Result<Response, ClientError> {
        self.endpoint.update(locale_id, version, body)
    }

    pub fn destroy(&self, locale_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(locale_id)
    }
}
