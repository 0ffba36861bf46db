use serde_json::{json, Map, Value};

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::Query;
use crate::response::Response;

/// Spaces live directly under the base URL
pub struct Spaces<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Spaces<'a> {
    pub(crate) fn new(client: &'a Client) -> Spaces<'a> {
        Spaces {
            endpoint: Endpoint::new(client, String::new()),
        }
    }

    pub fn all(&self) -> Result<Response, ClientError> {
        self.endpoint.all(Query::new())
    }

    pub fn find(&self, space_id: &str) -> Result<Response, ClientError> {
        self.endpoint.find(space_id)
    }

    /// Create a space. Users that belong to several organizations must name the
    /// one the space is created in.
    pub fn create(
        &self,
        name: &str,
        organization_id: Option<&str>,
        default_locale: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        if let Some(locale) = default_locale {
            body.insert("defaultLocale".to_string(), json!(locale));
        }

        let context = match organization_id {
            Some(organization_id) => RequestContext::new().with_organization_id(organization_id),
            None => RequestContext::new(),
        };
        self.endpoint.create(Value::Object(body), context)
    }

    pub fn update(&self, space_id: &str, version: u64, name: &str) -> Result<Response, ClientError> {
        self.endpoint
            .update(space_id, version, json!({ "name": name }))
    }

    pub fn destroy(&self, space_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(space_id)
    }
}
