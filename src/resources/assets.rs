use serde_json::{json, Value};

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::{Query, Request};
use crate::response::Response;

pub struct Assets<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Assets<'a> {
    pub(crate) fn new(client: &'a Client, space_id: &str) -> Assets<'a> {
        Assets {
            endpoint: Endpoint::in_space(client, space_id, "assets"),
        }
    }

    pub fn all(&self, query: Query) -> Result<Response, ClientError> {
        self.endpoint.all(query)
    }

    pub fn find(&self, asset_id: &str) -> Result<Response, ClientError> {
        self.endpoint.find(asset_id)
    }

    /// Create an asset from its localized `fields` (title, description, file)
    pub fn create(&self, fields: Value) -> Result<Response, ClientError> {
        self.endpoint
            .create(json!({ "fields": fields }), RequestContext::new())
    }

    pub fn create_with_id(&self, asset_id: &str, fields: Value) -> Result<Response, ClientError> {
        self.endpoint
            .create_with_id(asset_id, json!({ "fields": fields }), RequestContext::new())
    }

    pub fn update(&self, asset_id: &str, version: u64, fields: Value) -> Result<Response, ClientError> {
        self.endpoint
            .update(asset_id, version, json!({ "fields": fields }))
    }

    pub fn destroy(&self, asset_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(asset_id)
    }

    pub fn publish(&self, asset_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint.enter_state(asset_id, "published", version)
    }

    pub fn unpublish(&self, asset_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint
            .leave_state(asset_id, "published", Some(version))
    }

    pub fn archive(&self, asset_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint.enter_state(asset_id, "archived", version)
    }

    pub fn unarchive(&self, asset_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint
            .leave_state(asset_id, "archived", Some(version))
    }

    /// Ask the API to process the uploaded file of one locale
    pub fn process(&self, asset_id: &str, version: u64, locale: &str) -> Result<Response, ClientError> {
        let path = format!(
            "{}/files/{}/process",
            self.endpoint.item_path(asset_id),
            locale
        );
        self.endpoint.client().put(
            &Request::new(path),
            RequestContext::new().with_version(version).with_zero_length(),
        )
    }
}
