use serde_json::{json, Value};

use super::Endpoint;
use crate::client::Client;
use crate::error::ClientError;
use crate::headers::RequestContext;
use crate::request::Query;
use crate::response::Response;

pub struct Entries<'a> {
    endpoint: Endpoint<'a>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(client: &'a Client, space_id: &str) -> Entries<'a> {
        Entries {
            endpoint: Endpoint::in_space(client, space_id, "entries"),
        }
    }

    /// List entries; `content_type`, `limit`, `skip` and search parameters go in `query`
    pub fn all(&self, query: Query) -> Result<Response, ClientError> {
        self.endpoint.all(query)
    }

    pub fn find(&self, entry_id: &str) -> Result<Response, ClientError> {
        self.endpoint.find(entry_id)
    }

    /// Create an entry of the given content type from its localized `fields`
    pub fn create(&self, content_type_id: &str, fields: Value) -> Result<Response, ClientError> {
        self.endpoint.create(
            json!({ "fields": fields }),
            RequestContext::new().with_content_type_id(content_type_id),
        )
    }

    pub fn create_with_id(
        &self,
        content_type_id: &str,
        entry_id: &str,
        fields: Value,
    ) -> Result<Response, ClientError> {
        self.endpoint.create_with_id(
            entry_id,
            json!({ "fields": fields }),
            RequestContext::new().with_content_type_id(content_type_id),
        )
    }

    pub fn update(&self, entry_id: &str, version: u64, fields: Value) -> Result<Response, ClientError> {
        self.endpoint
            .update(entry_id, version, json!({ "fields": fields }))
    }

    pub fn destroy(&self, entry_id: &str) -> Result<Response, ClientError> {
        self.endpoint.destroy(entry_id)
    }

    pub fn publish(&self, entry_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint.enter_state(entry_id, "published", version)
    }

    pub fn unpublish(&self, entry_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint
            .leave_state(entry_id, "published", Some(version))
    }

    pub fn archive(&self, entry_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint.enter_state(entry_id, "archived", version)
    }

    pub fn unarchive(&self, entry_id: &str, version: u64) -> Result<Response, ClientError> {
        self.endpoint
            .leave_state(entry_id, "archived", Some(version))
    }
}
