//! Response interpretation.
//!
//! Every raw response is classified exactly once into a `ResponseObject`.
//! Error payloads are recognized by their `sys.type`, not only by the status
//! code, so a success status carrying an error payload is still an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::EnumString;

use crate::error::{ApiError, ClientError};
use crate::request::Request;
use crate::transport::RawResponse;

/// Reference to another resource, as found in `sys.space` or `sys.contentType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    pub id: String,
    #[serde(default)]
    pub link_type: Option<String>,
}

/// The metadata envelope every resource carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sys {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    pub version: Option<u64>,
    pub space: Option<Link>,
    pub content_type: Option<Link>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub published_version: Option<u64>,
    pub archived_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum ResourceKind {
    Space,
    ApiKey,
    Asset,
    ContentType,
    Entry,
    Locale,
    Role,
    WebhookDefinition,
    #[strum(default)]
    Other(String),
}

/// A single resource in its generic representation
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub sys: Sys,
    pub raw: Value,
}

impl Resource {
    pub fn from_value(raw: Value) -> Result<Resource, serde_json::Error> {
        let sys: Sys = match raw.get("sys") {
            Some(sys) => serde_json::from_value(sys.clone())?,
            None => Sys::default(),
        };
        let kind = sys
            .kind
            .parse::<ResourceKind>()
            .unwrap_or_else(|_| ResourceKind::Other(sys.kind.clone()));
        Ok(Resource { kind, sys, raw })
    }

    pub fn id(&self) -> Option<&str> {
        self.sys.id.as_deref()
    }

    pub fn version(&self) -> Option<u64> {
        self.sys.version
    }

    /// Id of the content type an entry belongs to
    pub fn content_type_id(&self) -> Option<&str> {
        self.sys
            .content_type
            .as_ref()
            .map(|link| link.sys.id.as_str())
    }

    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.raw.get("fields").and_then(Value::as_object)
    }

    /// A top level attribute other than `sys` and `fields`, e.g. `name` of a space
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }
}

/// One page of an `Array` response
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub items: Vec<Resource>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    request: Request,
}

impl Collection {
    fn from_value(value: &Value, request: &Request) -> Result<Collection, serde_json::Error> {
        let items = value
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .cloned()
                    .map(Resource::from_value)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let number = |name: &str| value.get(name).and_then(Value::as_u64);
        let total = number("total").unwrap_or(items.len() as u64);

        Ok(Collection {
            total,
            skip: number("skip").unwrap_or(0),
            limit: number("limit").unwrap_or(items.len() as u64),
            items,
            request: request.clone(),
        })
    }

    /// The request that produced this page
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The request for the following page, or `None` when this is the last one
    pub fn next_page(&self) -> Option<Request> {
        if self.limit == 0 {
            return None;
        }
        let next_skip = self.skip.checked_add(self.limit)?;
        if next_skip >= self.total {
            return None;
        }
        Some(
            self.request
                .clone()
                .with_param("skip", next_skip.to_string())
                .with_param("limit", self.limit.to_string()),
        )
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What a response turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseObject {
    Resource(Resource),
    Collection(Collection),
    Error(ApiError),
    /// A successful response without a body, e.g. after a delete
    NoContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub raw_body: String,
    pub object: ResponseObject,
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self.object, ResponseObject::Error(_))
    }

    pub fn error(&self) -> Option<&ApiError> {
        match &self.object {
            ResponseObject::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn resource(&self) -> Option<&Resource> {
        match &self.object {
            ResponseObject::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn collection(&self) -> Option<&Collection> {
        match &self.object {
            ResponseObject::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Turn an error object into `Err`, keeping every other response as is
    pub fn into_result(self) -> Result<Response, ClientError> {
        match self.object {
            ResponseObject::Error(error) => Err(ClientError::Api(error)),
            _ => Ok(self),
        }
    }
}

/// Maps a raw response to a `ResponseObject`
pub trait ResourceBuilder: Send + Sync {
    fn build(&self, raw: &RawResponse, request: &Request) -> Result<ResponseObject, ClientError>;
}

/// Builder for the JSON envelope used by the Management API
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResourceBuilder;

impl ResourceBuilder for DefaultResourceBuilder {
    fn build(&self, raw: &RawResponse, request: &Request) -> Result<ResponseObject, ClientError> {
        if raw.body.trim().is_empty() {
            return Ok(if raw.is_success() {
                ResponseObject::NoContent
            } else {
                ResponseObject::Error(ApiError::from_status(raw.status, &raw.body))
            });
        }

        let value: Value = match serde_json::from_str(&raw.body) {
            Ok(value) => value,
            Err(_) if !raw.is_success() => {
                return Ok(ResponseObject::Error(ApiError::from_status(
                    raw.status, &raw.body,
                )))
            }
            Err(e) => return Err(ClientError::Json(e)),
        };

        if let Some(error) = ApiError::from_payload(raw.status, &value) {
            return Ok(ResponseObject::Error(error));
        }
        if !raw.is_success() {
            return Ok(ResponseObject::Error(ApiError::from_status(
                raw.status, &raw.body,
            )));
        }

        let is_array = value
            .get("sys")
            .and_then(|sys| sys.get("type"))
            .and_then(Value::as_str)
            == Some("Array");
        if is_array {
            Ok(ResponseObject::Collection(Collection::from_value(
                &value, request,
            )?))
        } else {
            Ok(ResponseObject::Resource(Resource::from_value(value)?))
        }
    }
}

/// Interpret a raw response with the given builder
pub fn interpret(
    builder: &dyn ResourceBuilder,
    raw: RawResponse,
    request: &Request,
) -> Result<Response, ClientError> {
    let object = builder.build(&raw, request)?;
    Ok(Response {
        status: raw.status,
        raw_body: raw.body,
        object,
    })
}
