//! Header composition for outbound requests.
//!
//! Values that only apply to a single call (the version used for optimistic
//! locking, the organization a space is created in, the content type of a new
//! entry) travel in a `RequestContext` that is built for that call and dropped
//! with it, so nothing carries over into the next request.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_LENGTH,
    CONTENT_TYPE, USER_AGENT,
};

use crate::configuration::Configuration;
use crate::error::ClientError;

pub const ORGANIZATION_HEADER: &str = "x-contentful-organization";
pub const VERSION_HEADER: &str = "x-contentful-version";
pub const CONTENT_TYPE_HEADER: &str = "x-contentful-content-type";

/// Value of the `User-Agent` header
pub fn user_agent() -> String {
    format!("contentful-management.rs/{}", env!("CARGO_PKG_VERSION"))
}

/// Per-call values that add headers to a single request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub content_type_id: Option<String>,
    pub version: Option<u64>,
    pub organization_id: Option<String>,
    pub zero_length: bool,
}

impl RequestContext {
    pub fn new() -> RequestContext {
        RequestContext::default()
    }

    pub fn with_content_type_id(mut self, content_type_id: impl Into<String>) -> RequestContext {
        self.content_type_id = Some(content_type_id.into());
        self
    }

    pub fn with_version(mut self, version: u64) -> RequestContext {
        self.version = Some(version);
        self
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> RequestContext {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_zero_length(mut self) -> RequestContext {
        self.zero_length = true;
        self
    }
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader {
        name: name.to_string(),
    })
}

/// Build the headers for one request.
///
/// Optional headers are only present when the configuration or the context asks
/// for them. The access token is not validated here; an empty token is sent as is.
pub fn compose_headers(
    access_token: &str,
    configuration: &Configuration,
    context: &RequestContext,
) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, header_value(&USER_AGENT, &user_agent())?);
    headers.insert(
        AUTHORIZATION,
        header_value(&AUTHORIZATION, &format!("Bearer {access_token}"))?,
    );
    headers.insert(
        CONTENT_TYPE,
        header_value(&CONTENT_TYPE, &configuration.media_type())?,
    );

    if let Some(organization_id) = &context.organization_id {
        let name = HeaderName::from_static(ORGANIZATION_HEADER);
        let value = header_value(&name, organization_id)?;
        headers.insert(name, value);
    }

    if let Some(version) = context.version {
        headers.insert(HeaderName::from_static(VERSION_HEADER), HeaderValue::from(version));
    }

    if context.zero_length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    }

    if let Some(content_type_id) = &context.content_type_id {
        let name = HeaderName::from_static(CONTENT_TYPE_HEADER);
        let value = header_value(&name, content_type_id)?;
        headers.insert(name, value);
    }

    if configuration.gzip_encoded {
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
    }

    Ok(headers)
}

/// Render headers for logging with the bearer token masked
pub fn redacted(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if *name == AUTHORIZATION {
                "Bearer ***".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration() -> Configuration {
        Configuration::default()
    }

    #[test]
    fn test_base_headers() {
        let headers = compose_headers("token", &configuration(), &RequestContext::new()).unwrap();

        assert_eq!(headers[USER_AGENT], user_agent().as_str());
        assert_eq!(headers[AUTHORIZATION], "Bearer token");
        assert_eq!(
            headers[CONTENT_TYPE],
            "application/vnd.contentful.management.v1+json"
        );
        assert_eq!(headers[ACCEPT_ENCODING], "gzip");
        assert!(headers.get(ORGANIZATION_HEADER).is_none());
        assert!(headers.get(VERSION_HEADER).is_none());
        assert!(headers.get(CONTENT_TYPE_HEADER).is_none());
        assert!(headers.get(CONTENT_LENGTH).is_none());
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_context_headers() {
        let context = RequestContext::new()
            .with_organization_id("org1")
            .with_version(7)
            .with_content_type_id("blogPost")
            .with_zero_length();
        let headers = compose_headers("token", &configuration(), &context).unwrap();

        assert_eq!(headers[ORGANIZATION_HEADER], "org1");
        assert_eq!(headers[VERSION_HEADER], "7");
        assert_eq!(headers[CONTENT_TYPE_HEADER], "blogPost");
        assert_eq!(headers[CONTENT_LENGTH], "0");
        assert_eq!(headers.len(), 8);
    }

    #[test]
    fn test_gzip_can_be_disabled() {
        let configuration = Configuration {
            gzip_encoded: false,
            ..Configuration::default()
        };
        let headers = compose_headers("token", &configuration, &RequestContext::new()).unwrap();
        assert!(headers.get(ACCEPT_ENCODING).is_none());
    }

    #[test]
    fn test_api_version_is_embedded_in_media_type() {
        let configuration = Configuration {
            api_version: "2".to_string(),
            ..Configuration::default()
        };
        let headers = compose_headers("token", &configuration, &RequestContext::new()).unwrap();
        assert_eq!(
            headers[CONTENT_TYPE],
            "application/vnd.contentful.management.v2+json"
        );
    }

    #[test]
    fn test_composition_is_idempotent() {
        let context = RequestContext::new().with_version(3).with_organization_id("org");
        let first = compose_headers("token", &configuration(), &context).unwrap();
        let second = compose_headers("token", &configuration(), &context).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_token_still_composes() {
        let headers = compose_headers("", &configuration(), &RequestContext::new()).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer ");
    }

    #[test]
    fn test_illegal_header_value() {
        let result = compose_headers("bad\ntoken", &configuration(), &RequestContext::new());
        assert!(matches!(
            result,
            Err(ClientError::InvalidHeader { name }) if name == "authorization"
        ));
    }

    #[test]
    fn test_redacted_masks_token() {
        let headers = compose_headers("secret", &configuration(), &RequestContext::new()).unwrap();
        let rendered = redacted(&headers);
        assert!(rendered
            .iter()
            .any(|(name, value)| name == "authorization" && value == "Bearer ***"));
        assert!(!rendered.iter().any(|(_, value)| value.contains("secret")));
    }
}
