//! Request descriptors.
//!
//! A `Request` describes one API call as plain data. Resource factories build
//! them, the `Client` resolves and executes them without modifying them.

use serde_json::Value;
use std::collections::BTreeMap;

/// Query parameters, kept sorted so identical requests compare and log identically
pub type Query = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    url: String,
    query: Query,
    absolute: bool,
    body: Option<Value>,
}

impl Request {
    /// A request relative to the client's base URL (`{protocol}://{api_url}/spaces`)
    pub fn new(path: impl Into<String>) -> Request {
        Request {
            url: path.into(),
            query: Query::new(),
            absolute: false,
            body: None,
        }
    }

    /// A request against a fully qualified URL, used as is
    pub fn absolute(url: impl Into<String>) -> Request {
        Request {
            absolute: true,
            ..Request::new(url)
        }
    }

    pub fn with_query(mut self, query: Query) -> Request {
        self.query = query;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Request {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Request {
        self.body = Some(body);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Resolve the URL to call against the given base URL
    pub fn resolve(&self, base_url: &str) -> String {
        if self.absolute {
            return self.url.clone();
        }
        if self.url.is_empty() {
            return base_url.to_string();
        }
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.url.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE_URL: &str = "https://api.contentful.com/spaces";

    #[test]
    fn test_relative_request_is_prefixed() {
        let request = Request::new("/space1/entries");
        assert!(!request.is_absolute());
        assert_eq!(
            request.resolve(BASE_URL),
            "https://api.contentful.com/spaces/space1/entries"
        );
    }

    #[test]
    fn test_empty_path_resolves_to_base_url() {
        assert_eq!(Request::new("").resolve(BASE_URL), BASE_URL);
    }

    #[test]
    fn test_absolute_request_is_used_verbatim() {
        let request = Request::absolute("https://upload.example.test/spaces/x/uploads");
        assert!(request.is_absolute());
        assert_eq!(
            request.resolve(BASE_URL),
            "https://upload.example.test/spaces/x/uploads"
        );
    }

    #[test]
    fn test_query_and_body() {
        let request = Request::new("/space1/entries")
            .with_param("limit", "10")
            .with_param("content_type", "post")
            .with_body(json!({"fields": {}}));

        let keys: Vec<&str> = request.query().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["content_type", "limit"]);
        assert_eq!(request.body(), Some(&json!({"fields": {}})));
    }
}
