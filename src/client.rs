//! The Management API client.
//!
//! `Client` owns the configuration, the transport, and the dynamic entry
//! cache. Every call composes its headers from the client identity and a
//! `RequestContext` that lives only as long as the call, sends the request,
//! and classifies the response. API errors are either returned inside the
//! `Response` or raised as `Err`, depending on `raise_errors`.
//!
//! Dispatch keeps no per-call state on the client, so a `Client` may be shared
//! between threads. Registrations into the dynamic entry cache from several
//! threads are serialized by a lock; their relative order is unspecified.

use reqwest::Method;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info, trace, warn};

use crate::configuration::{Configuration, LogLevel};
use crate::dynamic_entry::{DynamicEntry, DynamicEntryCache, Entry, EntryDescriptor};
use crate::error::ClientError;
use crate::headers::{compose_headers, redacted, RequestContext};
use crate::request::{Query, Request};
use crate::resources::{
    ApiKeys, Assets, ContentTypes, Entries, Locales, Roles, Spaces, Webhooks,
};
use crate::response::{interpret, DefaultResourceBuilder, Resource, ResourceBuilder, Response};
use crate::transport::{ReqwestTransport, Transport, TransportRequest};

/// Page size used when loading content types into the dynamic entry cache
const CONTENT_TYPE_PAGE_SIZE: u32 = 1000;

pub struct Client {
    access_token: String,
    configuration: Configuration,
    transport: Box<dyn Transport>,
    resource_builder: Box<dyn ResourceBuilder>,
    dynamic_entries: RwLock<DynamicEntryCache>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("configuration", &self.configuration)
            .field("dynamic_entries", &self.dynamic_entry_keys())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with the default `reqwest` transport.
    ///
    /// Content types of the spaces listed in `dynamic_entries` are loaded
    /// before this returns.
    pub fn new(
        access_token: impl Into<String>,
        configuration: Configuration,
    ) -> Result<Client, ClientError> {
        Client::builder(access_token)
            .configuration(configuration)
            .build()
    }

    pub fn builder(access_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(access_token)
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// `{protocol}://{api_url}/spaces`
    pub fn base_url(&self) -> String {
        self.configuration.base_url()
    }

    pub fn get(&self, request: &Request, context: RequestContext) -> Result<Response, ClientError> {
        self.execute(Method::GET, request, context)
    }

    pub fn post(&self, request: &Request, context: RequestContext) -> Result<Response, ClientError> {
        self.execute(Method::POST, request, context)
    }

    pub fn put(&self, request: &Request, context: RequestContext) -> Result<Response, ClientError> {
        self.execute(Method::PUT, request, context)
    }

    pub fn delete(
        &self,
        request: &Request,
        context: RequestContext,
    ) -> Result<Response, ClientError> {
        self.execute(Method::DELETE, request, context)
    }

    fn execute(
        &self,
        method: Method,
        request: &Request,
        context: RequestContext,
    ) -> Result<Response, ClientError> {
        let url = request.resolve(&self.base_url());
        let headers = compose_headers(&self.access_token, &self.configuration, &context)?;
        let body = request.body().map(serde_json::to_string).transpose()?;

        if self.configuration.logger {
            log_request(
                self.configuration.log_level,
                &format!(
                    "{} {} query={:?} headers={:?}",
                    method,
                    url,
                    serde_urlencoded::to_string(request.query()).unwrap_or_default(),
                    redacted(&headers)
                ),
            );
        }

        let raw = self.transport.send(TransportRequest {
            method,
            url,
            query: request.query().clone(),
            headers,
            body,
            proxy: self.configuration.proxy(),
        })?;

        if self.configuration.logger {
            debug!("HTTP {} {}", raw.status, raw.body);
        }

        let response = interpret(self.resource_builder.as_ref(), raw, request)?;
        if response.is_error() && self.configuration.raise_errors {
            return response.into_result();
        }
        Ok(response)
    }

    pub fn spaces(&self) -> Spaces<'_> {
        Spaces::new(self)
    }

    pub fn api_keys(&self, space_id: &str) -> ApiKeys<'_> {
        ApiKeys::new(self, space_id)
    }

    pub fn assets(&self, space_id: &str) -> Assets<'_> {
        Assets::new(self, space_id)
    }

    pub fn content_types(&self, space_id: &str) -> ContentTypes<'_> {
        ContentTypes::new(self, space_id)
    }

    pub fn entries(&self, space_id: &str) -> Entries<'_> {
        Entries::new(self, space_id)
    }

    pub fn locales(&self, space_id: &str) -> Locales<'_> {
        Locales::new(self, space_id)
    }

    pub fn roles(&self, space_id: &str) -> Roles<'_> {
        Roles::new(self, space_id)
    }

    pub fn webhooks(&self, space_id: &str) -> Webhooks<'_> {
        Webhooks::new(self, space_id)
    }

    /// Register or replace the descriptor used for entries of content type `key`
    pub fn register_dynamic_entry(&self, key: impl Into<String>, descriptor: EntryDescriptor) {
        self.dynamic_entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(key, descriptor);
    }

    pub(crate) fn register_content_type(
        &self,
        content_type: &Resource,
    ) -> Result<Arc<EntryDescriptor>, ClientError> {
        let descriptor = self
            .dynamic_entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register_content_type(content_type)?;
        Ok(descriptor)
    }

    pub fn dynamic_entry(&self, key: &str) -> Option<Arc<EntryDescriptor>> {
        self.dynamic_entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
    }

    pub fn dynamic_entry_keys(&self) -> Vec<String> {
        self.dynamic_entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
    }

    /// Wrap an entry with the descriptor of its content type, when one is cached
    pub fn wrap_entry(&self, resource: Resource) -> Entry {
        let descriptor = resource
            .content_type_id()
            .and_then(|content_type_id| self.dynamic_entry(content_type_id));
        match descriptor {
            Some(descriptor) => Entry::Dynamic(DynamicEntry::new(
                descriptor,
                resource,
                self.configuration.default_locale.clone(),
            )),
            None => Entry::Generic(resource),
        }
    }

    /// Fetch every content type of a space into the dynamic entry cache.
    ///
    /// API errors fail the load regardless of `raise_errors`. Returns the number
    /// of content types registered.
    pub fn update_dynamic_entry_cache_for_space(&self, space_id: &str) -> Result<usize, ClientError> {
        trace!("Loading content types of space {} into the dynamic entry cache", space_id);
        let content_types = self.content_types(space_id);
        let mut request = content_types.all_request(Query::from([(
            "limit".to_string(),
            CONTENT_TYPE_PAGE_SIZE.to_string(),
        )]));
        let mut loaded = 0;

        loop {
            let response = content_types.fetch(&request)?.into_result()?;
            let Some(collection) = response.collection() else {
                break;
            };
            loaded += collection.len();
            match collection.next_page() {
                Some(next) if next != request => request = next,
                Some(_) => {
                    warn!(
                        "Content type listing of space {} did not advance past skip {}",
                        space_id, collection.skip
                    );
                    break;
                }
                None => break,
            }
        }

        debug!("Loaded {} content types of space {}", loaded, space_id);
        Ok(loaded)
    }

    fn preload_dynamic_entries(&self) -> Result<(), ClientError> {
        for space_id in &self.configuration.dynamic_entries {
            self.spaces().find(space_id)?.into_result()?;
            self.update_dynamic_entry_cache_for_space(space_id)?;
        }
        Ok(())
    }
}

fn log_request(level: LogLevel, line: &str) {
    match level {
        LogLevel::Error => error!("{}", line),
        LogLevel::Warn => warn!("{}", line),
        LogLevel::Info => info!("{}", line),
        LogLevel::Debug => debug!("{}", line),
        LogLevel::Trace => trace!("{}", line),
    }
}

/// Builder for [`Client`], used to swap the transport or the resource builder
pub struct ClientBuilder {
    access_token: String,
    configuration: Configuration,
    transport: Option<Box<dyn Transport>>,
    resource_builder: Option<Box<dyn ResourceBuilder>>,
}

impl ClientBuilder {
    fn new(access_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            access_token: access_token.into(),
            configuration: Configuration::default(),
            transport: None,
            resource_builder: None,
        }
    }

    pub fn configuration(mut self, configuration: Configuration) -> ClientBuilder {
        self.configuration = configuration;
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> ClientBuilder {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn resource_builder(mut self, builder: impl ResourceBuilder + 'static) -> ClientBuilder {
        self.resource_builder = Some(Box::new(builder));
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let client = Client {
            access_token: self.access_token,
            configuration: self.configuration,
            transport: self
                .transport
                .unwrap_or_else(|| Box::new(ReqwestTransport::new())),
            resource_builder: self
                .resource_builder
                .unwrap_or_else(|| Box::new(DefaultResourceBuilder)),
            dynamic_entries: RwLock::new(DynamicEntryCache::new()),
        };
        client.preload_dynamic_entries()?;
        Ok(client)
    }
}
