//! Client library for the Contentful Content Management API.
//!
//! This crate composes authenticated requests, sends them through a pluggable
//! transport, classifies the responses, and keeps a cache of content type
//! schemas so entries can be read as typed dynamic entries.
//!
//! # Modules
//!
//! - `client`: the `Client`, request dispatch and the dynamic entry cache
//! - `configuration`: client options and their defaults
//! - `dynamic_entry`: entry descriptors, the descriptor cache and `DynamicEntry`
//! - `error`: error types
//! - `headers`: header composition and the per-call `RequestContext`
//! - `logging`: optional `tracing` subscriber setup
//! - `request`: request descriptors
//! - `resources`: per-resource factories (spaces, entries, assets, ...)
//! - `response`: response classification
//! - `transport`: the `Transport` trait and the `reqwest` based default
//!
//! # Example
//!
//! ```no_run
//! use contentful_management::{Client, Configuration, Query, ResponseObject};
//!
//! fn main() -> Result<(), contentful_management::ClientError> {
//!     let configuration = Configuration {
//!         raise_errors: true,
//!         dynamic_entries: vec!["my-space".to_string()],
//!         ..Configuration::default()
//!     };
//!     let client = Client::new("CMA_TOKEN", configuration)?;
//!
//!     let response = client.entries("my-space").all(Query::new())?;
//!     if let ResponseObject::Collection(page) = response.object {
//!         for item in page.items {
//!             let entry = client.wrap_entry(item);
//!             println!("{:?}", entry.resource().id());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod configuration;
pub mod dynamic_entry;
pub mod error;
pub mod headers;
pub mod logging;
pub mod request;
pub mod resources;
pub mod response;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use configuration::{Configuration, ConfigurationError, LogLevel};
pub use dynamic_entry::{
    DynamicEntry, DynamicEntryCache, Entry, EntryDescriptor, FieldDescriptor, FieldType,
    FieldViolation,
};
pub use error::{ApiError, ApiErrorKind, ClientError};
pub use headers::RequestContext;
pub use request::{Query, Request};
pub use response::{
    Collection, DefaultResourceBuilder, Resource, ResourceBuilder, ResourceKind, Response,
    ResponseObject,
};
pub use transport::{ProxySettings, RawResponse, ReqwestTransport, Transport, TransportError, TransportRequest};
