//! Dynamic entries.
//!
//! A content type describes the fields of the entries created from it. The
//! cache keeps one `EntryDescriptor` per content type id so that entries can be
//! wrapped in a `DynamicEntry`, which reads and validates field values against
//! the schema instead of handing out raw JSON maps.
//!
//! Lookups for content types that are not cached are not an error: callers
//! get the generic representation back (see [`Entry::Generic`]).

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::trace;

use crate::response::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
pub enum FieldType {
    Symbol,
    Text,
    RichText,
    Integer,
    Number,
    Date,
    Boolean,
    Location,
    Link,
    Array,
    Object,
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Whether a JSON value is acceptable for a field of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Symbol | FieldType::Text | FieldType::Date => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Location => {
                value.get("lat").is_some_and(Value::is_number)
                    && value.get("lon").is_some_and(Value::is_number)
            }
            FieldType::Link => value.get("sys").is_some_and(Value::is_object),
            FieldType::Array => value.is_array(),
            FieldType::RichText | FieldType::Object => value.is_object(),
            FieldType::Unknown => true,
        }
    }
}

/// Element schema of an `Array` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsDescriptor {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub link_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub items: Option<ItemsDescriptor>,
}

impl FieldDescriptor {
    fn accepts(&self, value: &Value) -> bool {
        if !self.field_type.accepts(value) {
            return false;
        }
        match (&self.items, value.as_array()) {
            (Some(items), Some(elements)) => elements
                .iter()
                .all(|element| items.field_type.accepts(element)),
            _ => true,
        }
    }
}

/// Schema of the entries of one content type
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDescriptor {
    pub content_type_id: String,
    pub name: String,
    pub display_field: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl EntryDescriptor {
    /// Build a descriptor from a `ContentType` resource
    pub fn from_content_type(content_type: &Resource) -> Result<EntryDescriptor, serde_json::Error> {
        let fields = match content_type.attribute("fields") {
            Some(fields) => Vec::<FieldDescriptor>::deserialize(fields)?,
            None => Vec::new(),
        };

        Ok(EntryDescriptor {
            content_type_id: content_type.id().unwrap_or_default().to_string(),
            name: content_type
                .attribute("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            display_field: content_type
                .attribute("displayField")
                .and_then(Value::as_str)
                .map(str::to_string),
            fields,
        })
    }

    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// Registry of entry descriptors keyed by content type id (case-sensitive)
#[derive(Debug, Default, Clone)]
pub struct DynamicEntryCache {
    descriptors: HashMap<String, Arc<EntryDescriptor>>,
}

impl DynamicEntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the descriptor for `key`, returning the previous one
    pub fn register(
        &mut self,
        key: impl Into<String>,
        descriptor: EntryDescriptor,
    ) -> Option<Arc<EntryDescriptor>> {
        let key = key.into();
        trace!("Registering dynamic entry for content type {}", key);
        self.descriptors.insert(key, Arc::new(descriptor))
    }

    /// Register the descriptor of a `ContentType` resource under its id
    pub fn register_content_type(
        &mut self,
        content_type: &Resource,
    ) -> Result<Arc<EntryDescriptor>, serde_json::Error> {
        let descriptor = EntryDescriptor::from_content_type(content_type)?;
        let key = descriptor.content_type_id.clone();
        self.register(key.clone(), descriptor);
        Ok(Arc::clone(&self.descriptors[&key]))
    }

    pub fn get(&self, key: &str) -> Option<Arc<EntryDescriptor>> {
        self.descriptors.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptors.contains_key(key)
    }

    /// Registered content type ids, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.descriptors.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// The entry has a field the content type does not declare
    UnknownField(String),
    /// A required, enabled field has no value for the locale
    MissingRequired(String),
    TypeMismatch { field: String, expected: FieldType },
}

/// An entry read through the descriptor of its content type
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicEntry {
    descriptor: Arc<EntryDescriptor>,
    resource: Resource,
    default_locale: String,
}

impl DynamicEntry {
    pub fn new(
        descriptor: Arc<EntryDescriptor>,
        resource: Resource,
        default_locale: impl Into<String>,
    ) -> DynamicEntry {
        DynamicEntry {
            descriptor,
            resource,
            default_locale: default_locale.into(),
        }
    }

    pub fn descriptor(&self) -> &EntryDescriptor {
        &self.descriptor
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn into_resource(self) -> Resource {
        self.resource
    }

    pub fn id(&self) -> Option<&str> {
        self.resource.id()
    }

    /// Value of a declared field in the default locale
    pub fn field(&self, id: &str) -> Option<&Value> {
        self.field_for_locale(id, &self.default_locale)
    }

    /// Value of a declared field in the given locale; undeclared fields read as `None`
    pub fn field_for_locale(&self, id: &str, locale: &str) -> Option<&Value> {
        self.descriptor.field(id)?;
        self.resource.fields()?.get(id)?.get(locale)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.field(id).and_then(Value::as_str)
    }

    pub fn integer(&self, id: &str) -> Option<i64> {
        self.field(id).and_then(Value::as_i64)
    }

    pub fn number(&self, id: &str) -> Option<f64> {
        self.field(id).and_then(Value::as_f64)
    }

    pub fn boolean(&self, id: &str) -> Option<bool> {
        self.field(id).and_then(Value::as_bool)
    }

    /// Value of the content type's display field in the default locale
    pub fn display_value(&self) -> Option<&Value> {
        let display_field = self.descriptor.display_field.as_deref()?;
        self.field(display_field)
    }

    /// Check the entry's values for one locale against the descriptor
    pub fn validate(&self, locale: &str) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if let Some(fields) = self.resource.fields() {
            for id in fields.keys() {
                if self.descriptor.field(id).is_none() {
                    violations.push(FieldViolation::UnknownField(id.clone()));
                }
            }
        }

        for field in &self.descriptor.fields {
            match self.field_for_locale(&field.id, locale) {
                None | Some(Value::Null) => {
                    if field.required && !field.disabled {
                        violations.push(FieldViolation::MissingRequired(field.id.clone()));
                    }
                }
                Some(value) => {
                    if !field.accepts(value) {
                        violations.push(FieldViolation::TypeMismatch {
                            field: field.id.clone(),
                            expected: field.field_type,
                        });
                    }
                }
            }
        }

        violations
    }
}

/// An entry in its most specific available representation
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Dynamic(DynamicEntry),
    Generic(Resource),
}

impl Entry {
    pub fn resource(&self) -> &Resource {
        match self {
            Entry::Dynamic(entry) => entry.resource(),
            Entry::Generic(resource) => resource,
        }
    }

    pub fn as_dynamic(&self) -> Option<&DynamicEntry> {
        match self {
            Entry::Dynamic(entry) => Some(entry),
            Entry::Generic(_) => None,
        }
    }
}
