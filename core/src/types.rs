//! Domain DTOs for the pet-store API.
//!
//! # Design
//! Reads and writes use different types. `RawPet` decodes whatever the
//! upstream returns without failing on odd records: category and tag items
//! may be strings or `{name}` objects, ids may be numbers or numeric strings,
//! and photo URLs may hold nulls. `PetPayload` is the strict write shape,
//! with a typed `PetStatus` and every optional field skipped when absent.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Lifecycle state of a pet as tracked by the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub const ALL: [PetStatus; 3] = [PetStatus::Available, PetStatus::Pending, PetStatus::Sold];

    pub fn as_str(self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }

    /// Display label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            PetStatus::Available => "Dostępny",
            PetStatus::Pending => "Oczekujący",
            PetStatus::Sold => "Sprzedany",
        }
    }

    /// Exact, case-sensitive match against the wire values.
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// `(value, label)` pairs in declaration order, for select boxes.
    pub fn options() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|s| (s.as_str(), s.label())).collect()
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category or tag reference as it arrives from the upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NameRef {
    Text(String),
    Object {
        #[serde(default)]
        name: Option<Value>,
    },
    Other(Value),
}

impl NameRef {
    /// The non-empty name carried by this reference, if any.
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            NameRef::Text(text) => text.as_str(),
            NameRef::Object {
                name: Some(Value::String(text)),
            } => text.as_str(),
            _ => return None,
        };
        (!name.is_empty()).then_some(name)
    }
}

/// A pet record as returned by the upstream, decoded leniently.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPet {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<NameRef>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<NameRef>,
    #[serde(default, rename = "photoUrls", deserialize_with = "lenient_seq")]
    pub photo_urls: Vec<Value>,
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Request payload for `POST /pet` and `PUT /pet`.
///
/// Optional fields are only serialized when set; use the `with_*` builders,
/// which ignore empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub status: PetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_urls: Option<Vec<String>>,
}

impl PetPayload {
    pub fn new(name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            id: None,
            name: name.into(),
            status,
            category: None,
            tags: None,
            photo_urls: None,
        }
    }

    pub fn with_id(mut self, id: Option<i64>) -> Self {
        self.id = id;
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category.filter(|c| !c.name.is_empty());
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = (!tags.is_empty()).then_some(tags);
        self
    }

    pub fn with_photo_urls(mut self, urls: Vec<String>) -> Self {
        let urls: Vec<String> = urls.into_iter().filter(|u| !u.is_empty()).collect();
        self.photo_urls = (!urls.is_empty()).then_some(urls);
        self
    }
}

/// Inbound create/edit form, exactly as submitted.
///
/// `photo_urls` is a hidden field on the edit form carrying the pet's
/// current photos, space separated, so a full update keeps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PetForm {
    #[serde(default)]
    #[validate(
        custom = "not_blank",
        length(max = 255, message = "\"name\" may not be longer than 255 characters.")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "known_status")]
    pub status: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "\"category\" may not be longer than 255 characters."))]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub photo_urls: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("\"name\" is required.".into());
        return Err(err);
    }
    Ok(())
}

fn known_status(value: &str) -> Result<(), ValidationError> {
    if PetStatus::from_value(value.trim()).is_none() {
        let mut err = ValidationError::new("status");
        err.message = Some(format!("\"{value}\" is not a valid status.").into());
        return Err(err);
    }
    Ok(())
}

/// Generic upstream acknowledgement (`ApiResponse` in the pet-store schema).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of a successful image upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// HTTP status of the upstream response.
    pub code: u16,
    pub response: ApiMessage,
}
