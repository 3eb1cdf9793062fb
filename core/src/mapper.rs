//! Pure transformations between upstream JSON and form/display shapes.

use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::error::{GatewayError, GatewayResult};
use crate::types::{Category, NameRef, PetForm, PetPayload, PetStatus, RawPet, Tag};

/// Shown when a record carries no status at all.
pub const MISSING_STATUS: &str = "-";

/// Label for recognized statuses, the raw value otherwise, `-` when absent.
pub fn status_label(raw: Option<&str>) -> String {
    match raw {
        Some(value) => PetStatus::from_value(value)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| value.to_string()),
        None => MISSING_STATUS.to_string(),
    }
}

pub fn category_name(category: Option<&NameRef>) -> Option<String> {
    category.and_then(NameRef::name).map(str::to_string)
}

/// Names of all tags that carry one, in upstream order.
pub fn tag_names(tags: &[NameRef]) -> Vec<String> {
    tags.iter().filter_map(NameRef::name).map(str::to_string).collect()
}

pub fn photo_urls(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Display-ready pet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetView {
    pub id: Option<i64>,
    pub name: String,
    /// Raw upstream status value.
    pub status: Option<String>,
    pub status_label: String,
    pub category: Option<String>,
    pub tag_names: Vec<String>,
    pub photo_urls: Vec<String>,
}

impl PetView {
    pub fn from_raw(raw: RawPet) -> Self {
        Self {
            id: raw.id,
            status_label: status_label(raw.status.as_deref()),
            category: category_name(raw.category.as_ref()),
            tag_names: tag_names(&raw.tags),
            photo_urls: photo_urls(&raw.photo_urls),
            name: raw.name.unwrap_or_default(),
            status: raw.status,
        }
    }

    /// Recognized status, used to preselect the edit form.
    pub fn known_status(&self) -> Option<PetStatus> {
        self.status.as_deref().and_then(PetStatus::from_value)
    }

    /// Tags joined for the edit form's text field.
    pub fn tags_csv(&self) -> String {
        self.tag_names.join(", ")
    }
}

/// Split a comma-separated tag list into tag objects, dropping blanks.
pub fn parse_tags(csv: &str) -> Vec<Tag> {
    csv.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Tag::named)
        .collect()
}

/// `Some({name})` for a non-blank category, `None` otherwise.
pub fn category_payload(input: Option<&str>) -> Option<Category> {
    input
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|name| Category {
            id: None,
            name: name.to_string(),
        })
}

/// Photo URLs from the edit form's hidden field, in order.
pub fn parse_photo_urls(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

/// Inverse of [`parse_photo_urls`], for the edit form.
pub fn photo_urls_field(urls: &[String]) -> String {
    urls.join(" ")
}

/// Validate a submitted form and turn it into an upstream payload.
///
/// Rejects a blank or overlong name, an overlong category, and any status
/// outside the allow-list. Absent category, tags and photos are left out.
pub fn payload_from_form(form: &PetForm, id: Option<i64>) -> GatewayResult<PetPayload> {
    form.validate()?;
    let status = PetStatus::from_value(form.status.trim()).ok_or_else(|| {
        GatewayError::Validation(format!("\"{}\" is not a valid status.", form.status))
    })?;

    Ok(PetPayload::new(form.name.trim(), status)
        .with_id(id)
        .with_category(category_payload(form.category.as_deref()))
        .with_tags(parse_tags(form.tags.as_deref().unwrap_or_default()))
        .with_photo_urls(parse_photo_urls(
            form.photo_urls.as_deref().unwrap_or_default(),
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAX_FIELD_CHARS: usize = 255;

    fn form(name: &str, status: &str, category: Option<&str>, tags: Option<&str>) -> PetForm {
        PetForm {
            name: name.to_string(),
            status: status.to_string(),
            category: category.map(str::to_string),
            tags: tags.map(str::to_string),
            photo_urls: None,
        }
    }

    #[test]
    fn status_label_falls_back_to_raw_or_dash() {
        assert_eq!(status_label(Some("pending")), "Oczekujący");
        assert_eq!(status_label(Some("adopted")), "adopted");
        assert_eq!(status_label(None), "-");
    }

    #[test]
    fn tags_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_tags("a, b ,,c"),
            vec![Tag::named("a"), Tag::named("b"), Tag::named("c")]
        );
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn category_is_wrapped_or_omitted() {
        assert_eq!(
            category_payload(Some("Pies")),
            Some(Category {
                id: None,
                name: "Pies".to_string()
            })
        );
        assert_eq!(category_payload(Some("")), None);
        assert_eq!(category_payload(None), None);
    }

    #[test]
    fn payload_from_form_builds_full_payload() {
        let payload =
            payload_from_form(&form("Reksio", "sold", Some("Pies"), Some("a, b ,,c")), Some(3))
                .unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "id": 3,
                "name": "Reksio",
                "status": "sold",
                "category": {"name": "Pies"},
                "tags": [{"name": "a"}, {"name": "b"}, {"name": "c"}]
            })
        );
    }

    #[test]
    fn payload_from_form_omits_empty_category_and_tags() {
        let payload = payload_from_form(&form("Reksio", "available", Some(""), None), None).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "Reksio", "status": "available"})
        );
    }

    #[test]
    fn payload_from_form_rejects_unknown_status() {
        for status in ["", "lost", "Available", "SOLD", "adopted"] {
            let err = payload_from_form(&form("Reksio", status, None, None), None).unwrap_err();
            assert!(matches!(err, GatewayError::Validation(_)), "{status}");
        }
    }

    #[test]
    fn payload_from_form_rejects_blank_or_long_name() {
        assert!(payload_from_form(&form("   ", "available", None, None), None).is_err());
        let long = "x".repeat(MAX_FIELD_CHARS + 1);
        assert!(payload_from_form(&form(&long, "available", None, None), None).is_err());
        let long_category = "k".repeat(MAX_FIELD_CHARS + 1);
        assert!(
            payload_from_form(&form("Reksio", "available", Some(&long_category), None), None)
                .is_err()
        );
    }

    #[test]
    fn payload_from_form_reports_every_failed_field() {
        let long_category = "k".repeat(MAX_FIELD_CHARS + 1);
        let err = payload_from_form(&form(" ", "lost", Some(&long_category), None), None)
            .unwrap_err();
        let message = err.message();
        assert!(message.contains("\"category\" may not be longer"), "{message}");
        assert!(message.contains("\"name\" is required."), "{message}");
        assert!(message.contains("\"lost\" is not a valid status."), "{message}");
    }

    #[test]
    fn name_limit_counts_characters_not_bytes() {
        let polish = "ż".repeat(MAX_FIELD_CHARS);
        assert!(payload_from_form(&form(&polish, "available", None, None), None).is_ok());
    }

    #[test]
    fn photo_urls_round_trip_through_the_form() {
        let urls = vec![
            "https://img/a.png".to_string(),
            "https://img/b.png".to_string(),
        ];
        let mut edited = form("Reksio", "sold", None, None);
        edited.photo_urls = Some(photo_urls_field(&urls));

        let payload = payload_from_form(&edited, Some(4)).unwrap();
        assert_eq!(payload.photo_urls, Some(urls));
        assert_eq!(parse_photo_urls("  "), Vec::<String>::new());
    }

    #[test]
    fn view_flattens_duck_typed_fields() {
        let raw: RawPet = serde_json::from_value(json!({
            "id": 7,
            "name": "Mruczek",
            "status": "pending",
            "category": {"id": 2, "name": "Kot"},
            "tags": [{"name": "czarny"}, "mały", {"id": 9}],
            "photoUrls": ["https://img/m.png", "", null]
        }))
        .unwrap();
        let view = PetView::from_raw(raw);
        assert_eq!(view.status_label, "Oczekujący");
        assert_eq!(view.known_status(), Some(PetStatus::Pending));
        assert_eq!(view.category.as_deref(), Some("Kot"));
        assert_eq!(view.tags_csv(), "czarny, mały");
        assert_eq!(view.photo_urls, vec!["https://img/m.png".to_string()]);
    }

    #[test]
    fn view_of_sparse_record() {
        let view = PetView::from_raw(RawPet::default());
        assert_eq!(view.name, "");
        assert_eq!(view.status_label, "-");
        assert_eq!(view.category, None);
        assert!(view.tag_names.is_empty());
    }
}
