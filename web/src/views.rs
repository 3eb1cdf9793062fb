//! HTML rendering.
//!
//! Pages are handlebars templates compiled into the binary from
//! `web/templates/`. Every `{{value}}` is escaped with `html-escape`, which
//! is safe in text and in double-quoted attributes alike.

use std::sync::OnceLock;

use axum::http::StatusCode;
use handlebars::{Handlebars, TemplateError};
use html_escape::encode_double_quoted_attribute;
use petstore_core::mapper::photo_urls_field;
use petstore_core::{ErrorEnvelope, PetForm, PetStatus, PetView, SortDirection, SortKey};
use serde::{Deserialize, Serialize};

const PARTIALS: [(&str, &str); 7] = [
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
    ("flash", include_str!("../templates/partials/flash.hbs")),
    ("error_block", include_str!("../templates/partials/error_block.hbs")),
    ("status_select", include_str!("../templates/partials/status_select.hbs")),
    ("pet_fields", include_str!("../templates/partials/pet_fields.hbs")),
    ("photos", include_str!("../templates/partials/photos.hbs")),
];

const PAGES: [(&str, &str); 5] = [
    ("index", include_str!("../templates/index.hbs")),
    ("create", include_str!("../templates/create.hbs")),
    ("edit", include_str!("../templates/edit.hbs")),
    ("show", include_str!("../templates/show.hbs")),
    ("error", include_str!("../templates/error.hbs")),
];

static TEMPLATES: OnceLock<Handlebars<'static>> = OnceLock::new();

/// Build the template registry with every page and partial.
pub fn build_registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);
    handlebars.register_escape_fn(|value| encode_double_quoted_attribute(value).into_owned());

    for (name, source) in PARTIALS {
        handlebars.register_partial(name, source)?;
    }
    for (name, source) in PAGES {
        handlebars.register_template_string(name, source)?;
    }
    Ok(handlebars)
}

fn registry() -> &'static Handlebars<'static> {
    TEMPLATES.get_or_init(|| {
        build_registry().unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to compile page templates");
            Handlebars::new()
        })
    })
}

fn render<T: Serialize>(name: &str, data: &T) -> String {
    match registry().render(name, data) {
        Ok(html) => html,
        Err(err) => {
            tracing::error!(template = name, error = %err, "failed to render page");
            "<!DOCTYPE html>\n<html><body><h1>500 Internal Server Error</h1>\
             <p>The page could not be rendered.</p></body></html>\n"
                .to_string()
        }
    }
}

/// One-shot messages carried on the redirect target's query string.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Flash {
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

pub struct IndexPage {
    pub pets: Vec<PetView>,
    pub status: PetStatus,
    pub sort: SortKey,
    pub dir: SortDirection,
    pub error: Option<ErrorEnvelope>,
    pub flash: Flash,
}

#[derive(Serialize)]
struct StatusOption {
    value: &'static str,
    label: &'static str,
}

fn status_options() -> Vec<StatusOption> {
    PetStatus::options()
        .into_iter()
        .map(|(value, label)| StatusOption { value, label })
        .collect()
}

/// Gateway error as shown above a form or list.
#[derive(Serialize)]
struct ErrorView {
    message: String,
    status: Option<u16>,
    details: Option<String>,
}

impl ErrorView {
    fn from_envelope(envelope: &ErrorEnvelope) -> Self {
        let details = envelope
            .details
            .as_ref()
            .map(|details| match details {
                serde_json::Value::String(text) => text.clone(),
                other => serde_json::to_string_pretty(other).unwrap_or_default(),
            })
            .filter(|text| !text.is_empty());
        Self {
            message: envelope.error.clone(),
            status: envelope.status,
            details,
        }
    }
}

/// Column header linking to the list sorted by `key`.
#[derive(Serialize)]
struct SortColumn {
    title: &'static str,
    href: String,
    active: bool,
    descending: bool,
}

impl SortColumn {
    fn new(page: &IndexPage, key: SortKey, title: &'static str) -> Self {
        let active = page.sort == key;
        let dir = if active {
            page.dir.toggled()
        } else {
            SortDirection::Asc
        };
        Self {
            title,
            href: format!(
                "/?status={}&sort={}&dir={}",
                page.status,
                key.as_str(),
                dir.as_str()
            ),
            active,
            descending: page.dir == SortDirection::Desc,
        }
    }
}

#[derive(Serialize)]
struct IndexData<'a> {
    title: &'static str,
    status_label: &'static str,
    selected_status: &'static str,
    statuses: Vec<StatusOption>,
    sort: &'static str,
    dir: &'static str,
    columns: Vec<SortColumn>,
    pets: &'a [PetView],
    flash: &'a Flash,
    error: Option<ErrorView>,
}

/// Pet list filtered by status.
pub fn index(page: &IndexPage) -> String {
    render(
        "index",
        &IndexData {
            title: "Pets",
            status_label: page.status.label(),
            selected_status: page.status.as_str(),
            statuses: status_options(),
            sort: page.sort.as_str(),
            dir: page.dir.as_str(),
            columns: vec![
                SortColumn::new(page, SortKey::Id, "ID"),
                SortColumn::new(page, SortKey::Name, "Name"),
                SortColumn::new(page, SortKey::Status, "Status"),
            ],
            pets: &page.pets,
            flash: &page.flash,
            error: page.error.as_ref().map(ErrorView::from_envelope),
        },
    )
}

#[derive(Serialize)]
struct FormData<'a> {
    title: &'static str,
    id: Option<i64>,
    form: &'a PetForm,
    selected_status: &'a str,
    statuses: Vec<StatusOption>,
    photo_urls: &'a [String],
    photo_urls_field: String,
    error: Option<ErrorView>,
}

impl<'a> FormData<'a> {
    fn new(
        title: &'static str,
        id: Option<i64>,
        form: &'a PetForm,
        photo_urls: &'a [String],
        error: Option<&ErrorEnvelope>,
    ) -> Self {
        Self {
            title,
            id,
            form,
            selected_status: &form.status,
            statuses: status_options(),
            photo_urls,
            photo_urls_field: photo_urls_field(photo_urls),
            error: error.map(ErrorView::from_envelope),
        }
    }
}

/// Create form, optionally re-rendered with submitted values and an error.
pub fn create_form(form: &PetForm, error: Option<&ErrorEnvelope>) -> String {
    render("create", &FormData::new("Add pet", None, form, &[], error))
}

/// Edit form for pet `id`. `photo_urls` are listed below the form and sent
/// back with it.
pub fn edit_form(
    id: i64,
    form: &PetForm,
    photo_urls: &[String],
    error: Option<&ErrorEnvelope>,
) -> String {
    render(
        "edit",
        &FormData::new("Edit pet", Some(id), form, photo_urls, error),
    )
}

#[derive(Serialize)]
struct ShowData<'a> {
    title: &'a str,
    pet: &'a PetView,
    tags: String,
    photo_urls: &'a [String],
    flash: &'a Flash,
}

/// Pet details with the photo upload form.
pub fn show(pet: &PetView, flash: &Flash) -> String {
    render(
        "show",
        &ShowData {
            title: &pet.name,
            pet,
            tags: pet.tags_csv(),
            photo_urls: &pet.photo_urls,
            flash,
        },
    )
}

#[derive(Serialize)]
struct ErrorData<'a> {
    title: &'static str,
    status: String,
    message: &'a str,
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    render(
        "error",
        &ErrorData {
            title: "Error",
            status: status.to_string(),
            message,
        },
    )
}
