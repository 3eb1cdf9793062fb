//! Pet pages: list, show, create, edit, delete and photo upload.
//!
//! Successful writes redirect with a flash message; failed writes re-render
//! the submitted form with the gateway error so no input is lost.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use petstore_core::error::validation_message;
use petstore_core::mapper::parse_photo_urls;
use petstore_core::{
    payload_from_form, sort_pets, GatewayError, PetForm, PetStatus, PetView, SortDirection,
    SortKey,
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{gateway_status, WebResult};
use crate::routes::{redirect_with, FlashKind};
use crate::state::AppState;
use crate::views::{self, Flash, IndexPage};

/// Query parameters of the list page
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

/// Photo upload submission, collected from the multipart stream
#[derive(Debug, Default, Validate)]
struct PhotoUpload {
    file_name: Option<String>,
    /// Empty when the part carried no content type.
    #[validate(custom = "image_content_type")]
    content_type: String,
    #[validate(length(min = 1, message = "Choose a photo to upload."))]
    bytes: Vec<u8>,
    #[validate(length(
        max = 255,
        message = "The description may not be longer than 255 characters."
    ))]
    additional_metadata: Option<String>,
}

fn image_content_type(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("image/") {
        return Ok(());
    }
    let mut err = ValidationError::new("content_type");
    err.message = Some("The uploaded file must be an image.".into());
    Err(err)
}

/// `GET /` - pets with one status, sorted in memory
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
    Query(flash): Query<Flash>,
) -> Html<String> {
    // Unknown statuses fall back to the default filter.
    let status = query
        .status
        .as_deref()
        .and_then(PetStatus::from_value)
        .unwrap_or_default();
    let sort = SortKey::parse(query.sort.as_deref());
    let dir = SortDirection::parse(query.dir.as_deref());

    let (mut pets, error) = match state.gateway.list_by_status(status).await {
        Ok(raw) => (raw.into_iter().map(PetView::from_raw).collect::<Vec<_>>(), None),
        Err(err) => {
            tracing::warn!(%status, error = %err, "listing pets failed");
            (Vec::new(), Some(err.envelope()))
        }
    };
    sort_pets(&mut pets, sort, dir);

    Html(views::index(&IndexPage {
        pets,
        status,
        sort,
        dir,
        error,
        flash,
    }))
}

/// `GET /pets/create`
pub async fn create_form() -> Html<String> {
    let form = PetForm {
        status: PetStatus::default().as_str().to_string(),
        ..PetForm::default()
    };
    Html(views::create_form(&form, None))
}

/// `POST /pets`
pub async fn store(State(state): State<Arc<AppState>>, Form(form): Form<PetForm>) -> Response {
    let result = match payload_from_form(&form, None) {
        Ok(payload) => state.gateway.create(&payload).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(pet) => match pet.id {
            Some(id) => {
                tracing::info!(id, "pet created");
                redirect_with(
                    &format!("/pets/{id}"),
                    FlashKind::Notice,
                    "Pet added. You can upload a photo now.",
                )
                .into_response()
            }
            None => redirect_with(
                "/",
                FlashKind::Notice,
                "Pet added, but no ID was returned. Add the photo from the list.",
            )
            .into_response(),
        },
        Err(err) => {
            tracing::warn!(error = %err, "creating pet failed");
            (
                gateway_status(&err),
                Html(views::create_form(&form, Some(&err.envelope()))),
            )
                .into_response()
        }
    }
}

/// `GET /pets/{id}`
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(flash): Query<Flash>,
) -> Response {
    match state.gateway.get_by_id(id).await {
        Ok(raw) => Html(views::show(&PetView::from_raw(raw), &flash)).into_response(),
        Err(err) => back_to_list(id, err),
    }
}

/// `GET /pets/{id}/edit`
pub async fn edit(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.gateway.get_by_id(id).await {
        Ok(raw) => {
            let pet = PetView::from_raw(raw);
            let form = PetForm {
                name: pet.name.clone(),
                status: pet.known_status().unwrap_or_default().as_str().to_string(),
                category: pet.category.clone(),
                tags: Some(pet.tags_csv()),
                photo_urls: None,
            };
            Html(views::edit_form(id, &form, &pet.photo_urls, None)).into_response()
        }
        Err(err) => back_to_list(id, err),
    }
}

/// `PUT /pets/{id}` (also `POST`, for plain HTML forms)
///
/// The edit form sends the pet's photos back in a hidden field, so they
/// survive the full update and are listed again if it fails.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<PetForm>,
) -> Response {
    let result = match payload_from_form(&form, Some(id)) {
        Ok(payload) => state.gateway.update(&payload).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => {
            tracing::info!(id, "pet updated");
            redirect_with(&format!("/pets/{id}"), FlashKind::Notice, "Pet updated.").into_response()
        }
        Err(err) => {
            tracing::warn!(id, error = %err, "updating pet failed");
            let photo_urls = parse_photo_urls(form.photo_urls.as_deref().unwrap_or_default());
            (
                gateway_status(&err),
                Html(views::edit_form(id, &form, &photo_urls, Some(&err.envelope()))),
            )
                .into_response()
        }
    }
}

/// `DELETE /pets/{id}` (also `POST /pets/{id}/delete`)
pub async fn destroy(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.gateway.delete(id).await {
        Ok(()) => {
            tracing::info!(id, "pet deleted");
            redirect_with("/", FlashKind::Notice, "Pet deleted.").into_response()
        }
        Err(err) => {
            tracing::warn!(id, error = %err, "deleting pet failed");
            redirect_with(&format!("/pets/{id}"), FlashKind::Error, &err.message()).into_response()
        }
    }
}

/// `POST /pets/{id}/photo`
///
/// The photo is written to a named temp file inside the upload directory so
/// the gateway can send it from disk; the file is removed when the handler
/// returns, whatever the outcome.
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> WebResult<Response> {
    let back = format!("/pets/{id}");
    let upload = read_upload(multipart).await?;

    if let Err(message) = validate_upload(&upload, state.config.max_upload_bytes()) {
        return Ok(redirect_with(&back, FlashKind::Error, &message).into_response());
    }

    let suffix = upload
        .file_name
        .as_deref()
        .and_then(|name| FsPath::new(name).extension())
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let stored = tempfile::Builder::new()
        .prefix("pet-")
        .suffix(&suffix)
        .tempfile_in(state.config.upload_dir())?;
    tokio::fs::write(stored.path(), &upload.bytes).await?;

    let result = state
        .gateway
        .upload_image(id, stored.path(), upload.additional_metadata.as_deref())
        .await;
    drop(stored);

    match result {
        Ok(outcome) => {
            tracing::info!(id, code = outcome.code, "pet photo uploaded");
            let mut target = format!("/pets/{id}");
            if let Some(message) = outcome.response.message.filter(|m| !m.is_empty()) {
                target.push_str(&format!("?detail={}", urlencoding::encode(&message)));
            }
            Ok(redirect_with(&target, FlashKind::Notice, "Photo uploaded.").into_response())
        }
        Err(err) => {
            tracing::warn!(id, error = %err, "uploading pet photo failed");
            Ok(redirect_with(&back, FlashKind::Error, &err.message()).into_response())
        }
    }
}

async fn read_upload(mut multipart: Multipart) -> WebResult<PhotoUpload> {
    let mut upload = PhotoUpload::default();
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("photo") => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().unwrap_or_default().to_string();
                upload.bytes = field.bytes().await?.to_vec();
            }
            Some("additionalMetadata") => {
                let text = field.text().await?;
                upload.additional_metadata = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }
    Ok(upload)
}

fn validate_upload(upload: &PhotoUpload, max_bytes: usize) -> Result<(), String> {
    upload
        .validate()
        .map_err(|errors| validation_message(&errors))?;
    // Size limit comes from config.
    if upload.bytes.len() > max_bytes {
        return Err(format!(
            "The photo may not be larger than {} KB.",
            max_bytes / 1024
        ));
    }
    Ok(())
}

/// Failed reads on show/edit go back to the list with the gateway message.
fn back_to_list(id: i64, err: GatewayError) -> Response {
    tracing::warn!(id, error = %err, "fetching pet failed");
    redirect_with("/", FlashKind::Error, &err.message()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: &[u8], content_type: Option<&str>, metadata: Option<&str>) -> PhotoUpload {
        PhotoUpload {
            file_name: Some("cat.png".to_string()),
            content_type: content_type.unwrap_or_default().to_string(),
            bytes: bytes.to_vec(),
            additional_metadata: metadata.map(str::to_string),
        }
    }

    #[test]
    fn upload_requires_an_image() {
        assert!(validate_upload(&upload(b"", Some("image/png"), None), 1024).is_err());
        assert!(validate_upload(&upload(b"x", Some("text/plain"), None), 1024).is_err());
        assert!(validate_upload(&upload(b"x", None, None), 1024).is_err());
        assert!(validate_upload(&upload(b"x", Some("image/png"), None), 1024).is_ok());
    }

    #[test]
    fn upload_enforces_size_and_metadata_length() {
        assert!(validate_upload(&upload(&[0; 2048], Some("image/jpeg"), None), 1024).is_err());
        let long = "m".repeat(256);
        let err = validate_upload(&upload(b"x", Some("image/jpeg"), Some(&long)), 1024).unwrap_err();
        assert_eq!(err, "The description may not be longer than 255 characters.");
    }

    #[test]
    fn upload_errors_are_plain_sentences() {
        let err = validate_upload(&upload(b"x", Some("text/plain"), None), 1024).unwrap_err();
        assert_eq!(err, "The uploaded file must be an image.");
        let err = validate_upload(&upload(b"", Some("image/png"), None), 1024).unwrap_err();
        assert_eq!(err, "Choose a photo to upload.");
    }
}
