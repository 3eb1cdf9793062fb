use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

/// API key accepted by `DELETE /pet/{id}` unless another one is configured.
pub const API_KEY: &str = "special-key";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default)]
    pub tags: Vec<Value>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ApiResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            code: 200,
            kind: "unknown".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            code: 1,
            kind: "error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct PetUpdateForm {
    pub name: Option<String>,
    pub status: Option<String>,
}

pub struct Store {
    pets: RwLock<BTreeMap<i64, Pet>>,
    next_id: AtomicI64,
    api_key: String,
}

impl Store {
    pub fn new(api_key: &str) -> Self {
        Self {
            pets: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            api_key: api_key.to_string(),
        }
    }

    fn assign_id(&self, pet: &mut Pet) -> i64 {
        let id = match pet.id {
            Some(id) if id > 0 => id,
            _ => self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        pet.id = Some(id);
        id
    }
}

pub type Db = Arc<Store>;

pub fn app() -> Router {
    router(Arc::new(Store::new(API_KEY)))
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/pet", post(create_pet).put(update_pet))
        .route("/pet/findByStatus", get(find_by_status))
        .route(
            "/pet/{id}",
            get(get_pet).post(update_pet_with_form).delete(delete_pet),
        )
        .route("/pet/{id}/uploadImage", post(upload_image))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_pet(State(db): State<Db>, Json(mut pet): Json<Pet>) -> Json<Pet> {
    let id = db.assign_id(&mut pet);
    db.pets.write().await.insert(id, pet.clone());
    Json(pet)
}

async fn update_pet(
    State(db): State<Db>,
    Json(pet): Json<Pet>,
) -> Result<Json<Pet>, (StatusCode, Json<ApiResponse>)> {
    let id = pet.id.ok_or((
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error("Invalid ID supplied")),
    ))?;
    let mut pets = db.pets.write().await;
    let slot = pets
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, Json(ApiResponse::error("Pet not found"))))?;
    *slot = pet.clone();
    Ok(Json(pet))
}

async fn find_by_status(State(db): State<Db>, Query(query): Query<StatusQuery>) -> Json<Vec<Pet>> {
    let wanted: Vec<String> = query
        .status
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let pets = db.pets.read().await;
    Json(
        pets.values()
            .filter(|p| p.status.as_ref().is_some_and(|s| wanted.contains(s)))
            .cloned()
            .collect(),
    )
}

async fn get_pet(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Pet>, (StatusCode, Json<ApiResponse>)> {
    let pets = db.pets.read().await;
    pets.get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, Json(ApiResponse::error("Pet not found"))))
}

async fn update_pet_with_form(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Form(input): Form<PetUpdateForm>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mut pets = db.pets.write().await;
    let pet = pets.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        pet.name = name;
    }
    if let Some(status) = input.status {
        pet.status = Some(status);
    }
    Ok(Json(ApiResponse::ok(id.to_string())))
}

async fn delete_pet(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse>, StatusCode> {
    let key = headers.get("api_key").and_then(|v| v.to_str().ok());
    if key != Some(db.api_key.as_str()) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let mut pets = db.pets.write().await;
    pets.remove(&id)
        .map(|_| Json(ApiResponse::ok(id.to_string())))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn upload_image(
    State(db): State<Db>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mut file: Option<(String, usize)> = None;
    let mut metadata: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                file = Some((name, bytes.len()));
            }
            Some("additionalMetadata") => {
                metadata = Some(field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?);
            }
            _ => {}
        }
    }

    let (name, size) = file.ok_or(StatusCode::BAD_REQUEST)?;
    let mut pets = db.pets.write().await;
    let pet = pets.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    pet.photo_urls.push(format!("/uploads/{name}"));

    let mut message = String::new();
    if let Some(metadata) = metadata {
        message.push_str(&format!("additionalMetadata: {metadata}\n"));
    }
    message.push_str(&format!("File uploaded to ./{name}, {size} bytes"));
    Ok(Json(ApiResponse::ok(message)))
}
