//! The only component that talks to the upstream pet-store API.
//!
//! # Design
//! `PetGateway` pairs a `PetstoreClient` with a `Transport`. Every operation
//! runs the same sequence: configuration check, request build (which carries
//! field validation), one transport call, response parse. Any failure along
//! the way comes back as a `GatewayError`; nothing is retried.

use std::path::Path;
use std::sync::Arc;

use crate::client::PetstoreClient;
use crate::error::{GatewayError, GatewayResult};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{ApiMessage, PetPayload, PetStatus, RawPet, UploadOutcome};

const MISSING_BASE_URL: &str = "Missing pet-store base URL. Set PETSTORE_BASE_URL in the .env file.";
const MISSING_API_KEY: &str = "Missing pet-store API key. Set PETSTORE_API_KEY in the .env file.";

#[derive(Clone)]
pub struct PetGateway {
    client: PetstoreClient,
    api_key: String,
    config_errors: Vec<String>,
    transport: Arc<dyn Transport>,
}

impl PetGateway {
    /// Blank values count as missing. A gateway built without both settings
    /// still constructs, but every call fails with `Configuration`.
    pub fn new(base_url: Option<&str>, api_key: Option<&str>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.map(str::trim).filter(|s| !s.is_empty());
        let api_key = api_key.map(str::trim).filter(|s| !s.is_empty());

        let mut config_errors = Vec::new();
        if base_url.is_none() {
            config_errors.push(MISSING_BASE_URL.to_string());
        }
        if api_key.is_none() {
            config_errors.push(MISSING_API_KEY.to_string());
        }
        if !config_errors.is_empty() {
            tracing::warn!(errors = ?config_errors, "pet-store gateway is misconfigured");
        }

        Self {
            client: PetstoreClient::new(base_url.unwrap_or_default()),
            api_key: api_key.unwrap_or_default().to_string(),
            config_errors,
            transport,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config_errors.is_empty()
    }

    pub fn configuration_errors(&self) -> &[String] {
        &self.config_errors
    }

    fn ensure_configured(&self) -> GatewayResult<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(GatewayError::Configuration(self.config_errors.join(" ")))
        }
    }

    async fn send(&self, request: HttpRequest, context: &str) -> GatewayResult<HttpResponse> {
        let method = request.method.as_str();
        let url = request.url.clone();
        tracing::debug!(method, url = %url, "calling pet-store API");

        match self.transport.execute(request).await {
            Ok(response) => {
                if !response.is_success() {
                    tracing::warn!(method, url = %url, status = response.status, "pet-store API returned failure");
                }
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(method, url = %url, error = %err, "network error calling pet-store API");
                Err(GatewayError::Network {
                    message: format!("Network error while {context}."),
                    details: err.to_string(),
                })
            }
        }
    }

    /// `GET /pet/findByStatus`.
    pub async fn list_by_status(&self, status: PetStatus) -> GatewayResult<Vec<RawPet>> {
        self.ensure_configured()?;
        let req = self.client.build_find_by_status(status);
        let res = self.send(req, "fetching pets by status").await?;
        self.client.parse_find_by_status(res)
    }

    /// `GET /pet/{id}`.
    pub async fn get_by_id(&self, id: i64) -> GatewayResult<RawPet> {
        self.ensure_configured()?;
        let req = self.client.build_get_pet(id);
        let res = self.send(req, "fetching the pet").await?;
        self.client.parse_get_pet(res)
    }

    /// `POST /pet`. Fails without I/O when `name` is blank.
    pub async fn create(&self, payload: &PetPayload) -> GatewayResult<RawPet> {
        self.ensure_configured()?;
        let req = self.client.build_create_pet(payload)?;
        let res = self.send(req, "creating the pet").await?;
        self.client.parse_create_pet(res)
    }

    /// `PUT /pet`. Fails without I/O when `id` is absent.
    pub async fn update(&self, payload: &PetPayload) -> GatewayResult<RawPet> {
        self.ensure_configured()?;
        let req = self.client.build_update_pet(payload)?;
        let res = self.send(req, "updating the pet").await?;
        self.client.parse_update_pet(res)
    }

    /// `POST /pet/{id}` with form fields.
    pub async fn update_with_form(
        &self,
        id: i64,
        name: Option<&str>,
        status: Option<PetStatus>,
    ) -> GatewayResult<ApiMessage> {
        self.ensure_configured()?;
        let req = self.client.build_update_pet_with_form(id, name, status)?;
        let res = self.send(req, "updating the pet from form data").await?;
        self.client.parse_update_pet_with_form(res)
    }

    /// `DELETE /pet/{id}`, the one call that sends the `api_key` header.
    pub async fn delete(&self, id: i64) -> GatewayResult<()> {
        if !self.is_configured() {
            return Err(GatewayError::Configuration(format!(
                "{} Deleting a pet requires the api_key header.",
                self.config_errors.join(" ")
            )));
        }
        let req = self.client.build_delete_pet(id, &self.api_key);
        let res = self.send(req, "deleting the pet").await?;
        self.client.parse_delete_pet(res)
    }

    /// `POST /pet/{id}/uploadImage`. The file must be a readable regular file;
    /// it is read fully before the request is sent.
    pub async fn upload_image(
        &self,
        id: i64,
        file_path: &Path,
        additional_metadata: Option<&str>,
    ) -> GatewayResult<UploadOutcome> {
        self.ensure_configured()?;

        let is_file = tokio::fs::metadata(file_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(GatewayError::File {
                message: "Image file is not readable. Check the path and permissions.".to_string(),
                path: file_path.to_path_buf(),
            });
        }
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|_| GatewayError::File {
                message: "Failed to read the image file.".to_string(),
                path: file_path.to_path_buf(),
            })?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let req = self
            .client
            .build_upload_image(id, &file_name, bytes, additional_metadata);
        let res = self.send(req, "uploading the image").await?;
        self.client.parse_upload_image(res)
    }
}
