//! Stateless HTTP request builder and response parser for the pet-store API.
//!
//! # Design
//! `PetstoreClient` holds only a `base_url`. Each upstream operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. Field validation that must happen
//! before any I/O lives in the `build_*` methods, so a request that fails to
//! build never reaches a transport.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartBody, RequestBody};
use crate::types::{ApiMessage, PetPayload, PetStatus, RawPet, UploadOutcome};

/// Header carrying the API key on authenticated calls.
pub const API_KEY_HEADER: &str = "api_key";

#[derive(Debug, Clone)]
pub struct PetstoreClient {
    base_url: String,
}

impl PetstoreClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    pub fn build_find_by_status(&self, status: PetStatus) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/pet/findByStatus?status={status}"))
    }

    pub fn build_get_pet(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/pet/{id}"))
    }

    pub fn build_create_pet(&self, payload: &PetPayload) -> GatewayResult<HttpRequest> {
        if payload.name.trim().is_empty() {
            return Err(GatewayError::Validation("\"name\" is required.".to_string()));
        }
        self.json_request(HttpMethod::Post, "/pet", payload)
    }

    pub fn build_update_pet(&self, payload: &PetPayload) -> GatewayResult<HttpRequest> {
        if payload.id.is_none() {
            return Err(GatewayError::Validation(
                "\"id\" is required for an update.".to_string(),
            ));
        }
        self.json_request(HttpMethod::Put, "/pet", payload)
    }

    /// Form-encoded partial update. Empty values are left out; at least one
    /// field must remain.
    pub fn build_update_pet_with_form(
        &self,
        id: i64,
        name: Option<&str>,
        status: Option<PetStatus>,
    ) -> GatewayResult<HttpRequest> {
        let mut fields = Vec::new();
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            fields.push(("name".to_string(), name.to_string()));
        }
        if let Some(status) = status {
            fields.push(("status".to_string(), status.as_str().to_string()));
        }
        if fields.is_empty() {
            return Err(GatewayError::Validation(
                "nothing to update; provide at least \"name\" or \"status\".".to_string(),
            ));
        }

        let mut req = self.request(HttpMethod::Post, &format!("/pet/{id}"));
        req.body = Some(RequestBody::Form(fields));
        Ok(req)
    }

    pub fn build_delete_pet(&self, id: i64, api_key: &str) -> HttpRequest {
        let mut req = self.request(HttpMethod::Delete, &format!("/pet/{id}"));
        req.headers
            .push((API_KEY_HEADER.to_string(), api_key.to_string()));
        req
    }

    pub fn build_upload_image(
        &self,
        id: i64,
        file_name: &str,
        file_bytes: Vec<u8>,
        additional_metadata: Option<&str>,
    ) -> HttpRequest {
        let fields = additional_metadata
            .filter(|m| !m.is_empty())
            .map(|m| vec![("additionalMetadata".to_string(), m.to_string())])
            .unwrap_or_default();

        let mut req = self.request(HttpMethod::Post, &format!("/pet/{id}/uploadImage"));
        req.body = Some(RequestBody::Multipart(MultipartBody {
            file_field: "file".to_string(),
            file_name: file_name.to_string(),
            file_bytes,
            fields,
        }));
        req
    }

    fn json_request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &PetPayload,
    ) -> GatewayResult<HttpRequest> {
        let body =
            serde_json::to_string(payload).map_err(|e| GatewayError::Encode(e.to_string()))?;
        let mut req = self.request(method, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(RequestBody::Json(body));
        Ok(req)
    }

    /// Records that are not JSON objects are skipped rather than failing the
    /// whole page.
    pub fn parse_find_by_status(&self, response: HttpResponse) -> GatewayResult<Vec<RawPet>> {
        check_status(&response, "Failed to fetch the list of pets.")?;
        let items: Vec<Value> = decode(&response.body)?;
        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    pub fn parse_get_pet(&self, response: HttpResponse) -> GatewayResult<RawPet> {
        check_status(&response, "Failed to fetch the pet.")?;
        decode(&response.body)
    }

    pub fn parse_create_pet(&self, response: HttpResponse) -> GatewayResult<RawPet> {
        check_status(&response, "Failed to create the pet.")?;
        decode(&response.body)
    }

    pub fn parse_update_pet(&self, response: HttpResponse) -> GatewayResult<RawPet> {
        check_status(&response, "Failed to update the pet.")?;
        decode(&response.body)
    }

    pub fn parse_update_pet_with_form(&self, response: HttpResponse) -> GatewayResult<ApiMessage> {
        check_status(&response, "Failed to update the pet from form data.")?;
        Ok(decode(&response.body).unwrap_or_default())
    }

    pub fn parse_delete_pet(&self, response: HttpResponse) -> GatewayResult<()> {
        check_status(&response, "Failed to delete the pet.")
    }

    pub fn parse_upload_image(&self, response: HttpResponse) -> GatewayResult<UploadOutcome> {
        check_status(&response, "Failed to upload the pet image.")?;
        Ok(UploadOutcome {
            code: response.status,
            response: decode(&response.body).unwrap_or_default(),
        })
    }
}

/// Map a non-2xx response to `UpstreamHttp`, keeping the body as details.
fn check_status(response: &HttpResponse, message: &str) -> GatewayResult<()> {
    if response.is_success() {
        return Ok(());
    }
    let details = serde_json::from_str(&response.body)
        .unwrap_or_else(|_| Value::String(response.body.clone()));
    Err(GatewayError::UpstreamHttp {
        message: message.to_string(),
        status: response.status,
        details,
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> GatewayResult<T> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> PetstoreClient {
        PetstoreClient::new("https://petstore.test/v2")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn build_find_by_status_produces_correct_request() {
        let req = client().build_find_by_status(PetStatus::Pending);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "https://petstore.test/v2/pet/findByStatus?status=pending"
        );
        assert!(req.body.is_none());
        assert!(req.header(API_KEY_HEADER).is_none());
    }

    #[test]
    fn build_get_pet_has_no_api_key() {
        let req = client().build_get_pet(12);
        assert_eq!(req.url, "https://petstore.test/v2/pet/12");
        assert!(req.header(API_KEY_HEADER).is_none());
    }

    #[test]
    fn build_create_pet_requires_name() {
        let payload = PetPayload::new("  ", PetStatus::Available);
        let err = client().build_create_pet(&payload).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn build_create_pet_serializes_payload() {
        let payload = PetPayload::new("Burek", PetStatus::Available);
        let req = client().build_create_pet(&payload).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://petstore.test/v2/pet");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(req.json_body().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "Burek", "status": "available"}));
    }

    #[test]
    fn build_update_pet_requires_id() {
        let payload = PetPayload::new("Burek", PetStatus::Sold);
        let err = client().build_update_pet(&payload).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));

        let req = client().build_update_pet(&payload.with_id(Some(5))).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "https://petstore.test/v2/pet");
    }

    #[test]
    fn build_update_with_form_skips_empty_fields() {
        let req = client()
            .build_update_pet_with_form(3, Some(""), Some(PetStatus::Sold))
            .unwrap();
        assert_eq!(req.url, "https://petstore.test/v2/pet/3");
        assert_eq!(
            req.body,
            Some(RequestBody::Form(vec![(
                "status".to_string(),
                "sold".to_string()
            )]))
        );

        let err = client()
            .build_update_pet_with_form(3, None, None)
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn build_delete_pet_attaches_api_key() {
        let req = client().build_delete_pet(9, "special-key");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "https://petstore.test/v2/pet/9");
        assert_eq!(req.header(API_KEY_HEADER), Some("special-key"));
    }

    #[test]
    fn build_upload_image_omits_empty_metadata() {
        let req = client().build_upload_image(4, "cat.png", vec![1, 2, 3], Some(""));
        match req.body {
            Some(RequestBody::Multipart(body)) => {
                assert_eq!(body.file_field, "file");
                assert_eq!(body.file_name, "cat.png");
                assert_eq!(body.file_bytes, vec![1, 2, 3]);
                assert!(body.fields.is_empty());
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[test]
    fn parse_get_pet_not_found_keeps_status_and_body() {
        let err = client()
            .parse_get_pet(response(
                404,
                r#"{"code":1,"type":"error","message":"Pet not found"}"#,
            ))
            .unwrap_err();
        match err {
            GatewayError::UpstreamHttp { status, details, .. } => {
                assert_eq!(status, 404);
                assert_eq!(details["message"], "Pet not found");
            }
            other => panic!("expected UpstreamHttp, got {other:?}"),
        }
    }

    #[test]
    fn parse_failure_with_plain_text_body() {
        let err = client()
            .parse_create_pet(response(500, "internal error"))
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.details(), Some(json!("internal error")));
    }

    #[test]
    fn parse_find_by_status_skips_non_objects() {
        let pets = client()
            .parse_find_by_status(response(
                200,
                r#"[{"id":1,"name":"Reksio"},null,"junk",{"id":2}]"#,
            ))
            .unwrap();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].name.as_deref(), Some("Reksio"));
        assert_eq!(pets[1].id, Some(2));
    }

    #[test]
    fn parse_find_by_status_bad_json() {
        let err = client()
            .parse_find_by_status(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn parse_upload_image_returns_code_and_message() {
        let outcome = client()
            .parse_upload_image(response(
                200,
                r#"{"code":200,"type":"unknown","message":"File uploaded to ./cat.png, 3 bytes"}"#,
            ))
            .unwrap();
        assert_eq!(outcome.code, 200);
        assert_eq!(
            outcome.response.message.as_deref(),
            Some("File uploaded to ./cat.png, 3 bytes")
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PetstoreClient::new("https://petstore.test/v2/");
        assert_eq!(client.build_get_pet(1).url, "https://petstore.test/v2/pet/1");
    }
}
