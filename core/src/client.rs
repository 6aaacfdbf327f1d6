//! Stateless HTTP request builder and response parser for the records API.
//!
//! # Design
//! `RecordsClient` holds only the collection URL and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`, keeping this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Record, RecordFields, RecordId, UpdateRecord};

/// Path of the records collection, relative to the API base URL.
pub const RECORDS_PATH: &str = "/water-quality/records";

/// Synchronous, stateless client for the records API.
#[derive(Debug, Clone)]
pub struct RecordsClient {
    records_url: String,
}

impl RecordsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            records_url: format!("{}{RECORDS_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn records_url(&self) -> &str {
        &self.records_url
    }

    pub fn build_list_records(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.records_url.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_record(&self, id: RecordId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{id}", self.records_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_record(&self, input: &RecordFields) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.records_url.clone(), input)
    }

    pub fn build_update_record(
        &self,
        id: RecordId,
        input: &UpdateRecord,
    ) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Patch, format!("{}/{id}", self.records_url), input)
    }

    pub fn build_delete_record(&self, id: RecordId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{id}", self.records_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_records(&self, response: HttpResponse) -> Result<Vec<Record>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        parse_json(response)
    }

    /// The body of a successful delete is ignored; the backend may send an
    /// acknowledgement message or nothing at all.
    pub fn parse_delete_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_request<T: Serialize>(
    method: HttpMethod,
    path: String,
    input: &T,
) -> Result<HttpRequest, ApiError> {
    let body =
        serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            body: response.body.clone(),
        });
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RecordsClient {
        RecordsClient::new("http://127.0.0.1:5000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_records_produces_correct_request() {
        let req = client().build_list_records();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://127.0.0.1:5000/water-quality/records");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_record_addresses_id() {
        let req = client().build_get_record(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://127.0.0.1:5000/water-quality/records/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_record_sends_fields_without_id() {
        let input = RecordFields {
            location: "Lake A".to_string(),
            ph_level: 7.2,
            turbidity: 1.5,
            temperature: 18.0,
        };
        let req = client().build_create_record(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://127.0.0.1:5000/water-quality/records");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["location"], "Lake A");
        assert_eq!(body["ph_level"], 7.2);
        assert_eq!(body["turbidity"], 1.5);
        assert_eq!(body["temperature"], 18.0);
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_record_uses_patch_and_omits_missing_fields() {
        let input = UpdateRecord {
            location: Some("Updated".to_string()),
            ..UpdateRecord::default()
        };
        let req = client().build_update_record(7, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://127.0.0.1:5000/water-quality/records/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["location"], "Updated");
        assert!(body.get("ph_level").is_none());
    }

    #[test]
    fn build_delete_record_produces_correct_request() {
        let req = client().build_delete_record(9);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://127.0.0.1:5000/water-quality/records/9");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_records_success() {
        let records = client()
            .parse_list_records(response(
                200,
                r#"[{"id":1,"location":"Test","ph_level":7,"turbidity":0,"temperature":20,"created_at":"2025-01-01T00:00:00"}]"#,
            ))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields.location, "Test");
        assert!(records[0].created_at.is_some());
    }

    #[test]
    fn parse_get_record_not_found() {
        let err = client().parse_get_record(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn parse_create_record_success() {
        let record = client()
            .parse_create_record(response(
                201,
                r#"{"id":5,"location":"New","ph_level":7.2,"turbidity":1.5,"temperature":18}"#,
            ))
            .unwrap();
        assert_eq!(record.id, 5);
        assert_eq!(record.fields.location, "New");
    }

    #[test]
    fn parse_create_record_wrong_status() {
        let err = client()
            .parse_create_record(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_record_success() {
        let record = client()
            .parse_update_record(response(
                200,
                r#"{"id":5,"location":"Updated","ph_level":6.5,"turbidity":3,"temperature":19,"updated_at":"2025-02-01T08:00:00"}"#,
            ))
            .unwrap();
        assert_eq!(record.fields.ph_level, 6.5);
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn parse_delete_record_accepts_message_body() {
        let result = client().parse_delete_record(response(
            200,
            r#"{"message":"Record soft-deleted successfully"}"#,
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn parse_delete_record_accepts_no_content() {
        assert!(client().parse_delete_record(response(204, "")).is_ok());
    }

    #[test]
    fn parse_delete_record_not_found() {
        let err = client().parse_delete_record(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = RecordsClient::new("http://127.0.0.1:5000/");
        let req = client.build_list_records();
        assert_eq!(req.path, "http://127.0.0.1:5000/water-quality/records");
    }

    #[test]
    fn parse_list_records_bad_json() {
        let err = client()
            .parse_list_records(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
