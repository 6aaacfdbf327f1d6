use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub location: String,
    pub ph_level: f64,
    pub turbidity: f64,
    pub temperature: f64,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct CreateRecord {
    pub location: String,
    pub ph_level: f64,
    pub turbidity: f64,
    pub temperature: f64,
}

#[derive(Deserialize)]
pub struct UpdateRecord {
    pub location: Option<String>,
    pub ph_level: Option<f64>,
    pub turbidity: Option<f64>,
    pub temperature: Option<f64>,
}

/// JSON body of every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub name: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(id: i64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("record {id} does not exist"),
        }
    }

    fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            message: match status {
                StatusCode::NOT_FOUND => {
                    "The requested URL was not found on the server.".to_string()
                }
                StatusCode::METHOD_NOT_ALLOWED => {
                    "The method is not allowed for the requested URL.".to_string()
                }
                _ => status.canonical_reason().unwrap_or("Error").to_string(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Ids that are not integers never match a record route.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::with_status(StatusCode::NOT_FOUND)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(status = %self.status, message = %self.message, "request failed");
        let body = ErrorBody {
            code: self.status.as_u16(),
            name: self.status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Every record ever created, soft-deleted ones included.
#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    records: BTreeMap<i64, Record>,
}

impl Store {
    fn live(&self, id: i64) -> Result<&Record, ApiError> {
        self.records
            .get(&id)
            .filter(|r| r.deleted_at.is_none())
            .ok_or_else(|| ApiError::not_found(id))
    }

    fn live_mut(&mut self, id: i64) -> Result<&mut Record, ApiError> {
        self.records
            .get_mut(&id)
            .filter(|r| r.deleted_at.is_none())
            .ok_or_else(|| ApiError::not_found(id))
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/water-quality/records", get(list_records).post(create_record))
        .route(
            "/water-quality/records/{id}",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn route_not_found() -> ApiError {
    ApiError::with_status(StatusCode::NOT_FOUND)
}

async fn method_not_allowed() -> ApiError {
    ApiError::with_status(StatusCode::METHOD_NOT_ALLOWED)
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

async fn list_records(State(db): State<Db>) -> Json<Vec<Record>> {
    let store = db.read().await;
    Json(
        store
            .records
            .values()
            .filter(|r| r.deleted_at.is_none())
            .cloned()
            .collect(),
    )
}

async fn create_record(
    State(db): State<Db>,
    input: Result<Json<CreateRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let Json(input) = input?;
    let mut store = db.write().await;
    store.last_id += 1;
    let record = Record {
        id: store.last_id,
        location: input.location,
        ph_level: input.ph_level,
        turbidity: input.turbidity,
        temperature: input.temperature,
        created_at: now(),
        updated_at: None,
        deleted_at: None,
    };
    store.records.insert(record.id, record.clone());
    tracing::debug!(id = record.id, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Record>, ApiError> {
    let Path(id) = id?;
    let store = db.read().await;
    store.live(id).map(|r| Json(r.clone()))
}

async fn update_record(
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<UpdateRecord>, JsonRejection>,
) -> Result<Json<Record>, ApiError> {
    let Path(id) = id?;
    let Json(input) = input?;
    let mut store = db.write().await;
    let record = store.live_mut(id)?;
    if let Some(location) = input.location {
        record.location = location;
    }
    if let Some(ph_level) = input.ph_level {
        record.ph_level = ph_level;
    }
    if let Some(turbidity) = input.turbidity {
        record.turbidity = turbidity;
    }
    if let Some(temperature) = input.temperature {
        record.temperature = temperature;
    }
    record.updated_at = Some(now());
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(id) = id?;
    let mut store = db.write().await;
    let record = store.live_mut(id)?;
    record.deleted_at = Some(now());
    tracing::debug!(id, "record soft-deleted");
    Ok(Json(
        serde_json::json!({ "message": "Record soft-deleted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record() -> Record {
        Record {
            id: 1,
            location: "Lake A".to_string(),
            ph_level: 7.2,
            turbidity: 1.5,
            temperature: 18.0,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn record_omits_unset_timestamps() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["created_at"], "2025-01-01T08:00:00");
        assert!(json.get("updated_at").is_none());
        assert!(json.get("deleted_at").is_none());
    }

    #[test]
    fn create_record_requires_every_measurement() {
        let result: Result<CreateRecord, _> =
            serde_json::from_str(r#"{"location":"x","ph_level":7,"turbidity":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_record_ignores_client_side_fields() {
        let input: CreateRecord = serde_json::from_str(
            r#"{"id":0,"location":"x","ph_level":7,"turbidity":0,"temperature":20}"#,
        )
        .unwrap();
        assert_eq!(input.temperature, 20.0);
    }

    #[test]
    fn update_record_all_fields_optional() {
        let input: UpdateRecord = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.location.is_none());
        assert!(input.ph_level.is_none());
        assert!(input.turbidity.is_none());
        assert!(input.temperature.is_none());
    }

    #[test]
    fn soft_deleted_records_are_not_live() {
        let mut store = Store::default();
        let mut deleted = record();
        deleted.deleted_at = Some(deleted.created_at);
        store.records.insert(1, deleted);
        let err = store.live_mut(1).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
