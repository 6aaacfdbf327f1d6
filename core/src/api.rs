//! Asynchronous records API used by the table controller.
//!
//! # Design
//! `RecordsApi` is the seam between the controller and the network.
//! `HttpRecordsApi` implements it by pairing the sans-IO `RecordsClient`
//! with a `Transport`, and is also the single place where failures are
//! intercepted: each one is reported to the `ErrorSink` once, then returned
//! to the caller untouched.

use std::future::Future;

use crate::client::RecordsClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::sink::{ErrorSink, Notification};
use crate::transport::Transport;
use crate::types::{Record, RecordFields, RecordId, UpdateRecord};

/// CRUD operations on water quality records.
pub trait RecordsApi {
    /// All records that have not been soft-deleted.
    fn list(&self) -> impl Future<Output = Result<Vec<Record>, ApiError>> + Send;

    /// Persist a new record; the result carries the assigned id and timestamps.
    fn create(
        &self,
        input: &RecordFields,
    ) -> impl Future<Output = Result<Record, ApiError>> + Send;

    fn update(
        &self,
        id: RecordId,
        input: &UpdateRecord,
    ) -> impl Future<Output = Result<Record, ApiError>> + Send;

    /// Soft-delete: the record disappears from `list` but is not erased.
    fn delete(&self, id: RecordId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// `RecordsApi` over HTTP, reporting failures to an `ErrorSink`.
#[derive(Debug, Clone)]
pub struct HttpRecordsApi<T, S> {
    client: RecordsClient,
    transport: T,
    sink: S,
}

impl<T: Transport + Sync, S: ErrorSink + Sync> HttpRecordsApi<T, S> {
    pub fn new(client: RecordsClient, transport: T, sink: S) -> Self {
        Self {
            client,
            transport,
            sink,
        }
    }

    pub fn client(&self) -> &RecordsClient {
        &self.client
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Fetch a single non-deleted record.
    pub async fn get(&self, id: RecordId) -> Result<Record, ApiError> {
        let request = self.client.build_get_record(id);
        self.round_trip(Ok(request), RecordsClient::parse_get_record)
            .await
    }

    async fn round_trip<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: fn(&RecordsClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let result = match request {
            Ok(request) => {
                let method = request.method.as_str();
                tracing::trace!(method, path = %request.path, "sending request");
                match self.transport.execute(request).await {
                    Ok(response) => parse(&self.client, response),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };
        result.inspect_err(|e| self.sink.report(Notification::from_error(e)))
    }
}

impl<T: Transport + Sync, S: ErrorSink + Sync> RecordsApi for HttpRecordsApi<T, S> {
    async fn list(&self) -> Result<Vec<Record>, ApiError> {
        let request = self.client.build_list_records();
        self.round_trip(Ok(request), RecordsClient::parse_list_records)
            .await
    }

    async fn create(&self, input: &RecordFields) -> Result<Record, ApiError> {
        let request = self.client.build_create_record(input);
        self.round_trip(request, RecordsClient::parse_create_record)
            .await
    }

    async fn update(&self, id: RecordId, input: &UpdateRecord) -> Result<Record, ApiError> {
        let request = self.client.build_update_record(id, input);
        self.round_trip(request, RecordsClient::parse_update_record)
            .await
    }

    async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        let request = self.client.build_delete_record(id);
        self.round_trip(Ok(request), RecordsClient::parse_delete_record)
            .await
    }
}
