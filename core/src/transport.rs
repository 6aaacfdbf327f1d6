//! Executes `HttpRequest` values against the network.
//!
//! Only failures where no response came back are errors at this layer. Every
//! HTTP status, including 4xx/5xx, is handed back as data so the client's
//! `parse_*` methods stay in charge of status interpretation.

use std::future::Future;

use ureq::Agent;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs the HTTP round-trip for a request built by `RecordsClient`.
pub trait Transport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// Transport backed by a blocking `ureq` agent.
///
/// Each request runs on tokio's blocking pool, so awaiting it never stalls
/// the caller's event loop. Requests are never aborted once started.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?
    }
}

fn execute_blocking(agent: &Agent, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let path = req.path.as_str();
    let result = match req.method {
        HttpMethod::Get => with_headers(agent.get(path), &req.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(path), &req.headers).call(),
        HttpMethod::Post => send(with_headers(agent.post(path), &req.headers), req.body.as_deref()),
        HttpMethod::Patch => send(with_headers(agent.patch(path), &req.headers), req.body.as_deref()),
    };
    let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Network(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
