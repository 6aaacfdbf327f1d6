//! Error reporting sink.
//!
//! Failed requests are turned into a user-facing [`Notification`] and handed
//! to an [`ErrorSink`]. What the sink does with it (toast, log line, status
//! bar) is up to the host.

use tokio::sync::mpsc::UnboundedSender;

use crate::error::ApiError;

/// Status text used when the request never reached the server.
const UNKNOWN_ERROR: &str = "Unknown Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

/// A failed request, summarized for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    /// Status text of the failed response, e.g. `"Not Found"`.
    pub summary: String,
    /// Server-provided message when there is one, else the transport's.
    pub detail: String,
}

impl Notification {
    pub fn from_error(error: &ApiError) -> Self {
        let summary = error
            .status()
            .and_then(status_text)
            .unwrap_or(UNKNOWN_ERROR)
            .to_string();
        let detail = error.server_message().unwrap_or_else(|| error.to_string());
        Self {
            severity: Severity::Error,
            summary,
            detail,
        }
    }
}

fn status_text(status: u16) -> Option<&'static str> {
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
}

/// Receives notifications for failed requests.
pub trait ErrorSink {
    fn report(&self, notification: Notification);
}

/// Sink that writes each notification to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, notification: Notification) {
        tracing::error!(
            summary = %notification.summary,
            detail = %notification.detail,
            "request failed"
        );
    }
}

/// A channel of notifications, drained by the UI.
impl ErrorSink for UnboundedSender<Notification> {
    fn report(&self, notification: Notification) {
        if let Err(e) = self.send(notification) {
            tracing::warn!(summary = %e.0.summary, "notification channel closed, dropping");
        }
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for std::sync::Arc<S> {
    fn report(&self, notification: Notification) {
        (**self).report(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_status_text_and_detail_is_server_message() {
        let err = ApiError::NotFound {
            body: r#"{"code":404,"name":"Not Found","message":"record 3 does not exist"}"#
                .to_string(),
        };
        let n = Notification::from_error(&err);
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(n.summary, "Not Found");
        assert_eq!(n.detail, "record 3 does not exist");
    }

    #[test]
    fn detail_falls_back_to_error_message() {
        let err = ApiError::HttpError {
            status: 500,
            body: "boom".to_string(),
        };
        let n = Notification::from_error(&err);
        assert_eq!(n.summary, "Internal Server Error");
        assert_eq!(n.detail, "HTTP 500: boom");
    }

    #[test]
    fn network_failures_are_unknown_errors() {
        let n = Notification::from_error(&ApiError::Network("connection refused".to_string()));
        assert_eq!(n.summary, "Unknown Error");
        assert_eq!(n.detail, "network error: connection refused");
    }

    #[test]
    fn channel_sink_forwards_notifications() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.report(Notification::from_error(&ApiError::Network("x".to_string())));
        let received = rx.try_recv().unwrap();
        assert_eq!(received.summary, "Unknown Error");
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Notification>();
        drop(rx);
        tx.report(Notification::from_error(&ApiError::Network("x".to_string())));
    }
}
