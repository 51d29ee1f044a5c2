/**
 * Logs Route Handler
 * Endpoint for receiving client logs from the admin console
 */

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use tower_http::request_id::RequestId;

use super::ApiJson;
use crate::logging::config::{ClientLogBatch, ClientLogEntry, LogLevel, LogResponse};

/// Entries past this are counted as received but not re-emitted.
const MAX_BATCH: usize = 100;
const MAX_MESSAGE_LEN: usize = 4096;

/// POST /api/logs - Receive client logs
#[tracing::instrument(skip(logs), fields(batch_size = logs.logs.len()))]
pub async fn receive_client_logs(
    request_id: Option<Extension<RequestId>>,
    ApiJson(logs): ApiJson<ClientLogBatch>,
) -> impl IntoResponse {
    let req_id = request_id
        .as_ref()
        .and_then(|ext| ext.0.header_value().to_str().ok())
        .unwrap_or("unknown");

    tracing::debug!(request_id = %req_id, "received client logs");

    let mut processed = 0;

    for log in logs.logs.iter().take(MAX_BATCH) {
        if let Err(e) = process_client_log(log, req_id) {
            tracing::warn!(
                request_id = %req_id,
                error = %e,
                "failed to process client log"
            );
        } else {
            processed += 1;
        }
    }

    let dropped = logs.logs.len().saturating_sub(MAX_BATCH);
    let response = LogResponse {
        success: true,
        received: logs.logs.len(),
        processed,
        error: (dropped > 0)
            .then(|| format!("{} entries over the batch limit were dropped", dropped)),
    };

    (StatusCode::ACCEPTED, Json(response))
}

/// Process a single client log entry
fn process_client_log(log: &ClientLogEntry, request_id: &str) -> Result<(), String> {
    if log.message.trim().is_empty() {
        return Err("empty message".to_string());
    }
    if log.message.len() > MAX_MESSAGE_LEN {
        return Err(format!("message longer than {} bytes", MAX_MESSAGE_LEN));
    }

    let span = tracing::info_span!(
        "client_log",
        request_id = %request_id,
        timestamp = %log.timestamp,
        source = "client",
    );
    let _enter = span.enter();

    match log.level {
        LogLevel::Trace => tracing::trace!(
            client_message = %log.message,
            context = ?log.context,
            metadata = ?log.metadata,
            "client log"
        ),
        LogLevel::Debug => tracing::debug!(
            client_message = %log.message,
            context = ?log.context,
            metadata = ?log.metadata,
            "client log"
        ),
        LogLevel::Info => tracing::info!(
            client_message = %log.message,
            context = ?log.context,
            metadata = ?log.metadata,
            "client log"
        ),
        LogLevel::Warn => tracing::warn!(
            client_message = %log.message,
            context = ?log.context,
            metadata = ?log.metadata,
            "client log"
        ),
        LogLevel::Error => tracing::error!(
            client_message = %log.message,
            context = ?log.context,
            metadata = ?log.metadata,
            "client log"
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::json_request;
    use axum::{routing::post, Router};
    use serde_json::json;

    fn app() -> Router {
        Router::new().route("/api/logs", post(receive_client_logs))
    }

    fn entry(level: &str, message: &str) -> serde_json::Value {
        json!({ "timestamp": "2024-01-15T12:00:00Z", "level": level, "message": message })
    }

    #[tokio::test]
    async fn test_batch_is_accepted() {
        let batch = json!({ "logs": [entry("error", "save failed"), entry("info", "loaded")] });
        let (status, body) = json_request(app(), "POST", "/api/logs", None, &batch).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let res: LogResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.received, 2);
        assert_eq!(res.processed, 2);
        assert!(res.error.is_none());
    }

    #[tokio::test]
    async fn test_blank_entries_are_not_processed() {
        let batch = json!({ "logs": [entry("warn", "   "), entry("debug", "ok")] });
        let (_, body) = json_request(app(), "POST", "/api/logs", None, &batch).await;
        let res: LogResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.received, 2);
        assert_eq!(res.processed, 1);
    }

    #[tokio::test]
    async fn test_oversized_batch_is_truncated() {
        let logs: Vec<_> = (0..MAX_BATCH + 5).map(|i| entry("info", &i.to_string())).collect();
        let (status, body) =
            json_request(app(), "POST", "/api/logs", None, &json!({ "logs": logs })).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let res: LogResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.received, MAX_BATCH + 5);
        assert_eq!(res.processed, MAX_BATCH);
        assert!(res.error.is_some());
    }

    #[tokio::test]
    async fn test_unknown_level_is_rejected() {
        let batch = json!({ "logs": [entry("fatal", "boom")] });
        let (status, _) = json_request(app(), "POST", "/api/logs", None, &batch).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
