//! Per-operation instrumentation for API handlers.
//!
//! Wraps a handler body in a `tracing` span and records its duration and
//! outcome both as a log event and through the `metrics` facade. The
//! facade is a no-op unless the binary installs a recorder.

use std::future::Future;
use std::time::Instant;

use tracing::{info_span, Instrument};

use super::error::ApiError;

pub const REQUESTS_TOTAL: &str = "placement_api_requests_total";
pub const REQUEST_DURATION: &str = "placement_api_request_duration_seconds";

/// Runs `body` as the named API operation.
///
/// # Errors
///
/// Returns the error produced by `body` unchanged.
pub async fn instrumented<T, F>(operation: &'static str, body: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let span = info_span!(
        "api_operation",
        operation,
        duration_ms = tracing::field::Empty,
        outcome = tracing::field::Empty,
    );

    async move {
        let start = Instant::now();
        let result = body.await;
        let elapsed = start.elapsed();

        let outcome = match &result {
            Ok(_) => "ok",
            Err(ApiError::Validation(_)) => "invalid",
            Err(ApiError::NotFound(_)) => "not_found",
            Err(ApiError::Upstream(_)) => "error",
        };

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = elapsed.as_millis() as u64;
        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::Span::current().record("outcome", outcome);
        tracing::info!(operation, duration_ms, outcome, "operation complete");

        metrics::counter!(REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
        metrics::histogram!(REQUEST_DURATION, "operation" => operation).record(elapsed.as_secs_f64());

        result
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_success() {
        let result = instrumented("test", async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn passes_through_error() {
        let result: Result<(), ApiError> =
            instrumented("test", async { Err(ApiError::NotFound("thing".into())) }).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
