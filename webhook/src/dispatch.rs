use crate::alert::{AlertBatch, Extraction};
use crate::environment::EnvironmentResolver;
use crate::errors::WebhookError;
use crate::extract::extract;
use crate::metrics_defs::{
    ALERTS_SUPPRESSED, NOTIFICATIONS_FAILED, NOTIFICATIONS_SENT, RATE_LIMIT_RETRIES,
};
use crate::notifiers::{DeliveryAttempt, Notifier};
use http::StatusCode;
use serde::Serialize;
use shared::counter;
use tokio::time::{Duration, sleep};

/// Terminal outcome for one (alert, destination) pair
#[derive(Clone, Debug, Serialize)]
pub struct DeliveryResult {
    pub success: bool,
    /// Raw upstream response body
    pub response: serde_json::Value,
    /// Number of rate-limit retries performed (0 or 1)
    pub retries: u32,
}

/// Run every alert in the batch through one destination.
///
/// Suppressed and unrouted alerts produce no entry; a delivery failure is
/// recorded in its result and never aborts the remaining alerts. Only a
/// malformed alert payload (unparsable timestamp) fails the batch.
pub async fn dispatch<N: Notifier>(
    notifier: &N,
    batch: &AlertBatch,
    default_severity: &str,
    resolver: &EnvironmentResolver,
) -> Result<Vec<DeliveryResult>, WebhookError> {
    let mut results = Vec::new();

    for alert in &batch.alerts {
        let normalized =
            match extract(alert, default_severity, notifier.label_style(), resolver)? {
                Extraction::Suppressed => {
                    tracing::info!(
                        destination = notifier.name(),
                        "heartbeat alert, no notification will be sent"
                    );
                    counter!(ALERTS_SUPPRESSED).increment(1);
                    continue;
                }
                Extraction::Normalized(normalized) => normalized,
            };

        let Some(message) = notifier.prepare(&normalized) else {
            tracing::debug!(
                destination = notifier.name(),
                environment = %normalized.environment,
                severity = %normalized.severity,
                "no route for alert, skipping"
            );
            continue;
        };

        results.push(send_with_retry(notifier, &message).await);
    }

    Ok(results)
}

/// Attempt one delivery, retrying exactly once after the advertised delay
/// when the upstream rate-limits the first attempt.
async fn send_with_retry<N: Notifier>(notifier: &N, message: &N::Message) -> DeliveryResult {
    let attempt = match notifier.deliver(message).await {
        Ok(attempt) => attempt,
        Err(e) => return transport_failure(notifier.name(), e, 0),
    };

    if attempt.status != StatusCode::TOO_MANY_REQUESTS {
        return record(notifier.name(), attempt, 0);
    }

    // Negative, NaN and out-of-range values all fail the conversion
    let delay = attempt
        .body
        .get("retry_after")
        .and_then(|v| v.as_f64())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
    let Some(delay) = delay else {
        tracing::warn!(
            destination = notifier.name(),
            "rate limited without a usable retry_after, giving up"
        );
        counter!(NOTIFICATIONS_FAILED).increment(1);
        return DeliveryResult {
            success: false,
            response: attempt.body,
            retries: 0,
        };
    };

    tracing::warn!(
        destination = notifier.name(),
        retry_after = delay.as_secs_f64(),
        "API rate limiting in place, retrying after delay"
    );
    counter!(RATE_LIMIT_RETRIES).increment(1);
    sleep(delay).await;

    match notifier.deliver(message).await {
        Ok(attempt) => record(notifier.name(), attempt, 1),
        Err(e) => transport_failure(notifier.name(), e, 1),
    }
}

fn record(destination: &'static str, attempt: DeliveryAttempt, retries: u32) -> DeliveryResult {
    let success = attempt.status.is_success();
    if success {
        counter!(NOTIFICATIONS_SENT).increment(1);
    } else {
        tracing::error!(
            destination,
            status = attempt.status.as_u16(),
            "API returned non-success status code"
        );
        counter!(NOTIFICATIONS_FAILED).increment(1);
    }

    DeliveryResult {
        success,
        response: attempt.body,
        retries,
    }
}

fn transport_failure(
    destination: &'static str,
    error: WebhookError,
    retries: u32,
) -> DeliveryResult {
    tracing::error!(destination, %error, "delivery attempt failed");
    counter!(NOTIFICATIONS_FAILED).increment(1);
    DeliveryResult {
        success: false,
        response: serde_json::json!({ "error": error.to_string() }),
        retries,
    }
}
