pub mod alert;
pub mod config;
pub mod dispatch;
pub mod environment;
pub mod errors;
pub mod extract;
pub mod format;
pub mod links;
pub mod metrics_defs;
pub mod notifiers;
pub mod routing;
#[cfg(test)]
pub(crate) mod testutils;

use crate::alert::AlertBatch;
use crate::config::Config;
use crate::dispatch::{DeliveryResult, dispatch};
use crate::environment::EnvironmentResolver;
use crate::errors::WebhookError;
use crate::metrics_defs::ALERTS_RECEIVED;
use crate::notifiers::{DiscordNotifier, Notifier, PagerdutyNotifier, TelegramNotifier};
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use shared::counter;
use shared::http::{make_error_response, make_json_response, run_http_service};
use std::pin::Pin;
use std::sync::Arc;

/// The translation and routing engine: one configured notifier per active
/// destination plus the shared environment resolver.
pub struct Relay {
    resolver: EnvironmentResolver,
    discord: Option<DiscordNotifier>,
    telegram: Option<TelegramNotifier>,
    pagerduty: Option<PagerdutyNotifier>,
}

impl Relay {
    /// Build the relay from a validated configuration; destination support
    /// follows configuration presence.
    pub fn new(config: &Config) -> Self {
        Self {
            resolver: config.environment_resolver(),
            discord: config.discord.clone().map(DiscordNotifier::new),
            telegram: config.telegram.clone().map(TelegramNotifier::new),
            pagerduty: config.pagerduty.clone().map(PagerdutyNotifier::new),
        }
    }

    /// Build a relay with pre-constructed notifiers, for tests that point
    /// them at local upstreams.
    pub fn with_notifiers(
        resolver: EnvironmentResolver,
        discord: Option<DiscordNotifier>,
        telegram: Option<TelegramNotifier>,
        pagerduty: Option<PagerdutyNotifier>,
    ) -> Self {
        Self {
            resolver,
            discord,
            telegram,
            pagerduty,
        }
    }

    /// Fan one alert batch out to every configured destination.
    ///
    /// Destinations run concurrently and share no mutable state; the
    /// response holds one key per configured destination.
    pub async fn process(
        &self,
        batch: &AlertBatch,
        default_severity: &str,
    ) -> Result<serde_json::Value, WebhookError> {
        counter!(ALERTS_RECEIVED).increment(batch.alerts.len() as u64);

        let (discord, telegram, pagerduty) = tokio::join!(
            run_destination(self.discord.as_ref(), batch, default_severity, &self.resolver),
            run_destination(self.telegram.as_ref(), batch, default_severity, &self.resolver),
            run_destination(
                self.pagerduty.as_ref(),
                batch,
                default_severity,
                &self.resolver
            ),
        );

        let mut response = serde_json::Map::new();
        for (destination, results) in [
            ("discord", discord),
            ("telegram", telegram),
            ("pagerduty", pagerduty),
        ] {
            if let Some(results) = results {
                response.insert(destination.to_string(), serde_json::to_value(results?)?);
            }
        }

        Ok(serde_json::Value::Object(response))
    }
}

async fn run_destination<N: Notifier>(
    notifier: Option<&N>,
    batch: &AlertBatch,
    default_severity: &str,
    resolver: &EnvironmentResolver,
) -> Option<Result<Vec<DeliveryResult>, WebhookError>> {
    match notifier {
        Some(notifier) => Some(dispatch(notifier, batch, default_severity, resolver).await),
        None => None,
    }
}

/// Hyper service exposing the webhook endpoints
#[derive(Clone)]
pub struct WebhookService {
    relay: Arc<Relay>,
}

impl WebhookService {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

impl Service<Request<Incoming>> for WebhookService {
    type Response = Response<BoxBody<Bytes, WebhookError>>;
    type Error = WebhookError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let relay = self.relay.clone();
        Box::pin(async move { handle_request(relay, req).await })
    }
}

/// Route one request: health check, webhook, or structured 404/500.
///
/// Generic over the body type so tests can drive it without a connection.
pub async fn handle_request<B>(
    relay: Arc<Relay>,
    req: Request<B>,
) -> Result<Response<BoxBody<Bytes, WebhookError>>, WebhookError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();

    if parts.method == Method::GET && path == "/" {
        return Ok(make_json_response(&serde_json::json!({ "status": "ok" })));
    }

    if parts.method == Method::POST {
        // The path segment is the default severity for alerts without one
        let default_severity = path.trim_start_matches('/');
        if default_severity.is_empty() || default_severity.contains('/') {
            return Ok(make_error_response(
                StatusCode::NOT_FOUND,
                Some(&format!("{path} not found")),
            ));
        }

        let bytes = body
            .collect()
            .await
            .map_err(|e| WebhookError::RequestBodyError(e.to_string()))?
            .to_bytes();

        let batch: AlertBatch = match serde_json::from_slice(&bytes) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(%e, "rejecting unparsable webhook payload");
                return Ok(make_error_response(
                    StatusCode::BAD_REQUEST,
                    Some(&format!("invalid alert payload: {e}")),
                ));
            }
        };

        tracing::debug!(alerts = batch.alerts.len(), default_severity, "processing webhook");

        return match relay.process(&batch, default_severity).await {
            Ok(body) => Ok(make_json_response(&body)),
            Err(e) => {
                tracing::error!(%e, "webhook processing failed");
                Ok(make_error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some(&e.to_string()),
                ))
            }
        };
    }

    Ok(make_error_response(
        StatusCode::NOT_FOUND,
        Some(&format!("{path} not found")),
    ))
}

/// Serve the webhook until the listener fails
pub async fn run(host: &str, port: u16, config: Config) -> Result<(), WebhookError> {
    let service = WebhookService::new(Relay::new(&config));
    run_http_service(host, port, service).await
}
