use super::{DeliveryAttempt, Notifier, read_json_body};
use crate::alert::NormalizedAlert;
use crate::config::PagerdutyConfig;
use crate::errors::WebhookError;
use crate::extract::LabelStyle;
use crate::format::{PagingEvent, paging_event};
use crate::routing::{paging_routing_key, should_page};

const API_BASE: &str = "https://events.pagerduty.com";

/// Incident-paging destination: triggers events for critical firing alerts
pub struct PagerdutyNotifier {
    config: PagerdutyConfig,
    client: reqwest::Client,
    api_base: String,
}

impl PagerdutyNotifier {
    pub fn new(config: PagerdutyConfig) -> Self {
        Self::with_api_base(config, API_BASE)
    }

    /// Point the notifier at a different API base, for tests
    pub fn with_api_base(config: PagerdutyConfig, api_base: &str) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

impl Notifier for PagerdutyNotifier {
    type Message = PagingEvent;

    fn name(&self) -> &'static str {
        "pagerduty"
    }

    fn label_style(&self) -> LabelStyle {
        LabelStyle::Plain
    }

    fn prepare(&self, alert: &NormalizedAlert) -> Option<PagingEvent> {
        if !should_page(alert) {
            tracing::info!(
                severity = %alert.severity,
                status = alert.status.as_str(),
                "alert does not page, no incident will be triggered"
            );
            return None;
        }

        let routing_key = paging_routing_key(&self.config, alert)?;
        tracing::debug!(routing_key, "resolved paging routing key");
        Some(paging_event(alert, routing_key.to_string()))
    }

    async fn deliver(&self, event: &PagingEvent) -> Result<DeliveryAttempt, WebhookError> {
        let url = format!("{}/v2/enqueue", self.api_base);

        let response = self.client.post(&url).json(event).send().await?;

        Ok(read_json_body(response).await)
    }
}
