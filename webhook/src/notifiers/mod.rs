mod discord;
mod pagerduty;
mod telegram;

pub use discord::DiscordNotifier;
pub use pagerduty::PagerdutyNotifier;
pub use telegram::TelegramNotifier;

use crate::alert::NormalizedAlert;
use crate::errors::WebhookError;
use crate::extract::LabelStyle;
use http::StatusCode;

/// Outcome of one outbound HTTP call
#[derive(Clone, Debug)]
pub struct DeliveryAttempt {
    pub status: StatusCode,
    /// Raw JSON response body; `null` when the upstream returned none
    pub body: serde_json::Value,
}

/// Destination-specific behavior behind one delivery seam
///
/// The notifier decides how a normalized alert is routed and rendered
/// (`prepare`, where `None` is a soft-skip) and how a single delivery is
/// attempted (`deliver`). Retry policy lives in the dispatcher, not here.
pub trait Notifier: Send + Sync {
    type Message: Send + Sync;

    fn name(&self) -> &'static str;

    /// Label-wrapping style this destination expects in descriptions
    fn label_style(&self) -> LabelStyle;

    /// Resolve routing and render the message, or soft-skip with `None`
    fn prepare(&self, alert: &NormalizedAlert) -> Option<Self::Message>;

    /// Perform exactly one delivery attempt
    fn deliver(
        &self,
        message: &Self::Message,
    ) -> impl Future<Output = Result<DeliveryAttempt, WebhookError>> + Send;
}

/// Read a JSON response body, tolerating upstreams that return none
pub(crate) async fn read_json_body(response: reqwest::Response) -> DeliveryAttempt {
    let status = response.status();
    let body = response.json().await.unwrap_or(serde_json::Value::Null);
    DeliveryAttempt { status, body }
}
