use super::{DeliveryAttempt, Notifier, read_json_body};
use crate::alert::NormalizedAlert;
use crate::config::TelegramConfig;
use crate::errors::WebhookError;
use crate::extract::LabelStyle;
use crate::format::telegram_text;
use crate::routing::telegram_route;

const API_BASE: &str = "https://api.telegram.org";

/// Bot-messaging destination: sends HTML-formatted text to per-route chats
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
    api_base: String,
}

pub struct TelegramMessage {
    pub chat_id: i64,
    pub text: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_api_base(config, API_BASE)
    }

    /// Point the notifier at a different API base, for tests
    pub fn with_api_base(config: TelegramConfig, api_base: &str) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

impl Notifier for TelegramNotifier {
    type Message = TelegramMessage;

    fn name(&self) -> &'static str {
        "telegram"
    }

    fn label_style(&self) -> LabelStyle {
        LabelStyle::Html
    }

    fn prepare(&self, alert: &NormalizedAlert) -> Option<TelegramMessage> {
        let route = telegram_route(&self.config, alert)?;
        Some(TelegramMessage {
            chat_id: route.chat_id,
            text: telegram_text(alert),
        })
    }

    async fn deliver(&self, message: &TelegramMessage) -> Result<DeliveryAttempt, WebhookError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.config.bot_token);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("chat_id", message.chat_id.to_string()),
                ("parse_mode", "html".to_string()),
                ("text", message.text.clone()),
            ])
            .send()
            .await?;

        Ok(read_json_body(response).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{test_config, test_normalized};

    fn notifier() -> TelegramNotifier {
        TelegramNotifier::new(test_config().telegram.unwrap())
    }

    #[test]
    fn test_prepare_routes_and_renders() {
        let alert = test_normalized();
        let message = notifier().prepare(&alert).unwrap();
        assert_eq!(message.chat_id, -1001234567890);
        assert_eq!(
            message.text,
            format!("<b>{}</b>\n\n{}", alert.title, alert.description)
        );
    }

    #[test]
    fn test_prepare_soft_skips_unrouted_severity() {
        let mut alert = test_normalized();
        alert.severity = "warning".to_string();
        // test config only routes critical telegram alerts
        assert!(notifier().prepare(&alert).is_none());
    }
}
