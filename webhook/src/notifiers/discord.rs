use super::{DeliveryAttempt, Notifier, read_json_body};
use crate::alert::NormalizedAlert;
use crate::config::DiscordConfig;
use crate::errors::WebhookError;
use crate::extract::LabelStyle;
use crate::format::{Clock, Embed, discord_embed};
use crate::routing::discord_route;
use chrono::Utc;
use http::header::AUTHORIZATION;

const API_BASE: &str = "https://discord.com/api";

/// Team-chat destination: posts rich embeds to per-route channels
pub struct DiscordNotifier {
    config: DiscordConfig,
    client: reqwest::Client,
    api_base: String,
    clock: Clock,
}

/// One rendered embed bound to the channel it routes to
pub struct DiscordMessage {
    pub channel_id: String,
    pub embed: Embed,
}

impl DiscordNotifier {
    pub fn new(config: DiscordConfig) -> Self {
        Self::with_api_base(config, API_BASE)
    }

    /// Point the notifier at a different API base, for tests
    pub fn with_api_base(config: DiscordConfig, api_base: &str) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl Notifier for DiscordNotifier {
    type Message = DiscordMessage;

    fn name(&self) -> &'static str {
        "discord"
    }

    fn label_style(&self) -> LabelStyle {
        LabelStyle::Markdown
    }

    fn prepare(&self, alert: &NormalizedAlert) -> Option<DiscordMessage> {
        let route = discord_route(&self.config, alert)?;
        Some(DiscordMessage {
            channel_id: route.channel_id.clone(),
            embed: discord_embed(alert, &route.author, self.clock),
        })
    }

    async fn deliver(&self, message: &DiscordMessage) -> Result<DeliveryAttempt, WebhookError> {
        let url = format!(
            "{}/channels/{}/messages",
            self.api_base, message.channel_id
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bot {}", self.config.bot_token))
            .json(&serde_json::json!({ "embeds": [&message.embed] }))
            .send()
            .await?;

        Ok(read_json_body(response).await)
    }
}
