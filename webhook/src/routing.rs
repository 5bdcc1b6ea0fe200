use crate::alert::{AlertStatus, NormalizedAlert};
use crate::config::{DEFAULT_SERVICE, DiscordConfig, DiscordRoute, PagerdutyConfig, TelegramConfig, TelegramRoute};
use regex::Regex;
use std::sync::LazyLock;

// Leading alphabetic hostname prefix terminated by a dot or hyphen,
// e.g. "web-01.example.com" -> "web"
static SERVICE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)[.-]").expect("valid pattern"));

/// Resolve team-chat delivery parameters; `None` is a soft-skip
pub fn discord_route<'a>(
    config: &'a DiscordConfig,
    alert: &NormalizedAlert,
) -> Option<&'a DiscordRoute> {
    config
        .environments
        .get(&alert.environment)?
        .get(&alert.severity)
}

/// Resolve bot-messaging delivery parameters; `None` is a soft-skip
pub fn telegram_route<'a>(
    config: &'a TelegramConfig,
    alert: &NormalizedAlert,
) -> Option<&'a TelegramRoute> {
    config
        .environments
        .get(&alert.environment)?
        .get(&alert.severity)
}

/// Whether an alert pages at all: only critical, currently-firing alerts do
pub fn should_page(alert: &NormalizedAlert) -> bool {
    alert.severity == "critical" && alert.status == AlertStatus::Firing
}

/// Derive the paging service name for an alert.
///
/// Precedence: hostname prefix before a dot or hyphen, then a configured
/// application name, then a configured hostname, then the default service.
pub fn derive_service<'a>(config: &PagerdutyConfig, alert: &'a NormalizedAlert) -> &'a str {
    if let Some(captures) = SERVICE_PREFIX.captures(&alert.hostname) {
        if let Some(prefix) = captures.get(1) {
            return prefix.as_str();
        }
    }

    if config.services.contains_key(&alert.application) {
        return &alert.application;
    }

    if config.services.contains_key(&alert.hostname) {
        return &alert.hostname;
    }

    DEFAULT_SERVICE
}

/// Resolve the paging routing key for an alert.
///
/// An underived or unconfigured service falls back to the mandatory
/// "default" entry; `None` only occurs on a config that skipped validation.
pub fn paging_routing_key<'a>(
    config: &'a PagerdutyConfig,
    alert: &NormalizedAlert,
) -> Option<&'a str> {
    let service = derive_service(config, alert);
    config
        .services
        .get(service)
        .or_else(|| config.services.get(DEFAULT_SERVICE))
        .map(String::as_str)
}
