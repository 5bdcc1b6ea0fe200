use crate::alert::{AlertStatus, NormalizedAlert};
use crate::config::Author;
use crate::links::{LinkFormat, substitute_hyperlinks};
use chrono::{DateTime, Utc};
use serde::Serialize;

// Embed accent colors, matching the upstream chat palette
const COLOR_CRITICAL: u32 = 0xE01E5A; // red
const COLOR_WARNING: u32 = 0xECB22E; // yellow
const COLOR_INFO: u32 = 0x36C5F0; // blue
const COLOR_RESOLVED: u32 = 0x2EB67D; // green

/// Clock used for embed timestamps; injected so tests can pin the output
pub type Clock = fn() -> DateTime<Utc>;

/// Rich-embed payload for the team-chat destination
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub r#type: &'static str,
    pub description: String,
    pub author: EmbedAuthor,
    pub color: u32,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: String,
}

/// Event payload for the incident-paging destination
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PagingEvent {
    pub payload: PagingEventPayload,
    pub routing_key: String,
    pub event_action: &'static str,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PagingEventPayload {
    pub summary: String,
    pub severity: String,
    pub source: String,
}

/// Accent color keyed on (status, severity); unrecognized severities warn
pub fn embed_color(status: AlertStatus, severity: &str) -> u32 {
    match status {
        AlertStatus::Resolved => COLOR_RESOLVED,
        AlertStatus::Firing => match severity {
            "critical" => COLOR_CRITICAL,
            "warning" => COLOR_WARNING,
            "info" => COLOR_INFO,
            _ => COLOR_WARNING,
        },
    }
}

/// Render a normalized alert as a team-chat rich embed.
///
/// Hyperlinks in the description are rewritten to the chat markdown dialect.
pub fn discord_embed(alert: &NormalizedAlert, author: &Author, clock: Clock) -> Embed {
    Embed {
        title: alert.title.clone(),
        r#type: "rich",
        description: substitute_hyperlinks(&alert.description, LinkFormat::Markdown),
        author: EmbedAuthor {
            name: author.name.clone(),
            icon_url: author.icon_url.to_string(),
        },
        color: embed_color(alert.status, &alert.severity),
        timestamp: clock().to_rfc3339(),
    }
}

/// Render a normalized alert as bot-messaging HTML text
pub fn telegram_text(alert: &NormalizedAlert) -> String {
    format!("<b>{}</b>\n\n{}", alert.title, alert.description)
}

/// Render a normalized alert as an incident-paging trigger event.
///
/// The paging API rejects empty source fields, so a missing hostname is
/// substituted with the literal "none".
pub fn paging_event(alert: &NormalizedAlert, routing_key: String) -> PagingEvent {
    let source = if alert.hostname.is_empty() {
        "none".to_string()
    } else {
        alert.hostname.clone()
    };

    PagingEvent {
        payload: PagingEventPayload {
            summary: format!("{}\n\n{}", alert.title, alert.description),
            severity: alert.severity.clone(),
            source,
        },
        routing_key,
        event_action: "trigger",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::test_normalized;
    use chrono::TimeZone;
    use url::Url;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    fn author() -> Author {
        Author {
            name: "Alertmanager".to_string(),
            icon_url: Url::parse("https://icons.example.com/alert.png").unwrap(),
        }
    }

    #[test]
    fn test_embed_color_table() {
        assert_eq!(embed_color(AlertStatus::Firing, "critical"), 0xE01E5A);
        assert_eq!(embed_color(AlertStatus::Firing, "warning"), 0xECB22E);
        assert_eq!(embed_color(AlertStatus::Firing, "info"), 0x36C5F0);
        // Unknown severity defaults to the warning color
        assert_eq!(embed_color(AlertStatus::Firing, "page"), 0xECB22E);
        assert_eq!(embed_color(AlertStatus::Resolved, "critical"), 0x2EB67D);
    }

    #[test]
    fn test_discord_embed() {
        let mut alert = test_normalized();
        alert.description =
            "**Runbook URL**: <https://wiki.example.com/runbook|runbook>\n**Started**: x"
                .to_string();

        let embed = discord_embed(&alert, &author(), fixed_clock);
        assert_eq!(embed.r#type, "rich");
        assert_eq!(embed.title, alert.title);
        assert_eq!(
            embed.description,
            "**Runbook URL**: [runbook](https://wiki.example.com/runbook)\n**Started**: x"
        );
        assert_eq!(embed.author.name, "Alertmanager");
        assert_eq!(embed.color, 0xE01E5A);
        assert_eq!(embed.timestamp, "2024-03-01T12:30:00+00:00");
    }

    #[test]
    fn test_telegram_text() {
        let alert = test_normalized();
        let text = telegram_text(&alert);
        assert!(text.starts_with(&format!("<b>{}</b>\n\n", alert.title)));
        assert!(text.ends_with(&alert.description));
    }

    #[test]
    fn test_paging_event() {
        let alert = test_normalized();
        let event = paging_event(&alert, "pd-key".to_string());
        assert_eq!(event.event_action, "trigger");
        assert_eq!(event.routing_key, "pd-key");
        assert_eq!(event.payload.severity, "critical");
        assert_eq!(event.payload.source, "web-01.example.com");
        assert_eq!(
            event.payload.summary,
            format!("{}\n\n{}", alert.title, alert.description)
        );
    }

    #[test]
    fn test_paging_event_empty_hostname_becomes_none() {
        let mut alert = test_normalized();
        alert.hostname.clear();
        let event = paging_event(&alert, "pd-key".to_string());
        assert_eq!(event.payload.source, "none");
    }
}
