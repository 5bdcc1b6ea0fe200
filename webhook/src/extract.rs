use crate::alert::{Alert, AlertStatus, Extraction, NormalizedAlert};
use crate::environment::EnvironmentResolver;
use crate::errors::WebhookError;
use chrono::DateTime;

/// Sentinel alert emitted by the monitoring pipeline as a heartbeat
const HEARTBEAT_ALERTNAME: &str = "Watchdog";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a destination wants field labels wrapped in the description body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelStyle {
    /// `<b>Label</b>: value` (bot-messaging)
    Html,
    /// `**Label**: value` (team-chat)
    Markdown,
    /// `Label: value` (incident-paging)
    Plain,
}

impl LabelStyle {
    fn line(&self, label: &str, value: &str) -> String {
        match self {
            LabelStyle::Html => format!("<b>{label}</b>: {value}"),
            LabelStyle::Markdown => format!("**{label}**: {value}"),
            LabelStyle::Plain => format!("{label}: {value}"),
        }
    }
}

/// Pull the destination-facing fields out of one alert.
///
/// Returns `Extraction::Suppressed` for heartbeat alerts; every other alert
/// yields a fully-populated `NormalizedAlert`. The only hard failure is an
/// unparsable start/end timestamp, which indicates a broken upstream payload
/// rather than a condition worth degrading around.
pub fn extract(
    alert: &Alert,
    default_severity: &str,
    style: LabelStyle,
    resolver: &EnvironmentResolver,
) -> Result<Extraction, WebhookError> {
    if alert.labels.alertname.as_deref() == Some(HEARTBEAT_ALERTNAME) {
        return Ok(Extraction::Suppressed);
    }

    let mut title = alert.status.as_str().to_uppercase();
    let mut description = String::new();

    if let Some(environment) = &alert.labels.environment {
        description.push_str(&style.line("Environment", &format!("{environment}\n")));
    }

    let mut application = String::new();
    if let Some(app) = &alert.labels.app {
        application = app.clone();
        description.push_str(&style.line("App", &format!("{app}\n")));
    }

    // First present label of the hostname family wins
    let mut hostname = String::new();
    let hostname_family = [
        ("Hostname", &alert.labels.hostname),
        ("Instance", &alert.labels.nodename),
        ("Node", &alert.labels.node),
        ("Instance", &alert.labels.instance),
    ];
    if let Some((label, value)) = hostname_family
        .iter()
        .find_map(|(label, value)| value.as_deref().map(|v| (*label, v)))
    {
        hostname = value.to_string();
        description.push_str(&style.line(label, &format!("{value}\n")));
    }

    let severity = alert
        .labels
        .severity
        .clone()
        .unwrap_or_else(|| default_severity.to_string());

    if let Some(info) = &alert.annotations.info {
        description.push_str(&style.line("Info", &format!("{info}\n")));
    }

    if let Some(summary) = &alert.annotations.summary {
        title = format!("{} : {}", alert.status.as_str(), summary).to_uppercase();
    }

    if let Some(text) = &alert.annotations.description {
        description.push_str(&style.line("Description", &format!("{text}\n")));
    }

    if let Some(runbook_url) = &alert.annotations.runbook_url {
        description.push_str(&style.line("Runbook URL", &format!("{runbook_url}\n")));
    }

    if let Some(log) = &alert.labels.log {
        description.push_str(&style.line("Log", &format!("{log}\n")));
    }

    match alert.status {
        AlertStatus::Resolved => {
            description.push_str(&style.line("Resolved", &format_timestamp(&alert.ends_at)?));
        }
        AlertStatus::Firing => {
            description.push_str(&style.line("Started", &format_timestamp(&alert.starts_at)?));
        }
    }

    let environment = resolver
        .resolve(alert.labels.environment.as_deref())
        .to_string();

    Ok(Extraction::Normalized(NormalizedAlert {
        title,
        description,
        hostname,
        application,
        environment,
        severity,
        status: alert.status,
    }))
}

/// Reformat an ISO-8601 timestamp (UTC or local offset, optional fractional
/// seconds) as `YYYY-MM-DD HH:MM:SS`.
fn format_timestamp(raw: &str) -> Result<String, WebhookError> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| WebhookError::MalformedTimestamp(format!("{raw}: {e}")))?;
    Ok(parsed.format(TIMESTAMP_FORMAT).to_string())
}
