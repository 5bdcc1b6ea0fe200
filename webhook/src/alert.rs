use serde::Deserialize;

/// Whether the upstream monitoring pipeline considers the alert active
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Firing,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
        }
    }
}

/// Labels attached to an alert by the monitoring pipeline
///
/// All fields are optional; absence is a normal, expected state and is
/// handled field by field during extraction.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub alertname: Option<String>,
    pub environment: Option<String>,
    pub app: Option<String>,
    pub hostname: Option<String>,
    pub nodename: Option<String>,
    pub node: Option<String>,
    pub instance: Option<String>,
    pub severity: Option<String>,
    pub log: Option<String>,
}

/// Free-text annotations attached to an alert
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub info: Option<String>,
    pub runbook_url: Option<String>,
}

/// One alert event as posted by the monitoring pipeline
#[derive(Clone, Debug, Deserialize)]
pub struct Alert {
    pub status: AlertStatus,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub annotations: Annotations,
    /// ISO-8601 timestamp with offset, parsed lazily during extraction
    #[serde(rename = "startsAt")]
    pub starts_at: String,
    #[serde(rename = "endsAt")]
    pub ends_at: String,
}

/// Webhook request body; keys other than `alerts` are ignored
#[derive(Clone, Debug, Deserialize)]
pub struct AlertBatch {
    pub alerts: Vec<Alert>,
}

/// An alert reduced to the fields the notifiers format and route on
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedAlert {
    pub title: String,
    pub description: String,
    /// Empty when no hostname-family label was present
    pub hostname: String,
    pub application: String,
    /// Always a member of the configured valid environments
    pub environment: String,
    pub severity: String,
    pub status: AlertStatus,
}

/// Extraction outcome, matched exhaustively by the dispatcher
#[derive(Clone, Debug, PartialEq)]
pub enum Extraction {
    /// Heartbeat alert, dropped without any delivery attempt
    Suppressed,
    Normalized(NormalizedAlert),
}
