use shared::metrics_defs::{MetricDef, MetricType};

pub const ALERTS_RECEIVED: MetricDef = MetricDef {
    name: "alerts.received",
    metric_type: MetricType::Counter,
    description: "Alerts accepted from the monitoring pipeline",
};

pub const ALERTS_SUPPRESSED: MetricDef = MetricDef {
    name: "alerts.suppressed",
    metric_type: MetricType::Counter,
    description: "Heartbeat alerts dropped without a notification",
};

pub const NOTIFICATIONS_SENT: MetricDef = MetricDef {
    name: "notifications.sent",
    metric_type: MetricType::Counter,
    description: "Notifications delivered successfully to a destination",
};

pub const NOTIFICATIONS_FAILED: MetricDef = MetricDef {
    name: "notifications.failed",
    metric_type: MetricType::Counter,
    description: "Delivery attempts that ended in a recorded failure",
};

pub const RATE_LIMIT_RETRIES: MetricDef = MetricDef {
    name: "notifications.rate_limit_retries",
    metric_type: MetricType::Counter,
    description: "Deliveries retried after an upstream 429",
};

pub const ALL_METRICS: &[MetricDef] = &[
    ALERTS_RECEIVED,
    ALERTS_SUPPRESSED,
    NOTIFICATIONS_SENT,
    NOTIFICATIONS_FAILED,
    RATE_LIMIT_RETRIES,
];
