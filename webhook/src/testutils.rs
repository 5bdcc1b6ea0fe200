use crate::alert::{Alert, AlertStatus, Annotations, Labels, NormalizedAlert};
use crate::config::Config;
use crate::environment::EnvironmentResolver;
use indexmap::IndexMap;
use std::collections::HashSet;

pub fn test_resolver() -> EnvironmentResolver {
    EnvironmentResolver::new(
        HashSet::from(["production".to_string(), "staging".to_string()]),
        IndexMap::from([("prod".to_string(), "production".to_string())]),
        "production".to_string(),
    )
}

pub fn test_alert(status: AlertStatus) -> Alert {
    Alert {
        status,
        labels: Labels::default(),
        annotations: Annotations::default(),
        starts_at: "2024-03-01T12:00:00+00:00".to_string(),
        ends_at: "2024-03-01T13:00:00+00:00".to_string(),
    }
}

pub fn test_normalized() -> NormalizedAlert {
    NormalizedAlert {
        title: "FIRING : INSTANCE DOWN".to_string(),
        description: "Hostname: web-01.example.com\nStarted: 2024-03-01 12:00:00".to_string(),
        hostname: "web-01.example.com".to_string(),
        application: String::new(),
        environment: "production".to_string(),
        severity: "critical".to_string(),
        status: AlertStatus::Firing,
    }
}

pub fn test_config() -> Config {
    serde_yaml::from_str(
        r#"
discord:
    bot_token: "discord-token"
    environments:
        production:
            critical:
                channel_id: "100200300"
                author:
                    name: Alertmanager
                    icon_url: "https://icons.example.com/alert.png"
            warning:
                channel_id: "100200301"
                author:
                    name: Alertmanager
                    icon_url: "https://icons.example.com/alert.png"
telegram:
    bot_token: "telegram-token"
    environments:
        production:
            critical:
                chat_id: -1001234567890
pagerduty:
    services:
        default: "pd-default-key"
        web: "pd-web-key"
        api: "pd-api-key"
        bastion: "pd-bastion-key"
valid_environments:
    - production
    - staging
default_environment: production
environment_mapping:
    - pattern: prod
      environment: production
    - pattern: stag
      environment: staging
"#,
    )
    .expect("valid test config")
}
