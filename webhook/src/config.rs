use crate::environment::EnvironmentResolver;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use url::Url;

/// Paging service key used when no configured service matches
pub const DEFAULT_SERVICE: &str = "default";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Neither a discord nor a telegram section is configured")]
    NoChatDestination,

    #[error("pagerduty services map has no \"{DEFAULT_SERVICE}\" entry")]
    MissingDefaultService,

    #[error("valid_environments must not be empty")]
    EmptyValidEnvironments,

    #[error("default_environment \"{0}\" is not in valid_environments")]
    UnknownDefaultEnvironment(String),

    #[error("environment_mapping entry \"{0}\" has an empty pattern")]
    EmptyMappingPattern(String),
}

/// Relay configuration, loaded once at startup and read-only afterwards
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub discord: Option<DiscordConfig>,
    pub telegram: Option<TelegramConfig>,
    pub pagerduty: Option<PagerdutyConfig>,
    /// Environments alerts may be routed under
    pub valid_environments: HashSet<String>,
    /// Fallback when an alert names no valid environment
    pub default_environment: String,
    /// Ordered substring → environment rewrite rules; first match wins
    pub environment_mapping: Vec<EnvironmentMapping>,
}

impl Config {
    /// Validates the relay configuration beyond what deserialization enforces
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.discord.is_none() && self.telegram.is_none() {
            return Err(ValidationError::NoChatDestination);
        }

        if let Some(pagerduty) = &self.pagerduty
            && !pagerduty.services.contains_key(DEFAULT_SERVICE)
        {
            return Err(ValidationError::MissingDefaultService);
        }

        if self.valid_environments.is_empty() {
            return Err(ValidationError::EmptyValidEnvironments);
        }

        if !self.valid_environments.contains(&self.default_environment) {
            return Err(ValidationError::UnknownDefaultEnvironment(
                self.default_environment.clone(),
            ));
        }

        for entry in &self.environment_mapping {
            if entry.pattern.is_empty() {
                return Err(ValidationError::EmptyMappingPattern(
                    entry.environment.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Build the environment resolver from the global environment sections
    pub fn environment_resolver(&self) -> EnvironmentResolver {
        let mapping: IndexMap<String, String> = self
            .environment_mapping
            .iter()
            .map(|entry| (entry.pattern.clone(), entry.environment.clone()))
            .collect();

        EnvironmentResolver::new(
            self.valid_environments.clone(),
            mapping,
            self.default_environment.clone(),
        )
    }
}

/// One substring rewrite rule for environment resolution
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EnvironmentMapping {
    /// Substring to look for in the raw environment label
    pub pattern: String,
    /// Canonical environment the match rewrites to
    pub environment: String,
}

/// Team-chat destination configuration
#[derive(Clone, Debug, Deserialize)]
pub struct DiscordConfig {
    pub bot_token: String,
    /// environment → severity → delivery parameters
    pub environments: HashMap<String, HashMap<String, DiscordRoute>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DiscordRoute {
    pub channel_id: String,
    pub author: Author,
}

/// Author block shown on rich-embed messages
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Author {
    pub name: String,
    /// `url::Url` rejects invalid icon URLs at deserialization time
    pub icon_url: Url,
}

/// Bot-messaging destination configuration
#[derive(Clone, Debug, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// environment → severity → delivery parameters
    pub environments: HashMap<String, HashMap<String, TelegramRoute>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TelegramRoute {
    pub chat_id: i64,
}

/// Incident-paging destination configuration
#[derive(Clone, Debug, Deserialize)]
pub struct PagerdutyConfig {
    /// service name → routing key; must contain a "default" entry
    pub services: HashMap<String, String>,
}
