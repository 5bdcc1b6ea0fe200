use indexmap::IndexMap;
use std::collections::HashSet;

/// Maps raw environment labels onto the configured set of valid environments.
///
/// Resolution is a two-stage fallback: exact membership, then the first
/// substring match in the mapping table, then the default. The mapping table
/// preserves configuration order (first match wins), so resolution is
/// deterministic even when patterns overlap.
#[derive(Clone, Debug)]
pub struct EnvironmentResolver {
    valid: HashSet<String>,
    mapping: IndexMap<String, String>,
    default: String,
}

impl EnvironmentResolver {
    pub fn new(
        valid: HashSet<String>,
        mapping: IndexMap<String, String>,
        default: String,
    ) -> Self {
        Self {
            valid,
            mapping,
            default,
        }
    }

    /// Resolve a raw environment label to a member of the valid set.
    ///
    /// Total: any input, including `None`, yields a valid environment.
    pub fn resolve(&self, raw: Option<&str>) -> &str {
        let Some(raw) = raw else {
            tracing::info!("no environment label, falling back to default environment");
            return &self.default;
        };

        if self.valid.contains(raw) {
            return self
                .valid
                .get(raw)
                .map(String::as_str)
                .unwrap_or(&self.default);
        }

        // Partial match against the mapping table, in configured order
        let mapped = self
            .mapping
            .iter()
            .find(|(pattern, _)| raw.contains(pattern.as_str()))
            .map(|(_, environment)| environment);

        match mapped {
            Some(environment) if self.valid.contains(environment) => environment,
            _ => {
                tracing::info!(
                    environment = raw,
                    "invalid environment, falling back to default environment"
                );
                &self.default
            }
        }
    }
}
