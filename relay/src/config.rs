use std::fs::File;
use std::path::Path;
use webhook::config::{Config, ValidationError};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ValidationError),
}

/// Load and validate the relay configuration.
///
/// Any failure here is fatal: the process must not serve traffic with a
/// partial or inconsistent routing table.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let file = File::open(path)?;
    let config: Config = serde_yaml::from_reader(file)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn test_load_valid_config() {
        let yaml = r#"
telegram:
    bot_token: "telegram-token"
    environments:
        production:
            critical:
                chat_id: 42
valid_environments: [production]
default_environment: production
environment_mapping:
    - pattern: prod
      environment: production
"#;
        let tmp = write_tmp_file(yaml);
        let config = load(tmp.path()).expect("load config");
        assert_eq!(config.default_environment, "production");
        assert!(config.telegram.is_some());
        assert!(config.discord.is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_unparsable_yaml_is_an_error() {
        let tmp = write_tmp_file("valid_environments: [unterminated");
        assert!(matches!(
            load(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        // Parses, but configures no chat destination
        let yaml = r#"
valid_environments: [production]
default_environment: production
environment_mapping: []
"#;
        let tmp = write_tmp_file(yaml);
        assert!(matches!(
            load(tmp.path()),
            Err(ConfigError::InvalidConfig(ValidationError::NoChatDestination))
        ));
    }
}
