//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Toml(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Parse error: {}", e),
            ConfigError::Toml(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Toml(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Load and validate configuration from a file.
///
/// Files ending in `.toml` are read as TOML, everything else as JSON.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let config = if is_toml {
        parse_toml(&content)?
    } else {
        parse_json(&content)?
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a JSON document without validating it.
pub fn parse_json(content: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(content).map_err(ConfigError::Json)
}

/// Parse a TOML document without validating it.
pub fn parse_toml(content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{ "httpServer": { "port": 9000, "apis": ["pingApi"] } }"#);
        let config = load_config(file.path()).unwrap();
        let http = config.http_server.unwrap();
        assert_eq!(http.port, Some(9000));
        assert_eq!(http.apis, vec!["pingApi".to_string()]);
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(
            ".toml",
            "serverId = \"node-1\"\n\n[eventBus]\nhost = \"10.0.0.5\"\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server_id.as_deref(), Some("node-1"));
        assert_eq!(config.event_bus.unwrap().host, "10.0.0.5");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/quant/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_temp(".json", "{ \"log\": ");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_validation_runs_on_load() {
        let file = write_temp(".json", r#"{ "httpServer": {} }"#);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("httpServer.port"));
    }
}
