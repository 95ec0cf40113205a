use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - OMDb API key is not empty when the section is present
/// - Translation language pair looks like `src|dst`
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(omdb) = &config.omdb {
        if omdb.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "omdb.api_key cannot be empty".to_string(),
            ));
        }
    }

    if let Some(translation) = &config.translation {
        let valid = translation
            .langpair
            .split_once('|')
            .is_some_and(|(from, to)| !from.is_empty() && !to.is_empty());
        if !valid {
            return Err(ConfigError::ValidationError(format!(
                "translation.langpair must look like 'en|pt-br', got '{}'",
                translation.langpair
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::external_catalog::OmdbConfig;
    use crate::translation::MyMemoryConfig;
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let config = Config {
            omdb: Some(OmdbConfig::with_api_key("  ")),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_langpair_fails() {
        let config = Config {
            translation: Some(MyMemoryConfig {
                langpair: "pt-br".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
