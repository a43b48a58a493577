use crate::config::{AppConfig, CliConfig};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

impl CliConfig {
    /// Loads the TOML file (or defaults), applies command line overrides and validates.
    pub fn resolve(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };

        let config = self.apply_overrides(config).with_env_api_key();
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(path) = &self.portfolio {
            config.portfolio.path = path.clone();
        }
        if let Some(limit) = self.limit {
            config.portfolio.match_limit = limit;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "cold-mail",
            "--url",
            "https://jobs.example.com/1",
            "--limit",
            "3",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.url.as_deref(), Some("https://jobs.example.com/1"));
        assert_eq!(cli.limit, Some(3));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[model]\napi_key = \"k\"\n[portfolio]\npath = \"file.csv\"\nmatch_limit = 5"
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "cold-mail",
            "--config",
            file.path().to_str().unwrap(),
            "--portfolio",
            "override.csv",
            "--limit",
            "1",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.portfolio.path, "override.csv");
        assert_eq!(config.portfolio.match_limit, 1);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[model]\napi_key = \"k\"").unwrap();

        let cli = CliConfig::parse_from([
            "cold-mail",
            "--config",
            file.path().to_str().unwrap(),
            "--limit",
            "0",
        ]);
        assert!(cli.resolve().is_err());
    }
}
