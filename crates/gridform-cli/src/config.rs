//! Configuration file loading and settings resolution.
//!
//! Settings are resolved in order: command-line flag, environment variable
//! (both handled by clap), TOML file, built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use gridform::{GridformError, ParserConfig, PipelineConfig, ValidatorOptions};
use serde::Deserialize;

use crate::cli::{ParserArgs, SchemaArgs};

/// Default port for `gridform serve`.
pub const DEFAULT_PORT: u16 = 3141;

/// Contents of the TOML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub schema: SchemaSection,
    pub server: ServerSection,
    pub parser: ParserSection,
    pub validation: ValidationSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaSection {
    /// Base URL of the forms service.
    pub url: Option<String>,
    /// Local schema file.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserSection {
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationSection {
    /// Enforce `format` keywords.
    pub formats: Option<bool>,
}

impl FileConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, GridformError> {
        let text = fs::read_to_string(path).map_err(|e| GridformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
            .map_err(|e| GridformError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load the file if a path was given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, GridformError> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::debug!(path = %path.display(), "loaded configuration file");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Where to get the schema from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// No schema; validation disabled.
    None,
    /// A local JSON file.
    File(PathBuf),
    /// The forms endpoint under this base URL.
    Url(String),
}

/// Fully resolved settings for a command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub schema: SchemaSource,
    pub port: u16,
    pub parser: ParserConfig,
    pub validator: ValidatorOptions,
}

impl Settings {
    /// Merge command-line arguments over the file configuration.
    pub fn resolve(
        file: FileConfig,
        schema: &SchemaArgs,
        parser: &ParserArgs,
        port: Option<u16>,
    ) -> Result<Self, GridformError> {
        let schema = match (&schema.schema_path, &schema.schema_url) {
            (Some(path), _) => SchemaSource::File(path.clone()),
            (None, Some(url)) => SchemaSource::Url(url.clone()),
            (None, None) => match (file.schema.path, file.schema.url) {
                (Some(path), _) => SchemaSource::File(path),
                (None, Some(url)) => SchemaSource::Url(url),
                (None, None) => SchemaSource::None,
            },
        };

        let delimiter = match parser.delimiter.or(file.parser.delimiter) {
            Some(c) => Some(delimiter_byte(c)?),
            None => None,
        };

        let mut validator = ValidatorOptions::default();
        if let Some(formats) = file.validation.formats {
            validator.validate_formats = formats;
        }

        Ok(Self {
            schema,
            port: port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            parser: ParserConfig {
                delimiter,
                ..ParserConfig::default()
            },
            validator,
        })
    }

    /// Library configuration for these settings.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            parser: self.parser.clone(),
            validator: self.validator.clone(),
        }
    }
}

fn delimiter_byte(c: char) -> Result<u8, GridformError> {
    if c.is_ascii() && c != '"' && c != '\n' && c != '\r' {
        Ok(c as u8)
    } else {
        Err(GridformError::Config(format!("Unsupported delimiter: {:?}", c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config = FileConfig::parse(
            r#"
            [schema]
            url = "http://localhost:3000"

            [server]
            port = 8080

            [parser]
            delimiter = ";"

            [validation]
            formats = false
            "#,
        )
        .unwrap();

        let settings =
            Settings::resolve(config, &SchemaArgs::default(), &ParserArgs::default(), None).unwrap();
        assert_eq!(settings.schema, SchemaSource::Url("http://localhost:3000".to_string()));
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.parser.delimiter, Some(b';'));
        assert!(!settings.validator.validate_formats);
    }

    #[test]
    fn test_flags_override_file() {
        let config = FileConfig::parse("[schema]\nurl = \"http://a\"\n[server]\nport = 1\n").unwrap();
        let schema = SchemaArgs {
            schema_path: Some(PathBuf::from("schema.json")),
            schema_url: None,
        };

        let settings = Settings::resolve(config, &schema, &ParserArgs::default(), Some(2)).unwrap();
        assert_eq!(settings.schema, SchemaSource::File(PathBuf::from("schema.json")));
        assert_eq!(settings.port, 2);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(
            FileConfig::default(),
            &SchemaArgs::default(),
            &ParserArgs::default(),
            None,
        )
        .unwrap();
        assert_eq!(settings.schema, SchemaSource::None);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.parser.delimiter, None);
        assert!(settings.validator.validate_formats);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::parse("[server]\nhost = \"x\"\n").is_err());
    }

    #[test]
    fn test_bad_delimiter() {
        let parser = ParserArgs { delimiter: Some('é') };
        let err = Settings::resolve(FileConfig::default(), &SchemaArgs::default(), &parser, None);
        assert!(matches!(err, Err(GridformError::Config(_))));
    }
}
