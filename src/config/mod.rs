pub mod cli;
pub mod toml_config;

use crate::core::{BookField, ConfigProvider, ErrorPolicy, OutputFormat, PresenceMode};
use crate::domain::projection::FieldSelection;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "book-etl"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Validate a JSON file of book records and export the valid ones")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = "./data.json"))]
    pub input: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value_t = OutputFormat::Json))]
    pub format: OutputFormat,

    /// Only write these fields
    #[cfg_attr(feature = "cli", arg(long, value_enum, value_delimiter = ','))]
    pub include: Vec<BookField>,

    /// Leave these fields out
    #[cfg_attr(feature = "cli", arg(long, value_enum, value_delimiter = ','))]
    pub exclude: Vec<BookField>,

    /// When an isbn key with a null value counts as present
    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value_t = PresenceMode::NonNull))]
    pub presence: PresenceMode,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value_t = ErrorPolicy::Skip))]
    pub on_error: ErrorPolicy,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub json_logs: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input: "./data.json".to_string(),
            output_path: "./output".to_string(),
            format: OutputFormat::default(),
            include: Vec::new(),
            exclude: Vec::new(),
            presence: PresenceMode::default(),
            on_error: ErrorPolicy::default(),
            verbose: false,
            json_logs: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn field_selection(&self) -> FieldSelection {
        FieldSelection {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
        }
    }

    fn presence_mode(&self) -> PresenceMode {
        self.presence
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.on_error
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["json"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("output_path", &self.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.presence_mode(), PresenceMode::NonNull);
        assert_eq!(config.field_selection(), FieldSelection::all());
    }

    #[test]
    fn test_rejects_non_json_input() {
        let config = CliConfig {
            input: "books.csv".to_string(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_flags() {
        let config = CliConfig::parse_from([
            "book-etl",
            "--input",
            "library.json",
            "--format",
            "csv",
            "--exclude",
            "title,isbn_13",
            "--presence",
            "key-exists",
            "--on-error",
            "abort",
        ]);
        assert_eq!(config.input, "library.json");
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.exclude, vec![BookField::Title, BookField::Isbn13]);
        assert_eq!(config.presence, PresenceMode::KeyExists);
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }
}
