use crate::core::{ConfigProvider, ErrorPolicy, OutputFormat, PresenceMode};
use crate::domain::projection::FieldSelection;
use crate::utils::error::{BookError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    pub load: LoadConfig,
    #[serde(default)]
    pub error_handling: ErrorHandlingConfig,
    /// `load.include` / `load.exclude` resolved to fields while parsing.
    #[serde(skip)]
    selection: FieldSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub presence: Option<PresenceMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub format: Option<OutputFormat>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_invalid_record: Option<ErrorPolicy>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BookError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| BookError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 欄位名稱在載入時解析，未知欄位直接報錯
        config.selection = config.resolve_selection()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${BOOKS_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn resolve_selection(&self) -> Result<FieldSelection> {
        let include = match &self.load.include {
            Some(names) => validation::validate_field_names("load.include", names)?,
            None => Vec::new(),
        };
        let exclude = match &self.load.exclude {
            Some(names) => validation::validate_field_names("load.exclude", names)?,
            None => Vec::new(),
        };
        Ok(FieldSelection { include, exclude })
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_format(&self) -> OutputFormat {
        self.load.format.unwrap_or_default()
    }

    fn field_selection(&self) -> FieldSelection {
        self.selection.clone()
    }

    fn presence_mode(&self) -> PresenceMode {
        self.validation.presence.unwrap_or_default()
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.error_handling.on_invalid_record.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, &["json"])?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BookField;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[input]
path = "./data.json"

[validation]
presence = "key-exists"

[load]
output_path = "./test-output"
format = "csv"
exclude = ["title"]

[error_handling]
on_invalid_record = "abort"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.input_path(), "./data.json");
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert_eq!(config.presence_mode(), PresenceMode::KeyExists);
        assert_eq!(config.error_policy(), ErrorPolicy::Abort);
        assert_eq!(config.field_selection().exclude, vec![BookField::Title]);
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let toml_content = r#"
[input]
path = "books.json"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.presence_mode(), PresenceMode::NonNull);
        assert_eq!(config.error_policy(), ErrorPolicy::Skip);
        assert_eq!(config.field_selection(), FieldSelection::all());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BOOK_ETL_TEST_INPUT", "/srv/books/data.json");

        let toml_content = r#"
[input]
path = "${BOOK_ETL_TEST_INPUT}"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input.path, "/srv/books/data.json");

        std::env::remove_var("BOOK_ETL_TEST_INPUT");
    }

    #[test]
    fn test_unknown_field_fails_on_load() {
        let toml_content = r#"
[input]
path = "data.json"

[load]
output_path = "./output"
include = ["title", "isbn"]
"#;

        match TomlConfig::from_toml_str(toml_content) {
            Err(BookError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "load.include");
                assert_eq!(value, "isbn");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_selection_resolved_without_validate() {
        let toml_content = r#"
[input]
path = "data.json"

[load]
output_path = "./output"
include = ["title", "price"]
exclude = ["price"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.field_selection().columns(), vec![BookField::Title]);
    }

    #[test]
    fn test_bad_enum_value_is_a_parse_error() {
        let toml_content = r#"
[input]
path = "data.json"

[load]
output_path = "./output"
format = "xml"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(BookError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[input]
path = "from-file.json"

[load]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.input.path, "from-file.json");
    }
}
