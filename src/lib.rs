pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};

pub use core::{
    etl::{EtlEngine, EtlSummary},
    pipeline::BookPipeline,
};
pub use domain::isbn::validate_isbn10;
pub use domain::model::{BookField, BookRecord, RawRecord};
pub use domain::presence::{check_presence, PresenceMode};
pub use domain::projection::FieldSelection;
pub use domain::report::{ErrorPolicy, OutputFormat, ValidationReport};
pub use utils::error::{BookError, Result};
