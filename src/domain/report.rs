use crate::domain::model::BookRecord;
use crate::utils::error::BookError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the driver does when a record fails construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure, keep it in the report and move on.
    #[default]
    Skip,
    /// Stop the whole batch at the first failure.
    Abort,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Skip => write!(f, "skip"),
            ErrorPolicy::Abort => write!(f, "abort"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug)]
pub struct RejectedRecord {
    /// Position in the input array, starting at 0.
    pub index: usize,
    pub title: Option<String>,
    pub error: BookError,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub books: Vec<BookRecord>,
    pub rejected: Vec<RejectedRecord>,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.books.len() + self.rejected.len()
    }
}
