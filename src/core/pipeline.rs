use crate::core::{
    BookRecord, ConfigProvider, ErrorPolicy, OutputFormat, Pipeline, RawRecord, RejectedRecord,
    Storage, ValidationReport,
};
use crate::domain::projection::FieldSelection;
use crate::utils::error::{BookError, Result};
use serde_json::Value;

pub const OUTPUT_STEM: &str = "books";

/// Reads a JSON array of book objects, validates each one and writes the
/// accepted books back out.
pub struct BookPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BookPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn output_file(&self) -> String {
        format!(
            "{}/{}.{}",
            self.config.output_path().trim_end_matches('/'),
            OUTPUT_STEM,
            self.config.output_format().extension()
        )
    }
}

/// Splits a parsed document into raw records. Anything but an array of
/// objects is rejected.
pub fn parse_records(document: Value) -> Result<Vec<RawRecord>> {
    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(BookError::InputFormat {
                message: format!("expected a JSON array at the top level, found {}", kind(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(BookError::InputFormat {
                message: format!("element #{} is {}, expected an object", index, kind(&other)),
            }),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn render_json(books: &[BookRecord], selection: &FieldSelection) -> Result<Vec<u8>> {
    let projected: Vec<Value> = books
        .iter()
        .map(|book| Value::Object(selection.project(book)))
        .collect();
    Ok(serde_json::to_vec_pretty(&projected)?)
}

pub fn render_csv(books: &[BookRecord], selection: &FieldSelection) -> Result<Vec<u8>> {
    let columns = selection.columns();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|field| field.as_str()))?;
    for book in books {
        writer.write_record(columns.iter().map(|&field| match book.get(field) {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        }))?;
    }

    writer
        .into_inner()
        .map_err(|e| BookError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BookPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        let input = self.config.input_path();
        tracing::debug!("Reading book records from: {}", input);

        let bytes = self.storage.read_file(input).await?;
        let document: Value = serde_json::from_slice(&bytes)?;
        let records = parse_records(document)?;

        tracing::debug!("Parsed {} raw records", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<ValidationReport> {
        let mode = self.config.presence_mode();
        let policy = self.config.error_policy();
        let mut report = ValidationReport::default();

        for (index, raw) in data.iter().enumerate() {
            match BookRecord::from_raw_with(raw, mode) {
                Ok(book) => {
                    tracing::debug!("Record #{} accepted: {}", index, book.title());
                    report.books.push(book);
                }
                Err(error) if policy == ErrorPolicy::Abort => {
                    tracing::error!("Record #{} rejected, aborting: {}", index, error);
                    return Err(BookError::RecordRejected {
                        index,
                        source: Box::new(error),
                    });
                }
                Err(error) => {
                    tracing::warn!("Record #{} skipped: {}", index, error);
                    report.rejected.push(RejectedRecord {
                        index,
                        title: raw.get("title").and_then(|v| v.as_str()).map(str::to_string),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    async fn load(&self, report: ValidationReport) -> Result<String> {
        let selection = self.config.field_selection();
        let output_path = self.output_file();

        let data = match self.config.output_format() {
            OutputFormat::Json => render_json(&report.books, &selection)?,
            OutputFormat::Csv => render_csv(&report.books, &selection)?,
        };

        tracing::debug!("Writing {} books ({} bytes) to {}", report.books.len(), data.len(), output_path);
        self.storage.write_file(&output_path, &data).await?;

        Ok(output_path)
    }
}
