use crate::core::{Pipeline, ValidationReport};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlSummary {
    pub output_path: String,
    pub accepted: usize,
    pub rejected: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extracts and validates without writing anything.
    pub async fn dry_run(&self) -> Result<ValidationReport> {
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Dry run: extracted {} raw records", raw_data.len());
        self.pipeline.transform(raw_data).await
    }

    pub async fn run(&self) -> Result<EtlSummary> {
        tracing::info!("Starting book ETL process");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} raw records", raw_data.len());

        // Transform
        let report = self.pipeline.transform(raw_data).await?;
        let accepted = report.books.len();
        let rejected = report.rejected.len();
        tracing::info!("Validated {} of {} records", accepted, report.total());

        // Load
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(EtlSummary {
            output_path,
            accepted,
            rejected,
        })
    }
}
