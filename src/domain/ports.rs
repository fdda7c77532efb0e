use crate::domain::model::RawRecord;
use crate::domain::presence::PresenceMode;
use crate::domain::projection::FieldSelection;
use crate::domain::report::{ErrorPolicy, OutputFormat, ValidationReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn field_selection(&self) -> FieldSelection;
    fn presence_mode(&self) -> PresenceMode;
    fn error_policy(&self) -> ErrorPolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    async fn transform(&self, data: Vec<RawRecord>) -> Result<ValidationReport>;
    async fn load(&self, report: ValidationReport) -> Result<String>;
}
