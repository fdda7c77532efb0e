pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{BookField, BookRecord, RawRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::domain::presence::PresenceMode;
pub use crate::domain::report::{ErrorPolicy, OutputFormat, RejectedRecord, ValidationReport};
pub use crate::utils::error::Result;
