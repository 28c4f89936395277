pub mod etl;
pub mod exporter;
pub mod extractor;
pub mod field_map;
pub mod pipeline;
pub mod xlsx;

pub use crate::domain::model::{PartnerRecord, Summary, TransformResult};
pub use crate::domain::ports::{ConfigProvider, OutputFormat, Pipeline, Storage};
pub use crate::utils::error::Result;
