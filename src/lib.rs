pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{
    etl::EtlEngine, extractor::Extractor, field_map::FieldMap, pipeline::PartnerPipeline,
};
pub use crate::domain::model::PartnerRecord;
pub use crate::domain::ports::OutputFormat;
pub use crate::utils::error::{EtlError, Result};
pub use crate::utils::text::TextCleaner;
