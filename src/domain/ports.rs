use crate::domain::model::{PartnerRecord, TransformResult};
use crate::utils::error::Result;
use std::path::Path;

/// Byte-level file access. Reads are pipeline input, writes are pipeline output.
pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// File stem shared by every export, before any timestamp suffix.
    fn output_name(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    fn timestamped(&self) -> bool;
    fn write_summary(&self) -> bool;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<PartnerRecord>>;
    fn transform(&self, data: Vec<PartnerRecord>) -> Result<TransformResult>;
    /// Returns the paths written, in write order.
    fn load(&self, result: TransformResult) -> Result<Vec<String>>;
}
