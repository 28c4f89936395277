use crate::core::exporter;
use crate::core::extractor::Extractor;
use crate::core::{ConfigProvider, PartnerRecord, Pipeline, Storage, Summary, TransformResult};
use crate::utils::error::{EtlError, Result};
use std::io;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Saved partner-directory page in, spreadsheet files out.
pub struct PartnerPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    extractor: Extractor,
}

impl<S: Storage, C: ConfigProvider> PartnerPipeline<S, C> {
    pub fn new(storage: S, config: C, extractor: Extractor) -> Self {
        Self {
            storage,
            config,
            extractor,
        }
    }

    fn output_file(&self, stem: &str, suffix: &str, ext: &str) -> PathBuf {
        Path::new(self.config.output_path()).join(format!("{stem}{suffix}.{ext}"))
    }

    fn write(&self, path: PathBuf, data: &[u8], written: &mut Vec<String>) -> Result<()> {
        tracing::debug!("Writing {} bytes to {}", data.len(), path.display());
        self.storage.write_file(&path, data)?;
        written.push(path.to_string_lossy().into_owned());
        Ok(())
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for PartnerPipeline<S, C> {
    fn extract(&self) -> Result<Vec<PartnerRecord>> {
        let input = Path::new(self.config.input_path());
        tracing::debug!("Reading HTML from {}", input.display());

        let bytes = self.storage.read_file(input)?;
        // 存檔頁面必須是 UTF-8
        let html = String::from_utf8(bytes).map_err(|e| EtlError::InputRead {
            path: input.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        Ok(self.extractor.extract(&html))
    }

    fn transform(&self, data: Vec<PartnerRecord>) -> Result<TransformResult> {
        if data.is_empty() {
            tracing::warn!("No partner data found, output will only contain the header row");
        }

        Ok(TransformResult {
            columns: self.extractor.columns(),
            summary: Summary::from_records(&data),
            records: data,
        })
    }

    fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        let stem = self.config.output_name();
        // 所有輸出檔共用同一個時間戳
        let suffix = if self.config.timestamped() {
            format!("_{}", chrono::Local::now().format(TIMESTAMP_FORMAT))
        } else {
            String::new()
        };

        let mut written = Vec::new();
        for format in self.config.output_formats() {
            let data = exporter::render(*format, &result)?;
            self.write(self.output_file(stem, &suffix, format.ext()), &data, &mut written)?;
        }

        if self.config.write_summary() {
            let text = result.summary.to_string();
            self.write(self.output_file("summary", &suffix, "txt"), text.as_bytes(), &mut written)?;
        }

        Ok(written)
    }
}
