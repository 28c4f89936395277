use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract, transform, load. Returns the written paths.
    pub fn run(&self) -> Result<Vec<String>> {
        tracing::info!("Starting partner extraction");

        let records = self.pipeline.extract()?;
        tracing::info!("Extracted {} partner records", records.len());

        let result = self.pipeline.transform(records)?;
        tracing::info!(
            "Prepared {} rows x {} columns",
            result.records.len(),
            result.columns.len()
        );

        let outputs = self.pipeline.load(result)?;
        for path in &outputs {
            tracing::info!("Output saved to: {}", path);
        }

        Ok(outputs)
    }
}
