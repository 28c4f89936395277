use crate::core::xlsx;
use crate::domain::model::TransformResult;
use crate::domain::ports::OutputFormat;
use crate::utils::error::{EtlError, Result};

fn delimited(result: &TransformResult, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(&result.columns)?;
    for row in result.rows() {
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Serialize the table in `format`. One header row, then one row per record.
pub fn render(format: OutputFormat, result: &TransformResult) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Xlsx => {
            let rows: Vec<Vec<&str>> = result.rows().collect();
            xlsx::write_workbook(&result.columns, &rows)
        }
        OutputFormat::Csv => delimited(result, b','),
        OutputFormat::Tsv => delimited(result, b'\t'),
        OutputFormat::Json => {
            let mut json = serde_json::to_vec_pretty(&result.records)?;
            json.push(b'\n');
            Ok(json)
        }
    }
}
