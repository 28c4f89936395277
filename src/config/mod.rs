pub mod toml_config;

#[cfg(feature = "cli")]
mod cli {
    use crate::core::{ConfigProvider, OutputFormat};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_file_stem, validate_path, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "partner-etl")]
    #[command(about = "Extract partner records from a saved partner-directory page into a spreadsheet")]
    pub struct CliConfig {
        /// Saved HTML page of the partner directory
        #[arg(default_value = "Partners_Mendix.htm")]
        pub input_path: String,

        /// Directory the exports are written to
        #[arg(long, default_value = "./output")]
        pub output_path: String,

        /// File name (without extension) of the exports
        #[arg(long, default_value = "partner_data")]
        pub output_name: String,

        /// Output formats, comma separated
        #[arg(long = "format", value_enum, value_delimiter = ',', default_value = "xlsx")]
        pub output_formats: Vec<OutputFormat>,

        #[arg(long, help = "Append the run time to output file names")]
        pub timestamp: bool,

        #[arg(long, help = "Do not write the summary file")]
        pub no_summary: bool,

        #[arg(long, help = "Remove symbols other than basic punctuation from extracted text")]
        pub strip_symbols: bool,

        /// TOML file with a replacement field table
        #[arg(long)]
        pub config: Option<String>,

        /// Also write the log to this file
        #[arg(long)]
        pub log_file: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_name(&self) -> &str {
            &self.output_name
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.output_formats
        }

        fn timestamped(&self) -> bool {
            self.timestamp
        }

        fn write_summary(&self) -> bool {
            !self.no_summary
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input_path", &self.input_path)?;
            validate_path("output_path", &self.output_path)?;
            validate_file_stem("output_name", &self.output_name)?;
            if let Some(config) = &self.config {
                validate_path("config", config)?;
            }
            if let Some(log_file) = &self.log_file {
                validate_path("log_file", log_file)?;
            }
            Ok(())
        }
    }

}

#[cfg(feature = "cli")]
pub use cli::CliConfig;
