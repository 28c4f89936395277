use clap::Parser;
use partner_etl::utils::{logger, validation::Validate};
use partner_etl::{
    CliConfig, EtlEngine, EtlError, Extractor, FieldMap, LocalStorage, PartnerPipeline,
    TextCleaner, TomlConfig,
};
use std::path::Path;
use std::process::ExitCode;

fn report(e: &EtlError) -> ExitCode {
    tracing::error!("❌ Partner extraction failed: {}", e);
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    ExitCode::from(e.exit_code() as u8)
}

fn build_extractor(config: &CliConfig) -> partner_etl::Result<Extractor> {
    let (field_map, strip_symbols) = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading field table from: {}", path);
            let table = TomlConfig::from_file(path)?;
            table.validate()?;
            (table.field_map(), table.strip_symbols())
        }
        None => (FieldMap::default(), false),
    };

    Extractor::new(&field_map, TextCleaner::new(strip_symbols || config.strip_symbols))
}

fn main() -> ExitCode {
    let config = CliConfig::parse();

    // 初始化日誌
    if let Err(e) = logger::init_cli_logger(config.verbose, config.log_file.as_deref().map(Path::new)) {
        eprintln!("❌ {}", e);
        return ExitCode::from(e.exit_code() as u8);
    }

    tracing::info!("Starting partner-etl");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        return report(&e);
    }

    let extractor = match build_extractor(&config) {
        Ok(extractor) => extractor,
        Err(e) => return report(&e),
    };

    let pipeline = PartnerPipeline::new(LocalStorage::default(), config, extractor);
    let engine = EtlEngine::new(pipeline);

    match engine.run() {
        Ok(outputs) => {
            tracing::info!("✅ Partner extraction completed successfully!");
            for path in &outputs {
                println!("📁 {}", path);
            }
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}
