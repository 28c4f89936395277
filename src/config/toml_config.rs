use crate::core::field_map::{EntryLocator, FieldMap, FieldRule};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A field table loaded from TOML, replacing the built-in one.
///
/// ```toml
/// [entry]
/// selector = "td.pl-results-td-row-no"
/// container = "tr"
///
/// [[fields]]
/// column = "Name"
/// selector = "a.pl-results-partner-name"
/// extract = "text"
///
/// [[fields]]
/// column = "Locations"
/// selector = "span.pl-results-partner-count"
/// extract = { capture = 'Locations:\s*(\d+)' }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub entry: EntryLocator,
    pub fields: Vec<FieldRule>,
    #[serde(default)]
    pub transform: TransformOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformOptions {
    #[serde(default)]
    pub strip_symbols: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EtlError::ConfigError {
            message: format!("Cannot read field table '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn field_map(&self) -> FieldMap {
        FieldMap {
            entry: self.entry.clone(),
            fields: self.fields.clone(),
        }
    }

    pub fn strip_symbols(&self) -> bool {
        self.transform.strip_symbols
    }
}

impl From<FieldMap> for TomlConfig {
    fn from(map: FieldMap) -> Self {
        Self {
            entry: map.entry,
            fields: map.fields,
            transform: TransformOptions::default(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.field_map().validate()
    }
}
