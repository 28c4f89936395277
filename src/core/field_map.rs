//! The mapping table between output columns and the partner-directory markup.
//!
//! Class names here are owned by the third-party platform that renders the
//! saved page. When its markup changes, this table (or a `--config` file with
//! the same shape) is the only thing that needs editing.

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_unique, Validate};
use serde::{Deserialize, Serialize};

/// How the matches of a rule's selector become a single cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extraction {
    /// Text of the first match.
    Text,
    /// First capture group of the regex, applied to the first match's text.
    Capture(String),
    /// Texts of every match joined with ", ".
    JoinAll,
    /// Like `JoinAll`, but de-duplicated and sorted.
    SortedUnique,
    /// Text of the first match, kept only when it is an e-mail address.
    Email,
    /// `href` of the first match, kept only when it is an http(s) URL.
    Href,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub column: String,
    pub selector: String,
    pub extract: Extraction,
    /// Only the first element matching this is searched for `selector`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within: Option<String>,
    /// The first match only counts if it contains an element matching this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
}

impl FieldRule {
    pub fn new(column: &str, selector: &str, extract: Extraction) -> Self {
        Self {
            column: column.to_string(),
            selector: selector.to_string(),
            extract,
            within: None,
            requires: None,
        }
    }

    pub fn within(mut self, selector: &str) -> Self {
        self.within = Some(selector.to_string());
        self
    }

    pub fn requires(mut self, selector: &str) -> Self {
        self.requires = Some(selector.to_string());
        self
    }
}

/// Where partner entries start and how far each one reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLocator {
    /// One match per partner entry.
    pub selector: String,
    /// Tag of the nearest ancestor that holds the whole entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    pub entry: EntryLocator,
    pub fields: Vec<FieldRule>,
}

impl FieldMap {
    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.column.clone()).collect()
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        use Extraction::*;

        Self {
            entry: EntryLocator {
                selector: "td.pl-results-td-row-no".to_string(),
                container: Some("tr".to_string()),
            },
            fields: vec![
                FieldRule::new("Number", "span.pl-results-row-no", Text),
                FieldRule::new(
                    "Siemens Batch",
                    "td.sf-hidden",
                    Capture(r"sortScore\s*:\s*(\d+\.?\d*)".to_string()),
                ),
                FieldRule::new("Name", "a.pl-results-partner-name", Text),
                FieldRule::new("Partner Batch", "li.list-group-item", JoinAll)
                    .within(r#"span[id*="resultsPartnerType"]"#),
                FieldRule::new(
                    "Locations",
                    "span.pl-results-partner-count",
                    Capture(r"Locations:\s*(\d+)".to_string()),
                )
                .within("span.pl-results-partner-info"),
                FieldRule::new(
                    "Office address",
                    "span.pl-results-td-address-plocez__Mailing_Address__c",
                    Text,
                )
                .requires("span.pl-results-value"),
                FieldRule::new("Contact Name", "span.pl-results-value", Text)
                    .within("span.pl-results-td-contact-plocez__Contact__c"),
                FieldRule::new("Contact Email", "a[href]", Email)
                    .within("span.pl-results-td-contact-plocez__Email__c"),
                FieldRule::new("Contact Telephone", "a[href]", Text)
                    .within("span.pl-results-td-contact-plocez__Phone__c"),
                FieldRule::new("Contact website", "a[href]", Href)
                    .within("span.pl-results-td-contact-PLP_Website__c"),
                FieldRule::new("Proced Specialization", "li.list-group-item", SortedUnique)
                    .within("span.pl-results-td-account-Product_Specialization__c"),
            ],
        }
    }
}

impl Validate for FieldMap {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("entry.selector", &self.entry.selector)?;
        if let Some(container) = &self.entry.container {
            validate_non_empty_string("entry.container", container)?;
        }
        if self.fields.is_empty() {
            return Err(crate::utils::error::EtlError::ConfigError {
                message: "Field map must declare at least one field".to_string(),
            });
        }
        for field in &self.fields {
            validate_non_empty_string("fields.column", &field.column)?;
            validate_non_empty_string(&format!("fields.{}.selector", field.column), &field.selector)?;
            if let Some(within) = &field.within {
                validate_non_empty_string(&format!("fields.{}.within", field.column), within)?;
            }
        }
        validate_unique("fields.column", self.fields.iter().map(|f| f.column.as_str()))
    }
}
