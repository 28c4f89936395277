use crate::core::field_map::{Extraction, FieldMap, FieldRule};
use crate::domain::model::PartnerRecord;
use crate::utils::error::{EtlError, Result};
use crate::utils::text::{normalize_email, TextCleaner};
use crate::utils::validation::{validate_url, Validate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

fn parse_selector(field: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        field: field.to_string(),
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

enum Rule {
    Text,
    Capture(Regex),
    JoinAll,
    SortedUnique,
    Email,
    Href,
}

struct CompiledField {
    column: String,
    selector: Selector,
    within: Option<Selector>,
    requires: Option<Selector>,
    rule: Rule,
}

impl CompiledField {
    fn compile(field: &FieldRule) -> Result<Self> {
        let rule = match &field.extract {
            Extraction::Text => Rule::Text,
            Extraction::Capture(pattern) => {
                let re = Regex::new(pattern).map_err(|e| EtlError::InvalidConfigValueError {
                    field: format!("fields.{}.extract", field.column),
                    value: pattern.clone(),
                    reason: e.to_string(),
                })?;
                Rule::Capture(re)
            }
            Extraction::JoinAll => Rule::JoinAll,
            Extraction::SortedUnique => Rule::SortedUnique,
            Extraction::Email => Rule::Email,
            Extraction::Href => Rule::Href,
        };

        Ok(Self {
            column: field.column.clone(),
            selector: parse_selector(&field.column, &field.selector)?,
            within: field
                .within
                .as_deref()
                .map(|s| parse_selector(&field.column, s))
                .transpose()?,
            requires: field
                .requires
                .as_deref()
                .map(|s| parse_selector(&field.column, s))
                .transpose()?,
            rule,
        })
    }

    fn narrow<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match &self.within {
            Some(within) => scope.select(within).next(),
            None => Some(scope),
        }
    }

    fn first_match<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let found = self.narrow(scope)?.select(&self.selector).next()?;
        match &self.requires {
            Some(required) if found.select(required).next().is_none() => None,
            _ => Some(found),
        }
    }

    fn all_texts(&self, scope: ElementRef<'_>, cleaner: &TextCleaner) -> Vec<String> {
        let Some(scope) = self.narrow(scope) else {
            return Vec::new();
        };
        scope
            .select(&self.selector)
            .map(|el| cleaner.clean(&element_text(el)))
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn value(&self, scope: ElementRef<'_>, cleaner: &TextCleaner) -> String {
        match &self.rule {
            Rule::Text => self
                .first_match(scope)
                .map(|el| cleaner.clean(&element_text(el)))
                .unwrap_or_default(),
            Rule::Capture(re) => self
                .first_match(scope)
                .and_then(|el| {
                    let text = element_text(el);
                    let caps = re.captures(&text)?;
                    let m = caps.get(1).or_else(|| caps.get(0))?;
                    Some(m.as_str().trim().to_string())
                })
                .unwrap_or_default(),
            Rule::JoinAll => self.all_texts(scope, cleaner).join(", "),
            Rule::SortedUnique => self
                .all_texts(scope, cleaner)
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>()
                .join(", "),
            Rule::Email => self
                .first_match(scope)
                .and_then(|el| normalize_email(&element_text(el)))
                .unwrap_or_default(),
            Rule::Href => self
                .first_match(scope)
                .and_then(|el| el.value().attr("href"))
                .map(str::trim)
                .filter(|href| is_web_link(&self.column, href))
                .map(str::to_string)
                .unwrap_or_default(),
        }
    }
}

// 只接受字面上以 http:// 或 https:// 開頭的連結
fn is_web_link(column: &str, href: &str) -> bool {
    (href.starts_with("http://") || href.starts_with("https://"))
        && validate_url(column, href).is_ok()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Walks a parsed page and produces one [`PartnerRecord`] per partner entry.
pub struct Extractor {
    entry: Selector,
    container: Option<String>,
    fields: Vec<CompiledField>,
    cleaner: TextCleaner,
}

impl Extractor {
    /// Compiles every selector and pattern up front, so a broken field map
    /// fails before any input is read.
    pub fn new(map: &FieldMap, cleaner: TextCleaner) -> Result<Self> {
        map.validate()?;

        let fields = map
            .fields
            .iter()
            .map(CompiledField::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            entry: parse_selector("entry", &map.entry.selector)?,
            container: map.entry.container.as_ref().map(|c| c.to_ascii_lowercase()),
            fields,
            cleaner,
        })
    }

    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.column.clone()).collect()
    }

    pub fn extract(&self, html: &str) -> Vec<PartnerRecord> {
        let document = Html::parse_document(html);
        let entries: Vec<ElementRef<'_>> = document.select(&self.entry).collect();
        let total = entries.len();
        tracing::debug!("Found {} partner entries", total);

        entries
            .into_iter()
            .enumerate()
            .map(|(idx, marker)| {
                let record = self.extract_entry(self.scope_of(marker));
                tracing::info!(
                    "Processed partner {}/{}: {}",
                    idx + 1,
                    total,
                    record
                        .get("Name")
                        .filter(|name| !name.is_empty())
                        .unwrap_or("(no name)")
                );
                record
            })
            .collect()
    }

    fn scope_of<'a>(&self, marker: ElementRef<'a>) -> ElementRef<'a> {
        let Some(tag) = &self.container else {
            return marker;
        };

        marker
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == tag)
            .unwrap_or_else(|| {
                tracing::debug!("Partner entry has no enclosing <{}>, using the marker itself", tag);
                marker
            })
    }

    fn extract_entry(&self, scope: ElementRef<'_>) -> PartnerRecord {
        self.fields
            .iter()
            .map(|field| (field.column.clone(), field.value(scope, &self.cleaner)))
            .collect()
    }
}
