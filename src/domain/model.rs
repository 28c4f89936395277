use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// One partner entry: column name to value, in field-map order.
///
/// Records are assembled once through [`FromIterator`] and not changed
/// afterwards. A column whose markup was absent holds an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerRecord {
    fields: Vec<(String, String)>,
}

impl PartnerRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PartnerRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

// serde_json::Map 會重新排序鍵，這裡手動序列化以保留欄位順序
impl Serialize for PartnerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Column names used by the run summary.
pub mod columns {
    pub const PARTNER_BATCH: &str = "Partner Batch";
    pub const CONTACT_EMAIL: &str = "Contact Email";
    pub const CONTACT_TELEPHONE: &str = "Contact Telephone";
    pub const SPECIALIZATION: &str = "Proced Specialization";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_partners: usize,
    pub unique_batches: usize,
    pub partners_with_email: usize,
    pub partners_with_phone: usize,
    pub unique_specializations: usize,
}

impl Summary {
    pub fn from_records(records: &[PartnerRecord]) -> Self {
        let non_empty = |record: &PartnerRecord, column: &str| {
            record.get(column).is_some_and(|v| !v.is_empty())
        };

        let batches: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.get(columns::PARTNER_BATCH))
            .filter(|v| !v.is_empty())
            .collect();

        let specializations: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.get(columns::SPECIALIZATION))
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            total_partners: records.len(),
            unique_batches: batches.len(),
            partners_with_email: records
                .iter()
                .filter(|r| non_empty(r, columns::CONTACT_EMAIL))
                .count(),
            partners_with_phone: records
                .iter()
                .filter(|r| non_empty(r, columns::CONTACT_TELEPHONE))
                .count(),
            unique_specializations: specializations.len(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Partners: {}", self.total_partners)?;
        writeln!(f, "Unique Batches: {}", self.unique_batches)?;
        writeln!(f, "Partners with Email: {}", self.partners_with_email)?;
        writeln!(f, "Partners with Phone: {}", self.partners_with_phone)?;
        writeln!(f, "Unique Specializations: {}", self.unique_specializations)
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub columns: Vec<String>,
    pub records: Vec<PartnerRecord>,
    pub summary: Summary,
}

impl TransformResult {
    /// Data rows in record order, one cell per column.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.records.iter().map(|record| {
            self.columns
                .iter()
                .map(|column| record.get(column).unwrap_or(""))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(batch: &str, email: &str, phone: &str, specs: &str) -> PartnerRecord {
        [
            ("Name", "Acme"),
            (columns::PARTNER_BATCH, batch),
            (columns::CONTACT_EMAIL, email),
            (columns::CONTACT_TELEPHONE, phone),
            (columns::SPECIALIZATION, specs),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_record_keeps_column_order() {
        let record: PartnerRecord = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("missing"), None);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"b":"2","a":"1"}"#);
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            record("Gold", "a@example.com", "+1 555", "Banking, Insurance"),
            record("Gold", "", "+1 556", "Insurance"),
            record("Silver", "c@example.com", "", ""),
        ];

        let summary = Summary::from_records(&records);
        assert_eq!(summary.total_partners, 3);
        assert_eq!(summary.unique_batches, 2);
        assert_eq!(summary.partners_with_email, 2);
        assert_eq!(summary.partners_with_phone, 2);
        assert_eq!(summary.unique_specializations, 2);

        let text = summary.to_string();
        assert!(text.starts_with("Total Partners: 3\n"));
        assert!(text.ends_with("Unique Specializations: 2\n"));
    }

    #[test]
    fn test_rows_fill_missing_columns() {
        let result = TransformResult {
            columns: vec!["Name".to_string(), "Contact Name".to_string()],
            records: vec![[("Name", "Acme")].into_iter().collect()],
            summary: Summary::default(),
        };
        let rows: Vec<Vec<&str>> = result.rows().collect();
        assert_eq!(rows, vec![vec!["Acme", ""]]);
    }
}
