//! Policy CSV export
//!
//! One row per policy card in the published tree. The column layout is a
//! fixed 16-column import schema; only the columns backed by real content
//! are filled, the rest are always empty placeholders.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use tracing::{error, info};

use crate::content::{ContentNode, ContentSource, POLICY_KIND, fields, flatten};
use crate::errors::{HandbookError, Result};
use crate::utils::strip_html;

pub const EXPORT_FILE_NAME: &str = "policies-export.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

pub const EXPORT_HEADER: [&str; 16] = [
    "Id",
    "Title",
    "Category",
    "Subcategory",
    "Slug",
    "SummaryText",
    "FullHtml",
    "EffectiveDate",
    "Version",
    "AppliesToStates",
    "StateOverridesJson",
    "Tags",
    "RelatedIds",
    "AttachmentsJson",
    "AckRequired",
    "ExternalId",
];

/// One exported policy; field order matches [`EXPORT_HEADER`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyExportRow {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub slug: String,
    pub summary_text: String,
    pub full_html: String,
    pub effective_date: String,
    pub version: String,
    pub applies_to_states: String,
    pub state_overrides_json: String,
    pub tags: String,
    pub related_ids: String,
    pub attachments_json: String,
    pub ack_required: String,
    pub external_id: String,
}

/// Parse a stored revision date
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS[.f]`
/// and `YYYY-MM-DD`. Naive values are taken as UTC.
pub fn parse_effective_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn format_effective_date(raw: Option<String>) -> String {
    raw.as_deref()
        .and_then(parse_effective_date)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

fn export_row<N: ContentNode>(node: &N) -> PolicyExportRow {
    PolicyExportRow {
        id: node.id(),
        title: node
            .field(fields::POLICY_TITLE)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| node.name().to_string()),
        category: node
            .parent()
            .map(|p| p.name().to_string())
            .unwrap_or_default(),
        slug: node.url(),
        summary_text: strip_html(node.field(fields::SUMMARY).as_deref()),
        full_html: node.field(fields::FULL_POLICY_TEXT).unwrap_or_default(),
        effective_date: format_effective_date(node.field(fields::REVISION_DATE)),
        ..Default::default()
    }
}

/// Map every policy card under `roots` to an export row, in document order
pub fn export_rows<N: ContentNode>(roots: &[N]) -> Vec<PolicyExportRow> {
    flatten(roots)
        .iter()
        .filter(|n| n.kind() == POLICY_KIND)
        .map(export_row)
        .collect()
}

/// Render rows as CSV, header first
///
/// Fields are quoted only when they contain a comma, quote or line break;
/// embedded quotes are doubled.
pub fn write_csv(rows: &[PolicyExportRow]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| HandbookError::serialization(format!("Failed to finish CSV output: {}", e)))
}

pub struct ExportService {
    source: Arc<dyn ContentSource>,
}

impl ExportService {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// CSV bytes for all published policies
    ///
    /// With the content cache unavailable the export holds only the header.
    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let result = async {
            let rows = match self.source.published().await? {
                Some(snapshot) => export_rows(&snapshot.roots()),
                None => Vec::new(),
            };
            let bytes = write_csv(&rows)?;
            Ok::<_, HandbookError>((rows.len(), bytes))
        }
        .await;

        match result {
            Ok((count, bytes)) => {
                info!("Exported {} policies to CSV", count);
                Ok(bytes)
            }
            Err(e) => {
                error!("Error exporting policies to CSV: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSnapshot;

    #[test]
    fn test_parse_effective_date_formats() {
        let expected = "2024-01-15T00:00:00Z";
        for raw in [
            "2024-01-15",
            "2024-01-15T00:00:00",
            "2024-01-15 00:00:00",
            "2024-01-15T02:00:00+02:00",
        ] {
            assert_eq!(format_effective_date(Some(raw.to_string())), expected, "{}", raw);
        }
        assert_eq!(format_effective_date(Some("last tuesday".to_string())), "");
        assert_eq!(format_effective_date(None), "");
    }

    #[test]
    fn test_header_matches_row_field_order() {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.serialize(PolicyExportRow::default()).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, EXPORT_HEADER.join(","));
    }

    #[test]
    fn test_header_only_when_no_policies() {
        let bytes = write_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), format!("{}\n", EXPORT_HEADER.join(",")));
    }

    #[test]
    fn test_export_rows_map_content() {
        let snapshot = ContentSnapshot::from_json(
            r#"{"roots": [{
                "id": 1, "name": "Handbook", "kind": "handbookHome",
                "children": [{
                    "id": 10, "name": "Finance", "kind": "HandbookCategoryCard",
                    "children": [{
                        "id": 100, "name": "expenses", "kind": "policyCard",
                        "fields": {
                            "summary": "<p>Claim <em>costs</em></p>",
                            "fullPolicyText": "<h2>Expenses</h2>",
                            "revisionDate": "2024-03-01"
                        }
                    }]
                }]
            }]}"#,
        )
        .unwrap();

        let rows = export_rows(&snapshot.roots());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.id, 100);
        assert_eq!(row.title, "expenses");
        assert_eq!(row.category, "Finance");
        assert_eq!(row.slug, "/finance/expenses/");
        assert_eq!(row.summary_text, "Claim costs");
        assert_eq!(row.full_html, "<h2>Expenses</h2>");
        assert_eq!(row.effective_date, "2024-03-01T00:00:00Z");
        assert!(row.version.is_empty() && row.external_id.is_empty());
    }
}
