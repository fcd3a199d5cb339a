//! CSV and JSON export of flattened statements.
//!
//! CSV carries one line per (row, period) record with every cell's metadata.
//! JSON carries the whole table, statement metadata included.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tally_statements::{Statement, StatementTable, TableRecord};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV writer produced bytes that are not UTF-8.
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// DataFrame construction error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Unsupported format name.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values, one record per (row, period).
    #[display("csv")]
    Csv,

    /// Compact JSON.
    #[display("json")]
    Json,

    /// Pretty-printed JSON.
    #[display("pretty-json")]
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;
}

fn records_to_csv<'a>(records: impl IntoIterator<Item = &'a TableRecord>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

impl Exporter for StatementTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => records_to_csv(&self.records),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Statement {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.to_table().export_to_string(format)
    }
}

impl Exporter for [StatementTable] {
    /// CSV concatenates the records of every table under one header; JSON is
    /// an array of tables.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => records_to_csv(self.iter().flat_map(|t| &t.records)),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use tally_statements::{Cell, FactOrigin, StatementPeriod, StatementRow};
    use tally_xbrl::{ConceptId, Period, StatementKind};

    fn table() -> StatementTable {
        let mut statement = Statement::empty(StatementKind::IncomeStatement);
        statement.periods.push(StatementPeriod {
            period: Period::Duration {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            },
            label: "FY 2024".to_string(),
            fiscal_year: 2024,
            fiscal_quarter: None,
            is_ytd: false,
            derived: false,
        });
        let mut row = StatementRow::new(ConceptId::parse("us-gaap:Revenues"), "Revenues", 0, 1);
        row.cells[0] = Some(Cell::derived(1000.0, Some("iso4217:USD".to_string()), FactOrigin::Reported));
        statement.rows.push(row);
        statement.rows.push(StatementRow::new(ConceptId::parse("acme:Backlog"), "Backlog", 0, 1));
        statement.to_table()
    }

    #[test]
    fn test_csv_has_one_line_per_record() {
        let csv = table().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("row,concept,standard,label"));
        assert!(lines[1].contains("us-gaap:Revenues"));
        assert!(lines[1].contains("1000"));
        assert!(lines[1].contains("2024-12-31"));
        assert!(lines[2].contains("acme:Backlog"));
    }

    #[test]
    fn test_json_round_trips() {
        let original = table();
        let json = original.export_to_string(ExportFormat::Json).unwrap();
        let parsed: StatementTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_pretty_json() {
        let json = table().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("\"columns\""));
        assert!(json.contains("  "));
    }

    #[test]
    fn test_tables_share_one_header() {
        let tables = vec![table(), table()];
        let csv = tables.as_slice().export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 5);
        assert_eq!(csv.matches("row,concept").count(), 1);
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_from_str(#[case] raw: &str, #[case] expected: ExportFormat) {
        assert_eq!(raw.parse::<ExportFormat>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(f)) if f == "xlsx"
        ));
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
