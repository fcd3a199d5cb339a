//! Polars DataFrames from flattened statements.

use crate::export::ExportError;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tally_statements::StatementTable;

fn days_since_epoch(date: NaiveDate) -> i32 {
    // 1970-01-01 is day 719_163 of the common era
    date.num_days_from_ce() - 719_163
}

fn date_column(name: &str, dates: Vec<Option<NaiveDate>>) -> Result<Column, ExportError> {
    let days: Vec<Option<i32>> = dates.into_iter().map(|d| d.map(days_since_epoch)).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into())
}

/// Long format: one frame row per (statement row, period) record.
///
/// Column names follow the CSV header. Enum-valued fields are rendered as
/// their display names.
pub fn to_frame(table: &StatementTable) -> Result<DataFrame, ExportError> {
    let records = &table.records;
    let strings = |f: fn(&tally_statements::TableRecord) -> Option<String>| -> Vec<Option<String>> {
        records.iter().map(f).collect()
    };

    let columns: Vec<Column> = vec![
        Series::new("row".into(), records.iter().map(|r| r.row as u64).collect::<Vec<_>>()).into(),
        Series::new(
            "concept".into(),
            records.iter().map(|r| r.concept.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new("standard".into(), strings(|r| r.standard.clone())).into(),
        Series::new(
            "label".into(),
            records.iter().map(|r| r.label.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new("depth".into(), records.iter().map(|r| r.depth as u64).collect::<Vec<_>>()).into(),
        Series::new("is_abstract".into(), records.iter().map(|r| r.is_abstract).collect::<Vec<_>>()).into(),
        Series::new("is_total".into(), records.iter().map(|r| r.is_total).collect::<Vec<_>>()).into(),
        Series::new("section".into(), strings(|r| r.section.clone())).into(),
        Series::new("dimension".into(), strings(|r| r.dimension.clone())).into(),
        Series::new("period".into(), strings(|r| r.period.clone())).into(),
        date_column("period_start", records.iter().map(|r| r.period_start).collect())?,
        date_column("period_end", records.iter().map(|r| r.period_end).collect())?,
        Series::new("value".into(), records.iter().map(|r| r.value).collect::<Vec<_>>()).into(),
        Series::new("reported".into(), records.iter().map(|r| r.reported).collect::<Vec<_>>()).into(),
        Series::new("unit".into(), strings(|r| r.unit.clone())).into(),
        Series::new("is_instant".into(), records.iter().map(|r| r.is_instant).collect::<Vec<_>>()).into(),
        Series::new("balance".into(), strings(|r| r.balance.map(|b| b.to_string()))).into(),
        Series::new("weight".into(), records.iter().map(|r| r.weight).collect::<Vec<_>>()).into(),
        Series::new(
            "decimals".into(),
            records.iter().map(|r| r.decimals).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "fact_index".into(),
            records
                .iter()
                .map(|r| r.fact_index.map(|i| i as u64))
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new("origin".into(), strings(|r| r.origin.map(|o| o.to_string()))).into(),
        Series::new("split_factor".into(), records.iter().map(|r| r.split_factor).collect::<Vec<_>>()).into(),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Wide format: one frame row per statement row, one value column per period.
///
/// This is the layout a reader expects from a printed statement.
pub fn to_wide_frame(table: &StatementTable) -> Result<DataFrame, ExportError> {
    let rows = table.row_count();
    let mut concepts = vec![String::new(); rows];
    let mut labels = vec![String::new(); rows];
    let mut standards: Vec<Option<String>> = vec![None; rows];
    let mut depths = vec![0u64; rows];
    let mut dimensions: Vec<Option<String>> = vec![None; rows];
    let mut values: Vec<Vec<Option<f64>>> = vec![vec![None; rows]; table.columns.len()];

    for record in &table.records {
        let i = record.row;
        concepts[i].clone_from(&record.concept);
        labels[i].clone_from(&record.label);
        standards[i].clone_from(&record.standard);
        depths[i] = record.depth as u64;
        dimensions[i].clone_from(&record.dimension);
        if let Some(column) = record.period_index
            && let Some(slot) = values.get_mut(column)
        {
            slot[i] = record.value;
        }
    }

    let mut columns: Vec<Column> = vec![
        Series::new("concept".into(), concepts).into(),
        Series::new("standard".into(), standards).into(),
        Series::new("label".into(), labels).into(),
        Series::new("depth".into(), depths).into(),
        Series::new("dimension".into(), dimensions).into(),
    ];
    for (label, column) in table.columns.iter().zip(values) {
        columns.push(Series::new(label.as_str().into(), column).into());
    }
    Ok(DataFrame::new(columns)?)
}
