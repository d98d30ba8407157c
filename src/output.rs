//! Output formatting and export for aggregation results.
//!
//! Supports the on-screen metrics, the copy-paste summary, a plain-text
//! table, JSON, and spreadsheet/CSV exports.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::AggregationResult;
use crate::error::ProcessError;

pub const SUM_HEADER: &str = "Suma";
pub const EXPORT_SHEET_NAME: &str = "Resultados";
pub const NO_MATCHES_NOTICE: &str = "No se encontraron depósitos con terminación .01";

/// Formats an amount with two decimals and comma thousands separators.
///
/// `1234.5` → `"1,234.50"`, `-1000000` → `"-1,000,000.00"`.
pub fn format_amount(amount: &Decimal) -> String {
    let mut rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .abs();
    rounded.rescale(2);
    let digits = rounded.to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if amount.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}

/// The two headline figures: how many initiators, and their combined total.
pub fn render_metrics(result: &AggregationResult) -> String {
    format!(
        "Iniciadores encontrados: {}\nSuma total .01: {}",
        result.len(),
        format_amount(&result.grand_total())
    )
}

/// Markdown block meant to be pasted into chat or email.
pub fn render_summary(result: &AggregationResult) -> String {
    let mut out = String::from("RESULTADOS AGRUPADOS POR INICIADOR ---\n");
    for (initiator, sum) in result.iter() {
        out.push_str(&format!(
            "Iniciador: **{}** | Suma de depósitos .01: **{}**\n",
            initiator,
            format_amount(&sum)
        ));
    }
    out.push_str(&format!(
        "\nSUMA TOTAL FINAL de todos los depósitos .01: **{}**",
        format_amount(&result.grand_total())
    ));
    out
}

/// Aligned two-column text table. An empty result renders the header only.
pub fn render_table(result: &AggregationResult, initiator_header: &str) -> String {
    let rows: Vec<(&str, String)> = result
        .iter()
        .map(|(initiator, sum)| (initiator, format_amount(&sum)))
        .collect();

    let left = rows
        .iter()
        .map(|(i, _)| i.chars().count())
        .chain(std::iter::once(initiator_header.chars().count()))
        .max()
        .unwrap_or(0);
    let right = rows
        .iter()
        .map(|(_, s)| s.len())
        .chain(std::iter::once(SUM_HEADER.len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        format!("{initiator_header:<left$}  {SUM_HEADER:>right$}"),
        format!("{}  {}", "-".repeat(left), "-".repeat(right)),
    ];
    lines.extend(
        rows.iter()
            .map(|(initiator, sum)| format!("{initiator:<left$}  {sum:>right$}")),
    );
    lines.into_iter().map(|line| line + "\n").collect()
}

/// Message shown instead of results when processing failed.
pub fn render_failure(err: &ProcessError) -> String {
    match err.missing_column() {
        Some(missing) => format!(
            "No se encontraron las columnas '{}'. Columnas encontradas: {}",
            missing.required.join("' y '"),
            missing
                .found
                .iter()
                .map(|c| format!("'{c}'"))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => format!("Error al leer el archivo: {err}"),
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    initiator: &'a str,
    sum: Decimal,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    initiators: usize,
    rows: Vec<JsonRow<'a>>,
    grand_total: Decimal,
}

/// Pretty JSON report. Amounts are serialized as exact decimal strings.
pub fn render_json(result: &AggregationResult, source: &str) -> Result<String> {
    let report = JsonReport {
        generated_at: Utc::now(),
        source,
        initiators: result.len(),
        rows: result
            .iter()
            .map(|(initiator, sum)| JsonRow { initiator, sum })
            .collect(),
        grand_total: result.grand_total(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Builds a single-sheet workbook with one row per initiator.
pub fn export_xlsx(result: &AggregationResult, initiator_header: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;
    sheet.write_string_with_format(0, 0, initiator_header, &header)?;
    sheet.write_string_with_format(0, 1, SUM_HEADER, &header)?;

    for (row, (initiator, sum)) in (1u32..).zip(result.iter()) {
        sheet.write_string(row, 0, initiator)?;
        sheet.write_number_with_format(row, 1, sum.to_f64().unwrap_or_default(), &money)?;
    }

    debug!(rows = result.len(), "Workbook built");
    Ok(workbook.save_to_buffer()?)
}

/// Writes the workbook from [`export_xlsx`] to `path`.
pub fn write_xlsx(path: &str, result: &AggregationResult, initiator_header: &str) -> Result<()> {
    let bytes = export_xlsx(result, initiator_header)?;
    std::fs::write(path, &bytes)?;
    info!(path, bytes = bytes.len(), "Excel export written");
    Ok(())
}

/// Writes the same two columns as CSV, replacing any existing file.
pub fn export_csv(path: &str, result: &AggregationResult, initiator_header: &str) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record([initiator_header, SUM_HEADER])?;
    for (initiator, sum) in result.iter() {
        writer.write_record([initiator, sum.to_string().as_str()])?;
    }
    writer.flush()?;

    info!(path, rows = result.len(), "CSV export written");
    Ok(())
}
