//! Текстовый вывод базовой статистики для панели сводки.

use num_format::{Locale, ToFormattedString};
use std::fmt::Write as _;

use crate::analysis::{to_f64, BasicStatistics, NumericSummary, Reports, ValueCount};

/// `1234567.891` -> `1,234,567.89`.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let cents = (v.abs() * 100.0).round() as u64;
    let sign = if v < 0.0 && cents != 0 { "-" } else { "" };
    format!(
        "{sign}{}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

pub fn format_count(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}

fn write_numeric(out: &mut String, field: &str, s: &NumericSummary) {
    let _ = writeln!(out, "\n{field}:");
    let _ = writeln!(out, "  mean: {}", format_number(s.mean));
    let _ = writeln!(out, "  median: {}", format_number(s.median));
    match s.std {
        Some(std) => {
            let _ = writeln!(out, "  std: {}", format_number(std));
        }
        None => {
            let _ = writeln!(out, "  std: n/a");
        }
    }
    let _ = writeln!(out, "  min: {}", format_number(to_f64(s.min)));
    let _ = writeln!(out, "  max: {}", format_number(to_f64(s.max)));
}

fn write_counts(out: &mut String, field: &str, counts: &[ValueCount], total: usize) {
    let _ = writeln!(out, "\n{field} distribution:");
    for vc in counts {
        let share = if total == 0 { 0.0 } else { vc.count as f64 / total as f64 * 100.0 };
        let _ = writeln!(out, "  {}: {} ({share:.1}%)", vc.value, format_count(vc.count));
    }
}

pub fn render_summary(basic: &BasicStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== BASIC STATISTICS ===\n");
    let _ = writeln!(out, "Total records: {}", format_count(basic.total_records));
    let _ = writeln!(out, "Period: {} to {}\n", basic.start, basic.end);

    out.push_str("=== NUMERIC FIELDS ===\n");
    write_numeric(&mut out, "Quantity", &basic.quantity);
    write_numeric(&mut out, "Amount", &basic.amount);

    out.push_str("\n=== CATEGORICAL FIELDS ===\n");
    write_counts(&mut out, "CompanyCode", &basic.company_codes, basic.total_records);
    write_counts(&mut out, "DocumentType", &basic.document_types, basic.total_records);
    write_counts(&mut out, "Plant", &basic.plants, basic.total_records);

    out
}

/// Short console recap printed after a generate-and-analyze run.
pub fn headline(reports: &Reports, currency: &str) -> String {
    let basic = &reports.basic_statistics;
    let mut out = format!("Total records: {}\n", format_count(basic.total_records));
    let _ = write!(out, "Average amount: {} {currency}", format_number(basic.amount.mean));
    if let Some(r) = reports.correlation.quantity_amount() {
        let _ = write!(out, "\nQuantity/amount correlation: {r:.3}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_get_separators_and_two_decimals() {
        assert_eq!(format_number(1_234_567.891), "1,234,567.89");
        assert_eq!(format_number(0.005), "0.01");
        assert_eq!(format_number(-42.0), "-42.00");
        assert_eq!(format_count(5000), "5,000");
    }
}
