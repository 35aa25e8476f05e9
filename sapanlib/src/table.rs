//! Табличное представление только для чтения: заголовки и ячейки-строки, вывод через prettytable.

use prettytable::format::{FormatBuilder, LinePosition, LineSeparator, TableFormat};
use prettytable::{Cell, Row, Table};

use crate::{
    analysis::{CorrelationMatrix, GroupSummary, MaterialValue, MonthlyBucket},
    formats::csv::{DATE_FORMAT, HEADER},
    model::Record,
    summary::{format_count, format_number},
};

fn opt(v: Option<f64>) -> String {
    v.map(format_number).unwrap_or_else(|| "-".to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn new(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw ledger rows, same column order as the CSV file.
    pub fn from_records(records: &[Record]) -> Self {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.company_code.clone(),
                    r.plant.clone(),
                    r.material.clone(),
                    r.quantity.to_string(),
                    r.amount.to_string(),
                    r.currency.clone(),
                    r.document_type.to_string(),
                    r.posting_date.format(DATE_FORMAT).to_string(),
                    r.cost_center.clone(),
                    r.profit_center.clone(),
                    r.gl_account.clone(),
                    r.vendor.clone().unwrap_or_default(),
                    r.customer.clone().unwrap_or_default(),
                    r.fiscal_year.to_string(),
                    r.fiscal_period.to_string(),
                    r.document_number.clone(),
                ]
            })
            .collect();
        Self::new(&HEADER, rows)
    }

    /// Grouped sum/mean/count/percentage table; `key_header` names the grouping column.
    pub fn from_groups(key_header: &str, groups: &[GroupSummary]) -> Self {
        let rows = groups
            .iter()
            .map(|g| {
                vec![
                    g.key.clone(),
                    g.sum.to_string(),
                    format_number(g.mean),
                    format_count(g.count),
                    format!("{:.2}", g.percentage),
                ]
            })
            .collect();
        Self::new(&[key_header, "sum", "mean", "count", "percentage"], rows)
    }

    pub fn from_materials(materials: &[MaterialValue]) -> Self {
        let rows = materials
            .iter()
            .map(|m| {
                vec![
                    m.material.clone(),
                    m.amount.to_string(),
                    format!("{:.2}", m.cumulative_percentage),
                    m.class.to_string(),
                ]
            })
            .collect();
        Self::new(&["Material", "Amount", "cumulative_percentage", "ABC_Class"], rows)
    }

    pub fn from_time_series(buckets: &[MonthlyBucket]) -> Self {
        let rows = buckets
            .iter()
            .map(|b| {
                vec![
                    b.month_end.format(DATE_FORMAT).to_string(),
                    b.sum.to_string(),
                    opt(b.mean),
                    format_count(b.count),
                    opt(b.rolling_avg),
                ]
            })
            .collect();
        Self::new(&["PostingDate", "sum", "mean", "count", "rolling_avg"], rows)
    }

    pub fn from_correlation(matrix: &CorrelationMatrix) -> Self {
        let rows = matrix
            .labels
            .iter()
            .zip(&matrix.values)
            .map(|(label, row)| {
                let mut cells = vec![label.to_string()];
                cells.extend(row.iter().map(|v| match v {
                    Some(r) => format!("{r:.4}"),
                    None => "-".to_string(),
                }));
                cells
            })
            .collect();
        let mut headers = vec![""];
        headers.extend(matrix.labels);
        Self::new(&headers, rows)
    }

    /// Bordered text table with the headers as its title row.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.set_format(table_format());
        table.set_titles(Row::new(self.headers.iter().map(|h| Cell::new(h)).collect()));
        for row in &self.rows {
            table.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
        }
        table.to_string()
    }
}

fn table_format() -> TableFormat {
    let rule = LineSeparator::new('-', '+', '+', '+');
    FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separators(&[LinePosition::Top, LinePosition::Bottom], rule)
        .separator(LinePosition::Title, LineSeparator::new('=', '+', '+', '+'))
        .padding(1, 1)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_aligns_columns() {
        let t = TableView::new(
            &["k", "value"],
            vec![
                vec!["long_key".into(), "1".into()],
                vec!["x".into(), "22".into()],
            ],
        );
        let text = t.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "+----------+-------+",
                "| k        | value |",
                "+==========+=======+",
                "| long_key | 1     |",
                "| x        | 22    |",
                "+----------+-------+",
            ]
        );
    }

    #[test]
    fn render_without_rows_keeps_the_title() {
        let text = TableView::new(&["Material"], Vec::new()).render();
        assert!(text.contains("| Material |"));
        assert_eq!(text.lines().count(), 4);
    }
}
