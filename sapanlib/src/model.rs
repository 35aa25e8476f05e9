//! Доменная модель: одна плоская строка проводки и таблица таких строк в памяти.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SapanError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    #[serde(rename = "INV")]
    Inv,
    #[serde(rename = "PO")]
    Po,
    #[serde(rename = "SO")]
    So,
    #[serde(rename = "GR")]
    Gr,
    #[serde(rename = "GI")]
    Gi,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Inv,
        DocumentType::Po,
        DocumentType::So,
        DocumentType::Gr,
        DocumentType::Gi,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DocumentType::Inv => "INV",
            DocumentType::Po => "PO",
            DocumentType::So => "SO",
            DocumentType::Gr => "GR",
            DocumentType::Gi => "GI",
        }
    }

    /// Invoices, purchase orders and goods receipts carry a vendor.
    pub fn has_vendor(self) -> bool {
        matches!(self, DocumentType::Inv | DocumentType::Po | DocumentType::Gr)
    }

    /// Invoices, sales orders and goods issues carry a customer.
    pub fn has_customer(self) -> bool {
        matches!(self, DocumentType::Inv | DocumentType::So | DocumentType::Gi)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DocumentType {
    type Err = SapanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "INV" | "inv" => Ok(DocumentType::Inv),
            "PO" | "po" => Ok(DocumentType::Po),
            "SO" | "so" => Ok(DocumentType::So),
            "GR" | "gr" => Ok(DocumentType::Gr),
            "GI" | "gi" => Ok(DocumentType::Gi),
            other => Err(SapanError::Parse(format!("unknown document type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub company_code: String,
    pub plant: String,
    pub material: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub document_type: DocumentType,
    pub posting_date: NaiveDate,
    pub cost_center: String,
    pub profit_center: String,
    #[serde(rename = "GLAccount")]
    pub gl_account: String,
    pub vendor: Option<String>,
    pub customer: Option<String>,
    pub fiscal_year: i32,
    pub fiscal_period: u32,
    pub document_number: String,
}

/// Ordered rows of the in-memory table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// First `n` rows, used for previews.
    pub fn head(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// Currency of the first record; generated ledgers are single-currency.
    pub fn currency(&self) -> Option<&str> {
        self.records.first().map(|r| r.currency.as_str())
    }

    /// Earliest and latest posting date, `None` for an empty ledger.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().map(|r| r.posting_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

impl From<Vec<Record>> for Ledger {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Ledger {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
