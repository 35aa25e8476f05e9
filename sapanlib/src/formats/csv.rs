//! CSV из шестнадцати колонок, заголовок:
//! CompanyCode,Plant,Material,Quantity,Amount,Currency,DocumentType,PostingDate,CostCenter,ProfitCenter,GLAccount,Vendor,Customer,FiscalYear,FiscalPeriod,DocumentNumber

use crate::{
    error::{Result, SapanError},
    model::{DocumentType, Ledger, Record},
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const HEADER: [&str; 16] = [
    "CompanyCode",
    "Plant",
    "Material",
    "Quantity",
    "Amount",
    "Currency",
    "DocumentType",
    "PostingDate",
    "CostCenter",
    "ProfitCenter",
    "GLAccount",
    "Vendor",
    "Customer",
    "FiscalYear",
    "FiscalPeriod",
    "DocumentNumber",
];

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CsvRow {
    company_code: String,
    plant: String,
    material: String,
    quantity: String,
    amount: String,
    currency: String,
    document_type: String,
    posting_date: String,
    cost_center: String,
    profit_center: String,
    #[serde(rename = "GLAccount")]
    gl_account: String,
    vendor: Option<String>,
    customer: Option<String>,
    fiscal_year: String,
    fiscal_period: String,
    document_number: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct CsvOutRow<'a> {
    company_code: &'a str,
    plant: &'a str,
    material: &'a str,
    quantity: String,
    amount: String,
    currency: &'a str,
    document_type: &'static str,
    posting_date: String,
    cost_center: &'a str,
    profit_center: &'a str,
    #[serde(rename = "GLAccount")]
    gl_account: &'a str,
    vendor: Option<&'a str>,
    customer: Option<&'a str>,
    fiscal_year: i32,
    fiscal_period: u32,
    document_number: &'a str,
}

fn parse_err(row: usize, column: &str, detail: impl std::fmt::Display) -> SapanError {
    SapanError::Parse(format!("row {row}, column {column}: {detail}"))
}

fn parse_decimal(row: usize, column: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| parse_err(row, column, format!("{e} ({raw:?})")))
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

impl CsvRow {
    fn into_record(self, row: usize) -> Result<Record> {
        let posting_date = NaiveDate::parse_from_str(&self.posting_date, DATE_FORMAT)
            .map_err(|e| parse_err(row, "PostingDate", e))?;
        let document_type = DocumentType::from_str(&self.document_type)
            .map_err(|e| parse_err(row, "DocumentType", e))?;
        let fiscal_year = self
            .fiscal_year
            .parse::<i32>()
            .map_err(|e| parse_err(row, "FiscalYear", e))?;
        let fiscal_period = self
            .fiscal_period
            .parse::<u32>()
            .map_err(|e| parse_err(row, "FiscalPeriod", e))?;
        if !(1..=12).contains(&fiscal_period) {
            return Err(parse_err(row, "FiscalPeriod", format!("{fiscal_period} is not a month")));
        }

        Ok(Record {
            company_code: self.company_code,
            plant: self.plant,
            material: self.material,
            quantity: parse_decimal(row, "Quantity", &self.quantity)?,
            amount: parse_decimal(row, "Amount", &self.amount)?,
            currency: self.currency,
            document_type,
            posting_date,
            cost_center: self.cost_center,
            profit_center: self.profit_center,
            gl_account: self.gl_account,
            vendor: non_empty(self.vendor),
            customer: non_empty(self.customer),
            fiscal_year,
            fiscal_period,
            document_number: self.document_number,
        })
    }
}

pub struct Csv;

impl crate::traits::ReadFormat for Csv {
    fn read<R: BufRead>(r: R) -> Result<Ledger> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(r);
        let mut records = Vec::new();

        for (idx, rec) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = rec?;
            records.push(row.into_record(idx + 1)?);
        }

        tracing::debug!(rows = records.len(), "read ledger csv");
        Ok(Ledger::new(records))
    }
}

impl crate::traits::WriteFormat for Csv {
    fn write<W: Write>(mut w: W, ledger: &Ledger) -> Result<()> {
        let mut wrt = WriterBuilder::new().has_headers(false).from_writer(&mut w);
        // Explicit header so an empty ledger still produces a loadable file.
        wrt.write_record(HEADER)?;

        for r in ledger {
            let out = CsvOutRow {
                company_code: &r.company_code,
                plant: &r.plant,
                material: &r.material,
                quantity: r.quantity.to_string(),
                amount: r.amount.to_string(),
                currency: &r.currency,
                document_type: r.document_type.code(),
                posting_date: r.posting_date.format(DATE_FORMAT).to_string(),
                cost_center: &r.cost_center,
                profit_center: &r.profit_center,
                gl_account: &r.gl_account,
                vendor: r.vendor.as_deref(),
                customer: r.customer.as_deref(),
                fiscal_year: r.fiscal_year,
                fiscal_period: r.fiscal_period,
                document_number: &r.document_number,
            };
            wrt.serialize(out)?;
        }
        wrt.flush()?;
        Ok(())
    }
}

impl crate::traits::Format for Csv {
    const EXTENSION: &'static str = "csv";
}
