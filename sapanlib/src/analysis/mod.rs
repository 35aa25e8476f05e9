//! Описательная и групповая статистика по загруженным проводкам.

pub mod abc;
pub mod stats;

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::{
    config::AnalysisConfig,
    error::{Result, SapanError},
    files,
    model::{Ledger, Record},
};

pub use abc::{AbcClass, MaterialValue};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NumericSummary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation, undefined below two values.
    pub std: Option<f64>,
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BasicStatistics {
    pub total_records: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub quantity: NumericSummary,
    pub amount: NumericSummary,
    pub company_codes: Vec<ValueCount>,
    pub document_types: Vec<ValueCount>,
    pub plants: Vec<ValueCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyBucket {
    /// Last day of the calendar month.
    pub month_end: NaiveDate,
    pub sum: Decimal,
    pub mean: Option<f64>,
    pub count: usize,
    pub rolling_avg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupSummary {
    pub key: String,
    pub sum: Decimal,
    pub mean: f64,
    pub count: usize,
    /// Share of the grand total, in percent.
    pub percentage: f64,
}

/// Pearson correlation between quantity and amount, as a labelled 2x2 matrix.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: [&'static str; 2],
    pub values: [[Option<f64>; 2]; 2],
}

impl CorrelationMatrix {
    pub fn quantity_amount(&self) -> Option<f64> {
        self.values[0][1]
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reports {
    pub basic_statistics: BasicStatistics,
    pub time_series: Vec<MonthlyBucket>,
    pub cost_centers: Vec<GroupSummary>,
    pub material_analysis: Vec<MaterialValue>,
    pub correlation: CorrelationMatrix,
    pub document_types: Vec<GroupSummary>,
}

pub(crate) fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(f64::NAN)
}

pub(crate) fn overflow(what: &str) -> SapanError {
    SapanError::Analysis(format!("amount overflow in {what}"))
}

/// Adds `amount` into `acc`, failing instead of panicking past the `Decimal` range.
pub(crate) fn add_amount(acc: &mut Decimal, amount: Decimal, what: &str) -> Result<()> {
    *acc = acc.checked_add(amount).ok_or_else(|| overflow(what))?;
    Ok(())
}

/// Percentage of `part` in `total`; caller guarantees a non-zero total.
pub(crate) fn percent(part: Decimal, total: Decimal, what: &str) -> Result<f64> {
    part.checked_div(total)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .map(to_f64)
        .ok_or_else(|| overflow(what))
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<ValueCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut out: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value: value.to_string(), count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}

fn numeric_summary(values: &[Decimal]) -> Result<NumericSummary> {
    let floats: Vec<f64> = values.iter().copied().map(to_f64).collect();
    let empty = || SapanError::Analysis("empty dataset".into());
    Ok(NumericSummary {
        mean: stats::mean(&floats).ok_or_else(empty)?,
        median: stats::median(&floats).ok_or_else(empty)?,
        std: stats::sample_std(&floats),
        min: values.iter().copied().min().ok_or_else(empty)?,
        max: values.iter().copied().max().ok_or_else(empty)?,
    })
}

pub struct Analyzer {
    ledger: Ledger,
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(ledger: Ledger, config: AnalysisConfig) -> Self {
        Self { ledger, config }
    }

    pub fn from_path(path: &Path, config: AnalysisConfig) -> Result<Self> {
        Ok(Self::new(files::load_path(path)?, config))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn records(&self) -> Result<&[Record]> {
        if self.ledger.is_empty() {
            return Err(SapanError::Analysis("empty dataset".into()));
        }
        Ok(self.ledger.records())
    }

    pub fn basic_statistics(&self) -> Result<BasicStatistics> {
        let records = self.records()?;
        let (start, end) = self
            .ledger
            .date_range()
            .ok_or_else(|| SapanError::Analysis("empty dataset".into()))?;
        let quantities: Vec<Decimal> = records.iter().map(|r| r.quantity).collect();
        let amounts: Vec<Decimal> = records.iter().map(|r| r.amount).collect();

        Ok(BasicStatistics {
            total_records: records.len(),
            start,
            end,
            quantity: numeric_summary(&quantities)?,
            amount: numeric_summary(&amounts)?,
            company_codes: value_counts(records.iter().map(|r| r.company_code.as_str())),
            document_types: value_counts(records.iter().map(|r| r.document_type.code())),
            plants: value_counts(records.iter().map(|r| r.plant.as_str())),
        })
    }

    /// Monthly sum/mean/count of amounts, gap months included, plus a rolling mean of the sums.
    pub fn time_series(&self) -> Result<Vec<MonthlyBucket>> {
        let records = self.records()?;
        let mut by_month: BTreeMap<(i32, u32), (Decimal, usize)> = BTreeMap::new();
        for r in records {
            let slot = by_month
                .entry((r.posting_date.year(), r.posting_date.month()))
                .or_insert((Decimal::ZERO, 0));
            add_amount(&mut slot.0, r.amount, "time series")?;
            slot.1 += 1;
        }

        let (Some(&first), Some(&last)) = (by_month.keys().next(), by_month.keys().next_back()) else {
            return Err(SapanError::Analysis("empty dataset".into()));
        };

        let mut buckets = Vec::new();
        let (mut y, mut m) = first;
        while (y, m) <= last {
            let (sum, count) = by_month.get(&(y, m)).copied().unwrap_or((Decimal::ZERO, 0));
            let month_end = month_end(y, m)
                .ok_or_else(|| SapanError::Analysis(format!("invalid month {y}-{m:02}")))?;
            buckets.push(MonthlyBucket {
                month_end,
                sum,
                mean: (count > 0).then(|| to_f64(sum) / count as f64),
                count,
                rolling_avg: None,
            });
            (y, m) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
        }

        let sums: Vec<f64> = buckets.iter().map(|b| to_f64(b.sum)).collect();
        for (bucket, avg) in buckets
            .iter_mut()
            .zip(stats::rolling_mean(&sums, self.config.rolling_window))
        {
            bucket.rolling_avg = avg;
        }
        tracing::debug!(months = buckets.len(), "time series built");
        Ok(buckets)
    }

    fn grouped<F>(&self, what: &str, key: F) -> Result<Vec<GroupSummary>>
    where
        F: Fn(&Record) -> String,
    {
        let records = self.records()?;
        let mut groups: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
        for r in records {
            let slot = groups.entry(key(r)).or_insert((Decimal::ZERO, 0));
            add_amount(&mut slot.0, r.amount, what)?;
            slot.1 += 1;
        }
        let mut total = Decimal::ZERO;
        for (sum, _) in groups.values() {
            add_amount(&mut total, *sum, what)?;
        }
        if total.is_zero() {
            return Err(SapanError::Analysis(format!(
                "{what}: total amount is zero, percentages are undefined"
            )));
        }

        let mut out = groups
            .into_iter()
            .map(|(key, (sum, count))| {
                Ok(GroupSummary {
                    key,
                    sum,
                    mean: to_f64(sum) / count as f64,
                    count,
                    percentage: percent(sum, total, what)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        out.sort_by(|a, b| b.sum.cmp(&a.sum).then_with(|| a.key.cmp(&b.key)));
        Ok(out)
    }

    pub fn cost_centers(&self) -> Result<Vec<GroupSummary>> {
        self.grouped("cost centers", |r| r.cost_center.clone())
    }

    pub fn document_types(&self) -> Result<Vec<GroupSummary>> {
        self.grouped("document types", |r| r.document_type.code().to_string())
    }

    pub fn materials(&self) -> Result<Vec<MaterialValue>> {
        abc::classify(self.records()?, self.config.abc)
    }

    pub fn correlation(&self) -> Result<CorrelationMatrix> {
        let records = self.records()?;
        let q: Vec<f64> = records.iter().map(|r| to_f64(r.quantity)).collect();
        let a: Vec<f64> = records.iter().map(|r| to_f64(r.amount)).collect();
        let r = stats::pearson(&q, &a);
        // Diagonal is only defined where the column has variance.
        let self_corr = |xs: &[f64]| stats::sample_std(xs).filter(|s| *s > 0.0).map(|_| 1.0);
        Ok(CorrelationMatrix {
            labels: ["Quantity", "Amount"],
            values: [[self_corr(&q), r], [r, self_corr(&a)]],
        })
    }

    pub fn generate_all_reports(&self) -> Result<Reports> {
        let reports = Reports {
            basic_statistics: self.basic_statistics()?,
            time_series: self.time_series()?,
            cost_centers: self.cost_centers()?,
            material_analysis: self.materials()?,
            correlation: self.correlation()?,
            document_types: self.document_types()?,
        };
        tracing::info!(records = self.ledger.len(), "all reports generated");
        Ok(reports)
    }
}
