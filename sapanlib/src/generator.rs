//! Генерация синтетических проводок выборкой из фиксированных пулов значений.

use chrono::{Datelike, Days, Local, NaiveDate};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;

use crate::{
    config::{DecimalRange, GeneratorConfig},
    error::{Result, SapanError},
    files,
    model::{DocumentType, Ledger, Record},
};

/// Master-data pools the generator draws from.
#[derive(Debug, Clone)]
pub struct Pools {
    pub companies: Vec<String>,
    pub plants: Vec<String>,
    pub materials: Vec<String>,
    pub cost_centers: Vec<String>,
    pub profit_centers: Vec<String>,
    pub gl_accounts: Vec<String>,
    pub vendors: Vec<String>,
    pub customers: Vec<String>,
}

impl Default for Pools {
    fn default() -> Self {
        Self {
            companies: ["COMP_A", "COMP_B", "COMP_C", "COMP_D"].map(String::from).to_vec(),
            plants: (1..=5).map(|i| format!("PLANT_{i}")).collect(),
            materials: (1..=100).map(|i| format!("MAT_{i:05}")).collect(),
            cost_centers: (1001..=1020).map(|i| format!("CC_{i:04}")).collect(),
            profit_centers: (101..=110).map(|i| format!("PC_{i:03}")).collect(),
            gl_accounts: (40000..40100).map(|i| format!("G/L_{i:05}")).collect(),
            vendors: (10001..=10100).map(|i| format!("VEND_{i:05}")).collect(),
            customers: (50001..=50100).map(|i| format!("CUST_{i:05}")).collect(),
        }
    }
}

/// Inclusive bounds in whole cents, so every draw is a 2 dp value inside `range`.
fn cent_bounds(name: &str, range: &DecimalRange) -> Result<(i64, i64)> {
    let hundred = Decimal::ONE_HUNDRED;
    let lo = range.min.checked_mul(hundred).and_then(|v| v.ceil().to_i64());
    let hi = range.max.checked_mul(hundred).and_then(|v| v.floor().to_i64());
    match (lo, hi) {
        (Some(lo), Some(hi)) if lo <= hi => Ok((lo, hi)),
        _ => Err(SapanError::Config(format!(
            "{name} range {}..={} holds no whole-cent value",
            range.min, range.max
        ))),
    }
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &'a [String]) -> Result<&'a String> {
    pool.choose(rng)
        .ok_or_else(|| SapanError::Config("empty value pool".into()))
}

pub struct Generator {
    config: GeneratorConfig,
    pools: Pools,
    rng: ChaCha8Rng,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_pools(config, Pools::default())
    }

    pub fn with_pools(config: GeneratorConfig, pools: Pools) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self { config, pools, rng })
    }

    /// First posting date of the window; the last one is the day before `end_date`.
    fn window_start(&self) -> Result<NaiveDate> {
        let end = self.config.end_date.unwrap_or_else(|| Local::now().date_naive());
        end.checked_sub_days(Days::new(u64::from(self.config.days)))
            .ok_or_else(|| SapanError::Config(format!("date window of {} days underflows", self.config.days)))
    }

    pub fn generate(&mut self) -> Result<Ledger> {
        let start = self.window_start()?;
        let (q_lo, q_hi) = cent_bounds("quantity", &self.config.quantity)?;
        let (a_lo, a_hi) = cent_bounds("amount", &self.config.amount)?;

        let mut records = Vec::with_capacity(self.config.records);
        for _ in 0..self.config.records {
            let offset = self.rng.gen_range(0..u64::from(self.config.days));
            let posting_date = start
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| SapanError::Config("posting date overflows".into()))?;
            let document_type = *DocumentType::ALL
                .choose(&mut self.rng)
                .unwrap_or(&DocumentType::Inv);
            let pools = &self.pools;
            let rng = &mut self.rng;

            let quantity = Decimal::new(rng.gen_range(q_lo..=q_hi), 2);
            let amount = Decimal::new(rng.gen_range(a_lo..=a_hi), 2);
            let company_code = pick(rng, &pools.companies)?.clone();
            let plant = pick(rng, &pools.plants)?.clone();
            let material = pick(rng, &pools.materials)?.clone();
            let cost_center = pick(rng, &pools.cost_centers)?.clone();
            let profit_center = pick(rng, &pools.profit_centers)?.clone();
            let gl_account = pick(rng, &pools.gl_accounts)?.clone();
            let vendor = if document_type.has_vendor() {
                Some(pick(rng, &pools.vendors)?.clone())
            } else {
                None
            };
            let customer = if document_type.has_customer() {
                Some(pick(rng, &pools.customers)?.clone())
            } else {
                None
            };
            let document_number = format!("DOC_{:08}", rng.gen_range(1..=99_999_999u32));

            records.push(Record {
                company_code,
                plant,
                material,
                quantity,
                amount,
                currency: self.config.currency.clone(),
                document_type,
                posting_date,
                cost_center,
                profit_center,
                gl_account,
                vendor,
                customer,
                fiscal_year: posting_date.year(),
                fiscal_period: posting_date.month(),
                document_number,
            });
        }

        tracing::info!(records = records.len(), from = %start, days = self.config.days, "generated ledger");
        Ok(Ledger::new(records))
    }
}

/// One-shot generation with the default pools.
pub fn generate(config: &GeneratorConfig) -> Result<Ledger> {
    Generator::new(config.clone())?.generate()
}

/// Write a generated ledger to `path` (CSV unless the extension says JSON).
pub fn save(ledger: &Ledger, path: &Path) -> Result<()> {
    files::save_path(path, ledger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cent_bounds_round_inwards() {
        let r = DecimalRange::new(Decimal::new(1005, 3), Decimal::new(2009, 3));
        assert_eq!(cent_bounds("x", &r).expect("bounds"), (101, 200));
    }

    #[test]
    fn sub_cent_range_is_rejected() {
        let r = DecimalRange::new(Decimal::new(1001, 3), Decimal::new(1009, 3));
        assert!(cent_bounds("x", &r).is_err());
    }

    #[test]
    fn default_pools_have_expected_sizes() {
        let p = Pools::default();
        assert_eq!(p.companies.len(), 4);
        assert_eq!(p.plants.len(), 5);
        assert_eq!(p.materials.len(), 100);
        assert_eq!(p.cost_centers.len(), 20);
        assert_eq!(p.profit_centers.len(), 10);
        assert_eq!(p.gl_accounts.len(), 100);
        assert_eq!(p.materials[0], "MAT_00001");
        assert_eq!(p.gl_accounts[99], "G/L_40099");
    }
}
