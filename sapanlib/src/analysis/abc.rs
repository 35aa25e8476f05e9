//! ABC-классификация материалов по накопленной доле общей суммы.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{add_amount, percent};
use crate::{
    config::AbcThresholds,
    error::{Result, SapanError},
    model::Record,
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub const ALL: [AbcClass; 3] = [AbcClass::A, AbcClass::B, AbcClass::C];

    pub fn for_cumulative(cumulative_percentage: f64, thresholds: AbcThresholds) -> Self {
        if cumulative_percentage <= thresholds.a {
            AbcClass::A
        } else if cumulative_percentage <= thresholds.b {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialValue {
    pub material: String,
    pub amount: Decimal,
    pub cumulative_percentage: f64,
    pub class: AbcClass,
}

/// Materials by total amount, descending (ties by material id), each tagged with its class.
pub fn classify(records: &[Record], thresholds: AbcThresholds) -> Result<Vec<MaterialValue>> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for r in records {
        add_amount(totals.entry(r.material.as_str()).or_insert(Decimal::ZERO), r.amount, "materials")?;
    }
    let mut grand_total = Decimal::ZERO;
    for amount in totals.values() {
        add_amount(&mut grand_total, *amount, "materials")?;
    }
    if grand_total.is_zero() {
        return Err(SapanError::Analysis(
            "materials: total amount is zero, ABC classes are undefined".into(),
        ));
    }

    let mut ranked: Vec<(&str, Decimal)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut running = Decimal::ZERO;
    let mut out = Vec::with_capacity(ranked.len());
    for (material, amount) in ranked {
        add_amount(&mut running, amount, "materials")?;
        let cumulative_percentage = percent(running, grand_total, "materials")?;
        out.push(MaterialValue {
            material: material.to_string(),
            amount,
            cumulative_percentage,
            class: AbcClass::for_cumulative(cumulative_percentage, thresholds),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        let t = AbcThresholds::default();
        assert_eq!(AbcClass::for_cumulative(80.0, t), AbcClass::A);
        assert_eq!(AbcClass::for_cumulative(80.0001, t), AbcClass::B);
        assert_eq!(AbcClass::for_cumulative(95.0, t), AbcClass::B);
        assert_eq!(AbcClass::for_cumulative(95.5, t), AbcClass::C);
        assert_eq!(AbcClass::for_cumulative(100.0, t), AbcClass::C);
    }
}
