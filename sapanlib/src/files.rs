//! Загрузка/сохранение по пути; формат выбирается по расширению файла.

use crate::{
    error::Result,
    formats::{csv::Csv, json::Json},
    model::Ledger,
    traits::{Format, ReadFormat, WriteFormat},
};
use std::path::Path;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(Json::EXTENSION))
}

/// `.json` files are read as JSON, everything else as CSV.
pub fn load_path(path: &Path) -> Result<Ledger> {
    let ledger = if is_json(path) {
        Json::read_path(path)?
    } else {
        Csv::read_path(path)?
    };
    tracing::info!(path = %path.display(), records = ledger.len(), "ledger loaded");
    Ok(ledger)
}

pub fn save_path(path: &Path, ledger: &Ledger) -> Result<()> {
    if is_json(path) {
        Json::write_path(path, ledger)?;
    } else {
        Csv::write_path(path, ledger)?;
    }
    tracing::info!(path = %path.display(), records = ledger.len(), "ledger saved");
    Ok(())
}
