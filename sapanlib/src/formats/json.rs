//! JSON-массив записей, имена полей те же, что в заголовке CSV.

use crate::{error::Result, model::Ledger};
use std::io::{BufRead, Write};

pub struct Json;

impl crate::traits::ReadFormat for Json {
    fn read<R: BufRead>(r: R) -> Result<Ledger> {
        let ledger: Ledger = serde_json::from_reader(r)?;
        tracing::debug!(rows = ledger.len(), "read ledger json");
        Ok(ledger)
    }
}

impl crate::traits::WriteFormat for Json {
    fn write<W: Write>(mut w: W, ledger: &Ledger) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, ledger)?;
        writeln!(w)?;
        Ok(())
    }
}

impl crate::traits::Format for Json {
    const EXTENSION: &'static str = "json";
}
