//! Трэйты чтения/записи форматов на основе std::io, плюс помощники для путей.

use crate::{error::Result, model::Ledger};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<Ledger>;

    fn read_path(path: &Path) -> Result<Ledger> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, ledger: &Ledger) -> Result<()>;

    fn write_path(path: &Path, ledger: &Ledger) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        Self::write(&mut out, ledger)?;
        out.flush()?;
        Ok(())
    }
}

/// A format that can be both read and written; `EXTENSION` is the file suffix it owns.
pub trait Format: ReadFormat + WriteFormat {
    const EXTENSION: &'static str;
}
