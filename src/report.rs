use std::io::{self, BufWriter, Write};

use crate::HashTable;

const OUT_BUFFER_SIZE: usize = 32_768;
const TOTAL_LABEL: &str = "total words";

/// Writes the final counts, one `count<TAB>word` line per entry followed
/// by the grand total.
pub struct Reporter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Reporter<W> {
        Reporter {
            out: BufWriter::with_capacity(OUT_BUFFER_SIZE, out),
        }
    }

    /// Returns the grand total written on the last line.
    pub fn write_table(&mut self, table: &HashTable) -> io::Result<u64> {
        let mut total = 0u64;
        for (word, count) in table {
            write!(self.out, "{}\t", count)?;
            self.out.write_all(word)?;
            self.out.write_all(b"\n")?;
            total += count;
        }
        writeln!(self.out, "{}\t{}", total, TOTAL_LABEL)?;
        self.out.flush()?;
        Ok(total)
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(|err| err.into_error())
    }
}
