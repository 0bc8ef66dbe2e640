use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::tokenizer::{Tokenizer, MAX_TOKEN_LEN};
use crate::HashTable;

// Big reads, the streams are mostly plain text files.
const IN_BUFFER_SIZE: usize = 65_536;

#[derive(Clone, Debug)]
pub struct ScanOptions {
    pub max_token_len: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            max_token_len: MAX_TOKEN_LEN,
        }
    }
}

/// Running totals over everything scanned so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub tokens: u64,
    pub matched: u64,
    pub discarded: u64,
    pub skipped_inputs: usize,
}

/// Feeds the words of input streams into a vocabulary table.
pub struct CountingScanner<'a> {
    table: &'a mut HashTable,
    options: ScanOptions,
    stats: ScanStats,
}

impl<'a> CountingScanner<'a> {
    pub fn new(table: &'a mut HashTable) -> CountingScanner<'a> {
        CountingScanner::with_options(table, ScanOptions::default())
    }

    pub fn with_options(table: &'a mut HashTable, options: ScanOptions) -> CountingScanner<'a> {
        CountingScanner {
            table,
            options,
            stats: ScanStats::default(),
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Counts the vocabulary words of `input` until end of stream.
    ///
    /// Counts already applied stay in place if reading fails midway.
    pub fn scan<R: Read>(&mut self, input: R) -> io::Result<()> {
        let reader = BufReader::with_capacity(IN_BUFFER_SIZE, input);
        let mut tokenizer = Tokenizer::with_max_token_len(reader, self.options.max_token_len);
        let mut tokens = 0u64;
        let mut matched = 0u64;
        let result = loop {
            match tokenizer.next_token() {
                Ok(Some(token)) => {
                    tokens += 1;
                    if self.table.increment_if_present(token) {
                        matched += 1;
                    }
                }
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            }
        };
        self.stats.tokens += tokens;
        self.stats.matched += matched;
        self.stats.discarded += tokenizer.num_discarded() as u64;
        debug!("Scanned {} tokens, {} matched", tokens, matched);
        result
    }

    /// Scans the file at `path`.
    ///
    /// A file that cannot be opened or read is reported and skipped.
    /// Returns `false` in that case.
    pub fn scan_path<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                self.skip_input("Failed to open input file", path, &err);
                return false;
            }
        };
        if let Err(err) = self.scan(file) {
            self.skip_input("Failed to read input file", path, &err);
            return false;
        }
        true
    }

    // Always reported on stderr, whatever the log level.
    fn skip_input(&mut self, message: &str, path: &Path, err: &io::Error) {
        eprintln!("message = {} : {}\ndetail = {}", message, path.display(), err);
        debug!("{} {}: {}", message, path.display(), err);
        self.stats.skipped_inputs += 1;
    }

    pub fn scan_stdin(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let handle = stdin.lock();
        self.scan(handle)
    }

    /// Scans every path in order, or standard input if there are none.
    ///
    /// Unreadable inputs are skipped, see [`CountingScanner::scan_path`].
    pub fn scan_inputs<P: AsRef<Path>>(&mut self, paths: &[P]) {
        if paths.is_empty() {
            if let Err(err) = self.scan_stdin() {
                self.skip_input("Failed to read input", Path::new("stdin"), &err);
            }
            return;
        }
        for path in paths {
            self.scan_path(path);
        }
    }
}
