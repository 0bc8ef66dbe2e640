//! Counts, in a set of text files, the occurrences of the words listed in
//! a dictionary file.
//!
//! ```text
//! wordcount dictfile file1 file2   # count dictionary words in file1 and file2
//! wordcount dictfile < file        # count dictionary words read on stdin
//! ```
//!
//! The dictionary holds one word per line. Blank lines and lines starting
//! with `#` are ignored. Input words are separated by single spaces only.
//!
//! Output is one `count<TAB>word` line per dictionary word, then the total
//! number of matched words.
#[macro_use]
extern crate log;

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use dictcount::{CountingScanner, DictionaryLoader, LoadOptions, Reporter, ScanOptions};

// EPERM: the program cannot be used without a dictionary.
const MISSING_ARGUMENT_CODE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "wordcount")]
#[command(about = "Counts occurrences of dictionary words in files or stdin", long_about = None)]
struct Args {
    /// Dictionary file, one word per line
    dictionary: PathBuf,

    /// Files to scan. Standard input is read if none is given
    inputs: Vec<PathBuf>,

    /// Number of hash table buckets (defaults to the dictionary line count)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    capacity: Option<u64>,

    /// Longest word kept, in bytes
    #[arg(long, default_value_t = dictcount::tokenizer::MAX_TOKEN_LEN)]
    max_token_len: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::MissingRequiredArgument => {
                eprintln!(
                    "message = You have to give as first parameter the dictionary file and \
                     optionally some files to count, if no file is given stdin is read\n\
                     detail = {}",
                    io::Error::from_raw_os_error(MISSING_ARGUMENT_CODE)
                );
                process::exit(MISSING_ARGUMENT_CODE);
            }
            _ => err.exit(),
        },
    };

    if let Err(err) = try_main(args) {
        let code = os_error_code(&err);
        let detail = match code {
            Some(code) => io::Error::from_raw_os_error(code).to_string(),
            None => err
                .chain()
                .last()
                .map(|cause| cause.to_string())
                .unwrap_or_default(),
        };
        eprintln!("message = {}\ndetail = {}", err, detail);
        process::exit(code.unwrap_or(1));
    }
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let capacity = args
        .capacity
        .map(usize::try_from)
        .transpose()
        .context("Table capacity does not fit in memory")?;
    let loader = DictionaryLoader::new(LoadOptions {
        capacity,
        max_word_len: args.max_token_len,
    });
    let mut table = loader.load_path(&args.dictionary)?;
    info!(
        "Dictionary {} loaded: {} words, {} buckets",
        args.dictionary.display(),
        table.len(),
        table.capacity()
    );

    {
        let options = ScanOptions {
            max_token_len: args.max_token_len,
        };
        let mut scanner = CountingScanner::with_options(&mut table, options);
        scanner.scan_inputs(args.inputs.as_slice());
        info!("{:?}", scanner.stats());
    }

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock());
    reporter
        .write_table(&table)
        .context("Failed to write counts")?;
    table.destroy();
    Ok(())
}

/// OS error code behind a fatal error, used as exit status.
fn os_error_code(err: &anyhow::Error) -> Option<i32> {
    err.chain()
        .find_map(|cause| {
            if let Some(err) = cause.downcast_ref::<dictcount::Error>() {
                err.raw_os_error()
            } else {
                cause.downcast_ref::<io::Error>().and_then(io::Error::raw_os_error)
            }
        })
        .filter(|&code| code != 0)
}
