use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, Result};
use crate::tokenizer::MAX_TOKEN_LEN;
use crate::HashTable;

const COMMENT_MARKER: u8 = b'#';

/// Options for building the vocabulary table.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Number of buckets. Defaults to the number of lines of the file.
    pub capacity: Option<usize>,
    /// Words longer than this are truncated.
    pub max_word_len: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            capacity: None,
            max_word_len: MAX_TOKEN_LEN,
        }
    }
}

/// Reads a dictionary file, one word per line, into a [`HashTable`].
///
/// Lines starting with `#` and blank lines are ignored, duplicates are
/// kept once. The line terminator is stripped but the rest of the line,
/// spaces included, is taken verbatim.
pub struct DictionaryLoader {
    options: LoadOptions,
}

impl DictionaryLoader {
    pub fn new(options: LoadOptions) -> DictionaryLoader {
        DictionaryLoader { options }
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<HashTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::OpenDictionary {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        self.load(reader).map_err(|err| match err {
            Error::Io(source) => Error::ReadDictionary {
                path: path.to_path_buf(),
                source,
            },
            err => err,
        })
    }

    /// Builds the table from an already opened dictionary.
    ///
    /// Without an explicit capacity the stream is read twice: once to
    /// count its lines, then from the start to insert the words.
    pub fn load<R: BufRead + Seek>(&self, mut reader: R) -> Result<HashTable> {
        let capacity = match self.options.capacity {
            Some(capacity) => capacity,
            None => {
                let num_lines = count_lines(&mut reader)?;
                reader.seek(SeekFrom::Start(0))?;
                num_lines
            }
        };
        let mut table = HashTable::with_capacity(capacity)?;
        let mut line = Vec::new();
        let mut num_words = 0;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            match line.first() {
                Some(&b'\n') | Some(&COMMENT_MARKER) => continue,
                _ => {}
            }
            if line.last() == Some(&b'\n') {
                line.pop();
            }
            if line.len() > self.options.max_word_len {
                warn!(
                    "Dictionary word longer than {} bytes truncated",
                    self.options.max_word_len
                );
                line.truncate(self.options.max_word_len);
            }
            if table.insert(&line)? {
                num_words += 1;
            }
        }
        debug!(
            "Loaded {} distinct words into {} buckets",
            num_words,
            table.capacity()
        );
        Ok(table)
    }
}

impl Default for DictionaryLoader {
    fn default() -> Self {
        DictionaryLoader::new(LoadOptions::default())
    }
}

/// Loads the dictionary at `path` with the default options.
pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<HashTable> {
    DictionaryLoader::default().load_path(path)
}

/// Number of `\n` in the stream plus one, for a last line without
/// terminator.
fn count_lines<R: BufRead>(reader: &mut R) -> io::Result<usize> {
    let mut count = 1;
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if available.is_empty() {
            return Ok(count);
        }
        count += available.iter().filter(|&&b| b == b'\n').count();
        let len = available.len();
        reader.consume(len);
    }
}
