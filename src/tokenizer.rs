use std::io::{self, BufRead};

/// Only the space byte separates words. Tabs and newlines are part of
/// the word they appear in.
pub const DELIMITER: u8 = b' ';

/// Longest token kept, in bytes.
pub const MAX_TOKEN_LEN: usize = 1_023;

/// Splits a byte stream into space separated tokens.
///
/// Tokens longer than the configured maximum are dropped with a warning.
/// A single `\n` ending the last token of the stream is stripped, so that
/// the final word of a text file still matches. Empty tokens are skipped.
pub struct Tokenizer<R> {
    reader: R,
    token: Vec<u8>,
    max_token_len: usize,
    num_discarded: usize,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(reader: R) -> Tokenizer<R> {
        Tokenizer::with_max_token_len(reader, MAX_TOKEN_LEN)
    }

    pub fn with_max_token_len(reader: R, max_token_len: usize) -> Tokenizer<R> {
        Tokenizer {
            reader,
            token: Vec::new(),
            max_token_len,
            num_discarded: 0,
        }
    }

    /// Number of oversized tokens dropped so far.
    pub fn num_discarded(&self) -> usize {
        self.num_discarded
    }

    /// Returns the next token, or `None` once the stream is exhausted.
    pub fn next_token(&mut self) -> io::Result<Option<&[u8]>> {
        loop {
            self.token.clear();
            let mut oversized = false;
            let mut delimited = false;
            loop {
                let available = match self.reader.fill_buf() {
                    Ok(available) => available,
                    Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err),
                };
                if available.is_empty() {
                    break;
                }
                let (chunk, consumed) = match available.iter().position(|&b| b == DELIMITER) {
                    Some(pos) => {
                        delimited = true;
                        (&available[..pos], pos + 1)
                    }
                    None => (available, available.len()),
                };
                if !oversized {
                    if self.token.len() + chunk.len() > self.max_token_len {
                        oversized = true;
                        self.token.clear();
                    } else {
                        self.token.extend_from_slice(chunk);
                    }
                }
                self.reader.consume(consumed);
                if delimited {
                    break;
                }
            }
            if oversized {
                warn!(
                    "Buffer full when reading word (more than {} bytes), word discarded",
                    self.max_token_len
                );
                self.num_discarded += 1;
                if delimited {
                    continue;
                }
                return Ok(None);
            }
            if !delimited && self.token.last() == Some(&b'\n') {
                self.token.pop();
            }
            if !self.token.is_empty() {
                return Ok(Some(&self.token));
            }
            if !delimited {
                return Ok(None);
            }
        }
    }
}
