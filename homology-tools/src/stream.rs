//! Lazy parsing of tabular aligner output

use crate::hit::{HitRecord, HIT_COLUMNS};
use crate::traits::HitSink;
use homology_core::{HomologyError, HomologyResult};
use std::io::BufRead;

/// Iterator of hits parsed line by line from a reader.
///
/// Nothing is buffered beyond the current line, so records become available
/// while the producing process is still writing. Blank lines are skipped, as
/// are `#` header lines that do not have the full hit column count; a `#`
/// line with every column is a hit whose query id starts with `#`. The first
/// error ends the stream.
pub struct HitStream<R> {
    reader: R,
    line_number: usize,
    buffer: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> HitStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next raw line, tolerating non-UTF-8 bytes
    fn next_line(&mut self) -> Option<HomologyResult<String>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                let line = String::from_utf8_lossy(&self.buffer);
                Some(Ok(line.trim_end_matches(['\n', '\r']).to_string()))
            }
            Err(e) => Some(Err(HomologyError::Io(e))),
        }
    }
}

impl<R: BufRead> Iterator for HitStream<R> {
    type Item = HomologyResult<HitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.next_line() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                Some(Ok(line)) => line,
            };

            if line.trim().is_empty() || is_header(&line) {
                continue;
            }

            let parsed = HitRecord::parse_line(&line, self.line_number);
            if parsed.is_err() {
                self.finished = true;
            }
            return Some(parsed);
        }
    }
}

fn is_header(line: &str) -> bool {
    line.starts_with('#') && line.split('\t').count() != HIT_COLUMNS.len()
}

/// Feed every hit of a stream into a sink; returns the number of hits
pub fn drain_into<I>(hits: I, sink: &mut dyn HitSink) -> HomologyResult<usize>
where
    I: IntoIterator<Item = HomologyResult<HitRecord>>,
{
    let mut count = 0;
    for hit in hits {
        sink.accept(hit?);
        count += 1;
    }
    Ok(count)
}
