//! Reading EURING records from line-oriented streams.
//!
//! This module provides [`EuringReader`], which decodes one record per line
//! from any source implementing [`std::io::BufRead`]. The three formats may
//! be mixed freely within one file since each line is detected on its own.
//!
//! # Examples
//!
//! Reading records from a file:
//!
//! ```no_run
//! use euring::EuringReader;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("recoveries.psv")?;
//! let mut reader = EuringReader::new(BufReader::new(file));
//!
//! while let Some(record) = reader.read_record()? {
//!     println!("{}: {} errors", record.display_format(), record.errors().len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Reading from a buffer:
//!
//! ```
//! use euring::EuringReader;
//! use std::io::Cursor;
//!
//! let data = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000\n\n";
//! let mut reader = EuringReader::new(Cursor::new(data));
//!
//! let record = reader.read_record()?.unwrap();
//! assert!(record.errors().is_empty());
//! assert!(reader.read_record()?.is_none());
//! # Ok::<(), euring::EuringError>(())
//! ```

use crate::decoder::Decoder;
use crate::error::Result;
use crate::formats::RecordReader;
use crate::record::Record;
use std::io::BufRead;
use tracing::trace;

/// Reader for newline-separated EURING records.
///
/// Blank lines are skipped and trailing `\r` is removed, so files written on
/// any platform read the same. Records that fail validation are returned
/// with their errors; only I/O failures end the stream with `Err`.
#[derive(Debug)]
pub struct EuringReader<R: BufRead> {
    reader: R,
    decoder: Decoder,
    line: String,
    line_number: usize,
    records_read: usize,
}

impl<R: BufRead> EuringReader<R> {
    /// Create a new reader with a default [`Decoder`].
    ///
    /// # Arguments
    ///
    /// * `reader` - Any source implementing [`std::io::BufRead`]
    pub fn new(reader: R) -> Self {
        EuringReader {
            reader,
            decoder: Decoder::new(),
            line: String::new(),
            line_number: 0,
            records_read: 0,
        }
    }

    /// Decode with `decoder` instead of the default one.
    ///
    /// # Examples
    ///
    /// ```
    /// use euring::{Decoder, EuringFormat, EuringReader};
    /// use std::io::Cursor;
    ///
    /// let decoder = Decoder::new().with_format(EuringFormat::Euring2020);
    /// let reader = EuringReader::new(Cursor::new("")).with_decoder(decoder);
    /// assert_eq!(reader.records_read(), 0);
    /// ```
    #[must_use]
    pub fn with_decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the source fails or the input is
    /// not valid UTF-8.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let text = self.line.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                continue;
            }

            let record = self.decoder.decode(text);
            self.records_read += 1;
            trace!(
                line = self.line_number,
                format = %record.format(),
                errors = record.errors().len(),
                "read record"
            );
            return Ok(Some(record));
        }
    }

    /// Number of records returned so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Number of lines consumed so far, blank lines included.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead + std::fmt::Debug> RecordReader for EuringReader<R> {
    fn read_record(&mut self) -> Result<Option<Record>> {
        EuringReader::read_record(self)
    }

    fn records_read(&self) -> Option<usize> {
        Some(self.records_read)
    }
}
