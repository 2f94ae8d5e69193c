//! Writing EURING records to line-oriented streams.
//!
//! This module provides [`EuringWriter`], which serializes [`Record`]
//! instances one per line to any destination implementing
//! [`std::io::Write`]. Records can be written as EURING text, optionally
//! converted to another format on the way out, or as JSON.
//!
//! # Examples
//!
//! Writing to a buffer:
//!
//! ```
//! use euring::{EuringWriter, Record};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";
//! let record = Record::decode(text, None);
//!
//! let mut buffer = Vec::new();
//! {
//!     let mut writer = EuringWriter::new(&mut buffer);
//!     writer.write_record(&record)?;
//!     writer.finish()?;
//! }
//! assert!(String::from_utf8(buffer)?.ends_with("|\n"));
//! # Ok(())
//! # }
//! ```

use crate::error::{EuringError, Result};
use crate::formats::{EuringFormat, OutputFormat, RecordWriter};
use crate::record::Record;
use std::io::Write;

/// Writer for newline-separated EURING records.
///
/// # Examples
///
/// ```
/// use euring::{EuringFormat, EuringWriter};
///
/// let writer = EuringWriter::new(Vec::new()).with_target(EuringFormat::Euring2020, false);
/// assert_eq!(writer.records_written(), 0);
/// ```
#[derive(Debug)]
pub struct EuringWriter<W: Write> {
    writer: W,
    output: OutputFormat,
    target: Option<EuringFormat>,
    force: bool,
    records_written: usize,
    finished: bool,
}

impl<W: Write> EuringWriter<W> {
    /// Create a new writer emitting EURING text in each record's own format.
    ///
    /// # Arguments
    ///
    /// * `writer` - Any destination implementing [`std::io::Write`]
    pub fn new(writer: W) -> Self {
        EuringWriter {
            writer,
            output: OutputFormat::default(),
            target: None,
            force: false,
            records_written: 0,
            finished: false,
        }
    }

    /// Select EURING text or JSON output.
    #[must_use]
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Convert every record to `target` before writing.
    ///
    /// `force` allows lossy downgrades. Only applies to EURING text output.
    #[must_use]
    pub fn with_target(mut self, target: EuringFormat, force: bool) -> Self {
        self.target = Some(target);
        self.force = force;
        self
    }

    /// Write a single record followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The writer has already been finished
    /// - The record fails validation or cannot be converted to the target
    /// - An I/O error occurs during writing
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if self.finished {
            return Err(EuringError::InvalidRecord(
                "Cannot write to a finished writer".to_string(),
            ));
        }

        let line = match (self.output, self.target) {
            (OutputFormat::Euring, Some(target)) => record.export(target, self.force)?,
            (output, _) => record.serialize_as(output)?,
        };
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush the underlying writer.
    ///
    /// After calling `finish`, no more records can be written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Consume the writer and return the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + std::fmt::Debug> RecordWriter for EuringWriter<W> {
    fn write_record(&mut self, record: &Record) -> Result<()> {
        EuringWriter::write_record(self, record)
    }

    fn finish(&mut self) -> Result<()> {
        EuringWriter::finish(self)
    }

    fn records_written(&self) -> Option<usize> {
        Some(self.records_written)
    }
}
