//! Reader and writer traits for EURING record streams.
//!
//! These traits abstract over where records come from and where they go, so
//! that batch tools can move records between files, buffers and in-memory
//! collections without caring about the transport.
//!
//! # Example
//!
//! ```
//! use euring::formats::{RecordReader, RecordWriter};
//!
//! fn copy_records<R: RecordReader, W: RecordWriter>(
//!     reader: &mut R,
//!     writer: &mut W,
//! ) -> euring::Result<usize> {
//!     let mut count = 0;
//!     while let Some(record) = reader.read_record()? {
//!         writer.write_record(&record)?;
//!         count += 1;
//!     }
//!     writer.finish()?;
//!     Ok(count)
//! }
//! ```

use crate::error::Result;
use crate::record::Record;

/// Trait for sources that produce decoded EURING records.
///
/// Implementations return `Ok(None)` when the source is exhausted. A record
/// with validation problems is still a record: field errors live in its
/// report, and only transport failures surface as `Err`.
pub trait RecordReader: std::fmt::Debug {
    /// Read the next record from the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot be read.
    fn read_record(&mut self) -> Result<Option<Record>>;

    /// Read all remaining records into a vector.
    ///
    /// For large files, prefer streaming with
    /// [`read_record`](Self::read_record).
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails. Previously read records are
    /// discarded.
    fn read_all(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Returns the number of records read so far, if tracked.
    fn records_read(&self) -> Option<usize> {
        None
    }
}

/// Trait for sinks that serialize EURING records.
///
/// Writers may buffer; [`finish`](Self::finish) must be called to flush.
pub trait RecordWriter: std::fmt::Debug {
    /// Write a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized (it fails
    /// validation) or the output cannot be written.
    fn write_record(&mut self, record: &Record) -> Result<()>;

    /// Write multiple records.
    ///
    /// # Errors
    ///
    /// Returns an error if any record cannot be written.
    fn write_batch(&mut self, records: &[Record]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Finish writing and flush any buffered data.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn finish(&mut self) -> Result<()>;

    /// Returns the number of records written so far, if tracked.
    fn records_written(&self) -> Option<usize> {
        None
    }
}

/// Extension trait providing iterator-style access for record readers.
///
/// Automatically implemented for all types implementing [`RecordReader`].
pub trait RecordReaderExt: RecordReader {
    /// Create an iterator over records from this reader.
    fn records(&mut self) -> RecordIterator<'_, Self>
    where
        Self: Sized,
    {
        RecordIterator { reader: self }
    }
}

impl<T: RecordReader> RecordReaderExt for T {}

/// Iterator adapter for [`RecordReader`].
///
/// Created by the [`records`](RecordReaderExt::records) method.
#[derive(Debug)]
pub struct RecordIterator<'a, R: RecordReader> {
    reader: &'a mut R,
}

impl<R: RecordReader> Iterator for RecordIterator<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}
