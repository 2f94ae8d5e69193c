//! Parallel batch decoding and conversion using Rayon.
//!
//! Records are independent, so a batch of lines can be spread across
//! Rayon's work-stealing thread pool. Results keep the input order. The
//! pool respects the `RAYON_NUM_THREADS` environment variable.
//!
//! # Examples
//!
//! ```
//! use euring::parallel::decode_batch_parallel;
//! use euring::Decoder;
//!
//! let line = "GBB|A0|1234567890|0|1|ZZ|00010|00010|N|0|M|U|U|U|2|2|U|99|99|0|01012024|0|0000|AB00|+000000+0000000|1|9|99|0|4|00000|000|00000";
//! let lines = vec![line; 8];
//!
//! let records = decode_batch_parallel(&lines, &Decoder::new());
//! assert_eq!(records.len(), 8);
//! assert!(records.iter().all(|r| r.errors().is_empty()));
//! ```

use crate::config::ConvertOptions;
use crate::converter::convert_with;
use crate::decoder::Decoder;
use crate::error::Result;
use crate::record::Record;
use rayon::prelude::*;

/// Decode a batch of record lines in parallel.
///
/// Decoding never fails, so every line yields a record; problems are in
/// each record's report.
pub fn decode_batch_parallel<S>(lines: &[S], decoder: &Decoder) -> Vec<Record>
where
    S: AsRef<str> + Sync,
{
    lines
        .par_iter()
        .map(|line| decoder.decode(line.as_ref()))
        .collect()
}

/// Convert a batch of record lines in parallel.
///
/// Each line gets its own result, so one bad record does not sink the batch.
pub fn convert_batch_parallel<S>(lines: &[S], options: &ConvertOptions) -> Vec<Result<String>>
where
    S: AsRef<str> + Sync,
{
    lines
        .par_iter()
        .map(|line| convert_with(line.as_ref(), options))
        .collect()
}
