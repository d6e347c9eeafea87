//! Append-only CSV sink for discovered distributions
//!
//! The sink is the single shared mutable resource every crawl unit touches,
//! so it serializes writers internally behind a mutex. The header row is
//! written and flushed at creation, before any unit exists, which keeps it
//! strictly first in the file no matter how appends interleave. Each record
//! is flushed as it is written, so an aborted run leaves the file in a
//! well-defined last-flushed state.

use crate::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

/// Thread-safe CSV writer producing `Package,Distribution,Size` rows
pub struct CsvSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Creates the output file, truncating prior content, and writes the header
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        writer.write_record(["Package", "Distribution", "Size"])?;
        writer.flush()?;

        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Appends one distribution record
    ///
    /// Safe to call from any number of tasks; rows land in the order the
    /// internal lock is acquired.
    pub fn append(&self, package: &str, distribution: &str, size_bytes: i64) -> Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writer.write_record([package, distribution, &size_bytes.to_string()])?;
        writer.flush()?;
        Ok(())
    }

    /// Flushes any residual buffered state
    pub fn finish(&self) -> Result<()> {
        self.writer.lock().unwrap().flush()?;
        Ok(())
    }
}
