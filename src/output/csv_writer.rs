//! CSV export of SEO records
//!
//! One header row (`url,title,h1,meta_description,status_code`) followed by
//! one row per record, in the order given.

use crate::crawler::SeoRecord;
use crate::SeoError;
use std::io::Write;
use std::path::Path;

/// Writes `records` as CSV to any writer
pub fn write_records<W: Write>(records: &[SeoRecord], writer: W) -> Result<(), SeoError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for record in records {
        wtr.serialize(record)?;
    }

    // No records means serialize never ran, so emit the header by hand
    if records.is_empty() {
        wtr.write_record(["url", "title", "h1", "meta_description", "status_code"])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `records` as CSV to the file at `path`, replacing it if it exists
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(SeoError)` - The file could not be created or written
pub fn write_csv(records: &[SeoRecord], path: &Path) -> Result<(), SeoError> {
    let file = std::fs::File::create(path)?;
    write_records(records, file)?;
    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
