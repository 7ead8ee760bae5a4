use crate::model::ProductRecord;
use crate::HarvestError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializes records as a pretty-printed JSON array
pub fn records_to_json(records: &[ProductRecord]) -> Result<String, HarvestError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes records as a pretty-printed JSON array to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(HarvestError)` - The file could not be created or written
pub fn write_records_json(records: &[ProductRecord], output_path: &Path) -> Result<(), HarvestError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
