//! Persist collected notes to JSON and CSV.

use crate::extract::NoteRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// UTF-8 byte-order mark, prepended to the CSV so spreadsheet apps pick
/// the right encoding.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// CSV header, in field discovery order.
const CSV_HEADER: [&str; 4] = ["title", "link", "like", "author"];

/// Write the note list as an indented JSON array.
///
/// Non-ASCII text is written literally, not escaped. Any existing file is
/// overwritten.
pub fn write_json(notes: &[NoteRecord], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, notes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write the note list as CSV with a header row and a UTF-8 BOM.
///
/// The header is written even when the list is empty. Any existing file is
/// overwritten.
pub fn write_csv(notes: &[NoteRecord], path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(UTF8_BOM)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(CSV_HEADER)?;
    for note in notes {
        wtr.write_record([&note.title, &note.link, &note.like, &note.author])?;
    }
    wtr.flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
