//! JSON-lines output.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, VtError};

/// Path that selects stdout instead of a file.
pub const STDOUT_PATH: &str = "-";

/// Write one compact JSON object per line, in slice order.
pub fn write_jsonl<T: Serialize>(writer: impl Write, records: &[T]) -> Result<usize> {
    let mut writer = BufWriter::new(writer);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Serialize `records` to `path`, or to stdout when the path is `-`.
///
/// Files are written to a sibling temp file and renamed into place, so a
/// failed run never leaves a truncated feed behind.
pub fn serialize<T: Serialize>(records: &[T], path: &Path) -> Result<usize> {
    if path.as_os_str() == STDOUT_PATH {
        let stdout = std::io::stdout();
        return write_jsonl(stdout.lock(), records);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    let written = write_jsonl(temp.as_file_mut(), records)?;
    temp.persist(path)
        .map_err(|err| VtError::Io(err.error))?;
    Ok(written)
}
