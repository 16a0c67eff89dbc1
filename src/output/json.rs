//! JSON output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::MovieRecord;

/// Write `records` to `writer` as a pretty-printed JSON array followed by a newline.
pub fn write_json<W: Write>(mut writer: W, records: &[MovieRecord]) -> PipelineResult<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write `records` to a file, replacing it if it exists.
///
/// Every I/O failure, including one raised while serializing, is reported with the path.
pub fn write_json_to_path(path: impl AsRef<Path>, records: &[MovieRecord]) -> PipelineResult<()> {
    let path = path.as_ref();
    let output_err = |source| PipelineError::Output {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(output_err)?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, records).map_err(|e| match e {
        PipelineError::Json(e) if e.is_io() => output_err(io::Error::from(e)),
        other => other,
    })?;
    writer.flush().map_err(output_err)
}
