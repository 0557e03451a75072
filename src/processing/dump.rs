//! Human-readable view of a chunk file.
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::io::FileChunkReader;

/// Write the records of `src` to `out` as JSON lines, stopping after `limit` records if provided.
///
/// With `count_only`, only the number of records is written.
/// Returns the number of records read.
pub fn dump<W: Write>(
    src: &Path,
    count_only: bool,
    limit: Option<u64>,
    out: &mut W,
) -> Result<u64, Error> {
    let mut reader = FileChunkReader::from_path(src)?;
    let mut nb = 0;

    while limit.map_or(true, |limit| nb < limit) {
        let item = match reader.read_next()? {
            Some(item) => item,
            None => break,
        };
        nb += 1;
        if !count_only {
            serde_json::to_writer(&mut *out, &item)?;
            out.write_all(b"\n")?;
        }
    }

    if count_only {
        writeln!(out, "{}", nb)?;
    }
    debug!("dumped {} records from {:?}", nb, src);
    Ok(nb)
}
