//! Re-chunking of a folder of chunk files.
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Error;
use crate::io::{ChunkRoller, FileChunkReader, WriterTrait};
use crate::scan::CorpusScanner;

/// Copy every record of the chunks found by `scanner` in `src` into chunks of at most
/// `chunk_max` records in `dst`.
///
/// Returns the paths of the new chunks.
pub fn roll(
    scanner: &CorpusScanner,
    src: &Path,
    dst: &Path,
    chunk_max: u64,
) -> Result<Vec<PathBuf>, Error> {
    let mut roller = ChunkRoller::new(dst, chunk_max)?;

    for path in scanner.chunk_paths(src)? {
        info!("rolling {:?}", path);
        for item in FileChunkReader::from_path(&path)? {
            roller.write_single(&item?)?;
        }
    }

    roller.close()?;
    Ok(roller.rolled().to_vec())
}
