//! Add a word-level annotation layer to every record of a chunk.
use std::path::Path;

use log::info;

use crate::annotate::{Annotate, AnnotationMerge, WordTagger};
use crate::error::Error;
use crate::io::{ChunkSummary, FileChunkReader, FileChunkWriter};

/// Read `src`, add a [WordTagger] layer named `tagger` to each record and write the result to `dst`.
///
/// `dst` must not exist. If reading `src` fails, `dst` only holds the records written before the failure.
pub fn tag(
    src: &Path,
    dst: &Path,
    tagger: &str,
    merge: AnnotationMerge,
) -> Result<ChunkSummary, Error> {
    let annotator = WordTagger::new(tagger, merge);
    let reader = FileChunkReader::from_path(src)?;
    let mut writer = FileChunkWriter::create(dst)?;

    for item in reader {
        let mut item = item?;
        annotator.annotate(&mut item)?;
        writer.add(&item)?;
    }

    let summary = writer.finish()?;
    info!(
        "tagged {} records from {:?} into {:?} (sha256 {})",
        summary.count, src, dst, summary.hexdigest
    );
    Ok(summary)
}
