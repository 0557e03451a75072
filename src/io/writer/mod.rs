/*!
# Chunk writing

[ChunkWriter] appends encoded records to a single sink, [ChunkRoller] spreads them over
several files of bounded record count. Both implement [WriterTrait].

A writer owns its sink: it is flushed when the writer is closed or dropped.
Once a write fails, the writer refuses any further record rather than risk appending after a
partially written frame.
!*/
mod chunkwriter;
mod roller;
mod writertrait;

pub use chunkwriter::{ChunkSummary, ChunkWriter, FileChunkWriter};
pub use roller::ChunkRoller;
pub use writertrait::WriterTrait;
