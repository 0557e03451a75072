/*! Chunk reading

[ChunkReader] pulls records out of a byte source one frame at a time.
!*/
mod chunkreader;

pub use chunkreader::{ChunkReader, FileChunkReader};
