/*!
# IO utilities

Chunk file framing, reading and writing.

A chunk file is a sequence of self-delimiting frames (see [codec]), with no header or footer.
Reading stops cleanly when the file ends at a frame boundary.
!*/
pub mod codec;
mod digest;
pub mod reader;
pub mod writer;

pub use digest::{DigestReader, DigestWriter};
pub use reader::{ChunkReader, FileChunkReader};
pub use writer::{ChunkRoller, ChunkSummary, ChunkWriter, FileChunkWriter, WriterTrait};

/// File extension of chunk files.
pub const CHUNK_SUFFIX: &str = "sc";
