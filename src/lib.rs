/*! # streamchunk

Sequential record store for large streams of annotated documents.

A chunk file is a plain concatenation of self-delimiting record frames:

- [io::codec] encodes and decodes a single frame,
- [io::ChunkReader] pulls records until the end of the stream,
- [io::ChunkWriter] and [io::ChunkRoller] append records,
- [annotate::AnnotationMerge] adds a named tagger layer to a record,
- [scan::CorpusScanner] walks a folder of chunks and reports throughput.
!*/
pub mod annotate;
pub mod error;
pub mod io;
pub mod processing;
pub mod record;
pub mod scan;
