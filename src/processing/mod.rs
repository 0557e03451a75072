/*! Chunk processing

Operations behind the command line: dumping, tagging, re-chunking and entity statistics of chunk files.
!*/
mod dump;
mod roll;
mod stats;
mod tag;

pub use dump::dump;
pub use roll::roll;
pub use stats::{stats, EntityCounts, EntityStats};
pub use tag::tag;
