/*! Corpus scanning

[CorpusScanner] reads every chunk file of a folder, feeding a shared [Progress] that
periodically logs throughput and a projection of the remaining time.
!*/
mod progress;
mod scanner;

pub use progress::{Progress, Projection, Snapshot};
pub use scanner::{CorpusScanner, CorruptionPolicy, FileFailure, ScanConfig, ScanReport};
