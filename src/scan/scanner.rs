/*! Corpus scanner

Reads every chunk of a folder until its end, counting files, records and bytes.

A corrupt chunk is either skipped (the default, the failure is kept in the [ScanReport]) or
aborts the scan. Other errors (unreadable file, permissions...) always abort it.
!*/
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error, info};
use rayon::prelude::*;

use crate::error::Error;
use crate::io::{FileChunkReader, CHUNK_SUFFIX};
use crate::record::StreamItem;

use super::Progress;

/// Records in the reference corpus, used for remaining time projections.
pub const DEFAULT_TARGET_RECORDS: u64 = 500_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptionPolicy {
    /// log the failure and move on to the next file.
    #[default]
    Skip,
    /// stop the scan and return the error.
    Abort,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// extension of chunk files, without the dot.
    pub suffix: String,
    /// records between two progress reports.
    pub report_every: u64,
    pub target_records: u64,
    pub on_corruption: CorruptionPolicy,
    /// scan files concurrently.
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            suffix: CHUNK_SUFFIX.to_string(),
            report_every: 100,
            target_records: DEFAULT_TARGET_RECORDS,
            on_corruption: CorruptionPolicy::default(),
            parallel: false,
        }
    }
}

/// A chunk that could not be read until its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub record_index: u64,
    pub byte_offset: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub files: u64,
    pub records: u64,
    pub bytes: u64,
    pub elapsed: Duration,
    /// number of progress projections that were emitted.
    pub projections: u64,
    pub failures: Vec<FileFailure>,
}

pub struct CorpusScanner {
    config: ScanConfig,
}

impl CorpusScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// List chunk files of `dir` (non recursive), sorted by path.
    pub fn chunk_paths(&self, dir: &Path) -> Result<Vec<PathBuf>, Error> {
        let dir = dir
            .to_str()
            .ok_or_else(|| Error::Custom(format!("non UTF-8 path {:?}", dir)))?;
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(dir),
            glob::Pattern::escape(&self.config.suffix)
        );
        debug!("looking for chunks with {}", pattern);

        let mut paths = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
        paths.retain(|p| p.is_file());
        paths.sort();
        Ok(paths)
    }

    /// Scan every chunk file of `dir`.
    pub fn scan_dir(&self, dir: &Path) -> Result<ScanReport, Error> {
        let paths = self.chunk_paths(dir)?;
        info!("scanning {} chunks in {:?}", paths.len(), dir);
        self.scan_paths(&paths)
    }

    pub fn scan_paths(&self, paths: &[PathBuf]) -> Result<ScanReport, Error> {
        self.scan_with(paths, |_, _| ())
    }

    /// Scan `paths`, calling `visit` on every record read.
    ///
    /// Records read from a chunk before it turns out to be corrupt are counted and visited.
    pub fn scan_with<F>(&self, paths: &[PathBuf], visit: F) -> Result<ScanReport, Error>
    where
        F: Fn(&Path, &StreamItem) + Sync,
    {
        let progress = Progress::new(self.config.report_every, self.config.target_records);
        let mut failures = Vec::new();

        if self.config.parallel {
            let results: Vec<(&PathBuf, Result<(), Error>)> = paths
                .par_iter()
                .map(|path| (path, Self::scan_file(path, &progress, &visit)))
                .collect();
            for (path, result) in results {
                self.handle_result(path, result, &mut failures)?;
            }
        } else {
            for path in paths {
                let result = Self::scan_file(path, &progress, &visit);
                self.handle_result(path, result, &mut failures)?;
            }
        }

        let snapshot = progress.snapshot();
        Ok(ScanReport {
            files: snapshot.files,
            records: snapshot.records,
            bytes: snapshot.bytes,
            elapsed: snapshot.elapsed,
            projections: progress.projections(),
            failures,
        })
    }

    fn handle_result(
        &self,
        path: &Path,
        result: Result<(), Error>,
        failures: &mut Vec<FileFailure>,
    ) -> Result<(), Error> {
        match result {
            Ok(()) => Ok(()),
            Err(Error::Corruption {
                record_index,
                byte_offset,
                kind,
            }) if self.config.on_corruption == CorruptionPolicy::Skip => {
                error!(
                    "[{:?}] corrupt record #{} at byte {}: {}. Skipping file.",
                    path, record_index, byte_offset, kind
                );
                failures.push(FileFailure {
                    path: path.to_path_buf(),
                    record_index,
                    byte_offset,
                    reason: kind.to_string(),
                });
                Ok(())
            }
            Err(e) => {
                error!("[{:?}] {}", path, e);
                Err(e)
            }
        }
    }

    fn scan_file<F>(path: &Path, progress: &Progress, visit: &F) -> Result<(), Error>
    where
        F: Fn(&Path, &StreamItem),
    {
        let size = std::fs::metadata(path)?.len();
        let mut reader = FileChunkReader::from_path(path)?;
        progress.add_file(size);

        while let Some(item) = reader.read_next()? {
            progress.record();
            visit(path, &item);
        }
        debug!("{:?}: {} records", path, reader.records_read());
        Ok(())
    }
}
