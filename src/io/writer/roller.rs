/*! Spooling of a record stream into several chunk files.

Records flow into a temporary file inside the destination folder. When it holds `chunk_max`
records, or when the roller is closed, the file is renamed to `{count}-{hexdigest}.sc`.
!*/
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use rand::Rng;

use crate::error::Error;
use crate::io::CHUNK_SUFFIX;
use crate::record::StreamItem;

use super::{FileChunkWriter, WriterTrait};

pub struct ChunkRoller {
    chunk_dir: PathBuf,
    chunk_max: u64,
    tmp_path: PathBuf,
    current: Option<FileChunkWriter>,
    rolled: Vec<PathBuf>,
    /// set when a roll fails: the temporary file is left in place and no more records are taken.
    failed: bool,
}

impl ChunkRoller {
    /// Create a roller writing into `chunk_dir`, which is created if needed.
    pub fn new(chunk_dir: &Path, chunk_max: u64) -> Result<Self, Error> {
        if chunk_max == 0 {
            return Err(Error::Custom("chunk_max must be at least 1".to_string()));
        }
        std::fs::create_dir_all(chunk_dir)?;
        let tmp_name = format!(
            "tmp-{}.{}",
            rand::thread_rng().gen_range(0..100_000_000u32),
            CHUNK_SUFFIX
        );

        Ok(Self {
            chunk_dir: chunk_dir.to_path_buf(),
            chunk_max,
            tmp_path: chunk_dir.join(tmp_name),
            current: None,
            rolled: Vec::new(),
            failed: false,
        })
    }

    /// Put `item` into the currently open chunk, creating it if necessary.
    /// The chunk is rolled if it reaches `chunk_max` records.
    pub fn add(&mut self, item: &StreamItem) -> Result<(), Error> {
        if self.failed {
            return Err(Error::Poisoned(Some(self.tmp_path.clone())));
        }
        if self.current.is_none() {
            if self.tmp_path.exists() {
                std::fs::remove_file(&self.tmp_path)?;
            }
            self.current = Some(FileChunkWriter::create(&self.tmp_path)?);
        }

        let count = match self.current.as_mut() {
            Some(writer) => {
                writer.add(item)?;
                writer.count()
            }
            None => return Err(Error::Custom("no open chunk".to_string())),
        };
        debug!("added {}-th item to chunk", count);
        if count >= self.chunk_max {
            self.roll()?;
        }
        Ok(())
    }

    /// Close the open chunk (if any) and move it to its final name.
    pub fn roll(&mut self) -> Result<Option<PathBuf>, Error> {
        let mut writer = match self.current.take() {
            Some(writer) => writer,
            None => return Ok(None),
        };
        let dst = writer.finish().and_then(|summary| {
            let dst = self.chunk_dir.join(format!(
                "{}-{}.{}",
                summary.count, summary.hexdigest, CHUNK_SUFFIX
            ));
            std::fs::rename(&self.tmp_path, &dst)?;
            Ok(dst)
        });
        let dst = match dst {
            Ok(dst) => dst,
            Err(e) => {
                warn!(
                    "could not roll {:?}, keeping it and refusing new records: {}",
                    self.tmp_path, e
                );
                self.failed = true;
                return Err(e);
            }
        };
        info!("rolled chunk to {:?}", dst);
        self.rolled.push(dst.clone());
        Ok(Some(dst))
    }

    /// Paths of the chunks rolled so far.
    pub fn rolled(&self) -> &[PathBuf] {
        &self.rolled
    }
}

impl WriterTrait for ChunkRoller {
    type Item = StreamItem;

    fn write_single(&mut self, val: &StreamItem) -> Result<(), Error> {
        self.add(val)
    }

    fn close(&mut self) -> Result<(), Error> {
        self.roll().map(|_| ())
    }
}

impl Drop for ChunkRoller {
    fn drop(&mut self) {
        if self.current.is_some() {
            if let Err(e) = self.roll() {
                error!("could not roll last chunk {:?}: {}", self.tmp_path, e);
            }
        }
    }
}
