/*! Single-sink chunk writer.
!*/
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::error::Error;
use crate::io::codec;
use crate::io::digest::DigestWriter;
use crate::record::StreamItem;

use super::WriterTrait;

/// What was written by a [ChunkWriter], returned on close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    pub count: u64,
    pub bytes: u64,
    /// hex SHA-256 of the written bytes.
    pub hexdigest: String,
}

#[derive(Debug)]
pub struct ChunkWriter<W>
where
    W: Write,
{
    /// `None` once closed.
    sink: Option<DigestWriter<W>>,
    path: Option<PathBuf>,
    count: u64,
    poisoned: bool,
}

pub type FileChunkWriter = ChunkWriter<BufWriter<File>>;

impl FileChunkWriter {
    /// Create a new chunk file at `path`, creating parent directories if needed.
    ///
    /// Fails if `path` already exists.
    pub fn create(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            error!("{:?} already exists!", path);
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{path:?}"),
            )
            .into());
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let fh = OpenOptions::new().write(true).create_new(true).open(path)?;
        debug!("created chunk {:?}", path);
        Ok(Self::with_path(BufWriter::new(fh), path))
    }

    /// Open an existing chunk file and append records at its end.
    ///
    /// The returned digest and byte count only cover the appended part.
    pub fn append(path: &Path) -> Result<Self, Error> {
        let fh = OpenOptions::new().append(true).open(path)?;
        debug!("appending to chunk {:?}", path);
        Ok(Self::with_path(BufWriter::new(fh), path))
    }
}

impl<W> ChunkWriter<W>
where
    W: Write,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink: Some(DigestWriter::new(sink)),
            path: None,
            count: 0,
            poisoned: false,
        }
    }

    fn with_path(sink: W, path: &Path) -> Self {
        let mut w = Self::new(sink);
        w.path = Some(path.to_path_buf());
        w
    }

    fn sink(&mut self) -> Result<&mut DigestWriter<W>, Error> {
        if self.poisoned {
            return Err(Error::Poisoned(self.path.clone()));
        }
        self.sink
            .as_mut()
            .ok_or_else(|| Error::Custom("cannot add to a closed chunk".to_string()))
    }

    /// Poison the writer if `res` is an error.
    fn check<T>(&mut self, res: std::io::Result<T>) -> Result<T, Error> {
        res.map_err(|e| {
            error!(
                "write to {:?} failed after {} records: {}",
                self.path, self.count, e
            );
            self.poisoned = true;
            Error::Io(e)
        })
    }

    /// Encode `item` and append its frame.
    pub fn add(&mut self, item: &StreamItem) -> Result<(), Error> {
        let frame = codec::encode(item)?;
        let res = self.sink()?.write_all(&frame);
        self.check(res)?;
        self.count += 1;
        Ok(())
    }

    pub fn extend<'a, I>(&mut self, items: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a StreamItem>,
    {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        let res = self.sink()?.flush();
        self.check(res)
    }

    /// Number of records added.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }

    /// Flush and release the sink.
    ///
    /// On a poisoned writer, the sink is released and the first failure is reported again.
    pub fn finish(&mut self) -> Result<ChunkSummary, Error> {
        if self.poisoned {
            self.sink = None;
            return Err(Error::Poisoned(self.path.clone()));
        }
        let mut sink = match self.sink.take() {
            Some(sink) => sink,
            None => return Err(Error::Custom("chunk already closed".to_string())),
        };
        if let Err(e) = sink.flush() {
            self.poisoned = true;
            error!("flushing {:?} failed: {}", self.path, e);
            return Err(Error::Io(e));
        }

        Ok(ChunkSummary {
            count: self.count,
            bytes: sink.byte_count(),
            hexdigest: sink.hexdigest(),
        })
    }

    /// Flush and return the sink.
    pub fn into_inner(mut self) -> Result<W, Error> {
        self.flush()?;
        self.sink
            .take()
            .map(DigestWriter::into_inner)
            .ok_or_else(|| Error::Custom("chunk already closed".to_string()))
    }
}

impl<W> WriterTrait for ChunkWriter<W>
where
    W: Write,
{
    type Item = StreamItem;

    fn write_single(&mut self, val: &StreamItem) -> Result<(), Error> {
        self.add(val)
    }

    fn close(&mut self) -> Result<(), Error> {
        if self.is_closed() {
            return Ok(());
        }
        self.finish().map(|_| ())
    }
}

impl<W> Drop for ChunkWriter<W>
where
    W: Write,
{
    fn drop(&mut self) {
        if self.poisoned {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.flush() {
                error!("flushing {:?} on drop failed: {}", self.path, e);
            }
        }
    }
}
