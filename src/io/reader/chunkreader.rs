/*! Sequential chunk reader.

Reading is forward-only: the reader never seeks, so reading a chunk again means opening it again.
!*/
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::io::codec::{self, Decoded};
use crate::io::digest::DigestReader;
use crate::record::StreamItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    /// source exhausted at a frame boundary.
    Done,
    /// a frame failed to decode, nothing more will be read.
    Failed,
}

/// Pulls [StreamItem]s out of a byte source.
///
/// Iterating yields `Ok` records until the end of the stream, at which point it returns `None`.
/// A corrupt frame is yielded once as an `Err`, after which the iterator is fused.
#[derive(Debug)]
pub struct ChunkReader<R>
where
    R: Read,
{
    source: DigestReader<R>,
    records: u64,
    state: State,
}

pub type FileChunkReader = ChunkReader<BufReader<File>>;

impl FileChunkReader {
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        debug!("opening chunk {:?}", src);
        let fh = File::open(src)?;
        Ok(Self::new(BufReader::new(fh)))
    }
}

impl<R> ChunkReader<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        Self {
            source: DigestReader::new(source),
            records: 0,
            state: State::Reading,
        }
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` once the source is exhausted at a frame boundary.
    /// Errors are fatal: subsequent calls return `Ok(None)`.
    pub fn read_next(&mut self) -> Result<Option<StreamItem>, Error> {
        if self.state != State::Reading {
            return Ok(None);
        }

        let offset = self.source.byte_count();
        match codec::decode_at(&mut self.source, self.records, offset) {
            Ok(Decoded::Record { item, .. }) => {
                self.records += 1;
                Ok(Some(item))
            }
            Ok(Decoded::EndOfStream) => {
                self.state = State::Done;
                Ok(None)
            }
            Err(e) => {
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    /// Number of records successfully read.
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Number of bytes consumed from the source.
    pub fn bytes_read(&self) -> u64 {
        self.source.byte_count()
    }

    /// Hex SHA-256 of the bytes consumed so far. Covers the whole chunk once [Self::is_done].
    pub fn hexdigest(&self) -> String {
        self.source.hexdigest()
    }

    /// Whether the end of the stream has been reached cleanly.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

impl<R> Iterator for ChunkReader<R>
where
    R: Read,
{
    type Item = Result<StreamItem, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::io::codec;

    fn gen_data(nb: usize) -> Vec<u8> {
        (0..nb)
            .map(|i| StreamItem::new(&format!("doc-{i}"), &format!("document number {i}")))
            .flat_map(|item| codec::encode(&item).unwrap())
            .collect()
    }

    #[test]
    fn test_all() {
        let mut reader = ChunkReader::new(Cursor::new(gen_data(10)));
        let ids: Vec<String> = reader
            .by_ref()
            .map(|item| item.unwrap().stream_id)
            .collect();

        let expected: Vec<String> = (0..10).map(|i| format!("doc-{i}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(reader.records_read(), 10);
        assert!(reader.is_done());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_empty() {
        let mut reader = ChunkReader::new(Cursor::new(Vec::new()));
        assert!(reader.next().is_none());
        assert!(reader.is_done());
        assert_eq!(reader.records_read(), 0);
    }

    #[test]
    fn test_truncated_last() {
        let mut data = gen_data(3);
        data.pop();

        let mut reader = ChunkReader::new(Cursor::new(data));
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_ok());

        match reader.next() {
            Some(Err(Error::Corruption {
                record_index,
                byte_offset,
                ..
            })) => {
                assert_eq!(record_index, 2);
                let two_frames: u64 = gen_data(2).len() as u64;
                assert_eq!(byte_offset, two_frames);
            }
            other => panic!("expected corruption, got {:?}", other),
        }

        // fused after the error
        assert!(reader.next().is_none());
        assert!(!reader.is_done());
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn test_digest_matches_bytes() {
        let data = gen_data(4);
        let mut reader = ChunkReader::new(Cursor::new(data.clone()));
        reader.by_ref().for_each(|r| {
            r.unwrap();
        });
        assert_eq!(reader.bytes_read(), data.len() as u64);

        let mut again = ChunkReader::new(Cursor::new(data));
        again.by_ref().for_each(drop);
        assert_eq!(reader.hexdigest(), again.hexdigest());
    }
}
