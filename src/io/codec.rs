/*! Record framing

A chunk file is a plain concatenation of frames, one per record:

```text
[len: u32 big endian][payload: len bytes]
```

The payload is the `bincode` encoding of a [StreamItem]. The length header makes every frame
self-delimiting, so the end of a record is known without any external index, and a source that
is empty at a frame boundary can be told apart from one that stops in the middle of a frame.
!*/
use std::io::{ErrorKind, Read};

use bincode::config::{self, Config};

use crate::error::{Corruption, Error};
use crate::record::StreamItem;

pub const HEADER_BYTES: usize = 4;

/// Upper bound on a single payload. Anything bigger is treated as a corrupt header.
pub const MAX_FRAME_BYTES: u64 = 256 * 1024 * 1024;

// Length prefixes inside the payload are bounded too, so a corrupt one fails decoding
// instead of sizing an allocation.
fn codec_config() -> impl Config {
    config::standard().with_limit::<{ MAX_FRAME_BYTES as usize }>()
}

/// Outcome of a successful [decode] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A complete record, and the number of bytes its frame took (header included).
    Record { item: StreamItem, frame_len: u64 },
    /// The source was exhausted exactly at a frame boundary.
    EndOfStream,
}

/// Encode `item` as one frame.
pub fn encode(item: &StreamItem) -> Result<Vec<u8>, Error> {
    let payload = bincode::serde::encode_to_vec(item, codec_config())?;
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|len| u64::from(*len) <= MAX_FRAME_BYTES)
        .ok_or_else(|| Error::Custom(format!("record too large: {} bytes", payload.len())))?;

    let mut frame = Vec::with_capacity(HEADER_BYTES + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decode the next frame of `source`.
///
/// Corruption errors are reported at record 0, byte 0: see [decode_at] to report a position.
pub fn decode<R: Read>(source: &mut R) -> Result<Decoded, Error> {
    decode_at(source, 0, 0)
}

/// Decode the next frame of `source`, which starts at `byte_offset` and is the
/// `record_index`-th record of its stream.
///
/// Reads exactly one frame and nothing past it.
pub fn decode_at<R: Read>(
    source: &mut R,
    record_index: u64,
    byte_offset: u64,
) -> Result<Decoded, Error> {
    let corrupt = |kind| Error::corruption(record_index, byte_offset, kind);

    let mut header = [0u8; HEADER_BYTES];
    match read_full(source, &mut header)? {
        0 => return Ok(Decoded::EndOfStream),
        HEADER_BYTES => (),
        got => return Err(corrupt(Corruption::ShortHeader { got })),
    }

    let len = u64::from(u32::from_be_bytes(header));
    if len > MAX_FRAME_BYTES {
        return Err(corrupt(Corruption::Oversized(len)));
    }

    // `take` keeps a bogus header from making us allocate the whole announced length upfront.
    let mut payload = Vec::new();
    source.by_ref().take(len).read_to_end(&mut payload)?;
    if (payload.len() as u64) < len {
        return Err(corrupt(Corruption::ShortPayload {
            expected: len as usize,
            got: payload.len(),
        }));
    }

    let (item, used): (StreamItem, usize) =
        bincode::serde::decode_from_slice(&payload, codec_config())
            .map_err(|e| corrupt(Corruption::Payload(e.to_string())))?;
    if used != payload.len() {
        return Err(corrupt(Corruption::TrailingBytes(payload.len() - used)));
    }

    Ok(Decoded::Record {
        item,
        frame_len: HEADER_BYTES as u64 + len,
    })
}

/// Serialize a single record.
pub fn serialize(item: &StreamItem) -> Result<Vec<u8>, Error> {
    encode(item)
}

/// Deserialize a buffer holding exactly one frame.
pub fn deserialize(blob: &[u8]) -> Result<StreamItem, Error> {
    let mut cursor = blob;
    let item = match decode(&mut cursor)? {
        Decoded::Record { item, .. } => item,
        Decoded::EndOfStream => {
            return Err(Error::corruption(0, 0, Corruption::FrameCount(0)));
        }
    };
    if !cursor.is_empty() {
        let mut count = 1;
        while let Decoded::Record { .. } = decode(&mut cursor)? {
            count += 1;
        }
        return Err(Error::corruption(0, 0, Corruption::FrameCount(count)));
    }
    Ok(item)
}

/// Fill `buf` as far as the source allows. Returns the number of bytes read,
/// which is less than `buf.len()` only when the source is exhausted.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
