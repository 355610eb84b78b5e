//! Transparent value compression.
//!
//! Values above the configured threshold are zlib-compressed before they are
//! written. The codec is recorded next to the value so reads never guess.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::Error;

/// How a stored value is encoded on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Raw = 0,
    Zlib = 1,
}

impl Codec {
    pub fn from_i64(value: i64) -> Result<Self, Error> {
        match value {
            0 => Ok(Codec::Raw),
            1 => Ok(Codec::Zlib),
            other => Err(Error::Codec(format!("unknown codec marker {other}"))),
        }
    }
}

/// Encode `value` for storage.
///
/// Compression is applied only when the value is larger than `threshold`
/// and the compressed form is actually smaller.
pub fn encode(value: &[u8], threshold: usize) -> Result<(Codec, Vec<u8>), Error> {
    if value.len() <= threshold {
        return Ok((Codec::Raw, value.to_vec()));
    }

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(value.len() / 2), Compression::default());
    encoder.write_all(value).map_err(|e| Error::Codec(e.to_string()))?;
    let compressed = encoder.finish().map_err(|e| Error::Codec(e.to_string()))?;

    if compressed.len() < value.len() {
        Ok((Codec::Zlib, compressed))
    } else {
        Ok((Codec::Raw, value.to_vec()))
    }
}

/// Decode a stored value back to its original bytes.
pub fn decode(codec: Codec, stored: Vec<u8>) -> Result<Vec<u8>, Error> {
    match codec {
        Codec::Raw => Ok(stored),
        Codec::Zlib => {
            let mut out = Vec::with_capacity(stored.len() * 2);
            ZlibDecoder::new(stored.as_slice())
                .read_to_end(&mut out)
                .map_err(|e| Error::Codec(e.to_string()))?;
            Ok(out)
        }
    }
}
