//! The binary index format.
//!
//! An index file is a plain sequence of records with no header:
//!
//! ```text
//! label_len: u16 BE | label: "Name|Country" | loop_len: u32 BE | loop: bincode
//! ```
//!
//! The loop payload is a bincode-encoded [`EncodedLoop`].
use crate::errors::{Error, Result};
use crate::index::IndexedLoop;
use crate::{Loop, Point};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::io::{self, Read, Write};
use std::iter::FusedIterator;

const LOOP_ENCODING_VERSION: u8 = 1;
const LABEL_SEPARATOR: char = '|';

#[derive(Debug, Serialize, Deserialize)]
struct EncodedLoop {
    version: u8,
    vertices: Vec<[f64; 3]>,
}

fn corrupt(msg: impl Into<String>) -> Error {
    Error::CorruptData(msg.into())
}

/// Encode one loop with its labels as a record.
pub fn encode_record(item: &IndexedLoop) -> Result<Vec<u8>> {
    let label = format!("{}{}{}", item.name, LABEL_SEPARATOR, item.country);
    let label_len = u16::try_from(label.len()).map_err(|_| Error::Encoding { len: label.len() })?;

    let encoded = EncodedLoop {
        version: LOOP_ENCODING_VERSION,
        vertices: item
            .boundary
            .vertices()
            .iter()
            .map(|p| [p.x, p.y, p.z])
            .collect(),
    };
    let payload = bincode::serialize(&encoded)
        .map_err(|e| corrupt(format!("cannot encode loop: {}", e)))?;
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| Error::Encoding { len: payload.len() })?;

    let mut record = Vec::with_capacity(2 + label.len() + 4 + payload.len());
    record.extend_from_slice(&label_len.to_be_bytes());
    record.extend_from_slice(label.as_bytes());
    record.extend_from_slice(&payload_len.to_be_bytes());
    record.extend_from_slice(&payload);
    Ok(record)
}

pub fn write_record<W: Write>(writer: &mut W, item: &IndexedLoop) -> Result<()> {
    writer.write_all(&encode_record(item)?)?;
    Ok(())
}

/// Reads records one at a time until the underlying reader is exhausted.
///
/// The first error ends the iteration.
pub struct RecordReader<R> {
    reader: R,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        RecordReader {
            reader,
            done: false,
        }
    }

    fn read_record(&mut self) -> Result<Option<IndexedLoop>> {
        let mut label_len = [0u8; 2];
        if !self.read_prefix(&mut label_len)? {
            return Ok(None);
        }
        let label = self.read_bytes(u16::from_be_bytes(label_len) as u64, "label")?;
        let label = String::from_utf8(label).map_err(|_| corrupt("record label is not UTF-8"))?;
        let (name, country) = label
            .rsplit_once(LABEL_SEPARATOR)
            .ok_or_else(|| corrupt(format!("record label {:?} has no separator", label)))?;

        let mut loop_len = [0u8; 4];
        self.read_exact(&mut loop_len, "loop length")?;
        let payload = self.read_bytes(u32::from_be_bytes(loop_len) as u64, "loop")?;
        let encoded: EncodedLoop = bincode::deserialize(&payload)
            .map_err(|e| corrupt(format!("cannot decode loop for {:?}: {}", name, e)))?;
        if encoded.version != LOOP_ENCODING_VERSION {
            return Err(corrupt(format!(
                "unknown loop encoding version {}",
                encoded.version
            )));
        }

        let vertices = encoded
            .vertices
            .into_iter()
            .map(|[x, y, z]| Point::new(x, y, z))
            .collect();
        let boundary = Loop::from_points(vertices)
            .map_err(|e| corrupt(format!("invalid loop for {:?}: {}", name, e)))?;
        Ok(Some(IndexedLoop::new(name, country, boundary)))
    }

    /// Fill `buf`, returning false on a clean end of input.
    fn read_prefix(&mut self, buf: &mut [u8]) -> Result<bool> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => Ok(false),
            n if n == buf.len() => Ok(true),
            _ => Err(corrupt("truncated record length")),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => corrupt(format!("truncated record {}", what)),
            _ => e.into(),
        })
    }

    fn read_bytes(&mut self, len: u64, what: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.reader.by_ref().take(len).read_to_end(&mut buf)?;
        if (buf.len() as u64) < len {
            return Err(corrupt(format!("truncated record {}", what)));
        }
        Ok(buf)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<IndexedLoop>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for RecordReader<R> {}
