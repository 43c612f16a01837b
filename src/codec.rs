//! External collaborators the core consumes but does not own: the counter
//! wire format and the write-set framing. Section 1 of the specification
//! calls these out as out-of-scope ("treated as external collaborators,
//! specified only through the interfaces the core consumes/exposes"); this
//! module supplies the concrete, minimal implementation the rest of the
//! crate needs in order to be a runnable store.

use std::io::{self, Read, Write};

use crate::error::{Error, Result};
use crate::util::{read_u32_be, write_u32_be};

/// Encode a counter value as its big-endian 8-byte representation.
pub fn encode_counter(v: i64) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

/// Decode a counter value. Any buffer that isn't exactly 8 bytes is treated
/// as a codec failure, so callers can silently drop the adjust per
/// the merge table in spec section 4.7.
pub fn decode_counter(buf: &[u8]) -> Option<i64> {
    let arr: [u8; 8] = buf.try_into().ok()?;
    Some(i64::from_be_bytes(arr))
}

/// One operation inside a write-set. Operations within a batch apply in
/// order, so a `Put` following a `RemoveRange` that covers it wins, etc.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Put(Vec<u8>, Vec<u8>),
    /// Half-open range `[min, max)`. `None` on either side means unbounded.
    RemoveRange(Option<Vec<u8>>, Option<Vec<u8>>),
    Adjust(Vec<u8>, i64),
}

/// A batch of operations applied atomically by `AtomicStore::mutate`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteSet(pub Vec<WriteOp>);

impl WriteSet {
    pub fn new() -> WriteSet {
        WriteSet(Vec::new())
    }

    pub fn put(mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> WriteSet {
        self.0.push(WriteOp::Put(key.into(), value.into()));
        self
    }

    pub fn remove_range(
        mut self,
        min: Option<Vec<u8>>,
        max: Option<Vec<u8>>,
    ) -> WriteSet {
        self.0.push(WriteOp::RemoveRange(min, max));
        self
    }

    pub fn adjust(mut self, key: impl Into<Vec<u8>>, delta: i64) -> WriteSet {
        self.0.push(WriteOp::Adjust(key.into(), delta));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

const TAG_PUT: u8 = 1;
const TAG_REMOVE: u8 = 2;
const TAG_ADJUST: u8 = 3;
const BOUND_NONE: u8 = 0;
const BOUND_SOME: u8 = 1;

fn write_bytes(w: &mut impl Write, b: &[u8]) -> Result<()> {
    write_u32_be(w, b.len() as u32)?;
    w.write_all(b)?;
    Ok(())
}

fn write_bound(w: &mut impl Write, b: &Option<Vec<u8>>) -> Result<()> {
    match b {
        None => w.write_all(&[BOUND_NONE])?,
        Some(v) => {
            w.write_all(&[BOUND_SOME])?;
            write_bytes(w, v)?;
        }
    }
    Ok(())
}

fn read_exact_vec(r: &mut impl Read, n: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_bytes(r: &mut impl Read) -> Result<Vec<u8>> {
    let mut lb = [0u8; 4];
    r.read_exact(&mut lb)?;
    let len = u32::from_be_bytes(lb) as usize;
    Ok(read_exact_vec(r, len)?)
}

fn read_bound(r: &mut impl Read) -> Result<Option<Vec<u8>>> {
    let mut tag = [0u8; 1];
    r.read_exact(&mut tag)?;
    match tag[0] {
        BOUND_NONE => Ok(None),
        BOUND_SOME => Ok(Some(read_bytes(r)?)),
        other => Err(Error::Corrupt(format!("bad bound tag {}", other))),
    }
}

/// Serialize a write-set as a length-prefixed, self-delimiting record:
/// `u32 total_len | body`. `total_len` lets `MutationLog::replay` detect a
/// truncated tail write without parsing the body.
pub fn encode_write_set(ws: &WriteSet) -> Vec<u8> {
    let mut body = Vec::new();
    write_u32_be(&mut body, ws.0.len() as u32).unwrap();
    for op in &ws.0 {
        match op {
            WriteOp::Put(k, v) => {
                body.push(TAG_PUT);
                write_bytes(&mut body, k).unwrap();
                write_bytes(&mut body, v).unwrap();
            }
            WriteOp::RemoveRange(min, max) => {
                body.push(TAG_REMOVE);
                write_bound(&mut body, min).unwrap();
                write_bound(&mut body, max).unwrap();
            }
            WriteOp::Adjust(k, delta) => {
                body.push(TAG_ADJUST);
                write_bytes(&mut body, k).unwrap();
                body.extend_from_slice(&delta.to_be_bytes());
            }
        }
    }
    let mut framed = Vec::with_capacity(body.len() + 4);
    write_u32_be(&mut framed, body.len() as u32).unwrap();
    framed.extend_from_slice(&body);
    framed
}

/// Decode one framed write-set from the front of `buf`, returning the
/// decoded set and the number of bytes consumed. Returns `Ok(None)` when
/// `buf` holds fewer bytes than a complete frame (a partial tail write),
/// and `Err` when the frame is present but its body is malformed.
pub fn decode_write_set(buf: &[u8]) -> Result<Option<(WriteSet, usize)>> {
    if buf.len() < 4 {
        return Ok(None);
    }
    let body_len = read_u32_be(buf, 0) as usize;
    let total = 4 + body_len;
    if buf.len() < total {
        return Ok(None);
    }
    let mut cursor = io::Cursor::new(&buf[4..total]);
    let n_ops = {
        let mut lb = [0u8; 4];
        cursor
            .read_exact(&mut lb)
            .map_err(|_| Error::Corrupt("truncated write-set op count".into()))?;
        u32::from_be_bytes(lb)
    };
    let mut ops = Vec::with_capacity(n_ops as usize);
    for _ in 0..n_ops {
        let mut tag = [0u8; 1];
        cursor
            .read_exact(&mut tag)
            .map_err(|_| Error::Corrupt("truncated write-set op tag".into()))?;
        let op = match tag[0] {
            TAG_PUT => {
                let k = read_bytes(&mut cursor)?;
                let v = read_bytes(&mut cursor)?;
                WriteOp::Put(k, v)
            }
            TAG_REMOVE => {
                let min = read_bound(&mut cursor)?;
                let max = read_bound(&mut cursor)?;
                WriteOp::RemoveRange(min, max)
            }
            TAG_ADJUST => {
                let k = read_bytes(&mut cursor)?;
                let mut db = [0u8; 8];
                cursor
                    .read_exact(&mut db)
                    .map_err(|_| Error::Corrupt("truncated adjust delta".into()))?;
                WriteOp::Adjust(k, i64::from_be_bytes(db))
            }
            other => return Err(Error::Corrupt(format!("bad write-op tag {}", other))),
        };
        ops.push(op);
    }
    Ok(Some((WriteSet(ops), total)))
}
