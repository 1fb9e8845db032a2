use crate::error::{Result, VttError};
use bytes::{BufMut, BytesMut};
use std::fmt;

/// Size of a box header: 32-bit big-endian size followed by a four-character tag.
pub const BOX_HEADER_SIZE: usize = 8;

/// A four-character box tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(tag: &[u8; 4]) -> Self {
        FourCC(*tag)
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Writes a box header for a box whose content is `content_len` bytes long.
pub fn write_box_header(buf: &mut BytesMut, tag: FourCC, content_len: usize) -> Result<()> {
    let size = content_len
        .checked_add(BOX_HEADER_SIZE)
        .and_then(|size| u32::try_from(size).ok())
        .ok_or_else(|| {
            VttError::InvalidData(format!("{} box content too large: {} bytes", tag, content_len))
        })?;
    buf.put_u32(size);
    buf.put_slice(&tag.0);
    Ok(())
}

/// Appends a complete box holding `content` to `buf`.
pub fn append_box(buf: &mut BytesMut, tag: FourCC, content: &[u8]) -> Result<()> {
    buf.reserve(BOX_HEADER_SIZE + content.len());
    write_box_header(buf, tag, content.len())?;
    buf.put_slice(content);
    Ok(())
}

/// A box located inside a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBox<'a> {
    pub tag: FourCC,
    /// Box content, header excluded.
    pub content: &'a [u8],
}

impl RawBox<'_> {
    /// Total encoded size, header included.
    pub fn size(&self) -> usize {
        BOX_HEADER_SIZE + self.content.len()
    }
}

/// Iterates over consecutive boxes in a buffer.
///
/// Unlike a lenient walker, a truncated header or a size field that does not
/// fit the buffer yields an error, after which iteration stops.
pub struct BoxIter<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> BoxIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    fn fail(&mut self, msg: String) -> Option<Result<RawBox<'a>>> {
        self.failed = true;
        Some(Err(VttError::InvalidData(msg)))
    }
}

impl<'a> Iterator for BoxIter<'a> {
    type Item = Result<RawBox<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }

        let rest = &self.data[self.pos..];
        if rest.len() < BOX_HEADER_SIZE {
            return self.fail(format!("truncated box header: {} bytes left", rest.len()));
        }

        let size = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let tag = FourCC([rest[4], rest[5], rest[6], rest[7]]);
        if size < BOX_HEADER_SIZE {
            return self.fail(format!("{} box size {} smaller than its header", tag, size));
        }
        if size > rest.len() {
            return self.fail(format!(
                "{} box size {} exceeds remaining {} bytes",
                tag,
                size,
                rest.len()
            ));
        }

        self.pos += size;
        Some(Ok(RawBox {
            tag,
            content: &rest[BOX_HEADER_SIZE..size],
        }))
    }
}
