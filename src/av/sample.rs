use bytes::Bytes;
use std::fmt;

/// A timed unit of media data exchanged between parser, fragmenter and muxer.
///
/// Timing is set with the `with_*` builders while the producer owns the
/// sample; afterwards it is read-only. Payloads are [`Bytes`], so clones share
/// the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    dts: i64,
    pts: i64,
    duration: i64,
    is_key_frame: bool,
    is_encrypted: bool,
    data: Option<Bytes>,
    side_data: Bytes,
}

impl Sample {
    pub fn new(data: impl Into<Bytes>, is_key_frame: bool) -> Self {
        Self {
            dts: 0,
            pts: 0,
            duration: 0,
            is_key_frame,
            is_encrypted: false,
            data: Some(data.into()),
            side_data: Bytes::new(),
        }
    }

    /// A sample with an empty payload. Not the end-of-stream marker.
    pub fn empty() -> Self {
        Self::new(Bytes::new(), false)
    }

    /// A payload-less sample carrying only side data.
    pub fn from_metadata(side_data: impl Into<Bytes>) -> Self {
        Self {
            data: None,
            side_data: side_data.into(),
            ..Self::empty()
        }
    }

    /// The end-of-stream sentinel: no payload and no side data.
    pub fn end_of_stream() -> Self {
        Self {
            data: None,
            ..Self::empty()
        }
    }

    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = pts;
        self
    }

    pub fn with_dts(mut self, dts: i64) -> Self {
        self.dts = dts;
        self
    }

    /// Durations beyond `i64::MAX` saturate.
    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = i64::try_from(duration).unwrap_or(i64::MAX);
        self
    }

    pub fn with_side_data(mut self, side_data: impl Into<Bytes>) -> Self {
        self.side_data = side_data.into();
        self
    }

    pub fn with_encrypted(mut self, is_encrypted: bool) -> Self {
        self.is_encrypted = is_encrypted;
        self
    }

    pub fn dts(&self) -> i64 {
        self.dts
    }

    pub fn pts(&self) -> i64 {
        self.pts
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// `pts + duration`, saturating.
    pub fn end(&self) -> i64 {
        self.pts.saturating_add(self.duration)
    }

    pub fn is_key_frame(&self) -> bool {
        self.is_key_frame
    }

    pub fn is_encrypted(&self) -> bool {
        self.is_encrypted
    }

    /// Payload bytes; empty for metadata samples and end of stream.
    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Shared handle to the payload, if there is one.
    pub fn data_bytes(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    pub fn data_size(&self) -> usize {
        self.data().len()
    }

    pub fn side_data(&self) -> &[u8] {
        &self.side_data
    }

    pub fn is_metadata(&self) -> bool {
        self.data.is_none() && !self.side_data.is_empty()
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.data.is_none() && self.side_data.is_empty()
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_of_stream() {
            return write!(f, "end of stream");
        }
        write!(
            f,
            "dts: {} pts: {} duration: {} is_key_frame: {} size: {} side_data_size: {}",
            self.dts,
            self.pts,
            self.duration,
            self.is_key_frame,
            self.data_size(),
            self.side_data.len()
        )
    }
}
