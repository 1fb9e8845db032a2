use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecType {
    WebVtt,
}

impl CodecType {
    /// Codec string used in sample entries and manifests.
    pub fn codec_string(&self) -> &'static str {
        match self {
            CodecType::WebVtt => "wvtt",
        }
    }
}

/// Description of a text stream, announced once the source header is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub track_id: u32,
    pub time_scale: u32,
    pub codec_type: CodecType,
    pub language: String,
    /// Signature line followed by any metadata header lines.
    pub header: Vec<String>,
}

impl StreamInfo {
    pub fn codec_string(&self) -> &'static str {
        self.codec_type.codec_string()
    }
}

/// Called once when the stream header is complete.
pub type InitCallback = Box<dyn FnMut(StreamInfo) + Send>;

/// Called for every parsed sample. Returning `false` aborts parsing.
pub type NewSampleCallback = Box<dyn FnMut(Sample) -> bool + Send>;

/// Push-style parser for one source format.
pub trait MediaParser: Send {
    /// Registers the callbacks. Must be called before `parse` or `flush`.
    fn init(&mut self, init_cb: InitCallback, new_sample_cb: NewSampleCallback);

    /// Feeds a chunk of the source. Chunks may split lines anywhere.
    fn parse(&mut self, buf: &[u8]) -> crate::Result<()>;

    /// Finishes the stream, emitting anything still buffered followed by the
    /// end-of-stream sample.
    fn flush(&mut self) -> crate::Result<()>;
}

#[async_trait]
pub trait Demuxer: Send {
    /// Next sample, or `None` once the stream is exhausted.
    async fn read_sample(&mut self) -> crate::Result<Option<Sample>>;
    async fn streams(&mut self) -> crate::Result<Vec<StreamInfo>>;
}

mod sample;
pub use sample::*;
