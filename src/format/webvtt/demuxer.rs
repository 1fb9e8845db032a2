use crate::av::{Demuxer, MediaParser, Sample, StreamInfo};
use crate::codec::webvtt::WebVttParser;
use crate::config::Config;
use crate::format::mp4::WebVttFragmenter;
use crate::Result;
use async_trait::async_trait;
use bytes::BytesMut;
use futures::stream::{self, Stream};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Parser output waiting to be moved into the fragmenter.
#[derive(Debug, Default)]
struct Parsed {
    stream: Option<StreamInfo>,
    samples: VecDeque<Sample>,
}

/// Reads WebVTT text and yields fragmented cue samples.
///
/// Samples come out with non-decreasing, non-overlapping time ranges, each
/// holding the `vttc` boxes of the cues visible over its range (or a `vtte`
/// box for gaps). Cues in the source must be in start time order.
pub struct WebVttDemuxer<R: AsyncRead + Unpin + Send> {
    reader: R,
    read_chunk_size: usize,
    buf: BytesMut,
    parser: WebVttParser,
    parsed: Arc<Mutex<Parsed>>,
    fragmenter: WebVttFragmenter,
    finished: bool,
}

impl<R: AsyncRead + Unpin + Send> WebVttDemuxer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, Config::default())
    }

    pub fn with_config(reader: R, config: Config) -> Self {
        let parsed = Arc::new(Mutex::new(Parsed::default()));
        let read_chunk_size = config.read_chunk_size.max(1);
        let mut parser = WebVttParser::with_config(config);

        let on_init = parsed.clone();
        let on_sample = parsed.clone();
        parser.init(
            Box::new(move |info| on_init.lock().stream = Some(info)),
            Box::new(move |sample| {
                on_sample.lock().samples.push_back(sample);
                true
            }),
        );

        Self {
            reader,
            read_chunk_size,
            buf: BytesMut::with_capacity(read_chunk_size),
            parser,
            parsed,
            fragmenter: WebVttFragmenter::new(),
            finished: false,
        }
    }

    /// Reads one chunk and runs it through the parser and fragmenter.
    async fn fill(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.reserve(self.read_chunk_size);
        let n = match self.reader.read_buf(&mut self.buf).await {
            Ok(n) => n,
            Err(e) => {
                log::warn!("WebVTT source read failed: {}", e);
                self.abort();
                return Err(e.into());
            }
        };

        let result = if n == 0 {
            log::debug!("WebVTT source exhausted, flushing");
            self.finished = true;
            self.parser.flush()
        } else {
            self.parser.parse(&self.buf)
        };

        // Cues parsed before a failure still go downstream
        let drained = self.drain_parsed();
        if result.is_err() || drained.is_err() {
            self.abort();
        }
        result?;
        drained
    }

    /// Ends the stream after a failure, resolving the cues already accepted.
    fn abort(&mut self) {
        self.finished = true;
        self.fragmenter.flush();
    }

    fn drain_parsed(&mut self) -> Result<()> {
        let samples: Vec<Sample> = self.parsed.lock().samples.drain(..).collect();
        for sample in samples {
            self.fragmenter.push(sample)?;
        }
        Ok(())
    }

    /// Adapts the demuxer into a stream of samples. An error is yielded once,
    /// followed by the samples resolved before it.
    pub fn into_stream(self) -> impl Stream<Item = Result<Sample>> {
        stream::unfold(self, |mut demuxer| async move {
            match demuxer.read_sample().await {
                Ok(Some(sample)) => Some((Ok(sample), demuxer)),
                Ok(None) => None,
                Err(e) => Some((Err(e), demuxer)),
            }
        })
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> Demuxer for WebVttDemuxer<R> {
    async fn read_sample(&mut self) -> Result<Option<Sample>> {
        loop {
            if let Some(sample) = self.fragmenter.pop() {
                return Ok(Some(sample));
            }
            if self.finished {
                return Ok(None);
            }
            self.fill().await?;
        }
    }

    async fn streams(&mut self) -> Result<Vec<StreamInfo>> {
        loop {
            let announced = self.parsed.lock().stream.clone();
            if let Some(info) = announced {
                return Ok(vec![info]);
            }
            if self.finished {
                return Ok(Vec::new());
            }
            self.fill().await?;
        }
    }
}

/// Parses a complete WebVTT document and returns its fragmented samples.
pub fn fragment_webvtt(data: &[u8]) -> Result<Vec<Sample>> {
    let parsed = Arc::new(Mutex::new(Vec::new()));
    let sink = parsed.clone();

    let mut parser = WebVttParser::new();
    parser.init(
        Box::new(|_| {}),
        Box::new(move |sample| {
            sink.lock().push(sample);
            true
        }),
    );
    parser.parse(data)?;
    parser.flush()?;

    let mut fragmenter = WebVttFragmenter::new();
    for sample in parsed.lock().drain(..) {
        fragmenter.push(sample)?;
    }

    let mut samples = Vec::with_capacity(fragmenter.ready_samples_size());
    while let Some(sample) = fragmenter.pop() {
        samples.push(sample);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::mp4::{decode_cue_boxes, CueBox, VttCueBox};
    use crate::VttError;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &[u8] = b"WEBVTT\n\n\
        00:00.000 --> 00:02.000\nhi\n\n\
        NOTE between cues\n\n\
        00:01.000 --> 00:03.000\nhello\n\n\
        00:05.000 --> 00:06.000\nbye\n";

    fn ranges(samples: &[Sample]) -> Vec<(i64, i64)> {
        samples.iter().map(|s| (s.pts(), s.end())).collect()
    }

    #[test]
    fn test_fragment_webvtt() {
        let samples = fragment_webvtt(DOCUMENT).unwrap();
        assert_eq!(
            ranges(&samples),
            vec![(0, 1000), (1000, 2000), (2000, 3000), (3000, 5000), (5000, 6000)]
        );
        assert_eq!(decode_cue_boxes(samples[3].data()).unwrap(), vec![CueBox::Empty]);
        assert_eq!(
            decode_cue_boxes(samples[1].data()).unwrap(),
            vec![
                CueBox::Cue(VttCueBox::new("hi")),
                CueBox::Cue(VttCueBox::new("hello")),
            ]
        );
    }

    #[test]
    fn test_fragment_webvtt_out_of_order() {
        let data = b"WEBVTT\n\n00:05.000 --> 00:06.000\nb\n\n00:01.000 --> 00:02.000\na\n";
        assert!(matches!(
            fragment_webvtt(data),
            Err(VttError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_demuxer_small_chunks() {
        let config = Config {
            read_chunk_size: 7,
            ..Config::default()
        };
        let mut demuxer = WebVttDemuxer::with_config(DOCUMENT, config);

        let streams = demuxer.streams().await.unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].header, vec!["WEBVTT"]);

        let mut samples = Vec::new();
        while let Some(sample) = demuxer.read_sample().await.unwrap() {
            samples.push(sample);
        }
        assert_eq!(samples, fragment_webvtt(DOCUMENT).unwrap());
        assert!(demuxer.read_sample().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_demuxer_stream() {
        let samples: Vec<Sample> = WebVttDemuxer::new(DOCUMENT)
            .into_stream()
            .map(|s| s.unwrap())
            .collect()
            .await;
        assert_eq!(samples.len(), 5);
    }

    #[tokio::test]
    async fn test_demuxer_delivers_cues_before_error() {
        let data: &[u8] = b"WEBVTT\n\n00:00.000 --> 00:01.000\nok\n\n00:02.000 --> bad\n";
        let mut demuxer = WebVttDemuxer::new(data);

        assert!(matches!(
            demuxer.read_sample().await,
            Err(VttError::Parser(_))
        ));

        let sample = demuxer.read_sample().await.unwrap().unwrap();
        assert_eq!((sample.pts(), sample.end()), (0, 1000));
        assert_eq!(
            decode_cue_boxes(sample.data()).unwrap(),
            vec![CueBox::Cue(VttCueBox::new("ok"))]
        );
        assert!(demuxer.read_sample().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_demuxer_stream_after_error() {
        let data: &[u8] = b"WEBVTT\n\n00:00.000 --> 00:01.000\nok\n\n00:02.000 --> bad\n";
        let items: Vec<Result<Sample>> = WebVttDemuxer::new(data).into_stream().collect().await;

        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Err(VttError::Parser(_))));
        let sample = items[1].as_ref().unwrap();
        assert_eq!((sample.pts(), sample.end()), (0, 1000));
    }

    #[tokio::test]
    async fn test_demuxer_without_header() {
        let mut demuxer = WebVttDemuxer::new(&b"not a caption file\n"[..]);
        assert!(demuxer.streams().await.is_err());
        assert!(demuxer.streams().await.unwrap().is_empty());
    }
}
