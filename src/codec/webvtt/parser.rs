use super::sample::cue_to_sample;
use super::types::Cue;
use crate::av::{CodecType, InitCallback, MediaParser, NewSampleCallback, Sample, StreamInfo};
use crate::config::Config;
use crate::utils::parse_timestamp;
use crate::{Result, VttError};
use bytes::BytesMut;
use std::fmt;

const SIGNATURE: &str = "WEBVTT";
const COMMENT_MARKER: &str = "NOTE";
const TIMING_ARROW: &str = "-->";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// What the parser expects the next line to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingState {
    Header,
    Metadata,
    CueIdentifierOrTimingOrComment,
    CueTiming,
    CuePayload,
    Comment,
    ParseError,
}

/// Streaming WebVTT parser.
///
/// Input is fed in chunks of any size; lines are reassembled internally and
/// every completed cue or comment block is handed to the sample callback as
/// soon as its terminating blank line is seen. Cue order is not checked.
pub struct WebVttParser {
    config: Config,
    init_cb: Option<InitCallback>,
    new_sample_cb: Option<NewSampleCallback>,
    // Bytes not yet terminated by a newline.
    buffer: BytesMut,
    header: Vec<String>,
    state: ReadingState,
    current_cue: Cue,
    stream_announced: bool,
    flushed: bool,
}

impl WebVttParser {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            init_cb: None,
            new_sample_cb: None,
            buffer: BytesMut::new(),
            header: Vec::new(),
            state: ReadingState::Header,
            current_cue: Cue::default(),
            stream_announced: false,
            flushed: false,
        }
    }

    pub fn state(&self) -> ReadingState {
        self.state
    }

    /// Signature and metadata header lines read so far.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    fn check_usable(&self) -> Result<()> {
        if self.init_cb.is_none() || self.new_sample_cb.is_none() {
            return Err(VttError::Precondition(
                "parser used before init".into(),
            ));
        }
        if self.state == ReadingState::ParseError {
            return Err(VttError::Parser("parser is in error state".into()));
        }
        if self.flushed {
            return Err(VttError::Precondition("parser already flushed".into()));
        }
        Ok(())
    }

    fn next_line(&mut self) -> Option<String> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line = self.buffer.split_to(pos + 1);
        Some(decode_line(&line[..pos]))
    }

    /// Runs one line through the state machine, entering the error state on
    /// failure.
    fn process_line(&mut self, line: &str) -> Result<()> {
        self.handle_line(line).map_err(|e| {
            log::warn!("WebVTT parse error in state {:?}: {}", self.state, e);
            self.state = ReadingState::ParseError;
            e
        })
    }

    fn handle_line(&mut self, line: &str) -> Result<()> {
        match self.state {
            ReadingState::Header => {
                let line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);
                if line.is_empty() {
                    return Ok(());
                }
                if !is_signature(line) {
                    return Err(VttError::Parser(format!(
                        "expected WEBVTT signature, found {:?}",
                        line
                    )));
                }
                self.header.push(line.to_string());
                self.state = ReadingState::Metadata;
            }
            ReadingState::Metadata => {
                if line.is_empty() {
                    self.announce_stream();
                    self.state = ReadingState::CueIdentifierOrTimingOrComment;
                } else {
                    self.header.push(line.to_string());
                }
            }
            ReadingState::CueIdentifierOrTimingOrComment => {
                if line.is_empty() {
                    return Ok(());
                }
                if is_comment(line) {
                    self.current_cue.comment.push(line.to_string());
                    self.state = ReadingState::Comment;
                } else if line.contains(TIMING_ARROW) {
                    self.parse_timing(line)?;
                    self.state = ReadingState::CuePayload;
                } else {
                    self.current_cue.identifier = line.to_string();
                    self.state = ReadingState::CueTiming;
                }
            }
            ReadingState::CueTiming => {
                self.parse_timing(line)?;
                self.state = ReadingState::CuePayload;
            }
            ReadingState::CuePayload => {
                if line.is_empty() {
                    self.emit_current_cue()?;
                    self.state = ReadingState::CueIdentifierOrTimingOrComment;
                } else {
                    self.current_cue.payload.push(line.to_string());
                }
            }
            ReadingState::Comment => {
                if line.is_empty() {
                    self.emit_current_cue()?;
                    self.state = ReadingState::CueIdentifierOrTimingOrComment;
                } else {
                    self.current_cue.comment.push(line.to_string());
                }
            }
            ReadingState::ParseError => {
                return Err(VttError::Parser("parser is in error state".into()));
            }
        }
        Ok(())
    }

    fn parse_timing(&mut self, line: &str) -> Result<()> {
        let (start_time, duration, settings) = parse_timing_line(line)?;
        self.current_cue.start_time = start_time;
        self.current_cue.duration = duration;
        self.current_cue.settings = settings;
        Ok(())
    }

    fn announce_stream(&mut self) {
        if self.stream_announced {
            return;
        }
        self.stream_announced = true;
        log::debug!("WebVTT header complete: {} line(s)", self.header.len());

        let info = StreamInfo {
            track_id: self.config.track_id,
            time_scale: self.config.time_scale,
            codec_type: CodecType::WebVtt,
            language: self.config.language.clone(),
            header: self.header.clone(),
        };
        if let Some(init_cb) = self.init_cb.as_mut() {
            init_cb(info);
        }
    }

    fn emit_current_cue(&mut self) -> Result<()> {
        let cue = std::mem::take(&mut self.current_cue);
        log::debug!(
            "Emitting WebVTT {} at {}",
            if cue.is_comment() { "comment" } else { "cue" },
            cue.start_time
        );
        let sample = cue_to_sample(&cue)?;
        self.deliver(sample)
    }

    fn deliver(&mut self, sample: Sample) -> Result<()> {
        let new_sample_cb = self
            .new_sample_cb
            .as_mut()
            .ok_or_else(|| VttError::Precondition("parser used before init".into()))?;
        if !new_sample_cb(sample) {
            return Err(VttError::Pipeline("sample callback rejected sample".into()));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            let rest = self.buffer.split();
            let line = decode_line(&rest);
            self.handle_line(&line)?;
        }

        match self.state {
            ReadingState::Header => {
                return Err(VttError::Parser("missing WEBVTT signature".into()));
            }
            ReadingState::CueTiming => {
                return Err(VttError::Parser(format!(
                    "cue {:?} has no timing line",
                    self.current_cue.identifier
                )));
            }
            ReadingState::CuePayload | ReadingState::Comment => {
                self.emit_current_cue()?;
                self.state = ReadingState::CueIdentifierOrTimingOrComment;
            }
            _ => {}
        }

        self.announce_stream();
        self.deliver(Sample::end_of_stream())
    }
}

impl Default for WebVttParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WebVttParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebVttParser")
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .field("header", &self.header)
            .field("flushed", &self.flushed)
            .finish()
    }
}

impl MediaParser for WebVttParser {
    fn init(&mut self, init_cb: InitCallback, new_sample_cb: NewSampleCallback) {
        self.init_cb = Some(init_cb);
        self.new_sample_cb = Some(new_sample_cb);
    }

    fn parse(&mut self, buf: &[u8]) -> Result<()> {
        self.check_usable()?;
        self.buffer.extend_from_slice(buf);
        while let Some(line) = self.next_line() {
            self.process_line(&line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.check_usable()?;
        self.flushed = true;
        self.finish().map_err(|e| {
            log::warn!("WebVTT flush failed: {}", e);
            self.state = ReadingState::ParseError;
            e
        })
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

fn is_signature(line: &str) -> bool {
    match line.strip_prefix(SIGNATURE) {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t'),
        None => false,
    }
}

fn is_comment(line: &str) -> bool {
    match line.strip_prefix(COMMENT_MARKER) {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t'),
        None => false,
    }
}

/// Parses `<start> --> <end> [settings...]` into start, duration and
/// settings, all times in milliseconds.
pub fn parse_timing_line(line: &str) -> Result<(u64, u64, String)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 || tokens[1] != TIMING_ARROW {
        return Err(VttError::Parser(format!("malformed timing line {:?}", line)));
    }

    let start = parse_timestamp(tokens[0])?;
    let end = parse_timestamp(tokens[2])?;
    if end < start {
        return Err(VttError::Parser(format!(
            "cue ends before it starts: {:?}",
            line
        )));
    }

    Ok((start, end - start, tokens[3..].join(" ")))
}
