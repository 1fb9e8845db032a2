//! # WebVTT
//!
//! Streaming parser for WebVTT text and the conversion of its blocks to
//! samples.
//!
//! ```rust
//! use vttio::av::{MediaParser, Sample, StreamInfo};
//! use vttio::codec::webvtt::{sample_to_cue, WebVttParser};
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cues = Arc::new(Mutex::new(Vec::new()));
//! let sink = cues.clone();
//!
//! let mut parser = WebVttParser::new();
//! parser.init(
//!     Box::new(|info: StreamInfo| println!("stream ready: {}", info.codec_string())),
//!     Box::new(move |sample: Sample| {
//!         if !sample.is_end_of_stream() {
//!             sink.lock().push(sample_to_cue(&sample).unwrap());
//!         }
//!         true
//!     }),
//! );
//!
//! parser.parse(b"WEBVTT\n\n00:01.000 --> 00:0")?;
//! parser.parse(b"2.000\nHello\n")?;
//! parser.flush()?;
//!
//! let cues = cues.lock();
//! assert_eq!(cues.len(), 1);
//! assert_eq!(cues[0].payload, vec!["Hello"]);
//! # Ok(())
//! # }
//! ```

pub mod parser;
pub mod sample;
pub mod types;

pub use parser::{parse_timing_line, ReadingState, WebVttParser};
pub use sample::{cue_to_sample, sample_to_cue};
pub use types::Cue;
