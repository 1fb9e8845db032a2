#![doc(html_root_url = "https://docs.rs/vttio/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::missing_crate_level_docs)]

//! # vttio - WebVTT packaging for segmented streaming
//!
//! `vttio` turns WebVTT caption text into the timed samples an ISO-BMFF
//! (fragmented MP4) text track carries. Cues may overlap in the source; the
//! samples produced never do.
//!
//! ## Features
//!
//! - Streaming WebVTT parser that accepts input in arbitrary chunks
//! - `vttc` / `vtte` / `payl` / `iden` / `sttg` cue box encoding and decoding
//! - Interval sweep that splits overlapping cues into non-overlapping samples,
//!   filling gaps with empty cue boxes
//! - Async demuxer over any `tokio::io::AsyncRead`
//!
//! ## Quick Start
//!
//! ```rust
//! use vttio::format::fragment_webvtt;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vtt = b"WEBVTT\n\n00:00.000 --> 00:02.000\nhi\n\n00:01.000 --> 00:03.000\nhello\n";
//! let samples = fragment_webvtt(vtt)?;
//!
//! let ranges: Vec<_> = samples.iter().map(|s| (s.pts(), s.end())).collect();
//! assert_eq!(ranges, vec![(0, 1000), (1000, 2000), (2000, 3000)]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading from a file
//!
//! ```rust,no_run
//! use vttio::av::Demuxer;
//! use vttio::format::WebVttDemuxer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = tokio::fs::File::open("captions.vtt").await?;
//!     let mut demuxer = WebVttDemuxer::new(file);
//!
//!     while let Some(sample) = demuxer.read_sample().await? {
//!         println!("{}", sample);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `av`: samples, stream descriptions and the parser/demuxer traits
//! - `codec`: the WebVTT cue model and streaming text parser
//! - `format`: ISO-BMFF cue boxes, the fragmenter and the demuxer
//! - `config`: runtime settings loaded from TOML and the environment
//! - `error`: the crate error type and `Result` alias
//! - `utils`: timestamp helpers

/// Media samples and stream descriptions
pub mod av;

/// WebVTT cue model and text parser
pub mod codec;

/// Error types and utilities
pub mod error;

/// Container formats (ISO-BMFF cue boxes, WebVTT demuxing)
pub mod format;

/// Common utilities and helper functions
pub mod utils;

/// Configuration module
pub mod config;

pub use error::{Result, VttError};
