//! Reading WebVTT documents into fragmented cue samples.
//!
//! Ties the streaming [`WebVttParser`](crate::codec::webvtt::WebVttParser) to
//! the [`WebVttFragmenter`](crate::format::mp4::WebVttFragmenter), either over
//! an async reader or over a complete in-memory document.

mod demuxer;

pub use demuxer::{fragment_webvtt, WebVttDemuxer};
