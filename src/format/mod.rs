/// ISO-BMFF boxes and sample fragmentation for WebVTT
pub mod mp4;

/// WebVTT document demuxing
pub mod webvtt;

pub use self::mp4::{CueBox, VttCueBox, VttEmptyCueBox, WebVttFragmenter};
pub use self::webvtt::{fragment_webvtt, WebVttDemuxer};
