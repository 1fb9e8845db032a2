//! # ISO-BMFF WebVTT Samples
//!
//! Box encoding for WebVTT cues in MP4 and the fragmenter that turns
//! overlapping cues into the non-overlapping samples an MP4 text track needs.
//!
//! ```rust
//! use vttio::av::Sample;
//! use vttio::format::mp4::{decode_cue_boxes, CueBox, WebVttFragmenter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut fragmenter = WebVttFragmenter::new();
//! fragmenter.push(Sample::new(&b"hi"[..], true).with_pts(0).with_duration(2000))?;
//! fragmenter.push(Sample::new(&b"hello"[..], true).with_pts(0).with_duration(1500))?;
//! fragmenter.flush();
//!
//! let first = fragmenter.pop().unwrap();
//! assert_eq!((first.pts(), first.duration()), (0, 1500));
//! assert_eq!(decode_cue_boxes(first.data())?.len(), 2);
//!
//! let second = fragmenter.pop().unwrap();
//! assert_eq!((second.pts(), second.duration()), (1500, 500));
//! assert!(matches!(decode_cue_boxes(second.data())?[..], [CueBox::Cue(_)]));
//! # Ok(())
//! # }
//! ```

/// Generic box header reading and writing
pub mod boxes;

/// Cue boxes (`vttc`, `vtte`, `payl`, ...)
pub mod cue_box;

/// Overlap-free cue fragmentation
pub mod fragmenter;

pub use boxes::{BoxIter, FourCC, RawBox, BOX_HEADER_SIZE};
pub use cue_box::{
    decode_cue_box, decode_cue_boxes, encode_cue, CueBox, VttCueBox, VttEmptyCueBox,
    EMPTY_CUE_BOX_SIZE,
};
pub use fragmenter::WebVttFragmenter;
