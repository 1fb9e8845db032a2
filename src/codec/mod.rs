pub mod webvtt;

// Re-export common types and functions
pub use webvtt::{Cue, WebVttParser};
