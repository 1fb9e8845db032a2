use super::cue_box::{encode_cue, VttEmptyCueBox};
use crate::av::Sample;
use crate::codec::webvtt::sample_to_cue;
use crate::error::{Result, VttError};
use bytes::{Bytes, BytesMut};
use std::collections::VecDeque;

/// A cue that is still on screen at the sweep cursor.
#[derive(Debug, Clone)]
struct ActiveCue {
    start: u64,
    end: u64,
    cue_box: Bytes,
}

/// Turns cues with arbitrary overlap into a gap-free sequence of
/// non-overlapping samples.
///
/// Each output sample covers a range during which the set of visible cues
/// does not change, and carries the `vttc` boxes of all of those cues, in
/// the order they were pushed. Ranges between cues get a `vtte` box. No
/// range is produced before the first cue.
///
/// Cues must be pushed in non-decreasing start time order.
#[derive(Debug, Default)]
pub struct WebVttFragmenter {
    // Push order, which is also start order.
    active: Vec<ActiveCue>,
    // Everything before the cursor has been emitted.
    cursor: Option<u64>,
    ready: VecDeque<Sample>,
}

impl WebVttFragmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cue sample, emitting every range that can no longer change.
    ///
    /// Comment samples are dropped, and the end-of-stream sample flushes.
    /// A cue starting before an already emitted boundary is rejected without
    /// changing any state.
    pub fn push(&mut self, sample: Sample) -> Result<()> {
        if sample.is_end_of_stream() {
            self.flush();
            return Ok(());
        }
        if sample.is_metadata() {
            log::debug!("Dropping WebVTT comment sample");
            return Ok(());
        }

        let cue = sample_to_cue(&sample)?;
        let start = cue.start_time;
        if let Some(cursor) = self.cursor {
            if start < cursor {
                return Err(VttError::Precondition(format!(
                    "cue at {} pushed after boundary {}",
                    start, cursor
                )));
            }
        }
        if cue.duration == 0 {
            log::debug!("Dropping zero length cue at {}", start);
            return Ok(());
        }
        let cue_box = encode_cue(&cue)?;

        self.resolve_until(Some(start));
        self.fill_to(start);
        self.active.push(ActiveCue {
            start,
            end: cue.end_time(),
            cue_box,
        });
        self.cursor = Some(start);
        Ok(())
    }

    /// Emits everything still buffered. Calling it again is a no-op.
    pub fn flush(&mut self) {
        self.resolve_until(None);
    }

    /// Next ready sample, in increasing start time order.
    pub fn pop(&mut self) -> Option<Sample> {
        self.ready.pop_front()
    }

    pub fn ready_samples_size(&self) -> usize {
        self.ready.len()
    }

    /// Number of cues still waiting for their end to be resolved.
    pub fn active_cues(&self) -> usize {
        self.active.len()
    }

    /// Closes out active cues in end order until the earliest remaining end
    /// is past `bound`.
    fn resolve_until(&mut self, bound: Option<u64>) {
        while let Some(cursor) = self.cursor {
            let Some(min_end) = self.active.iter().map(|c| c.end).min() else {
                break;
            };
            if bound.is_some_and(|bound| min_end > bound) {
                break;
            }
            self.emit_active(cursor, min_end);
            self.active.retain(|c| c.end > min_end);
            self.cursor = Some(min_end);
        }
    }

    /// Emits `[cursor, start)` for the cues still active, or as a gap when
    /// none are.
    fn fill_to(&mut self, start: u64) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if cursor >= start {
            return;
        }
        if self.active.is_empty() {
            log::debug!("WebVTT gap from {} to {}", cursor, start);
            self.emit(cursor, start, VttEmptyCueBox.to_bytes());
        } else {
            self.emit_active(cursor, start);
        }
    }

    fn emit_active(&mut self, from: u64, to: u64) {
        if to <= from {
            return;
        }
        let len = self.active.iter().map(|c| c.cue_box.len()).sum();
        let mut data = BytesMut::with_capacity(len);
        for cue in &self.active {
            debug_assert!(cue.start <= from && cue.end >= to);
            data.extend_from_slice(&cue.cue_box);
        }
        self.emit(from, to, data.freeze());
    }

    fn emit(&mut self, from: u64, to: u64, data: Bytes) {
        let pts = i64::try_from(from).unwrap_or(i64::MAX);
        log::trace!("WebVTT sample [{}, {}) with {} bytes", from, to, data.len());
        self.ready.push_back(
            Sample::new(data, true)
                .with_pts(pts)
                .with_dts(pts)
                .with_duration(to - from),
        );
    }
}
