use crate::utils::format_timestamp;
use std::fmt;

/// A WebVTT block: either a timed cue or a comment (`NOTE`) block.
///
/// When `comment` is non-empty the block is a comment and every other field
/// is left empty. Comment lines are kept verbatim, starting with the `NOTE`
/// line itself. Multi-line fields keep one element per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cue {
    pub identifier: String,
    /// Milliseconds.
    pub start_time: u64,
    /// Milliseconds.
    pub duration: u64,
    /// Cue settings, carried as written.
    pub settings: String,
    pub payload: Vec<String>,
    pub comment: Vec<String>,
}

impl Cue {
    pub fn new(start_time: u64, duration: u64, payload: Vec<String>) -> Self {
        Self {
            start_time,
            duration,
            payload,
            ..Default::default()
        }
    }

    pub fn comment(lines: Vec<String>) -> Self {
        Self {
            comment: lines,
            ..Default::default()
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_settings(mut self, settings: impl Into<String>) -> Self {
        self.settings = settings.into();
        self
    }

    pub fn end_time(&self) -> u64 {
        self.start_time.saturating_add(self.duration)
    }

    pub fn is_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    pub fn payload_text(&self) -> String {
        self.payload.join("\n")
    }

    pub fn comment_text(&self) -> String {
        self.comment.join("\n")
    }
}

/// Writes the block back out in WebVTT syntax, without the trailing blank line.
impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_comment() {
            return write!(f, "{}", self.comment_text());
        }

        if !self.identifier.is_empty() {
            writeln!(f, "{}", self.identifier)?;
        }
        write!(
            f,
            "{} --> {}",
            format_timestamp(self.start_time),
            format_timestamp(self.end_time())
        )?;
        if !self.settings.is_empty() {
            write!(f, " {}", self.settings)?;
        }
        for line in &self.payload {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}
