//! # Utility Functions
//!
//! Helpers shared by the WebVTT parser and the box layer.
//!
//! ## Timestamps
//!
//! WebVTT timestamps are converted to and from milliseconds:
//!
//! ```rust
//! use vttio::utils::{format_timestamp, parse_timestamp};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ms = parse_timestamp("00:01:02.003")?;
//! assert_eq!(ms, 62_003);
//! assert_eq!(format_timestamp(ms), "00:01:02.003");
//! # Ok(())
//! # }
//! ```

/// WebVTT timestamp parsing and formatting
pub mod time;

pub use time::{format_timestamp, parse_timestamp};
