//! RTCM3 stream decoder.
//!
//! Locates framed messages in an arbitrary byte stream, verifies their
//! CRC-24Q, and decodes satellite observations (legacy and MSM),
//! broadcast ephemerides and reference-station metadata.

pub mod basic;
pub mod decode;

pub use decode::Decoder;
