//! # subtext: subtitle and streaming text parsers
//!
//! `subtext` is a collection of small, byte-exact parsers for subtitle and
//! streaming text formats. Every parser is a pure function over the caller's
//! input bytes: results reference the input through offset/length ranges,
//! nothing is retained, and nothing is allocated behind the caller's back.
//!
//! ## Overview
//!
//! - [slice]: ASCII classification, line splitting, and saturating
//!   integer/float prefix scans shared by every parser.
//! - [token]: quoted/escaped token extraction into a caller-owned buffer,
//!   with a two-pass size-query protocol.
//! - [subtitle]: one module per subtitle/caption format (SubRip, WebVTT,
//!   ASS, MicroDVD, MPL2, MPSub, PJS, STL, VPlayer, JACOsub, LRC, SAMI,
//!   RealText, SubViewer, SCC, MCC, AQTitle).
//! - [meta]: miscellaneous byte-level helpers (ID3v2 tag length, data:
//!   URIs, ffmetadata key/value lines, TTML extradata, concat scripts).
//!
//! Timestamps keep each format's native unit (milliseconds, centiseconds,
//! ticks, frames, or microseconds); the unit is part of each result type's
//! field name.

mod error;

pub mod meta;
pub mod slice;
pub mod subtitle;
pub mod token;

pub use error::*;
