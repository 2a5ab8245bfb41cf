//! # subtext-hls: HLS playlists and the live streaming client
//!
//! This crate covers the playlist side of HTTP Live Streaming
//! ([RFC 8216](https://www.rfc-editor.org/rfc/rfc8216)) as far as a byte
//! pipe needs it:
//!
//! - [events]: a line-oriented, zero-copy event stream over playlist text.
//! - [Playlist]: the owned segment/variant model built from the events,
//!   with URLs resolved against the playlist's own URL.
//! - [writer]: the fixed two-line version header.
//! - [Client]: a blocking, cooperative live client that drives playlist
//!   reloads and sequential segment reads. All I/O and time sources are
//!   injected through the [Fetch], [Clock], and [Interrupt] traits, so
//!   the reload clock is fully deterministic under test.
//!
//! Segment payloads are opaque: the client hands segment bytes to its
//! caller in strict sequence order and never inspects them.

mod client;
mod error;
mod playlist;

pub mod events;
pub mod writer;

pub use client::*;
pub use error::*;
pub use playlist::*;
