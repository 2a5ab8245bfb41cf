//! C FFI bindings for the `subtext` parsers.
//!
//! Every entry point is a pure function over caller-owned memory:
//! byte inputs arrive as pointer + length pairs, results are written
//! through out-parameters, and slice results are `(offset, length)`
//! pairs into the caller's input buffer.
//!
//! ## Error Handling
//!
//! Functions return `0` on success and negative error codes on failure
//! (`-28` for an undersized output buffer, matching `ENOSPC`). Entry
//! points that return a count or a length instead document their own
//! failure value.
//!
//! ## Buffer protocol
//!
//! Parsers that fill caller-owned buffers support a size-query pass:
//! call with a null/zero-capacity output to learn the required capacity,
//! then call again with a large enough buffer. Both passes report the
//! same counters.

mod error;
mod ffi;
mod hls;
mod meta;
mod subtitle;

pub use error::*;
pub use hls::*;
pub use meta::*;
pub use subtitle::*;
