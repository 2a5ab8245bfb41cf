//! Concat script keywords and tokens.

use crate::slice::skip_ws;
use crate::token::{self, Token};
use crate::{Error, Result};

/// Position of a whitespace-delimited keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
	/// Leading whitespace bytes skipped.
	pub skip: usize,
	/// Keyword length.
	pub len: usize,
	/// Bytes to advance the cursor: past the keyword, its delimiter, and
	/// any whitespace that follows.
	pub advance: usize,
}

/// Parse one keyword from a NUL-terminated buffer.
pub fn parse_keyword(buf: &[u8]) -> Result<Keyword> {
	let end = buf.iter().position(|&b| b == 0).ok_or(Error::InvalidArgs)?;
	let buf = &buf[..end];

	let skip = skip_ws(buf);
	let len = buf[skip..]
		.iter()
		.take_while(|&&b| !crate::slice::is_ws(b))
		.count();

	let mut advance = skip + len;
	if advance < buf.len() {
		advance += 1;
		advance += skip_ws(&buf[advance..]);
	}

	Ok(Keyword { skip, len, advance })
}

/// [token::get_token] against the whitespace terminator set.
pub fn get_token(buf: &[u8], dst: &mut [u8]) -> Result<Token> {
	token::get_token(buf, b" \n\t\r\0", dst)
}
