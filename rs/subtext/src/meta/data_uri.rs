//! `data:` URI splitting.

use std::ops::Range;

use crate::{Error, Result};

/// Slices of a `data:content/type[;base64][;opt…],payload` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
	pub content_type: Range<usize>,
	/// True when the last parameter before the comma is `base64`
	/// (case-insensitive).
	pub base64: bool,
	/// May be empty; a zero-length payload is valid.
	pub payload: Range<usize>,
}

/// Split a `data:` URI. `uri` must be NUL-terminated (`len = strlen + 1`).
pub fn parse(uri: &[u8]) -> Result<Parsed> {
	let end = uri.iter().position(|&b| b == 0).ok_or(Error::InvalidArgs)?;
	let uri = &uri[..end];

	let data = uri.strip_prefix(b"data:").ok_or(Error::Malformed)?;
	let head = b"data:".len();

	let comma = data.iter().position(|&b| b == b',').ok_or(Error::Malformed)?;
	let header = &data[..comma];

	let mut parts = header.split(|&b| b == b';');
	let content_type_len = parts.next().map(|p| p.len()).unwrap_or(0);
	let base64 = parts
		.next_back()
		.is_some_and(|last| last.eq_ignore_ascii_case(b"base64"));

	Ok(Parsed {
		content_type: head..head + content_type_len,
		base64,
		payload: head + comma + 1..end,
	})
}
