//! TTML track extradata probing.
//!
//! Paragraph-based TTML tracks carry a fixed 48-byte signature at the
//! start of their extradata, optionally followed by two inline
//! NUL-terminated strings: the `tt` element parameters and the document
//! prefix emitted before the body.

use crate::{Error, Result};

/// Marks paragraph-based extradata. Exactly 48 bytes.
pub const PARAGRAPH_SIGNATURE: &[u8; 48] = b"subtext-ttml-paragraph-extradata-signature-v001\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
	/// True when the signature is present.
	pub paragraph: bool,
	/// True when no strings follow the signature.
	pub is_default: bool,
	/// Offset of the NUL-terminated `tt` parameter string, when present.
	pub tt_params_off: usize,
	/// Offset of the NUL-terminated pre-body string, when present.
	pub pre_body_off: usize,
}

pub fn parse_extradata(extradata: &[u8]) -> Result<Parsed> {
	if !extradata.starts_with(PARAGRAPH_SIGNATURE) {
		return Ok(Parsed {
			paragraph: false,
			is_default: true,
			tt_params_off: 0,
			pre_body_off: 0,
		});
	}

	let rest = &extradata[PARAGRAPH_SIGNATURE.len()..];
	if rest.is_empty() {
		return Ok(Parsed {
			paragraph: true,
			is_default: true,
			tt_params_off: 0,
			pre_body_off: 0,
		});
	}

	// Both strings must be present and NUL-terminated in place.
	let tt_params_off = PARAGRAPH_SIGNATURE.len();
	let tt_end = rest.iter().position(|&b| b == 0).ok_or(Error::Malformed)?;

	let pre_body_off = tt_params_off + tt_end + 1;
	let tail = &extradata[pre_body_off..];
	if tail.is_empty() || !tail.contains(&0) {
		return Err(Error::Malformed);
	}

	Ok(Parsed {
		paragraph: true,
		is_default: false,
		tt_params_off,
		pre_body_off,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cstr(buf: &[u8], off: usize) -> &[u8] {
		let end = buf[off..].iter().position(|&b| b == 0).unwrap();
		&buf[off..off + end]
	}

	#[test]
	fn signature_is_48_bytes() {
		assert_eq!(PARAGRAPH_SIGNATURE.len(), 48);
	}

	#[test]
	fn default_paragraph() {
		let parsed = parse_extradata(PARAGRAPH_SIGNATURE).unwrap();
		assert!(parsed.paragraph);
		assert!(parsed.is_default);
	}

	#[test]
	fn non_paragraph() {
		let parsed = parse_extradata(b"something else").unwrap();
		assert!(!parsed.paragraph);
		assert!(parsed.is_default);
	}

	#[test]
	fn with_strings() {
		let mut data = PARAGRAPH_SIGNATURE.to_vec();
		data.extend_from_slice(b"xml:lang=\"en\"\0");
		data.extend_from_slice(b"<head/>\0");

		let parsed = parse_extradata(&data).unwrap();
		assert!(parsed.paragraph);
		assert!(!parsed.is_default);
		assert_eq!(cstr(&data, parsed.tt_params_off), b"xml:lang=\"en\"");
		assert_eq!(cstr(&data, parsed.pre_body_off), b"<head/>");
	}

	#[test]
	fn missing_second_string() {
		let mut data = PARAGRAPH_SIGNATURE.to_vec();
		data.extend_from_slice(b"params\0");
		assert_eq!(parse_extradata(&data), Err(Error::Malformed));
	}

	#[test]
	fn unterminated_string() {
		let mut data = PARAGRAPH_SIGNATURE.to_vec();
		data.extend_from_slice(b"params");
		assert_eq!(parse_extradata(&data), Err(Error::Malformed));
	}
}
