//! MacCaption (MCC) payload compression.
//!
//! MCC stores ancillary data as uppercase hex with single-letter aliases
//! for the sequences that dominate real captures:
//!
//! ```text
//! G..O  1..9 repetitions of FA 00 00
//! P     FB 80 80
//! Q     FC 80 80
//! R     FD 80 80
//! S     96 69
//! T     61 01
//! U     E1 00 00 00
//! Z     00
//! ```
//!
//! [expand_payload] decodes a payload string into raw bytes;
//! [bytes_to_hex] is the inverse and applies the alias table greedily
//! when asked to. Hex digits are matched case-insensitively on input and
//! emitted uppercase.

use crate::{Error, Result};

const FANUL: [u8; 3] = [0xfa, 0x00, 0x00];

/// Outcome of a payload expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parsed {
	pub total: usize,
	pub written: usize,
	/// True when the output is incomplete: an invalid character stopped
	/// the scan, or the output slice filled up.
	pub truncated: bool,
}

/// Expand a payload string (hex pairs and alias letters) into raw bytes.
/// Scanning stops at the first character that is neither. Pass an empty
/// output slice for a size-only query.
pub fn expand_payload(text: &[u8], bytes: &mut [u8]) -> Parsed {
	let mut out = Parsed::default();
	let mut emit = |out: &mut Parsed, data: &[u8]| {
		for &b in data {
			if out.written < bytes.len() {
				bytes[out.written] = b;
				out.written += 1;
			}
			out.total += 1;
		}
	};

	let mut i = 0;
	while i < text.len() {
		match text[i] {
			c @ b'G'..=b'O' => {
				let reps = (c - b'G') as usize + 1;
				for _ in 0..reps {
					emit(&mut out, &FANUL);
				}
				i += 1;
			}
			b'P' => {
				emit(&mut out, &[0xfb, 0x80, 0x80]);
				i += 1;
			}
			b'Q' => {
				emit(&mut out, &[0xfc, 0x80, 0x80]);
				i += 1;
			}
			b'R' => {
				emit(&mut out, &[0xfd, 0x80, 0x80]);
				i += 1;
			}
			b'S' => {
				emit(&mut out, &[0x96, 0x69]);
				i += 1;
			}
			b'T' => {
				emit(&mut out, &[0x61, 0x01]);
				i += 1;
			}
			b'U' => {
				emit(&mut out, &[0xe1, 0x00, 0x00, 0x00]);
				i += 1;
			}
			b'Z' => {
				emit(&mut out, &[0x00]);
				i += 1;
			}
			_ => {
				let mut raw = [0u8; 1];
				let Some(pair) = text.get(i..i + 2) else {
					out.truncated = true;
					break;
				};
				if hex::decode_to_slice(pair, &mut raw).is_err() {
					out.truncated = true;
					break;
				}
				emit(&mut out, &raw);
				i += 2;
			}
		}
	}

	out.truncated |= out.written < out.total;
	out
}

/// Encode raw bytes as an MCC payload string, NUL-terminated.
///
/// With `alias` set, alias sequences are matched greedily (longest run
/// first); otherwise the output is plain uppercase hex. Follows the
/// two-pass capacity protocol: an empty destination is a size query, a
/// short one receives a NUL-terminated prefix of whole encoding units.
///
/// Returns the number of bytes written, excluding the NUL.
pub fn bytes_to_hex(dst: &mut [u8], bytes: &[u8], alias: bool) -> Result<usize> {
	// Size pass.
	let mut required = 1;
	let mut i = 0;
	while i < bytes.len() {
		let (_, consumed, len) = encode_unit(&bytes[i..], alias);
		required += len;
		i += consumed;
	}

	if dst.is_empty() {
		return Err(Error::OutOfSpace { advance: 0, required });
	}

	// Fill pass, emitting only whole units.
	let mut written = 0;
	let mut advance = 0;
	let mut i = 0;
	while i < bytes.len() {
		let (unit, consumed, len) = encode_unit(&bytes[i..], alias);
		if written + len + 1 > dst.len() {
			break;
		}
		dst[written..written + len].copy_from_slice(&unit[..len]);
		written += len;
		i += consumed;
		advance = i;
	}
	dst[written] = 0;

	if dst.len() < required {
		return Err(Error::OutOfSpace { advance, required });
	}
	Ok(written)
}

/// Encode one unit from the front of `bytes`: `(unit, input consumed,
/// output length)`.
fn encode_unit(bytes: &[u8], alias: bool) -> ([u8; 2], usize, usize) {
	if alias {
		let reps = bytes
			.chunks(3)
			.take_while(|c| *c == FANUL)
			.take(9)
			.count();
		if reps > 0 {
			return ([b'G' + (reps as u8 - 1), 0], reps * 3, 1);
		}
		if bytes.starts_with(&[0xe1, 0x00, 0x00, 0x00]) {
			return ([b'U', 0], 4, 1);
		}
		if bytes.starts_with(&[0xfb, 0x80, 0x80]) {
			return ([b'P', 0], 3, 1);
		}
		if bytes.starts_with(&[0xfc, 0x80, 0x80]) {
			return ([b'Q', 0], 3, 1);
		}
		if bytes.starts_with(&[0xfd, 0x80, 0x80]) {
			return ([b'R', 0], 3, 1);
		}
		if bytes.starts_with(&[0x96, 0x69]) {
			return ([b'S', 0], 2, 1);
		}
		if bytes.starts_with(&[0x61, 0x01]) {
			return ([b'T', 0], 2, 1);
		}
		if bytes[0] == 0x00 {
			return ([b'Z', 0], 1, 1);
		}
	}

	const HEX: &[u8; 16] = b"0123456789ABCDEF";
	let b = bytes[0];
	([HEX[(b >> 4) as usize], HEX[(b & 0x0f) as usize]], 1, 2)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn expand(text: &[u8]) -> Vec<u8> {
		let probe = expand_payload(text, &mut []);
		let mut out = vec![0u8; probe.total];
		let filled = expand_payload(text, &mut out);
		assert!(!filled.truncated);
		out
	}

	#[test]
	fn aliases_expand() {
		assert_eq!(expand(b"G"), vec![0xfa, 0x00, 0x00]);
		assert_eq!(expand(b"H"), vec![0xfa, 0x00, 0x00, 0xfa, 0x00, 0x00]);
		assert_eq!(expand(b"S"), vec![0x96, 0x69]);
		assert_eq!(expand(b"T"), vec![0x61, 0x01]);
		assert_eq!(expand(b"U"), vec![0xe1, 0x00, 0x00, 0x00]);
		assert_eq!(expand(b"Z"), vec![0x00]);
	}

	#[test]
	fn hex_expands_case_insensitively() {
		assert_eq!(expand(b"9669"), vec![0x96, 0x69]);
		assert_eq!(expand(b"ab"), vec![0xab]);
		assert_eq!(expand(b"AB"), vec![0xab]);
	}

	#[test]
	fn stops_at_invalid() {
		let mut out = [0u8; 16];
		let parsed = expand_payload(b"61x", &mut out);
		assert_eq!(parsed.total, 1);
		assert!(parsed.truncated);
		assert_eq!(out[0], 0x61);
	}

	#[test]
	fn odd_trailing_digit_truncates() {
		let mut out = [0u8; 16];
		let parsed = expand_payload(b"619", &mut out);
		assert_eq!(parsed.total, 1);
		assert!(parsed.truncated);
	}

	#[test]
	fn plain_hex_round_trip() {
		let data = [0xfa, 0x00, 0x00, 0x12, 0x96, 0x69];
		let mut text = [0u8; 64];
		let n = bytes_to_hex(&mut text, &data, false).unwrap();
		assert_eq!(&text[..n], b"FA0000129669");
		assert_eq!(expand(&text[..n]), data);
	}

	#[test]
	fn alias_round_trip() {
		let data = [
			0xfa, 0x00, 0x00, 0xfa, 0x00, 0x00, 0xfb, 0x80, 0x80, 0x00, 0x61, 0x01, 0x42,
		];
		let mut text = [0u8; 64];
		let n = bytes_to_hex(&mut text, &data, true).unwrap();
		assert_eq!(&text[..n], b"HPZT42");
		assert_eq!(expand(&text[..n]), data);
	}

	#[test]
	fn long_fanul_runs_split() {
		let data = FANUL.repeat(11);
		let mut text = [0u8; 64];
		let n = bytes_to_hex(&mut text, &data, true).unwrap();
		assert_eq!(&text[..n], b"OH");
		assert_eq!(expand(&text[..n]), data);
	}

	#[test]
	fn size_query_matches_fill() {
		let data = [0x12, 0x34, 0x56];
		let err = bytes_to_hex(&mut [], &data, false).unwrap_err();
		let Error::OutOfSpace { required, .. } = err else {
			panic!("expected out-of-space");
		};
		assert_eq!(required, 7);

		let mut dst = vec![0u8; required];
		let n = bytes_to_hex(&mut dst, &data, false).unwrap();
		assert_eq!(n, 6);
		assert_eq!(&dst[..], b"123456\0");
	}

	#[test]
	fn short_buffer_writes_whole_units() {
		let data = [0x12, 0x34];
		let mut dst = [0xffu8; 4];
		let err = bytes_to_hex(&mut dst, &data, false).unwrap_err();
		assert_eq!(err, Error::OutOfSpace { advance: 1, required: 5 });
		assert_eq!(&dst, b"12\0\xff");
	}
}
