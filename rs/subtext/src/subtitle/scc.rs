//! Scenarist Closed Captions payload words.

/// Outcome of a word scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parsed {
	/// Valid words found in the input.
	pub total: usize,
	/// Words written to the output.
	pub written: usize,
	/// True when the output is incomplete: an invalid token stopped the
	/// scan, or the output slice filled up.
	pub truncated: bool,
}

/// Tokenize space-separated 4-hex-digit words ("9420 942c …") into `u16`
/// values. Scanning stops at the first invalid token. Pass an empty
/// output slice for a size-only query.
pub fn parse_words(text: &[u8], words: &mut [u16]) -> Parsed {
	let mut out = Parsed::default();

	for token in text.split(|&b| b == b' ') {
		if token.is_empty() {
			continue;
		}
		let Some(word) = parse_word(token) else {
			tracing::trace!(words = out.total, "stopping at invalid word");
			out.truncated = true;
			break;
		};
		if out.written < words.len() {
			words[out.written] = word;
			out.written += 1;
		}
		out.total += 1;
	}

	out.truncated |= out.written < out.total;
	out
}

fn parse_word(token: &[u8]) -> Option<u16> {
	if token.len() != 4 {
		return None;
	}
	let mut raw = [0u8; 2];
	hex::decode_to_slice(token, &mut raw).ok()?;
	Some(u16::from_be_bytes(raw))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn basic() {
		let mut words = [0u16; 8];
		let out = parse_words(b"9420 942c 94ae", &mut words);
		assert_eq!(out.total, 3);
		assert_eq!(out.written, 3);
		assert!(!out.truncated);
		assert_eq!(&words[..3], &[0x9420, 0x942c, 0x94ae]);
	}

	#[test]
	fn stops_at_invalid() {
		let mut words = [0u16; 8];
		let out = parse_words(b"9420 94zz 94ae", &mut words);
		assert_eq!(out.total, 1);
		assert!(out.truncated);
		assert_eq!(words[0], 0x9420);
	}

	#[test]
	fn wrong_length_token() {
		let mut words = [0u16; 8];
		let out = parse_words(b"9420 94a 94ae", &mut words);
		assert_eq!(out.total, 1);
		assert!(out.truncated);
	}

	#[test]
	fn size_query() {
		let out = parse_words(b"9420 942c", &mut []);
		assert_eq!(out.total, 2);
		assert_eq!(out.written, 0);
		assert!(out.truncated);
	}

	#[test]
	fn extra_spaces_ignored() {
		let mut words = [0u16; 8];
		let out = parse_words(b"  9420   942c ", &mut words);
		assert_eq!(out.total, 2);
		assert!(!out.truncated);
	}

	#[test]
	fn empty_input() {
		let out = parse_words(b"", &mut []);
		assert_eq!(out.total, 0);
		assert!(!out.truncated);
	}
}
