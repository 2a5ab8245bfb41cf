//! SAMI `Start=` attribute values.

use crate::slice::{scan_i64, skip_ws};
use crate::{Error, Result};

/// Parse a `Start=` value into milliseconds.
///
/// Leading and trailing whitespace is tolerated; anything else trailing
/// the number is not. Values that overflow the range are an error rather
/// than wrapping.
pub fn parse_start_ms(s: &[u8]) -> Result<i64> {
	let mut pos = skip_ws(s);

	let scan = scan_i64(&s[pos..]).ok_or(Error::Malformed)?;
	if scan.saturated {
		return Err(Error::Malformed);
	}
	pos += scan.len;

	pos += skip_ws(&s[pos..]);
	if pos != s.len() {
		return Err(Error::Malformed);
	}
	Ok(scan.value)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn basic() {
		assert_eq!(parse_start_ms(b"1500"), Ok(1500));
		assert_eq!(parse_start_ms(b" 42 "), Ok(42));
		assert_eq!(parse_start_ms(b"0"), Ok(0));
	}

	#[test]
	fn rejects_garbage() {
		assert!(parse_start_ms(b"").is_err());
		assert!(parse_start_ms(b"abc").is_err());
		assert!(parse_start_ms(b"15x").is_err());
	}

	#[test]
	fn overflow_is_an_error() {
		assert!(parse_start_ms(b"99999999999999999999").is_err());
	}
}
