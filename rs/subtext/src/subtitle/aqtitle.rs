//! AQTitle frame markers: `-->> <frame>`.

use crate::slice::{scan_i64, skip_ws};
use crate::{Error, Result};

pub fn parse_marker(line: &[u8]) -> Result<i64> {
	let rest = line.strip_prefix(b"-->>").ok_or(Error::Malformed)?;
	let rest = &rest[skip_ws(rest)..];
	let scan = scan_i64(rest).ok_or(Error::Malformed)?;
	Ok(scan.value)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn basic() {
		assert_eq!(parse_marker(b"-->> 120"), Ok(120));
		assert_eq!(parse_marker(b"-->>7"), Ok(7));
		assert_eq!(parse_marker(b"-->> -3"), Ok(-3));
	}

	#[test]
	fn rejects_other_lines() {
		assert!(parse_marker(b"--> 120").is_err());
		assert!(parse_marker(b"-->>").is_err());
		assert!(parse_marker(b"-->> x").is_err());
		assert!(parse_marker(b"subtitle text").is_err());
	}
}
