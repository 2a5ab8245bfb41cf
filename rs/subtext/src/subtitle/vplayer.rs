//! VPlayer: `H:MM:SS[.CC]` followed by one of `:`, space, or `=`.

use std::ops::Range;

use crate::slice::{scan_digits, scan_i64};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	pub start_cs: i64,
	pub payload: Range<usize>,
}

pub fn parse_line(line: &[u8]) -> Result<Event> {
	let mut pos = 0;

	let hh = scan_i64(line).filter(|s| s.value >= 0).ok_or(Error::Malformed)?;
	pos += hh.len;
	if line.get(pos) != Some(&b':') {
		return Err(Error::Malformed);
	}
	pos += 1;

	let (mm, n) = scan_digits(&line[pos..], 2).ok_or(Error::Malformed)?;
	pos += n;
	if line.get(pos) != Some(&b':') {
		return Err(Error::Malformed);
	}
	pos += 1;

	let (ss, n) = scan_digits(&line[pos..], 2).ok_or(Error::Malformed)?;
	pos += n;

	let mut cs = 0;
	if line.get(pos) == Some(&b'.') {
		let (v, n) = scan_digits(&line[pos + 1..], 2).ok_or(Error::Malformed)?;
		cs = v as i64;
		pos += 1 + n;
	}

	match line.get(pos).copied() {
		Some(b':') | Some(b' ') | Some(b'=') => pos += 1,
		_ => return Err(Error::Malformed),
	}

	Ok(Event {
		start_cs: (hh.value * 3600 + mm as i64 * 60 + ss as i64) * 100 + cs,
		payload: pos..line.len(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn colon_delimiter() {
		let line = b"0:00:02:Hello";
		let ev = parse_line(line).unwrap();
		assert_eq!(ev.start_cs, 200);
		assert_eq!(&line[ev.payload.clone()], b"Hello");
	}

	#[test]
	fn fraction_and_space() {
		let ev = parse_line(b"1:02:03.45 text").unwrap();
		assert_eq!(ev.start_cs, (3600 + 123) * 100 + 45);
	}

	#[test]
	fn equals_delimiter() {
		let line = b"0:00:10=x";
		let ev = parse_line(line).unwrap();
		assert_eq!(&line[ev.payload.clone()], b"x");
	}

	#[test]
	fn rejects_missing_delimiter() {
		assert!(parse_line(b"0:00:02").is_err());
		assert!(parse_line(b"0:00:02.50").is_err());
		assert!(parse_line(b"0:00;02:x").is_err());
	}
}
