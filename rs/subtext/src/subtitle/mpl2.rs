//! MPL2: `[start][end]text`, one tick = 1/10 second.

use std::ops::Range;

use crate::slice::scan_i64;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	pub start_ticks: i64,
	/// -1 when the closing tick is omitted (`[start][]text`).
	pub duration_ticks: i64,
	pub payload: Range<usize>,
}

pub fn parse_line(line: &[u8]) -> Result<Event> {
	let mut pos = 0;
	let start = read_bracketed(line, &mut pos)?.ok_or(Error::Malformed)?;
	let end = read_bracketed(line, &mut pos)?;

	Ok(Event {
		start_ticks: start,
		duration_ticks: end.map(|e| e - start).unwrap_or(-1),
		payload: pos..line.len(),
	})
}

fn read_bracketed(line: &[u8], pos: &mut usize) -> Result<Option<i64>> {
	if line.get(*pos) != Some(&b'[') {
		return Err(Error::Malformed);
	}
	*pos += 1;

	if line.get(*pos) == Some(&b']') {
		*pos += 1;
		return Ok(None);
	}

	let scan = scan_i64(&line[*pos..])
		.filter(|s| s.value >= 0)
		.ok_or(Error::Malformed)?;
	*pos += scan.len;
	if line.get(*pos) != Some(&b']') {
		return Err(Error::Malformed);
	}
	*pos += 1;
	Ok(Some(scan.value))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn full_form() {
		let line = b"[11][25]- Hi.|- Hello.";
		let ev = parse_line(line).unwrap();
		assert_eq!(ev.start_ticks, 11);
		assert_eq!(ev.duration_ticks, 14);
		assert_eq!(&line[ev.payload.clone()], b"- Hi.|- Hello.");
	}

	#[test]
	fn open_ended() {
		let ev = parse_line(b"[11][]x").unwrap();
		assert_eq!(ev.duration_ticks, -1);
	}

	#[test]
	fn rejects_bad_lines() {
		assert!(parse_line(b"[][1]x").is_err());
		assert!(parse_line(b"[1]2]x").is_err());
		assert!(parse_line(b"x[1][2]").is_err());
	}
}
