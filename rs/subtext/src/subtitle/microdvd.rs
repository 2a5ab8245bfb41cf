//! MicroDVD: `{start}{end}text`, frame-based.

use std::ops::Range;

use crate::slice::scan_i64;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	pub start_frame: i64,
	/// -1 when the closing frame is omitted (`{start}{}text`).
	pub duration_frames: i64,
	pub payload: Range<usize>,
}

pub fn parse_line(line: &[u8]) -> Result<Event> {
	let mut pos = 0;
	let start = read_braced(line, &mut pos)?.ok_or(Error::Malformed)?;
	let end = read_braced(line, &mut pos)?;

	Ok(Event {
		start_frame: start,
		duration_frames: end.map(|e| e - start).unwrap_or(-1),
		payload: pos..line.len(),
	})
}

/// Read `{N}` or `{}`; `Ok(None)` for the empty form.
fn read_braced(line: &[u8], pos: &mut usize) -> Result<Option<i64>> {
	if line.get(*pos) != Some(&b'{') {
		return Err(Error::Malformed);
	}
	*pos += 1;

	if line.get(*pos) == Some(&b'}') {
		*pos += 1;
		return Ok(None);
	}

	let scan = scan_i64(&line[*pos..])
		.filter(|s| s.value >= 0)
		.ok_or(Error::Malformed)?;
	*pos += scan.len;
	if line.get(*pos) != Some(&b'}') {
		return Err(Error::Malformed);
	}
	*pos += 1;
	Ok(Some(scan.value))
}
