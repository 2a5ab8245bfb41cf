//! Spruce subtitle format: `HH:MM:SS:CC , HH:MM:SS:CC , payload`.

use crate::slice::{scan_digits, skip_space};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
	pub start_cs: i64,
	pub duration_cs: i32,
	/// Offset of the payload after the second comma.
	pub payload_off: usize,
}

pub fn parse_line(line: &[u8]) -> Result<Event> {
	let mut pos = skip_space(line);
	let start = read_ts(line, &mut pos)?;

	expect_comma(line, &mut pos)?;
	let end = read_ts(line, &mut pos)?;
	expect_comma(line, &mut pos)?;

	Ok(Event {
		start_cs: start,
		duration_cs: crate::slice::saturate_i32(end - start),
		payload_off: pos,
	})
}

/// Whitespace-tolerant ` , ` between the fields.
fn expect_comma(line: &[u8], pos: &mut usize) -> Result<()> {
	*pos += skip_space(&line[*pos..]);
	if line.get(*pos) != Some(&b',') {
		return Err(Error::Malformed);
	}
	*pos += 1;
	*pos += skip_space(&line[*pos..]);
	Ok(())
}

fn read_ts(line: &[u8], pos: &mut usize) -> Result<i64> {
	let mut i = *pos;
	let mut fields = [0i64; 4];

	for (n, field) in fields.iter_mut().enumerate() {
		if n > 0 {
			if line.get(i) != Some(&b':') {
				return Err(Error::Malformed);
			}
			i += 1;
		}
		let (v, len) = scan_digits(&line[i..], 2).ok_or(Error::Malformed)?;
		*field = v as i64;
		i += len;
	}

	*pos = i;
	let [hh, mm, ss, cc] = fields;
	Ok((hh * 3600 + mm * 60 + ss) * 100 + cc)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn basic() {
		let line = b"00:00:01:10 , 00:00:02:20 , Hello";
		let ev = parse_line(line).unwrap();
		assert_eq!(ev.start_cs, 110);
		assert_eq!(ev.duration_cs, 110);
		assert_eq!(&line[ev.payload_off..], b"Hello");
	}

	#[test]
	fn tight_commas() {
		let ev = parse_line(b"01:02:03:04,01:02:04:04,x").unwrap();
		assert_eq!(ev.start_cs, (3600 + 2 * 60 + 3) * 100 + 4);
		assert_eq!(ev.duration_cs, 100);
	}

	#[test]
	fn rejects_incomplete() {
		assert!(parse_line(b"00:00:01:10 , 00:00:02:20").is_err());
		assert!(parse_line(b"00:00:01 , 00:00:02:20 , x").is_err());
		assert!(parse_line(b"junk").is_err());
	}
}
