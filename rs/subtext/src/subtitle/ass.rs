//! SSA/ASS `Dialogue:` lines.

use crate::slice::{scan_digits, scan_i64, skip_space};
use crate::{Error, Result};

/// Timing and layer of one `Dialogue:` line.
///
/// `rest_off` is the byte offset of the remainder after the second
/// timestamp's trailing comma, i.e. the start of the Style field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialogue {
	pub start_cs: i64,
	pub duration_cs: i32,
	pub layer: i32,
	pub rest_off: usize,
}

/// Parse a `Dialogue:` line.
///
/// The first field is either the layer number or the legacy `Marked=N`;
/// both are read with the atoi rule (leading sign and digits, stop at the
/// first non-digit), which resolves `Marked=…` to layer 0.
pub fn parse_dialogue(line: &[u8]) -> Result<Dialogue> {
	let rest = line.strip_prefix(b"Dialogue:").ok_or(Error::Malformed)?;

	// atoi at offset 10, matching the legacy field layout. With the
	// prefix being 9 bytes this lands one past the colon, on or inside
	// the first field.
	let layer = match line.get(10..) {
		Some(tail) => scan_i64(&tail[skip_space(tail)..])
			.map(|s| crate::slice::saturate_i32(s.value))
			.unwrap_or(0),
		None => 0,
	};

	// Skip the first field entirely, then read both timestamps.
	let mut pos = line.len() - rest.len();
	let comma = line[pos..]
		.iter()
		.position(|&b| b == b',')
		.ok_or(Error::Malformed)?;
	pos += comma + 1;

	let start = read_ts(line, &mut pos)?;
	if line.get(pos) != Some(&b',') {
		return Err(Error::Malformed);
	}
	pos += 1;
	let end = read_ts(line, &mut pos)?;
	if line.get(pos) != Some(&b',') {
		return Err(Error::Malformed);
	}
	pos += 1;

	Ok(Dialogue {
		start_cs: start,
		duration_cs: crate::slice::saturate_i32(end - start),
		layer,
		rest_off: pos,
	})
}

/// `H:MM:SS.cc` in centiseconds; the separator before the fraction is any
/// single byte, as the legacy scanner had it.
fn read_ts(line: &[u8], pos: &mut usize) -> Result<i64> {
	let mut i = *pos;
	i += skip_space(&line[i..]);

	let hh = scan_i64(&line[i..]).ok_or(Error::Malformed)?;
	i += hh.len;
	if line.get(i) != Some(&b':') {
		return Err(Error::Malformed);
	}
	i += 1;

	let (mm, n) = scan_digits(&line[i..], 2).ok_or(Error::Malformed)?;
	i += n;
	if line.get(i) != Some(&b':') {
		return Err(Error::Malformed);
	}
	i += 1;

	let (ss, n) = scan_digits(&line[i..], 2).ok_or(Error::Malformed)?;
	i += n;

	// One separator byte, then the centiseconds.
	if line.get(i).is_none() {
		return Err(Error::Malformed);
	}
	i += 1;
	let cs = scan_i64(&line[i..])
		.filter(|s| s.value >= 0)
		.ok_or(Error::Malformed)?;
	i += cs.len;

	*pos = i;
	Ok((hh.value * 3600 + mm as i64 * 60 + ss as i64) * 100 + cs.value)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn layer_form() {
		let line = b"Dialogue: 0,0:00:01.50,0:00:03.75,Default,,0,0,0,,Hello";
		let d = parse_dialogue(line).unwrap();
		assert_eq!(d.start_cs, 150);
		assert_eq!(d.duration_cs, 225);
		assert_eq!(d.layer, 0);
		assert_eq!(&line[d.rest_off..], b"Default,,0,0,0,,Hello");
	}

	#[test]
	fn nonzero_layer() {
		let line = b"Dialogue: 12,0:00:00.00,0:00:01.00,Style,Name,0,0,0,,text";
		let d = parse_dialogue(line).unwrap();
		assert_eq!(d.layer, 12);
	}

	#[test]
	fn marked_resolves_to_zero() {
		let line = b"Dialogue: Marked=1,0:00:02.00,0:00:04.00,Default,,0,0,0,,x";
		let d = parse_dialogue(line).unwrap();
		assert_eq!(d.layer, 0);
		assert_eq!(d.start_cs, 200);
		assert_eq!(d.duration_cs, 200);
	}

	#[test]
	fn hour_field() {
		let line = b"Dialogue: 0,1:02:03.04,1:02:04.04,S,,0,0,0,,x";
		let d = parse_dialogue(line).unwrap();
		assert_eq!(d.start_cs, (3600 + 2 * 60 + 3) * 100 + 4);
		assert_eq!(d.duration_cs, 100);
	}

	#[test]
	fn rejects_non_dialogue() {
		assert!(parse_dialogue(b"Comment: 0,0:00:01.00,0:00:02.00,,,0,0,0,,x").is_err());
		assert!(parse_dialogue(b"Dialogue: 0,bad").is_err());
		assert!(parse_dialogue(b"Dialogue: 0,0:00:01.00").is_err());
	}
}
