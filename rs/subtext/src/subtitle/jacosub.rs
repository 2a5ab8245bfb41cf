//! JACOsub timed lines and the `SHIFT` directive.
//!
//! Timestamps are expressed in script ticks: `HH:MM:SS.FF` where `FF`
//! counts frames at the script's `TIMERES` (ticks per second), or the
//! absolute `@frame` form. Packet timing is converted to centiseconds
//! after applying the additive shift.

use crate::slice::{scan_i64, skip_space};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
	pub start_cs: i64,
	pub duration_cs: i64,
}

/// Parse the parameter of a `#SHIFT` directive into a frame offset.
///
/// Accepts one to four `.`/`:`-separated components, scaled like the
/// legacy scanner, with the sign taken from the first component. Returns
/// 0 on any failure or when the result does not fit an `i32`.
pub fn parse_shift(timeres: u32, text: &[u8]) -> i32 {
	let mut pos = 0;
	let mut fields = [0i64; 4];
	let mut count = 0;

	for (n, field) in fields.iter_mut().enumerate() {
		if n > 0 {
			if !matches!(text.get(pos), Some(&b'.') | Some(&b':')) {
				break;
			}
			pos += 1;
		}
		let Some(scan) = scan_i64(&text[pos..]) else {
			break;
		};
		*field = scan.value;
		pos += scan.len;
		count = n + 1;
	}

	let negative = text.first() == Some(&b'-') || fields[0] < 0;
	fields[0] = fields[0].abs();

	let timeres = timeres as i64;
	let [a, b, c, d] = fields;
	let ticks = match count {
		1 => a,
		2 => a.saturating_mul(timeres).saturating_add(b),
		3 => (a.saturating_mul(60).saturating_add(b))
			.saturating_mul(timeres)
			.saturating_add(c),
		4 => (a.saturating_mul(3600).saturating_add(b.saturating_mul(60)).saturating_add(c))
			.saturating_mul(timeres)
			.saturating_add(d),
		_ => return 0,
	};
	let ticks = if negative { -ticks } else { ticks };

	i32::try_from(ticks).unwrap_or(0)
}

/// Parse a timed line: `HH:MM:SS.FF HH:MM:SS.FF …` or `@start @end …`.
pub fn read_ts(timeres: u32, shift_frames: i32, line: &[u8]) -> Result<Timing> {
	if timeres == 0 {
		return Err(Error::InvalidArgs);
	}

	let (ts_start, ts_end) = read_tick_pair(line, timeres as i64)?;

	let timeres = timeres as i64;
	let shift = shift_frames as i64;
	let start_cs = (ts_start.saturating_add(shift)).saturating_mul(100) / timeres;
	let end_cs = (ts_end.saturating_add(shift)).saturating_mul(100) / timeres;

	Ok(Timing {
		start_cs,
		duration_cs: end_cs - start_cs,
	})
}

fn read_tick_pair(line: &[u8], timeres: i64) -> Result<(i64, i64)> {
	let mut pos = skip_space(line);

	if line.get(pos) == Some(&b'@') {
		let start = scan_i64(&line[pos + 1..]).ok_or(Error::Malformed)?;
		pos += 1 + start.len;
		pos += skip_space(&line[pos..]);
		if line.get(pos) != Some(&b'@') {
			return Err(Error::Malformed);
		}
		let end = scan_i64(&line[pos + 1..]).ok_or(Error::Malformed)?;
		return Ok((start.value, end.value));
	}

	let start = read_clock(line, &mut pos, timeres)?;
	let ws = skip_space(&line[pos..]);
	if ws == 0 {
		return Err(Error::Malformed);
	}
	pos += ws;
	let end = read_clock(line, &mut pos, timeres)?;
	Ok((start, end))
}

/// `HH:MM:SS.FF` in ticks at TIMERES.
fn read_clock(line: &[u8], pos: &mut usize, timeres: i64) -> Result<i64> {
	let mut i = *pos;
	let mut fields = [0i64; 4];

	for (n, field) in fields.iter_mut().enumerate() {
		if n > 0 {
			let sep = if n == 3 { b'.' } else { b':' };
			if line.get(i) != Some(&sep) {
				return Err(Error::Malformed);
			}
			i += 1;
		}
		let scan = scan_i64(&line[i..])
			.filter(|s| s.value >= 0)
			.ok_or(Error::Malformed)?;
		*field = scan.value;
		i += scan.len;
	}

	*pos = i;
	let [hh, mm, ss, ff] = fields;
	Ok((hh * 3600 + mm * 60 + ss).saturating_mul(timeres).saturating_add(ff))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timed_pair() {
		// 30 ticks per second: one second is 30 frames.
		let t = read_ts(30, 0, b"0:00:01.00 0:00:02.15 Hello").unwrap();
		assert_eq!(t.start_cs, 100);
		assert_eq!(t.duration_cs, 150);
	}

	#[test]
	fn frame_pair() {
		let t = read_ts(30, 0, b"@30 @90 x").unwrap();
		assert_eq!(t.start_cs, 100);
		assert_eq!(t.duration_cs, 200);
	}

	#[test]
	fn shift_applied() {
		let t = read_ts(30, 30, b"@0 @30 x").unwrap();
		assert_eq!(t.start_cs, 100);
		assert_eq!(t.duration_cs, 100);
	}

	#[test]
	fn zero_timeres_rejected() {
		assert!(read_ts(0, 0, b"@0 @30").is_err());
	}

	#[test]
	fn malformed_lines() {
		assert!(read_ts(30, 0, b"0:00:01.00").is_err());
		assert!(read_ts(30, 0, b"@30").is_err());
		assert!(read_ts(30, 0, b"hello").is_err());
	}

	#[test]
	fn shift_forms() {
		assert_eq!(parse_shift(30, b"5"), 5);
		assert_eq!(parse_shift(30, b"1.15"), 45);
		assert_eq!(parse_shift(30, b"1:02.3"), (62 * 30 + 3));
		assert_eq!(parse_shift(30, b"1:02:03.4"), ((3600 + 123) * 30 + 4));
		assert_eq!(parse_shift(30, b"-1.0"), -30);
		assert_eq!(parse_shift(30, b"junk"), 0);
	}

	#[test]
	fn shift_overflow_returns_zero() {
		assert_eq!(parse_shift(30, b"99999999999"), 0);
	}
}
