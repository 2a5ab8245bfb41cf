//! RealText timestamps.
//!
//! Accepts the colon-separated clock forms (`HH:MM:SS.cc`, `MM:SS`, …)
//! and plain decimal seconds, with up to two fractional digits. Output is
//! centiseconds.

use crate::slice::{scan_digits, scan_i64, skip_ws};
use crate::{Error, Result};

pub fn read_ts(s: &[u8]) -> Result<i64> {
	let mut pos = skip_ws(s);

	let mut fields = [0i64; 3];
	let mut count = 0;
	for (n, field) in fields.iter_mut().enumerate() {
		if n > 0 {
			if s.get(pos) != Some(&b':') {
				break;
			}
			pos += 1;
		}
		let scan = scan_i64(&s[pos..])
			.filter(|v| v.value >= 0)
			.ok_or(Error::Malformed)?;
		*field = scan.value;
		pos += scan.len;
		count = n + 1;
	}

	let mut cs = 0;
	if s.get(pos) == Some(&b'.') {
		let (frac, n) = scan_digits(&s[pos + 1..], 2).ok_or(Error::Malformed)?;
		cs = frac as i64 * if n == 1 { 10 } else { 1 };
	}

	let (hh, mm, ss) = match count {
		1 => (0, 0, fields[0]),
		2 => (0, fields[0], fields[1]),
		3 => (fields[0], fields[1], fields[2]),
		_ => return Err(Error::Malformed),
	};
	Ok((hh * 3600 + mm * 60 + ss) * 100 + cs)
}
