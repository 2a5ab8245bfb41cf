//! SubRip (SRT).
//!
//! A cue is an optional index line, a timing line
//! `HH:MM:SS,mmm --> HH:MM:SS,mmm` (a `.` separator is also accepted,
//! the fraction is always three digits) with optional settings after the
//! second timestamp, then payload lines until the first blank line or the
//! end of input. Anything that is not a cue is skipped, which also covers
//! the index lines.

use std::ops::Range;

use crate::slice::{self, scan_digits, scan_i64};

/// One SubRip cue. The payload range spans all payload lines including
/// their inner line breaks, excluding the final separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	pub start_ms: i64,
	pub duration_ms: i64,
	pub payload: Range<usize>,
}

/// Iterate the cues of a SubRip file.
pub fn cues(text: &[u8]) -> Cues<'_> {
	Cues {
		text,
		lines: slice::lines(text),
	}
}

pub struct Cues<'a> {
	text: &'a [u8],
	lines: slice::Lines<'a>,
}

impl Iterator for Cues<'_> {
	type Item = Event;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let line = self.lines.next()?;
			let Some((start_ms, end_ms)) = parse_timing(&self.text[line.clone()]) else {
				continue;
			};

			// Payload runs to the first blank line or EOF.
			let mut payload = line.end..line.end;
			let mut first = true;
			for line in self.lines.by_ref() {
				if slice::trim(self.text, line.clone()).is_empty() {
					break;
				}
				if first {
					payload.start = line.start;
					first = false;
				}
				payload.end = line.end;
			}

			return Some(Event {
				start_ms,
				duration_ms: end_ms - start_ms,
				payload,
			});
		}
	}
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm [settings]`.
fn parse_timing(line: &[u8]) -> Option<(i64, i64)> {
	let mut pos = slice::skip_space(line);
	let start = read_ts(&line[pos..], &mut pos)?;

	pos += slice::skip_space(&line[pos..]);
	if !line[pos..].starts_with(b"-->") {
		return None;
	}
	pos += 3;
	pos += slice::skip_space(&line[pos..]);

	let end = read_ts(&line[pos..], &mut pos)?;
	// Positional settings after the second timestamp are tolerated.
	Some((start, end))
}

/// `HH:MM:SS,mmm` with exactly three fractional digits; `.` also accepted.
fn read_ts(buf: &[u8], pos: &mut usize) -> Option<i64> {
	let mut i = 0;

	let hh = scan_i64(&buf[i..]).filter(|s| s.value >= 0)?;
	i += hh.len;
	if buf.get(i) != Some(&b':') {
		return None;
	}
	i += 1;

	let (mm, n) = scan_digits(&buf[i..], 2)?;
	i += n;
	if buf.get(i) != Some(&b':') {
		return None;
	}
	i += 1;

	let (ss, n) = scan_digits(&buf[i..], 2)?;
	i += n;
	if !matches!(buf.get(i), Some(&b',') | Some(&b'.')) {
		return None;
	}
	i += 1;

	let (ms, n) = scan_digits(&buf[i..], 3)?;
	if n != 3 {
		return None;
	}
	i += n;

	*pos += i;
	Some((hh.value * 3600 + mm as i64 * 60 + ss as i64) * 1000 + ms as i64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn simple_cue() {
		let text = b"1\n00:00:01,000 --> 00:00:02,500\nHello\n\n";
		let got: Vec<_> = cues(text).collect();
		assert_eq!(got.len(), 1);
		assert_eq!(got[0].start_ms, 1000);
		assert_eq!(got[0].duration_ms, 1500);
		assert_eq!(&text[got[0].payload.clone()], b"Hello");
	}

	#[test]
	fn multi_line_payload() {
		let text = b"1\n00:00:01,000 --> 00:00:02,000\nfirst\nsecond\n\n2\n00:00:03,000 --> 00:00:04,000\nnext\n";
		let got: Vec<_> = cues(text).collect();
		assert_eq!(got.len(), 2);
		assert_eq!(&text[got[0].payload.clone()], b"first\nsecond");
		assert_eq!(&text[got[1].payload.clone()], b"next");
	}

	#[test]
	fn dot_separator_and_settings() {
		let text = b"00:01:00.250 --> 00:01:02.750 X1:10 X2:20\npayload\n";
		let got: Vec<_> = cues(text).collect();
		assert_eq!(got.len(), 1);
		assert_eq!(got[0].start_ms, 60_250);
		assert_eq!(got[0].duration_ms, 2500);
	}

	#[test]
	fn two_digit_fraction_rejected() {
		let text = b"00:00:01,00 --> 00:00:02,000\nHello\n";
		assert_eq!(cues(text).count(), 0);
	}

	#[test]
	fn junk_between_cues_skipped() {
		let text = b"garbage\nmore garbage\n\n3\n00:00:05,000 --> 00:00:06,000\nok\n";
		let got: Vec<_> = cues(text).collect();
		assert_eq!(got.len(), 1);
		assert_eq!(&text[got[0].payload.clone()], b"ok");
	}

	#[test]
	fn empty_payload() {
		let text = b"00:00:01,000 --> 00:00:02,000\n\nnext block\n";
		let got: Vec<_> = cues(text).collect();
		assert_eq!(got.len(), 1);
		assert!(got[0].payload.is_empty());
	}

	#[test]
	fn crlf_input() {
		let text = b"1\r\n00:00:01,000 --> 00:00:02,500\r\nHello\r\n\r\n";
		let got: Vec<_> = cues(text).collect();
		assert_eq!(got.len(), 1);
		assert_eq!(&text[got[0].payload.clone()], b"Hello");
	}
}
