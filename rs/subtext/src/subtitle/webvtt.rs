//! WebVTT.
//!
//! The file must begin with `WEBVTT` followed by whitespace or the end of
//! the line. Cues are blank-line separated blocks: an optional identifier
//! line, a timing line `[HH:]MM:SS.fff --> [HH:]MM:SS.fff [settings]`,
//! then payload lines. Fractions of one to three digits are right-padded
//! to milliseconds. Blocks without a timing line (NOTE, STYLE, header
//! text) are skipped.

use std::ops::Range;

use crate::slice::{self, scan_digits, scan_i64};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
	pub start_ms: i64,
	pub end_ms: i64,
	pub identifier: Range<usize>,
	pub settings: Range<usize>,
	pub payload: Range<usize>,
}

/// Validate the `WEBVTT` magic and return a cue iterator.
pub fn parse(text: &[u8]) -> Result<Cues<'_>> {
	let mut lines = slice::lines(text);
	let magic = lines.next().ok_or(Error::Malformed)?;
	let line = &text[magic];
	if !line.starts_with(b"WEBVTT") {
		return Err(Error::Malformed);
	}
	match line.get(6) {
		None => {}
		Some(&b) if slice::is_ws(b) => {}
		Some(_) => return Err(Error::Malformed),
	}

	Ok(Cues { text, lines })
}

pub struct Cues<'a> {
	text: &'a [u8],
	lines: slice::Lines<'a>,
}

impl Cues<'_> {
	fn is_blank(&self, line: &Range<usize>) -> bool {
		slice::trim(self.text, line.clone()).is_empty()
	}

	fn skip_block(&mut self) {
		while let Some(line) = self.lines.next() {
			if self.is_blank(&line) {
				break;
			}
		}
	}
}

impl Iterator for Cues<'_> {
	type Item = Cue;

	fn next(&mut self) -> Option<Self::Item> {
		'block: loop {
			let mut line = self.lines.next()?;
			while self.is_blank(&line) {
				line = self.lines.next()?;
			}

			// A block's first line without an arrow is the identifier.
			let mut identifier = 0..0;
			if !contains_arrow(&self.text[line.clone()]) {
				identifier = line;
				line = match self.lines.next() {
					Some(next) if !self.is_blank(&next) => next,
					_ => continue 'block,
				};
				if !contains_arrow(&self.text[line.clone()]) {
					self.skip_block();
					continue 'block;
				}
			}

			let Some((start_ms, end_ms, settings)) = parse_timing(self.text, line.clone()) else {
				self.skip_block();
				continue 'block;
			};

			let mut payload = line.end..line.end;
			let mut first = true;
			let text = self.text;
			for line in self.lines.by_ref() {
				if slice::trim(text, line.clone()).is_empty() {
					break;
				}
				if first {
					payload.start = line.start;
					first = false;
				}
				payload.end = line.end;
			}

			return Some(Cue {
				start_ms,
				end_ms,
				identifier,
				settings,
				payload,
			});
		}
	}
}

fn contains_arrow(line: &[u8]) -> bool {
	line.windows(3).any(|w| w == b"-->")
}

fn parse_timing(text: &[u8], line: Range<usize>) -> Option<(i64, i64, Range<usize>)> {
	let buf = &text[line.clone()];
	let mut pos = slice::skip_space(buf);

	let start = read_ts(&buf[pos..], &mut pos)?;
	pos += slice::skip_space(&buf[pos..]);
	if !buf[pos..].starts_with(b"-->") {
		return None;
	}
	pos += 3;
	pos += slice::skip_space(&buf[pos..]);
	let end = read_ts(&buf[pos..], &mut pos)?;

	pos += slice::skip_space(&buf[pos..]);
	let settings = slice::trim_end(text, line.start + pos..line.end);
	Some((start, end, settings))
}

/// `[HH:]MM:SS.fff`, one to three fractional digits.
fn read_ts(buf: &[u8], pos: &mut usize) -> Option<i64> {
	let mut i = 0;

	let a = scan_i64(&buf[i..]).filter(|s| s.value >= 0)?;
	i += a.len;
	if buf.get(i) != Some(&b':') {
		return None;
	}
	i += 1;

	let (b, n) = scan_digits(&buf[i..], 2)?;
	i += n;

	let (hh, mm, ss) = match buf.get(i).copied() {
		Some(b':') => {
			i += 1;
			let (c, n) = scan_digits(&buf[i..], 2)?;
			i += n;
			(a.value, b as i64, c as i64)
		}
		_ => (0, a.value, b as i64),
	};

	if buf.get(i) != Some(&b'.') {
		return None;
	}
	i += 1;
	let (frac, n) = scan_digits(&buf[i..], 3)?;
	i += n;
	let ms = frac as i64 * [100, 10, 1][n - 1];

	*pos += i;
	Some((hh * 3600 + mm * 60 + ss) * 1000 + ms)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cue_without_hours() {
		let text = b"WEBVTT\n\n00:00.000 --> 00:01.000\nHello\n";
		let got: Vec<_> = parse(text).unwrap().collect();
		assert_eq!(got.len(), 1);
		assert_eq!(got[0].start_ms, 0);
		assert_eq!(got[0].end_ms, 1000);
		assert_eq!(&text[got[0].payload.clone()], b"Hello");
		assert!(got[0].identifier.is_empty());
		assert!(got[0].settings.is_empty());
	}

	#[test]
	fn missing_magic() {
		assert!(parse(b"00:00.000 --> 00:01.000\nHello\n").is_err());
		assert!(parse(b"WEBVTTX\n").is_err());
		assert!(parse(b"").is_err());
	}

	#[test]
	fn magic_with_trailing_text() {
		assert!(parse(b"WEBVTT - This file has cues.\n").is_ok());
		assert!(parse(b"WEBVTT\n").is_ok());
	}

	#[test]
	fn identifier_and_settings() {
		let text = b"WEBVTT\n\nintro\n00:00:01.500 --> 00:00:03.000 align:start line:0\nfirst line\nsecond line\n";
		let got: Vec<_> = parse(text).unwrap().collect();
		assert_eq!(got.len(), 1);
		assert_eq!(&text[got[0].identifier.clone()], b"intro");
		assert_eq!(&text[got[0].settings.clone()], b"align:start line:0");
		assert_eq!(&text[got[0].payload.clone()], b"first line\nsecond line");
		assert_eq!(got[0].start_ms, 1500);
		assert_eq!(got[0].end_ms, 3000);
	}

	#[test]
	fn short_fraction_is_padded() {
		let text = b"WEBVTT\n\n00:01.5 --> 00:02.25\nx\n";
		let got: Vec<_> = parse(text).unwrap().collect();
		assert_eq!(got[0].start_ms, 1500);
		assert_eq!(got[0].end_ms, 2250);
	}

	#[test]
	fn note_blocks_skipped() {
		let text = b"WEBVTT\n\nNOTE\nthis is a comment\n\n00:00.000 --> 00:01.000\nHello\n";
		let got: Vec<_> = parse(text).unwrap().collect();
		assert_eq!(got.len(), 1);
		assert_eq!(&text[got[0].payload.clone()], b"Hello");
	}

	#[test]
	fn multiple_cues() {
		let text = b"WEBVTT\n\n00:00.000 --> 00:01.000\na\n\n1\n00:01.000 --> 00:02.000\nb\n";
		let got: Vec<_> = parse(text).unwrap().collect();
		assert_eq!(got.len(), 2);
		assert_eq!(&text[got[1].identifier.clone()], b"1");
		assert_eq!(&text[got[1].payload.clone()], b"b");
	}
}
