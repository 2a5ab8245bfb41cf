//! Line-oriented playlist events.
//!
//! [EventReader] walks playlist text without copying: every slice an
//! event carries is an offset range into the input. This is the layer the
//! owned [crate::Playlist] model and the FFI surface are both built on.

use std::ops::Range;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use subtext::slice::{self, scan_f64, scan_i64};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum EventKind {
	Uri = 0,
	Extinf = 1,
	StreamInf = 2,
	TargetDuration = 3,
	MediaSequence = 4,
	EndList = 5,
	Unknown = 255,
}

/// One playlist line worth of information.
///
/// The meaning of the slices and numbers depends on the kind:
///
/// | kind             | `a`            | `b`   | `num_a`        |
/// |------------------|----------------|-------|----------------|
/// | `Uri`            | the URI        |       |                |
/// | `Extinf`         | full attribute | title | duration in us |
/// | `StreamInf`      | attribute list |       | `BANDWIDTH`    |
/// | `TargetDuration` |                |       | duration in us |
/// | `MediaSequence`  |                |       | sequence       |
/// | `EndList`        |                |       |                |
/// | `Unknown`        | the whole line |       |                |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	pub kind: EventKind,
	/// 1-based input line number.
	pub line_no: u32,
	pub a: Range<usize>,
	pub b: Range<usize>,
	pub num_a: i64,
	pub num_b: i64,
}

impl Event {
	fn new(kind: EventKind, line_no: u32) -> Self {
		Self {
			kind,
			line_no,
			a: 0..0,
			b: 0..0,
			num_a: 0,
			num_b: 0,
		}
	}
}

/// Iterate the events of a playlist.
///
/// The first non-empty line must be `#EXTM3U`. Lines that are neither
/// recognized tags, unknown `#EXT*` tags, nor URIs (i.e. plain comments
/// and blank lines) produce no event.
pub struct EventReader<'a> {
	text: &'a [u8],
	lines: slice::Lines<'a>,
	line_no: u32,
	started: bool,
	failed: bool,
}

impl<'a> EventReader<'a> {
	pub fn new(text: &'a [u8]) -> Self {
		Self {
			text,
			lines: slice::lines(text),
			line_no: 0,
			started: false,
			failed: false,
		}
	}

	fn next_line(&mut self) -> Option<Range<usize>> {
		let line = self.lines.next()?;
		self.line_no += 1;
		Some(line)
	}

	fn fail(&mut self) -> Option<Result<Event>> {
		self.failed = true;
		Some(Err(Error::Malformed))
	}

	fn parse_line(&mut self, line: Range<usize>) -> Option<Option<Event>> {
		let bytes = &self.text[line.clone()];
		let line_no = self.line_no;

		let event = if let Some(rest) = bytes.strip_prefix(b"#EXT-X-TARGETDURATION:") {
			let scan = scan_i64(rest)?;
			let mut ev = Event::new(EventKind::TargetDuration, line_no);
			ev.num_a = scan.value.saturating_mul(1_000_000);
			ev
		} else if let Some(rest) = bytes.strip_prefix(b"#EXT-X-MEDIA-SEQUENCE:") {
			let scan = scan_i64(rest)?;
			let mut ev = Event::new(EventKind::MediaSequence, line_no);
			ev.num_a = scan.value;
			ev
		} else if bytes.starts_with(b"#EXT-X-ENDLIST") {
			Event::new(EventKind::EndList, line_no)
		} else if let Some(rest) = bytes.strip_prefix(b"#EXT-X-STREAM-INF:") {
			let off = line.start + (bytes.len() - rest.len());
			let mut ev = Event::new(EventKind::StreamInf, line_no);
			ev.a = off..line.end;
			ev.num_a = attribute(rest, b"BANDWIDTH")
				.and_then(|v| scan_i64(v))
				.map(|s| s.value)
				.unwrap_or(0);
			ev
		} else if let Some(rest) = bytes.strip_prefix(b"#EXTINF:") {
			let off = line.start + (bytes.len() - rest.len());
			let (duration, len) = scan_f64(rest)?;
			let mut ev = Event::new(EventKind::Extinf, line_no);
			ev.a = off..line.end;
			ev.num_a = (duration * 1e6) as i64;
			if let Some(comma) = rest[len..].iter().position(|&b| b == b',') {
				ev.b = off + len + comma + 1..line.end;
			}
			ev
		} else if bytes.starts_with(b"#EXT") {
			let mut ev = Event::new(EventKind::Unknown, line_no);
			ev.a = line;
			ev
		} else if bytes.starts_with(b"#") {
			return Some(None);
		} else {
			let trimmed = slice::trim(self.text, line);
			if trimmed.is_empty() {
				return Some(None);
			}
			let mut ev = Event::new(EventKind::Uri, line_no);
			ev.a = trimmed;
			ev
		};

		Some(Some(event))
	}
}

impl Iterator for EventReader<'_> {
	type Item = Result<Event>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}

		if !self.started {
			// The first non-empty line must be the magic; running out of
			// input before seeing it is just as malformed.
			loop {
				let Some(line) = self.next_line() else {
					return self.fail();
				};
				let trimmed = slice::trim(self.text, line);
				if trimmed.is_empty() {
					continue;
				}
				if &self.text[trimmed] != b"#EXTM3U" {
					return self.fail();
				}
				self.started = true;
				break;
			}
		}

		loop {
			let line = self.next_line()?;
			match self.parse_line(line) {
				None => return self.fail(),
				Some(None) => continue,
				Some(Some(event)) => return Some(Ok(event)),
			}
		}
	}
}

/// Look up a `KEY=VALUE` attribute in a comma-separated list. Values may
/// be double-quoted, in which case commas are inert and the quotes are
/// stripped.
pub(crate) fn attribute<'a>(attrs: &'a [u8], key: &[u8]) -> Option<&'a [u8]> {
	let mut pos = 0;
	while pos < attrs.len() {
		pos += slice::skip_ws(&attrs[pos..]);

		let eq = attrs[pos..].iter().position(|&b| b == b'=')?;
		let name = &attrs[pos..pos + eq];
		pos += eq + 1;

		let (value, next) = if attrs.get(pos) == Some(&b'"') {
			let close = attrs[pos + 1..].iter().position(|&b| b == b'"')?;
			(&attrs[pos + 1..pos + 1 + close], pos + 1 + close + 1)
		} else {
			let end = attrs[pos..]
				.iter()
				.position(|&b| b == b',')
				.map(|c| pos + c)
				.unwrap_or(attrs.len());
			(&attrs[pos..end], end)
		};

		if name == key {
			return Some(value);
		}

		// Step past the comma separating this attribute from the next.
		pos = match attrs[next..].iter().position(|&b| b == b',') {
			Some(c) => next + c + 1,
			None => attrs.len(),
		};
	}
	None
}
