//! The owned playlist model.

use std::ops::Range;

use url::Url;

use crate::events::{EventKind, EventReader};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	pub duration_us: i64,
	/// Absolute URL, resolved against the playlist's own URL.
	pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
	/// Declared bandwidth in bits per second.
	pub bandwidth: i32,
	pub url: String,
}

/// A parsed media or master playlist.
///
/// `segments` is empty exactly when the input was a variant list; segment
/// `i` carries media sequence number `start_seq_no + i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
	pub target_duration_us: i64,
	pub start_seq_no: i32,
	pub finished: bool,
	pub segments: Vec<Segment>,
	pub variants: Vec<Variant>,
}

/// Aggregate header fields collected by [scan].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
	pub target_duration_us: i64,
	pub start_seq_no: i32,
	pub finished: bool,
}

/// An `#EXTINF` or `#EXT-X-STREAM-INF` tag arms the next URI line; the
/// newer arming replaces an older one, and nothing else disarms.
enum Arming {
	None,
	Segment { duration_us: i64 },
	Variant { bandwidth: i32 },
}

/// Fold the event stream, handing every armed URI line (as a byte range
/// into `text`) to the matching callback. This is the shared core of the
/// owned model and the zero-copy FFI surface.
pub fn scan(
	text: &[u8],
	strict: bool,
	mut on_segment: impl FnMut(i64, Range<usize>),
	mut on_variant: impl FnMut(i32, Range<usize>),
) -> Result<Summary> {
	let mut summary = Summary::default();
	let mut arming = Arming::None;

	for event in EventReader::new(text) {
		let event = event?;
		match event.kind {
			EventKind::TargetDuration => summary.target_duration_us = event.num_a,
			EventKind::MediaSequence => {
				summary.start_seq_no = subtext::slice::saturate_i32(event.num_a)
			}
			EventKind::EndList => summary.finished = true,
			EventKind::Extinf => {
				arming = Arming::Segment {
					duration_us: event.num_a,
				}
			}
			EventKind::StreamInf => {
				arming = Arming::Variant {
					bandwidth: subtext::slice::saturate_i32(event.num_a),
				}
			}
			EventKind::Uri => match std::mem::replace(&mut arming, Arming::None) {
				Arming::Segment { duration_us } => on_segment(duration_us, event.a),
				Arming::Variant { bandwidth } => on_variant(bandwidth, event.a),
				Arming::None => {}
			},
			EventKind::Unknown => {
				if strict {
					return Err(Error::Malformed);
				}
			}
		}
	}

	Ok(summary)
}

impl Playlist {
	/// Parse playlist text, resolving URI lines against `base`.
	/// Unrecognized `#EXT*` tags are tolerated.
	pub fn parse(text: &[u8], base: &Url) -> Result<Self> {
		Self::parse_mode(text, base, false)
	}

	/// Like [Playlist::parse], but any unrecognized `#EXT*` tag is a
	/// parse error.
	pub fn parse_strict(text: &[u8], base: &Url) -> Result<Self> {
		Self::parse_mode(text, base, true)
	}

	fn parse_mode(text: &[u8], base: &Url, strict: bool) -> Result<Self> {
		let mut segments = Vec::new();
		let mut variants = Vec::new();
		let bad_url = std::cell::Cell::new(false);

		let summary = scan(
			text,
			strict,
			|duration_us, range| match resolve(base, &text[range]) {
				Some(url) => segments.push(Segment { duration_us, url }),
				None => bad_url.set(true),
			},
			|bandwidth, range| match resolve(base, &text[range]) {
				Some(url) => variants.push(Variant { bandwidth, url }),
				None => bad_url.set(true),
			},
		)?;
		if bad_url.get() {
			return Err(Error::Malformed);
		}

		Ok(Self {
			target_duration_us: summary.target_duration_us,
			start_seq_no: summary.start_seq_no,
			finished: summary.finished,
			segments,
			variants,
		})
	}

	/// The variant with the highest bandwidth; the first seen wins ties.
	pub fn best_variant(&self) -> Option<&Variant> {
		let mut best: Option<&Variant> = None;
		for variant in &self.variants {
			match best {
				Some(b) if variant.bandwidth <= b.bandwidth => {}
				_ => best = Some(variant),
			}
		}
		best
	}
}

fn resolve(base: &Url, uri: &[u8]) -> Option<String> {
	let uri = std::str::from_utf8(uri).ok()?;
	let url = match Url::parse(uri) {
		Ok(url) => url,
		Err(_) => base.join(uri).ok()?,
	};
	Some(url.into())
}
