//! HLS playlist parser and writer entry points.
//!
//! The playlist functions return segment and variant URLs as slices into
//! the input text; the caller resolves them against the playlist URL and
//! must keep the text alive while consuming results. A null/zero-capacity
//! array turns either call into a size-only pass over the same input.

#![allow(non_camel_case_types)]

use subtext_hls::events::EventReader;
use subtext_hls::{scan, writer};

use crate::{ffi, Error, Status};

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_hls_segment {
	pub duration_us: i64,
	pub url_offset: usize,
	pub url_len: usize,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_hls_variant {
	pub bandwidth: i32,
	pub url_offset: usize,
	pub url_len: usize,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_hls_playlist {
	pub target_duration_us: i64,
	pub start_seq_no: i32,
	pub finished: i32,
	pub n_segments: usize,
	pub n_variants: usize,
}

unsafe fn parse_playlist(
	text: *const u8,
	text_len: usize,
	out_playlist: *mut subtext_hls_playlist,
	out_segments: *mut subtext_hls_segment,
	out_segments_cap: usize,
	out_variants: *mut subtext_hls_variant,
	out_variants_cap: usize,
	strict: bool,
) -> Result<i32, Error> {
	let text = unsafe { ffi::parse_slice(text, text_len) }?;

	let mut n_segments = 0;
	let mut n_variants = 0;
	let summary = scan(
		text,
		strict,
		|duration_us, url| {
			if !out_segments.is_null() && n_segments < out_segments_cap {
				unsafe {
					out_segments.add(n_segments).write(subtext_hls_segment {
						duration_us,
						url_offset: url.start,
						url_len: url.len(),
					})
				};
			}
			n_segments += 1;
		},
		|bandwidth, url| {
			if !out_variants.is_null() && n_variants < out_variants_cap {
				unsafe {
					out_variants.add(n_variants).write(subtext_hls_variant {
						bandwidth,
						url_offset: url.start,
						url_len: url.len(),
					})
				};
			}
			n_variants += 1;
		},
	)
	.map_err(Error::from)?;

	unsafe {
		ffi::store(
			out_playlist,
			subtext_hls_playlist {
				target_duration_us: summary.target_duration_us,
				start_seq_no: summary.start_seq_no,
				finished: summary.finished as i32,
				n_segments,
				n_variants,
			},
		)
	}?;
	Ok(0)
}

/// Parse an HLS playlist; unrecognized `#EXT*` tags are tolerated.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_hls_parse(
	text: *const u8,
	text_len: usize,
	out_playlist: *mut subtext_hls_playlist,
	out_segments: *mut subtext_hls_segment,
	out_segments_cap: usize,
	out_variants: *mut subtext_hls_variant,
	out_variants_cap: usize,
) -> Status {
	ffi::enter(|| unsafe {
		parse_playlist(
			text,
			text_len,
			out_playlist,
			out_segments,
			out_segments_cap,
			out_variants,
			out_variants_cap,
			false,
		)
	})
}

/// Like [subtext_hls_parse], but any unrecognized `#EXT*` tag fails the
/// parse.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_hls_parse_strict(
	text: *const u8,
	text_len: usize,
	out_playlist: *mut subtext_hls_playlist,
	out_segments: *mut subtext_hls_segment,
	out_segments_cap: usize,
	out_variants: *mut subtext_hls_variant,
	out_variants_cap: usize,
) -> Status {
	ffi::enter(|| unsafe {
		parse_playlist(
			text,
			text_len,
			out_playlist,
			out_segments,
			out_segments_cap,
			out_variants,
			out_variants_cap,
			true,
		)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_hls_event {
	/// A [subtext_hls_event_kind] value.
	pub kind: u32,
	pub line_no: u32,

	/// Primary slice into the input (URI, attribute list, …).
	pub a_offset: usize,
	pub a_len: usize,

	/// Secondary slice into the input (EXTINF title).
	pub b_offset: usize,
	pub b_len: usize,

	/// Parsed numeric fields; meaning depends on the kind.
	pub num_a: i64,
	pub num_b: i64,
}

#[repr(u32)]
pub enum subtext_hls_event_kind {
	SUBTEXT_HLS_EVENT_URI = 0,
	SUBTEXT_HLS_EVENT_EXTINF = 1,
	SUBTEXT_HLS_EVENT_STREAM_INF = 2,
	SUBTEXT_HLS_EVENT_TARGETDURATION = 3,
	SUBTEXT_HLS_EVENT_MEDIA_SEQUENCE = 4,
	SUBTEXT_HLS_EVENT_ENDLIST = 5,
	SUBTEXT_HLS_EVENT_UNKNOWN = 255,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_hls_events_result {
	pub n_events_total: usize,
	pub n_events_written: usize,
	pub truncated: i32,
}

/// Parse an HLS playlist into a flat stream of events.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_hls_parse_events(
	text: *const u8,
	text_len: usize,
	out: *mut subtext_hls_events_result,
	events: *mut subtext_hls_event,
	events_cap: usize,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let text = unsafe { ffi::parse_slice(text, text_len) }?;

		let mut total = 0;
		let mut written = 0;
		for event in EventReader::new(text) {
			let event = event.map_err(Error::from)?;
			if !events.is_null() && written < events_cap {
				unsafe {
					events.add(written).write(subtext_hls_event {
						kind: event.kind.into(),
						line_no: event.line_no,
						a_offset: event.a.start,
						a_len: event.a.len(),
						b_offset: event.b.start,
						b_len: event.b.len(),
						num_a: event.num_a,
						num_b: event.num_b,
					})
				};
				written += 1;
			}
			total += 1;
		}

		unsafe {
			ffi::store(
				out,
				subtext_hls_events_result {
					n_events_total: total,
					n_events_written: written,
					truncated: (written < total) as i32,
				},
			)
		}?;
		Ok(0)
	})
}

/// Write the playlist version header `#EXTM3U\n#EXT-X-VERSION:<N>\n`.
///
/// Returns the bytes written excluding the NUL terminator, or a
/// negative code (`-28` with a short buffer, after writing a
/// NUL-terminated prefix).
///
/// # Safety
/// `dst` must be valid for `dst_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn subtext_hls_write_playlist_version(
	dst: *mut u8,
	dst_len: usize,
	version: i32,
) -> isize {
	let code = ffi::enter(|| -> Result<i32, Error> {
		let dst = unsafe { ffi::parse_slice_mut(dst, dst_len) }?;
		let version = u32::try_from(version).map_err(|_| Error::InvalidArgs)?;
		let written = writer::write_playlist_version(dst, version).map_err(Error::from)?;
		i32::try_from(written).map_err(|_| Error::InvalidCode)
	});
	code as isize
}

#[cfg(test)]
mod tests {
	use super::*;

	const VOD: &[u8] = b"#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:42\n#EXTINF:9.5,\na.ts\n#EXTINF:10.0,\nb.ts\n#EXT-X-ENDLIST\n";

	#[test]
	fn parse_size_query_then_fill() {
		let mut pl = subtext_hls_playlist::default();

		let rc = unsafe {
			subtext_hls_parse(
				VOD.as_ptr(),
				VOD.len(),
				&mut pl,
				std::ptr::null_mut(),
				0,
				std::ptr::null_mut(),
				0,
			)
		};
		assert_eq!(rc, 0);
		assert_eq!(pl.target_duration_us, 10_000_000);
		assert_eq!(pl.start_seq_no, 42);
		assert_eq!(pl.finished, 1);
		assert_eq!(pl.n_segments, 2);
		assert_eq!(pl.n_variants, 0);

		let mut segs = [subtext_hls_segment::default(); 4];
		let mut vars = [subtext_hls_variant::default(); 4];
		let rc = unsafe {
			subtext_hls_parse(
				VOD.as_ptr(),
				VOD.len(),
				&mut pl,
				segs.as_mut_ptr(),
				segs.len(),
				vars.as_mut_ptr(),
				vars.len(),
			)
		};
		assert_eq!(rc, 0);
		assert_eq!(segs[0].duration_us, 9_500_000);
		assert_eq!(&VOD[segs[0].url_offset..segs[0].url_offset + segs[0].url_len], b"a.ts");
		assert_eq!(segs[1].duration_us, 10_000_000);
		assert_eq!(&VOD[segs[1].url_offset..segs[1].url_offset + segs[1].url_len], b"b.ts");
	}

	#[test]
	fn strict_mode_difference() {
		let text = b"#EXTM3U\n#EXT-X-ODD:1\n#EXTINF:4,\na.ts\n";
		let mut pl = subtext_hls_playlist::default();
		let lenient = unsafe {
			subtext_hls_parse(
				text.as_ptr(),
				text.len(),
				&mut pl,
				std::ptr::null_mut(),
				0,
				std::ptr::null_mut(),
				0,
			)
		};
		assert_eq!(lenient, 0);
		assert_eq!(pl.n_segments, 1);

		let strict = unsafe {
			subtext_hls_parse_strict(
				text.as_ptr(),
				text.len(),
				&mut pl,
				std::ptr::null_mut(),
				0,
				std::ptr::null_mut(),
				0,
			)
		};
		assert_eq!(strict, -1);
	}

	#[test]
	fn event_stream() {
		let mut out = subtext_hls_events_result::default();
		let rc = unsafe {
			subtext_hls_parse_events(VOD.as_ptr(), VOD.len(), &mut out, std::ptr::null_mut(), 0)
		};
		assert_eq!(rc, 0);
		assert_eq!(out.n_events_total, 7);
		assert_eq!(out.truncated, 1);

		let mut events = [subtext_hls_event::default(); 16];
		let rc = unsafe {
			subtext_hls_parse_events(VOD.as_ptr(), VOD.len(), &mut out, events.as_mut_ptr(), 16)
		};
		assert_eq!(rc, 0);
		assert_eq!(out.truncated, 0);
		assert_eq!(events[0].kind, 3);
		assert_eq!(events[0].line_no, 2);
		assert_eq!(events[3].kind, 0);
		assert_eq!(&VOD[events[3].a_offset..events[3].a_offset + events[3].a_len], b"a.ts");
	}

	#[test]
	fn writer_byte_exact() {
		let mut dst = [0u8; 64];
		let n = unsafe { subtext_hls_write_playlist_version(dst.as_mut_ptr(), dst.len(), 7) };
		assert_eq!(n, 25);
		assert_eq!(&dst[..26], b"#EXTM3U\n#EXT-X-VERSION:7\n\0");

		let mut small = [0u8; 8];
		let n = unsafe { subtext_hls_write_playlist_version(small.as_mut_ptr(), small.len(), 7) };
		assert_eq!(n, -28);

		let n = unsafe { subtext_hls_write_playlist_version(std::ptr::null_mut(), 0, 7) };
		assert_eq!(n, -28);

		let n = unsafe { subtext_hls_write_playlist_version(dst.as_mut_ptr(), dst.len(), -1) };
		assert_eq!(n, -22);
	}
}
