//! Subtitle and caption parser entry points.

#![allow(non_camel_case_types)]

use subtext::subtitle::{
	aqtitle, ass, jacosub, lrc, mcc, microdvd, mpl2, mpsub, pjs, realtext, sami, scc, srt, stl,
	subviewer, vplayer, webvtt,
};

use crate::{ffi, Error, Status};

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_srt_event {
	pub start_ms: i64,
	pub duration_ms: i64,
	pub payload_offset: usize,
	pub payload_len: usize,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_srt_parse_result {
	pub n_events: usize,
}

/// Parse SubRip text into events. Payloads are slices into the input.
///
/// With a null `events` array (or zero capacity) only `out.n_events` is
/// reported; otherwise up to `events_cap` events are written.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_srt_parse(
	text: *const u8,
	text_len: usize,
	out: *mut subtext_srt_parse_result,
	events: *mut subtext_srt_event,
	events_cap: usize,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let text = unsafe { ffi::parse_slice(text, text_len) }?;

		let mut n_events = 0;
		for event in srt::cues(text) {
			if !events.is_null() && n_events < events_cap {
				unsafe {
					events.add(n_events).write(subtext_srt_event {
						start_ms: event.start_ms,
						duration_ms: event.duration_ms,
						payload_offset: event.payload.start,
						payload_len: event.payload.len(),
					})
				};
			}
			n_events += 1;
		}

		unsafe { ffi::store(out, subtext_srt_parse_result { n_events }) }?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_webvtt_cue {
	pub start_ms: i64,
	pub end_ms: i64,
	pub payload_offset: usize,
	pub payload_len: usize,
	pub identifier_offset: usize,
	pub identifier_len: usize,
	pub settings_offset: usize,
	pub settings_len: usize,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_webvtt_parse_result {
	pub n_cues: usize,
}

/// Parse WebVTT text into cues. Fails when the `WEBVTT` magic is absent.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_webvtt_parse(
	text: *const u8,
	text_len: usize,
	out: *mut subtext_webvtt_parse_result,
	cues: *mut subtext_webvtt_cue,
	cues_cap: usize,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let text = unsafe { ffi::parse_slice(text, text_len) }?;

		let mut n_cues = 0;
		for cue in webvtt::parse(text).map_err(Error::from)? {
			if !cues.is_null() && n_cues < cues_cap {
				unsafe {
					cues.add(n_cues).write(subtext_webvtt_cue {
						start_ms: cue.start_ms,
						end_ms: cue.end_ms,
						payload_offset: cue.payload.start,
						payload_len: cue.payload.len(),
						identifier_offset: cue.identifier.start,
						identifier_len: cue.identifier.len(),
						settings_offset: cue.settings.start,
						settings_len: cue.settings.len(),
					})
				};
			}
			n_cues += 1;
		}

		unsafe { ffi::store(out, subtext_webvtt_parse_result { n_cues }) }?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_ass_dialogue {
	pub start_cs: i64,
	pub duration_cs: i32,
	pub layer: i32,
	pub rest_off: usize,
}

/// Parse an SSA/ASS `Dialogue:` line.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_ass_parse_dialogue(
	line: *const u8,
	line_len: usize,
	out: *mut subtext_ass_dialogue,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let d = ass::parse_dialogue(line).map_err(Error::from)?;
		unsafe {
			ffi::store(
				out,
				subtext_ass_dialogue {
					start_cs: d.start_cs,
					duration_cs: d.duration_cs,
					layer: d.layer,
					rest_off: d.rest_off,
				},
			)
		}?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_microdvd_event {
	pub start_frame: i64,
	/// -1 if unknown
	pub duration_frames: i64,
	pub payload_offset: usize,
	pub payload_len: usize,
}

/// Parse a MicroDVD line `{start}{end}text` (or `{start}{}text`).
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_microdvd_parse_line(
	line: *const u8,
	line_len: usize,
	out: *mut subtext_microdvd_event,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let ev = microdvd::parse_line(line).map_err(Error::from)?;
		unsafe {
			ffi::store(
				out,
				subtext_microdvd_event {
					start_frame: ev.start_frame,
					duration_frames: ev.duration_frames,
					payload_offset: ev.payload.start,
					payload_len: ev.payload.len(),
				},
			)
		}?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_mpl2_event {
	/// 1 tick = 1/10 s
	pub start_ticks: i64,
	/// -1 if unknown
	pub duration_ticks: i64,
	pub payload_offset: usize,
	pub payload_len: usize,
}

/// Parse an MPL2 line `[start][end]text` (or `[start][]text`).
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_mpl2_parse_line(
	line: *const u8,
	line_len: usize,
	out: *mut subtext_mpl2_event,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let ev = mpl2::parse_line(line).map_err(Error::from)?;
		unsafe {
			ffi::store(
				out,
				subtext_mpl2_event {
					start_ticks: ev.start_ticks,
					duration_ticks: ev.duration_ticks,
					payload_offset: ev.payload.start,
					payload_len: ev.payload.len(),
				},
			)
		}?;
		Ok(0)
	})
}

/// Parse one MPSub timing line into `(start, duration)` in TSBASE
/// (10,000,000) units.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_mpsub_parse_line(
	line: *const u8,
	line_len: usize,
	out_start: *mut i64,
	out_duration: *mut i64,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let (start, duration) = mpsub::parse_line(line).map_err(Error::from)?;
		unsafe { ffi::store(out_start, start) }?;
		unsafe { ffi::store(out_duration, duration) }?;
		Ok(0)
	})
}

/// Parse a PJS line `start,end,"payload"`.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_pjs_parse_line(
	line: *const u8,
	line_len: usize,
	out_payload_off: *mut usize,
	out_start: *mut i64,
	out_duration: *mut i32,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let ev = pjs::parse_line(line).map_err(Error::from)?;
		unsafe { ffi::store(out_payload_off, ev.payload.start) }?;
		unsafe { ffi::store(out_start, ev.start) }?;
		unsafe { ffi::store(out_duration, ev.duration) }?;
		Ok(0)
	})
}

/// Parse an STL line `HH:MM:SS:CC , HH:MM:SS:CC , payload`.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_stl_parse_line(
	line: *const u8,
	line_len: usize,
	out_payload_off: *mut usize,
	out_start_cs: *mut i64,
	out_duration_cs: *mut i32,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let ev = stl::parse_line(line).map_err(Error::from)?;
		unsafe { ffi::store(out_payload_off, ev.payload_off) }?;
		unsafe { ffi::store(out_start_cs, ev.start_cs) }?;
		unsafe { ffi::store(out_duration_cs, ev.duration_cs) }?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_vplayer_event {
	/// centiseconds (1/100 s)
	pub start_cs: i64,
	pub payload_offset: usize,
	pub payload_len: usize,
}

/// Parse a VPlayer line `H:MM:SS[.CC][: =]text`.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_vplayer_parse_line(
	line: *const u8,
	line_len: usize,
	out: *mut subtext_vplayer_event,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let ev = vplayer::parse_line(line).map_err(Error::from)?;
		unsafe {
			ffi::store(
				out,
				subtext_vplayer_event {
					start_cs: ev.start_cs,
					payload_offset: ev.payload.start,
					payload_len: ev.payload.len(),
				},
			)
		}?;
		Ok(0)
	})
}

/// Parse a JACOsub `SHIFT` directive parameter into a frame offset.
/// Returns the offset itself; 0 on any failure.
///
/// # Safety
/// `text` must be valid for `text_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn subtext_jacosub_parse_shift(
	timeres: u32,
	text: *const u8,
	text_len: usize,
) -> i32 {
	ffi::enter(|| {
		let Ok(text) = (unsafe { ffi::parse_slice(text, text_len) }) else {
			return 0;
		};
		jacosub::parse_shift(timeres, text)
	})
}

/// Parse a JACOsub timed line and compute packet timing in centiseconds.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_jacosub_read_ts(
	timeres: u32,
	shift_frames: i32,
	line: *const u8,
	line_len: usize,
	out_start_cs: *mut i64,
	out_duration_cs: *mut i64,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let timing = jacosub::read_ts(timeres, shift_frames, line).map_err(Error::from)?;
		unsafe { ffi::store(out_start_cs, timing.start_cs) }?;
		unsafe { ffi::store(out_duration_cs, timing.duration_cs) }?;
		Ok(0)
	})
}

/// Length in bytes of the leading timestamp group of an LRC line.
///
/// # Safety
/// `line` must be valid for `line_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn subtext_lrc_count_ts_prefix(line: *const u8, line_len: usize) -> usize {
	let Ok(line) = (unsafe { ffi::parse_slice(line, line_len) }) else {
		return 0;
	};
	lrc::count_ts_prefix(line)
}

/// Parse one leading LRC timestamp. Returns the bytes consumed and
/// writes the start time in microseconds; returns 0 when the line does
/// not start with a timestamp.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_lrc_read_ts(
	line: *const u8,
	line_len: usize,
	out_start_us: *mut i64,
) -> usize {
	let Ok(line) = (unsafe { ffi::parse_slice(line, line_len) }) else {
		return 0;
	};
	match lrc::read_ts(line) {
		Some((consumed, start_us)) => {
			unsafe { ffi::store_opt(out_start_us, start_us) };
			consumed
		}
		None => 0,
	}
}

/// Parse a SAMI `Start=` value into milliseconds.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_sami_parse_start_ms(
	s: *const u8,
	s_len: usize,
	out_ms: *mut i64,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let s = unsafe { ffi::parse_slice(s, s_len) }?;
		let ms = sami::parse_start_ms(s).map_err(Error::from)?;
		unsafe { ffi::store(out_ms, ms) }?;
		Ok(0)
	})
}

/// Parse a RealText timestamp into centiseconds.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_realtext_read_ts(
	s: *const u8,
	s_len: usize,
	out_cs: *mut i64,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let s = unsafe { ffi::parse_slice(s, s_len) }?;
		let cs = realtext::read_ts(s).map_err(Error::from)?;
		unsafe { ffi::store(out_cs, cs) }?;
		Ok(0)
	})
}

/// Parse a SubViewer timestamp line into start and duration in ms.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_subviewer_read_ts(
	line: *const u8,
	line_len: usize,
	out_start_ms: *mut i64,
	out_duration_ms: *mut i32,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let (start, duration) = subviewer::read_ts(line).map_err(Error::from)?;
		unsafe { ffi::store(out_start_ms, start) }?;
		unsafe { ffi::store(out_duration_ms, duration) }?;
		Ok(0)
	})
}

/// Parse a SubViewer v1 time tag `[HH:MM:SS]`. Returns 1 on success, 0
/// on no match.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_subviewer1_parse_time(
	line: *const u8,
	line_len: usize,
	out_hh: *mut i32,
	out_mm: *mut i32,
	out_ss: *mut i32,
) -> i32 {
	ffi::enter(|| {
		let Ok(line) = (unsafe { ffi::parse_slice(line, line_len) }) else {
			return 0;
		};
		match subviewer::parse_time_v1(line) {
			Some((hh, mm, ss)) => {
				unsafe { ffi::store_opt(out_hh, hh) };
				unsafe { ffi::store_opt(out_mm, mm) };
				unsafe { ffi::store_opt(out_ss, ss) };
				1
			}
			None => 0,
		}
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_scc_parse_words_result {
	pub n_words_total: usize,
	pub n_words_written: usize,
	pub truncated: i32,
}

/// Parse SCC payload hex words ("9420 942c …") into u16 words. Parsing
/// stops at the first invalid token.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_scc_parse_words(
	text: *const u8,
	text_len: usize,
	out: *mut subtext_scc_parse_words_result,
	words: *mut u16,
	words_cap: usize,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let text = unsafe { ffi::parse_slice(text, text_len) }?;
		let words = if words.is_null() {
			&mut [][..]
		} else {
			unsafe { std::slice::from_raw_parts_mut(words, words_cap) }
		};

		let parsed = scc::parse_words(text, words);
		unsafe {
			ffi::store(
				out,
				subtext_scc_parse_words_result {
					n_words_total: parsed.total,
					n_words_written: parsed.written,
					truncated: parsed.truncated as i32,
				},
			)
		}?;
		Ok(0)
	})
}

/// Convert bytes to an MCC hex string, NUL-terminated, applying the MCC
/// alias rules when `use_alias` is nonzero. `dest_cap` must cover the
/// encoding plus the NUL; `1 + 2 * bytes_size` always suffices.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_mcc_bytes_to_hex(
	dest: *mut u8,
	dest_cap: usize,
	bytes: *const u8,
	bytes_size: usize,
	use_alias: i32,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let bytes = unsafe { ffi::parse_slice(bytes, bytes_size) }?;
		let dest = unsafe { ffi::parse_slice_mut(dest, dest_cap) }?;
		mcc::bytes_to_hex(dest, bytes, use_alias != 0).map_err(Error::from)?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_mcc_expand_result {
	pub n_bytes_total: usize,
	pub n_bytes_written: usize,
	pub truncated: i32,
}

/// Expand an MCC payload string (hex plus alias chars) into raw bytes.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_mcc_expand_payload(
	text: *const u8,
	text_len: usize,
	out: *mut subtext_mcc_expand_result,
	bytes: *mut u8,
	bytes_cap: usize,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let text = unsafe { ffi::parse_slice(text, text_len) }?;
		let bytes = unsafe { ffi::parse_slice_mut(bytes, bytes_cap) }?;

		let parsed = mcc::expand_payload(text, bytes);
		unsafe {
			ffi::store(
				out,
				subtext_mcc_expand_result {
					n_bytes_total: parsed.total,
					n_bytes_written: parsed.written,
					truncated: parsed.truncated as i32,
				},
			)
		}?;
		Ok(0)
	})
}

/// Parse an AQTitle frame marker line (`-->> <frame>`).
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_aqtitle_parse_marker(
	line: *const u8,
	line_len: usize,
	out_frame: *mut i64,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		let frame = aqtitle::parse_marker(line).map_err(Error::from)?;
		unsafe { ffi::store(out_frame, frame) }?;
		Ok(0)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn srt_two_pass() {
		let text = b"1\n00:00:01,000 --> 00:00:02,500\nHello\n\n";
		let mut out = subtext_srt_parse_result::default();

		let rc = unsafe {
			subtext_srt_parse(text.as_ptr(), text.len(), &mut out, std::ptr::null_mut(), 0)
		};
		assert_eq!(rc, 0);
		assert_eq!(out.n_events, 1);

		let mut events = [subtext_srt_event::default(); 4];
		let rc = unsafe {
			subtext_srt_parse(text.as_ptr(), text.len(), &mut out, events.as_mut_ptr(), 4)
		};
		assert_eq!(rc, 0);
		assert_eq!(events[0].start_ms, 1000);
		assert_eq!(events[0].duration_ms, 1500);
		let payload = &text[events[0].payload_offset..events[0].payload_offset + events[0].payload_len];
		assert_eq!(payload, b"Hello");
	}

	#[test]
	fn webvtt_rejects_bad_magic() {
		let text = b"nope";
		let mut out = subtext_webvtt_parse_result::default();
		let rc = unsafe {
			subtext_webvtt_parse(text.as_ptr(), text.len(), &mut out, std::ptr::null_mut(), 0)
		};
		assert_eq!(rc, -1);
	}

	#[test]
	fn null_out_pointer() {
		let text = b"1\n00:00:01,000 --> 00:00:02,500\nHello\n\n";
		let rc = unsafe {
			subtext_srt_parse(
				text.as_ptr(),
				text.len(),
				std::ptr::null_mut(),
				std::ptr::null_mut(),
				0,
			)
		};
		assert_eq!(rc, -14);
	}

	#[test]
	fn jacosub_shift_passthrough() {
		assert_eq!(unsafe { subtext_jacosub_parse_shift(30, b"5".as_ptr(), 1) }, 5);
		assert_eq!(unsafe { subtext_jacosub_parse_shift(30, std::ptr::null(), 3) }, 0);
	}

	#[test]
	fn mcc_hex_round_trip() {
		let data = [0xfa, 0x00, 0x00, 0x42];
		let mut text = [0u8; 16];
		let rc = unsafe {
			subtext_mcc_bytes_to_hex(text.as_mut_ptr(), text.len(), data.as_ptr(), data.len(), 1)
		};
		assert_eq!(rc, 0);
		let len = text.iter().position(|&b| b == 0).unwrap();
		assert_eq!(&text[..len], b"G42");

		let mut out = subtext_mcc_expand_result::default();
		let mut bytes = [0u8; 16];
		let rc = unsafe {
			subtext_mcc_expand_payload(text.as_ptr(), len, &mut out, bytes.as_mut_ptr(), 16)
		};
		assert_eq!(rc, 0);
		assert_eq!(out.n_bytes_total, 4);
		assert_eq!(&bytes[..4], &data);
	}

	#[test]
	fn scc_reports_truncation() {
		let text = b"9420 942c 94ae";
		let mut out = subtext_scc_parse_words_result::default();
		let mut words = [0u16; 2];
		let rc = unsafe {
			subtext_scc_parse_words(text.as_ptr(), text.len(), &mut out, words.as_mut_ptr(), 2)
		};
		assert_eq!(rc, 0);
		assert_eq!(out.n_words_total, 3);
		assert_eq!(out.n_words_written, 2);
		assert_eq!(out.truncated, 1);
	}
}
