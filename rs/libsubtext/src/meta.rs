//! Metadata and script helper entry points.

#![allow(non_camel_case_types)]

use subtext::meta::{concat, data_uri, ffmetadata, id3v2, ttml};
use subtext::token;

use crate::{ffi, Error, Status};

/// Compute the ID3v2 tag length from the 10-byte header. Returns the
/// total tag length including the header, or 0 on any validation
/// failure.
///
/// # Safety
/// `buf` must be valid for `buf_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn subtext_id3v2_tag_len(buf: *const u8, buf_len: usize) -> i32 {
	ffi::enter(|| {
		let Ok(buf) = (unsafe { ffi::parse_slice(buf, buf_len) }) else {
			return 0;
		};
		i32::try_from(id3v2::tag_len(buf)).unwrap_or(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_data_uri_parsed {
	pub content_type_offset: usize,
	pub content_type_len: usize,
	pub payload_offset: usize,
	pub payload_len: usize,
	pub base64: i32,
}

/// Split a `data:content/type[;base64][;opt…],payload` URI into slices.
/// `uri_len` must include the trailing NUL byte (`strlen + 1`).
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_data_uri_parse(
	uri: *const u8,
	uri_len: usize,
	out: *mut subtext_data_uri_parsed,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let uri = unsafe { ffi::parse_slice(uri, uri_len) }?;
		let parsed = data_uri::parse(uri).map_err(Error::from)?;
		unsafe {
			ffi::store(
				out,
				subtext_data_uri_parsed {
					content_type_offset: parsed.content_type.start,
					content_type_len: parsed.content_type.len(),
					payload_offset: parsed.payload.start,
					payload_len: parsed.payload.len(),
					base64: parsed.base64 as i32,
				},
			)
		}?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_ffmetadata_split {
	pub eq_offset: usize,
	pub key_escaped_len: usize,
	pub value_escaped_len: usize,
	pub key_unescaped_len: usize,
	pub value_unescaped_len: usize,
}

/// Find the first `=` not escaped by a preceding backslash. `line_len`
/// must include the trailing NUL byte (`strlen + 1`).
///
/// Returns 0 and fills `out` when a split exists, 1 when none does, and
/// a negative code on invalid arguments.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_ffmetadata_split_kv(
	line: *const u8,
	line_len: usize,
	out: *mut subtext_ffmetadata_split,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let line = unsafe { ffi::parse_slice(line, line_len) }?;
		match ffmetadata::split_kv(line).map_err(Error::from)? {
			Some(split) => {
				unsafe {
					ffi::store(
						out,
						subtext_ffmetadata_split {
							eq_offset: split.eq_offset,
							key_escaped_len: split.key_escaped_len,
							value_escaped_len: split.value_escaped_len,
							key_unescaped_len: split.key_unescaped_len,
							value_unescaped_len: split.value_unescaped_len,
						},
					)
				}?;
				Ok(0)
			}
			None => Ok(1),
		}
	})
}

/// Unescape a byte string, removing one `\` per escape pair. Always
/// writes a trailing NUL when `dst_len > 0`.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_ffmetadata_unescape(
	dst: *mut u8,
	dst_len: usize,
	src: *const u8,
	src_len: usize,
	out_written: *mut usize,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let src = unsafe { ffi::parse_slice(src, src_len) }?;
		let dst = unsafe { ffi::parse_slice_mut(dst, dst_len) }?;
		let written = ffmetadata::unescape(dst, src).map_err(Error::from)?;
		unsafe { ffi::store_opt(out_written, written) };
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_ttml_extradata {
	/// 1 if the paragraph signature is present, else 0.
	pub is_paragraph_mode: i32,
	/// 1 if no additional strings follow the signature.
	pub is_default: i32,
	pub tt_params_offset: usize,
	pub pre_body_offset: usize,
}

/// Probe TTML track extradata. Offsets, when nonzero, point at
/// NUL-terminated strings already present in the buffer.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_ttml_parse_extradata(
	extradata: *const u8,
	extradata_len: usize,
	out: *mut subtext_ttml_extradata,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let extradata = unsafe { ffi::parse_slice(extradata, extradata_len) }?;
		let parsed = ttml::parse_extradata(extradata).map_err(Error::from)?;
		unsafe {
			ffi::store(
				out,
				subtext_ttml_extradata {
					is_paragraph_mode: parsed.paragraph as i32,
					is_default: parsed.is_default as i32,
					tt_params_offset: parsed.tt_params_off,
					pre_body_offset: parsed.pre_body_off,
				},
			)
		}?;
		Ok(0)
	})
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct subtext_concat_keyword {
	pub skip: usize,
	pub len: usize,
	pub advance: usize,
}

/// Parse a whitespace-delimited keyword from a concat script line.
/// `buf_len` must include the trailing NUL byte (`strlen + 1`).
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_concat_parse_keyword(
	buf: *const u8,
	buf_len: usize,
	out: *mut subtext_concat_keyword,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let buf = unsafe { ffi::parse_slice(buf, buf_len) }?;
		let kw = concat::parse_keyword(buf).map_err(Error::from)?;
		unsafe {
			ffi::store(
				out,
				subtext_concat_keyword {
					skip: kw.skip,
					len: kw.len,
					advance: kw.advance,
				},
			)
		}?;
		Ok(0)
	})
}

/// Read a whitespace-terminated token from a concat script.
/// See [subtext_util_get_token] for the buffer protocol.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_concat_get_token(
	buf: *const u8,
	buf_len: usize,
	dst: *mut u8,
	dst_len: usize,
	out_advance: *mut usize,
	out_required: *mut usize,
) -> Status {
	unsafe { subtext_util_get_token(buf, buf_len, b" \n\t\r\0".as_ptr(), 5, dst, dst_len, out_advance, out_required) }
}

/// Read one token from a NUL-terminated input against a NUL-terminated
/// terminator set, with backslash escapes and single-quote literals.
///
/// `buf_len` and `term_len` must include the trailing NUL bytes. The
/// output is always NUL-terminated when `dst_len > 0`; when `dst_len`
/// is too small, `-28` is returned and `*out_required` holds the
/// capacity that would succeed. `*out_advance` is the number of input
/// bytes to advance the cursor, pointing at the delimiter.
///
/// # Safety
/// All pointers must be valid for the given sizes.
#[no_mangle]
pub unsafe extern "C" fn subtext_util_get_token(
	buf: *const u8,
	buf_len: usize,
	term: *const u8,
	term_len: usize,
	dst: *mut u8,
	dst_len: usize,
	out_advance: *mut usize,
	out_required: *mut usize,
) -> Status {
	ffi::enter(|| -> Result<i32, Error> {
		let buf = unsafe { ffi::parse_slice(buf, buf_len) }?;
		let term = unsafe { ffi::parse_slice(term, term_len) }?;
		let dst = unsafe { ffi::parse_slice_mut(dst, dst_len) }?;

		match token::get_token(buf, term, dst) {
			Ok(tok) => {
				unsafe { ffi::store_opt(out_advance, tok.advance) };
				unsafe { ffi::store_opt(out_required, tok.required) };
				Ok(0)
			}
			Err(subtext::Error::OutOfSpace { advance, required }) => {
				unsafe { ffi::store_opt(out_advance, advance) };
				unsafe { ffi::store_opt(out_required, required) };
				Err(Error::OutOfSpace)
			}
			Err(err) => Err(err.into()),
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn token_two_pass_through_ffi() {
		let buf = b"  'a b' rest\0";
		let term = b" \0";
		let mut advance = 0usize;
		let mut required = 0usize;

		let rc = unsafe {
			subtext_util_get_token(
				buf.as_ptr(),
				buf.len(),
				term.as_ptr(),
				term.len(),
				std::ptr::null_mut(),
				0,
				&mut advance,
				&mut required,
			)
		};
		assert_eq!(rc, -28);
		assert_eq!(required, 4);

		let mut dst = vec![0u8; required];
		let rc = unsafe {
			subtext_util_get_token(
				buf.as_ptr(),
				buf.len(),
				term.as_ptr(),
				term.len(),
				dst.as_mut_ptr(),
				dst.len(),
				&mut advance,
				&mut required,
			)
		};
		assert_eq!(rc, 0);
		assert_eq!(&dst[..3], b"a b");
	}

	#[test]
	fn ffmetadata_split_codes() {
		let line = b"key=value\0";
		let mut out = subtext_ffmetadata_split::default();
		assert_eq!(
			unsafe { subtext_ffmetadata_split_kv(line.as_ptr(), line.len(), &mut out) },
			0
		);
		assert_eq!(out.eq_offset, 3);

		let line = b"no separator\0";
		assert_eq!(
			unsafe { subtext_ffmetadata_split_kv(line.as_ptr(), line.len(), &mut out) },
			1
		);
	}

	#[test]
	fn id3v2_len() {
		let header = [b'I', b'D', b'3', 4, 0, 0, 0, 0, 0, 10];
		assert_eq!(unsafe { subtext_id3v2_tag_len(header.as_ptr(), header.len()) }, 20);
		assert_eq!(unsafe { subtext_id3v2_tag_len(std::ptr::null(), 10) }, 0);
	}

	#[test]
	fn data_uri_slices() {
		let uri = b"data:text/plain;base64,aGk=\0";
		let mut out = subtext_data_uri_parsed::default();
		assert_eq!(unsafe { subtext_data_uri_parse(uri.as_ptr(), uri.len(), &mut out) }, 0);
		assert_eq!(out.base64, 1);
		assert_eq!(
			&uri[out.content_type_offset..out.content_type_offset + out.content_type_len],
			b"text/plain"
		);
		assert_eq!(&uri[out.payload_offset..out.payload_offset + out.payload_len], b"aGk=");
	}
}
