use crate::Error;

/// Runs the provided function and converts its result to a C-compatible
/// return value, turning panics into an error code instead of unwinding
/// across the FFI boundary.
pub fn enter<C: ReturnCode, F: FnOnce() -> C>(f: F) -> i32 {
	match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
		Ok(ret) => ret.code(),
		Err(_) => Error::Panic.code(),
	}
}

/// Types that can be converted to C-compatible return codes.
pub trait ReturnCode {
	/// Convert to an i32 status code.
	fn code(&self) -> i32;
}

impl ReturnCode for () {
	fn code(&self) -> i32 {
		0
	}
}

impl ReturnCode for i32 {
	fn code(&self) -> i32 {
		*self
	}
}

impl ReturnCode for usize {
	fn code(&self) -> i32 {
		i32::try_from(*self).unwrap_or_else(|_| Error::InvalidCode.code())
	}
}

impl<T: ReturnCode> ReturnCode for Result<T, Error> {
	fn code(&self) -> i32 {
		match self {
			Ok(value) => value.code(),
			Err(e) => e.code(),
		}
	}
}

/// Parse a raw pointer and size into a byte slice.
///
/// Returns an empty slice if both pointer and size are zero.
///
/// # Safety
/// The caller must ensure that data is valid for 'a.
pub unsafe fn parse_slice<'a>(data: *const u8, size: usize) -> Result<&'a [u8], Error> {
	if data.is_null() {
		if size == 0 {
			return Ok(&[]);
		}
		return Err(Error::InvalidPointer);
	}

	let data = unsafe { std::slice::from_raw_parts(data, size) };
	Ok(data)
}

/// Parse a raw mutable pointer and capacity into a byte slice. A null
/// pointer or zero capacity yields the empty slice, which the parsers
/// treat as a size query.
///
/// # Safety
/// The caller must ensure that data is valid for 'a.
pub unsafe fn parse_slice_mut<'a>(data: *mut u8, size: usize) -> Result<&'a mut [u8], Error> {
	if data.is_null() || size == 0 {
		return Ok(&mut []);
	}

	let data = unsafe { std::slice::from_raw_parts_mut(data, size) };
	Ok(data)
}

/// Write a value through an out-pointer, rejecting null.
///
/// # Safety
/// `ptr` must be valid for writes of `T` when non-null.
pub unsafe fn store<T>(ptr: *mut T, value: T) -> Result<(), Error> {
	if ptr.is_null() {
		return Err(Error::InvalidPointer);
	}
	unsafe { ptr.write(value) };
	Ok(())
}

/// Write a value through an optional out-pointer, ignoring null.
///
/// # Safety
/// `ptr` must be valid for writes of `T` when non-null.
pub unsafe fn store_opt<T>(ptr: *mut T, value: T) {
	if !ptr.is_null() {
		unsafe { ptr.write(value) };
	}
}
