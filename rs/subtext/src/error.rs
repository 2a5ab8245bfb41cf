use thiserror::Error;

/// A parse error.
///
/// Parsers never partially succeed past a reported error. Buffer-filling
/// parsers report [Error::OutOfSpace] with both counters filled, so a call
/// with an empty destination doubles as a size query.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// A required input is missing, empty where disallowed, or not
	/// terminated the way the parser's contract demands.
	#[error("invalid arguments")]
	InvalidArgs,

	/// The destination buffer is too small.
	///
	/// `advance` is the number of input bytes the parser consumed and
	/// `required` the destination size (including any terminator) that
	/// would make the same call succeed.
	#[error("output buffer too small: {required} bytes required")]
	OutOfSpace { advance: usize, required: usize },

	/// The input violates the format.
	#[error("malformed input")]
	Malformed,
}

pub type Result<T> = std::result::Result<T, Error>;
