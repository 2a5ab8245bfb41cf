use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
	/// Null, empty, or structurally invalid required inputs.
	#[error("invalid arguments")]
	InvalidArgs,

	/// A URL the client cannot drive, e.g. `hls://` without a nested
	/// scheme.
	#[error("unsupported url: {0}")]
	UnsupportedUrl(String),

	/// The playlist text violates the format.
	#[error("malformed playlist")]
	Malformed,

	/// The destination buffer is too small; `required` bytes would
	/// succeed.
	#[error("output buffer too small: {required} bytes required")]
	OutOfSpace { advance: usize, required: usize },

	/// Open produced no segments, even after variant resolution.
	#[error("empty playlist")]
	EmptyPlaylist,

	/// The client only reads.
	#[error("writing is not supported")]
	WriteUnsupported,

	/// Cancellation was observed through the interrupt callback.
	#[error("interrupted")]
	Interrupted,

	/// A finished playlist has been fully drained.
	#[error("end of stream")]
	Eof,

	/// Nested reader failure, propagated verbatim.
	#[error("io error: {0}")]
	Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
	/// Wrap a nested transport error.
	pub fn io<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
		Self::Io(Arc::new(err))
	}
}

impl From<subtext::Error> for Error {
	fn from(err: subtext::Error) -> Self {
		match err {
			subtext::Error::InvalidArgs => Error::InvalidArgs,
			subtext::Error::OutOfSpace { advance, required } => Error::OutOfSpace { advance, required },
			subtext::Error::Malformed => Error::Malformed,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
