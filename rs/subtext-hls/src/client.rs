//! The live streaming client.
//!
//! A blocking, single-threaded driver over a nested byte protocol: it
//! reloads the playlist on the live reload clock and hands out segment
//! bytes in strict sequence order. All I/O, time, and cancellation are
//! injected so the state machine is deterministic under test; callers
//! provide an implementation of [Fetch] to perform the actual network
//! I/O.

use bytes::BytesMut;
use tracing::{debug, warn};
use url::Url;

use crate::{Error, Playlist, Result};

/// A blocking byte stream over one nested URL.
pub trait SegmentStream {
	/// Read some bytes into `dst`. `Ok(0)` means end of stream.
	fn read(&mut self, dst: &mut [u8]) -> Result<usize>;
}

/// Opens nested URLs on behalf of the client.
pub trait Fetch {
	type Stream: SegmentStream;

	fn open(&mut self, url: &str) -> Result<Self::Stream>;
}

/// Monotonic time and the blocking sleep primitive.
pub trait Clock {
	/// Monotonic time in microseconds.
	fn now(&self) -> i64;
	/// Block for the given number of microseconds.
	fn sleep(&mut self, micros: i64);
}

/// Cancellation query, polled between sleep slices and after failed
/// segment opens.
pub trait Interrupt {
	fn is_interrupted(&self) -> bool;
}

/// A [Clock] over [std::time::Instant] and [std::thread::sleep].
pub struct SystemClock {
	epoch: std::time::Instant,
}

impl Default for SystemClock {
	fn default() -> Self {
		Self {
			epoch: std::time::Instant::now(),
		}
	}
}

impl Clock for SystemClock {
	fn now(&self) -> i64 {
		self.epoch.elapsed().as_micros() as i64
	}

	fn sleep(&mut self, micros: i64) {
		std::thread::sleep(std::time::Duration::from_micros(micros.max(0) as u64));
	}
}

/// Never interrupts.
pub struct NoInterrupt;

impl Interrupt for NoInterrupt {
	fn is_interrupted(&self) -> bool {
		false
	}
}

/// Whether the stream is opened for reading or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Read,
	Write,
}

/// Poll the interrupt at least this often while waiting for a reload.
const SLEEP_SLICE_US: i64 = 100_000;

/// How much to ask the nested reader for at a time during reloads.
const RELOAD_CHUNK: usize = 4096;

pub struct Client<F: Fetch, C: Clock, I: Interrupt> {
	fetch: F,
	clock: C,
	interrupt: I,

	playlist_url: String,
	playlist: Playlist,
	cur_seq_no: i32,
	segment: Option<F::Stream>,
	last_load_time: i64,
}

impl<F: Fetch, C: Clock, I: Interrupt> Client<F, C, I> {
	/// Open an `hls+<scheme>://` URL and position the stream.
	///
	/// For a variant-list playlist the highest-bandwidth variant is
	/// followed (first seen wins ties). Live playlists with at least
	/// three segments start three from the end, per the HLS
	/// specification's recommendation.
	pub fn open(fetch: F, clock: C, interrupt: I, uri: &str, mode: Mode) -> Result<Self> {
		if mode == Mode::Write {
			return Err(Error::WriteUnsupported);
		}

		let nested = match uri.strip_prefix("hls+") {
			Some(rest) => rest,
			None => {
				if let Some(rest) = uri.strip_prefix("hls://") {
					warn!("no nested protocol specified, use e.g. hls+http://{rest}");
				} else {
					warn!(%uri, "unsupported url");
				}
				return Err(Error::UnsupportedUrl(uri.to_string()));
			}
		};

		let mut client = Self {
			fetch,
			clock,
			interrupt,
			playlist_url: nested.to_string(),
			playlist: Playlist::default(),
			cur_seq_no: 0,
			segment: None,
			last_load_time: 0,
		};
		client.reload_playlist()?;

		if client.playlist.segments.is_empty() {
			if let Some(best) = client.playlist.best_variant() {
				client.playlist_url = best.url.clone();
				client.reload_playlist()?;
			}
		}
		if client.playlist.segments.is_empty() {
			warn!("empty playlist");
			return Err(Error::EmptyPlaylist);
		}

		client.cur_seq_no = client.playlist.start_seq_no;
		if !client.playlist.finished && client.playlist.segments.len() >= 3 {
			client.cur_seq_no = client.playlist.start_seq_no + client.playlist.segments.len() as i32 - 3;
		}

		Ok(client)
	}

	/// Read segment bytes into `dst`.
	///
	/// Drains the open segment first; on end of segment, advances the
	/// sequence number and opens the next one, reloading the playlist
	/// when the reload clock says so and waiting (in interruptible
	/// 100 ms slices) when the live window has run dry. Failing segment
	/// opens are skipped with a warning; the stream continues.
	pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
		if dst.is_empty() {
			return Ok(0);
		}

		loop {
			if let Some(stream) = &mut self.segment {
				let n = stream.read(dst)?;
				if n > 0 {
					return Ok(n);
				}
				self.segment = None;
				self.cur_seq_no += 1;
			}

			// The last declared segment duration is the expected time
			// until the playlist grows; fall back to the target duration.
			let mut reload_interval = match self.playlist.segments.last() {
				Some(segment) => segment.duration_us,
				None => self.playlist.target_duration_us,
			};

			'retry: loop {
				if !self.playlist.finished
					&& self.clock.now() - self.last_load_time >= reload_interval
				{
					self.reload_playlist()?;
					// If the playlist still has nothing new for us, the
					// next reload within this call comes sooner.
					reload_interval = self.playlist.target_duration_us / 2;
				}

				if self.cur_seq_no < self.playlist.start_seq_no {
					warn!(
						"skipping {} segments ahead, expired from playlist",
						self.playlist.start_seq_no - self.cur_seq_no
					);
					self.cur_seq_no = self.playlist.start_seq_no;
				}

				let idx = (self.cur_seq_no - self.playlist.start_seq_no) as usize;
				if idx >= self.playlist.segments.len() {
					if self.playlist.finished {
						return Err(Error::Eof);
					}
					while self.clock.now() - self.last_load_time < reload_interval {
						if self.interrupt.is_interrupted() {
							return Err(Error::Interrupted);
						}
						self.clock.sleep(SLEEP_SLICE_US);
					}
					continue 'retry;
				}

				let url = &self.playlist.segments[idx].url;
				debug!(%url, "opening segment");
				match self.fetch.open(url) {
					Ok(stream) => {
						self.segment = Some(stream);
						break 'retry;
					}
					Err(Error::Interrupted) => return Err(Error::Interrupted),
					Err(err) => {
						if self.interrupt.is_interrupted() {
							return Err(Error::Interrupted);
						}
						warn!(%url, "unable to open segment: {err}");
						self.cur_seq_no += 1;
					}
				}
			}
		}
	}

	/// Drop the playlist state and any open segment stream.
	pub fn close(self) {}

	/// The sequence number of the segment the next read serves.
	pub fn current_sequence(&self) -> i32 {
		self.cur_seq_no
	}

	fn reload_playlist(&mut self) -> Result<()> {
		let base = Url::parse(&self.playlist_url)
			.map_err(|_| Error::UnsupportedUrl(self.playlist_url.clone()))?;

		let mut stream = self.fetch.open(&self.playlist_url)?;
		let mut text = BytesMut::new();
		let mut chunk = [0u8; RELOAD_CHUNK];
		loop {
			let n = stream.read(&mut chunk)?;
			if n == 0 {
				break;
			}
			text.extend_from_slice(&chunk[..n]);
		}

		self.playlist = Playlist::parse(&text, &base)?;
		self.last_load_time = self.clock.now();
		debug!(
			segments = self.playlist.segments.len(),
			variants = self.playlist.variants.len(),
			finished = self.playlist.finished,
			"loaded playlist"
		);
		Ok(())
	}
}
