//! Injectable time sources.
//!
//! Expiry is detected lazily by comparing the cached expiry against [`Clock::now`], so swapping
//! in a [`ManualClock`] lets callers move time forward without sleeping.

// self
use crate::_prelude::*;

/// Source of the current UTC instant.
pub trait Clock
where
	Self: Debug + Send + Sync,
{
	/// Returns the current instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time via [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Shared clock that only moves when told to. Clones observe the same instant.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock frozen at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(start)))
	}

	/// Creates a clock frozen at the current wall-clock instant.
	pub fn starting_now() -> Self {
		Self::new(OffsetDateTime::now_utc())
	}

	/// Moves the clock forward (or backward, for negative deltas).
	pub fn advance(&self, delta: Duration) {
		let mut now = self.0.lock();

		*now += delta;
	}

	/// Jumps to an absolute instant.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn manual_clock_is_shared_between_clones() {
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC));
		let observer = clock.clone();

		clock.advance(Duration::seconds(10));

		assert_eq!(observer.now(), macros::datetime!(2025-01-01 00:00:10 UTC));

		observer.set(macros::datetime!(2025-06-01 12:00 UTC));

		assert_eq!(clock.now(), macros::datetime!(2025-06-01 12:00 UTC));
	}

	#[test]
	fn system_clock_moves_forward() {
		let clock = SystemClock;
		let first = clock.now();

		assert!(clock.now() >= first);
	}
}
