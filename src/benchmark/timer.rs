//! Per-request latency timing.

use std::time::Instant;

/// Nanoseconds elapsed from `start` to `end`.
///
/// `Instant` is monotonic, so wall-clock adjustments between the two
/// samples cannot skew the result. A reversed pair saturates to zero,
/// and counts beyond `u64::MAX` nanoseconds truncate on the cast.
#[inline]
pub fn elapsed_nanos(start: Instant, end: Instant) -> u64 {
    end.duration_since(start).as_nanos() as u64
}
