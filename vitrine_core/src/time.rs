// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame clock time values.
//!
//! The root controller owns the frame clock and hands its current reading to
//! [`ViewTree::render`](crate::view::ViewTree::render). Animations advance
//! against that reading, so every animation in one render pass sees the same
//! instant.
//!
//! [`HostTime`] is a monotonic tick count, [`Duration`] a tick delta, and
//! [`Timebase`] the rational ticks-to-nanoseconds factor used when a value
//! has to be shown to a human or exported.

use core::fmt;
use core::ops::{Add, Sub};

/// A point on the frame clock, in monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// A timebase where ticks are milliseconds.
    pub const MILLIS: Self = Self {
        numer: 1_000_000,
        denom: 1,
    };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A span on the frame clock, in the same tick units as [`HostTime`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Creates a duration from milliseconds using the given timebase.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64, timebase: Timebase) -> Self {
        Self(timebase.nanos_to_ticks(millis.saturating_mul(1_000_000)))
    }

    /// Converts this duration to nanoseconds using the given timebase.
    #[inline]
    #[must_use]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        timebase.ticks_to_nanos(self.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}
