use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MICRO: i64 = 1_000;

// Invariant:
// `nanos` is a forward offset in 0..1_000_000_000, so the derived
// (seconds, nanos) field ordering is the instant ordering.

///
/// Timestamp
///
/// Absolute instant stored as whole seconds since the Unix epoch plus a
/// nanosecond offset. Instants before the epoch carry a negative
/// seconds component and a positive nanosecond offset.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    pub const EPOCH: Self = Self {
        seconds: 0,
        nanos: 0,
    };
    pub const MIN: Self = Self {
        seconds: i64::MIN,
        nanos: 0,
    };
    pub const MAX: Self = Self {
        seconds: i64::MAX,
        nanos: 999_999_999,
    };

    /// Construct from whole seconds and a nanosecond offset; offsets of
    /// a second or more carry into the seconds component.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    pub const fn from_seconds_nanos(seconds: i64, nanos: u32) -> Self {
        let carry = nanos as i64 / NANOS_PER_SECOND;
        Self {
            seconds: seconds.saturating_add(carry),
            nanos: (nanos as i64 % NANOS_PER_SECOND) as u32,
        }
    }

    /// Construct from whole seconds.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Construct from microseconds since the epoch.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    pub const fn from_micros(micros: i64) -> Self {
        let nanos = micros.rem_euclid(NANOS_PER_SECOND / NANOS_PER_MICRO) * NANOS_PER_MICRO;
        Self {
            seconds: micros.div_euclid(NANOS_PER_SECOND / NANOS_PER_MICRO),
            nanos: nanos as u32,
        }
    }

    /// Parse an RFC-3339 string into a `Timestamp`.
    pub fn parse_rfc3339(s: &str) -> Option<Self> {
        let dt = OffsetDateTime::parse(s, &Rfc3339).ok()?;
        Self::from_total_nanos(dt.unix_timestamp_nanos())
    }

    /// Whole seconds since the epoch.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.seconds
    }

    /// Nanosecond offset within the second, in `0..1_000_000_000`.
    #[must_use]
    pub const fn nanos(self) -> u32 {
        self.nanos
    }

    #[expect(clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    fn from_total_nanos(total: i128) -> Option<Self> {
        let seconds = i64::try_from(total.div_euclid(i128::from(NANOS_PER_SECOND))).ok()?;
        let nanos = total.rem_euclid(i128::from(NANOS_PER_SECOND)) as u32;
        Some(Self { seconds, nanos })
    }

    fn total_nanos(self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }
}

impl Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = OffsetDateTime::from_unix_timestamp_nanos(self.total_nanos())
            .ok()
            .and_then(|dt| dt.format(&Rfc3339).ok());

        match rendered {
            Some(s) => f.write_str(&s),
            // Out of the calendar range `time` can express.
            None => write!(f, "{}.{:09}s", self.seconds, self.nanos),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_rfc3339(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}")))
    }
}

///
/// TESTS
///
