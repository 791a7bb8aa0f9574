use core::fmt::{Display, Error as FmtError, Formatter};
use core::ops::{Add, Sub};
use core::time::Duration;

use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::{Timestamp, TimestampError};

/// Indicates a timestamp on the destination chain after which the packet will
/// no longer be processed, and will instead count as having timed-out.
///
/// Timestamps travel as u64 Unix timestamps in nanoseconds, where 0 indicates
/// that the timestamp is not set. The explicit `Never` variant distinguishes
/// the absence of a timeout from the epoch.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum TimeoutTimestamp {
    #[default]
    Never,
    At(Timestamp),
}

impl TimeoutTimestamp {
    /// Creates a new timeout timestamp from a given nanosecond value.
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Self, TimestampError> {
        Self::try_from(nanoseconds)
    }

    /// Returns the timestamp in nanoseconds, where 0 indicates the absence
    /// of a timeout.
    pub fn nanoseconds(&self) -> u64 {
        match self {
            Self::At(timestamp) => timestamp.nanoseconds(),
            Self::Never => 0,
        }
    }

    /// Returns if the timeout timestamp is set.
    pub fn is_set(&self) -> bool {
        match self {
            TimeoutTimestamp::At(_) => true,
            TimeoutTimestamp::Never => false,
        }
    }

    /// Returns a timeout timestamp that never expires.
    pub fn no_timeout() -> Self {
        Self::Never
    }

    /// Checks whether the given timestamp has reached the timeout timestamp.
    pub fn has_elapsed(&self, timestamp: &Timestamp) -> bool {
        match self {
            Self::At(timeout_timestamp) => timeout_timestamp <= timestamp,
            // When there's no timeout, timestamps are never expired
            Self::Never => false,
        }
    }
}

impl TryFrom<u64> for TimeoutTimestamp {
    type Error = TimestampError;

    fn try_from(timestamp: u64) -> Result<Self, Self::Error> {
        let timeout_timestamp = if timestamp == 0 {
            TimeoutTimestamp::Never
        } else {
            TimeoutTimestamp::At(Timestamp::from_nanoseconds(timestamp)?)
        };

        Ok(timeout_timestamp)
    }
}

impl From<Timestamp> for TimeoutTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        if timestamp.is_zero() {
            Self::Never
        } else {
            Self::At(timestamp)
        }
    }
}

impl Display for TimeoutTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            TimeoutTimestamp::At(timeout_timestamp) => write!(f, "{timeout_timestamp}"),
            TimeoutTimestamp::Never => write!(f, "no timeout timestamp"),
        }
    }
}

impl Add<Duration> for TimeoutTimestamp {
    type Output = Result<Self, TimestampError>;

    fn add(self, rhs: Duration) -> Self::Output {
        match self {
            TimeoutTimestamp::At(timestamp) => Ok(TimeoutTimestamp::At(timestamp.add(rhs)?)),
            TimeoutTimestamp::Never => Ok(TimeoutTimestamp::Never),
        }
    }
}

impl Sub<Duration> for TimeoutTimestamp {
    type Output = Result<Self, TimestampError>;

    fn sub(self, rhs: Duration) -> Self::Output {
        match self {
            TimeoutTimestamp::At(timestamp) => Ok(TimeoutTimestamp::At(timestamp.sub(rhs)?)),
            TimeoutTimestamp::Never => Ok(TimeoutTimestamp::Never),
        }
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::{Deserialize, Serialize};

    use super::TimeoutTimestamp;

    impl Serialize for TimeoutTimestamp {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.nanoseconds().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for TimeoutTimestamp {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let timestamp = u64::deserialize(deserializer)?;
            TimeoutTimestamp::try_from(timestamp).map_err(serde::de::Error::custom)
        }
    }
}
