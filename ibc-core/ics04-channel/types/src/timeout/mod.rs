//! Packet timeouts: the destination height and timestamp bounds after which
//! a packet can only be timed out.

mod height;
mod timestamp;

use core::fmt::{Display, Error as FmtError, Formatter};

pub use height::*;
use ibc_relay_client_types::Height;
use ibc_relay_primitives::Timestamp;
pub use timestamp::*;

/// The pair of bounds carried by every packet.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    pub height: TimeoutHeight,
    pub timestamp: TimeoutTimestamp,
}

impl Timeout {
    pub fn new(height: TimeoutHeight, timestamp: TimeoutTimestamp) -> Self {
        Self { height, timestamp }
    }

    /// A packet needs at least one of the two bounds to ever expire.
    pub fn is_set(&self) -> bool {
        self.height.is_set() || self.timestamp.is_set()
    }

    /// Returns `true` once either bound is reached by the given chain height
    /// or chain timestamp.
    pub fn elapsed(&self, height: Height, timestamp: &Timestamp) -> bool {
        self.height.has_elapsed(height) || self.timestamp.has_elapsed(timestamp)
    }

    /// Like [`Timeout::elapsed`], but reports the reached bound as an error
    /// detail.
    pub fn check_not_elapsed(
        &self,
        height: Height,
        timestamp: Timestamp,
    ) -> Result<(), TimeoutElapsed> {
        if self.elapsed(height, &timestamp) {
            return Err(TimeoutElapsed {
                timeout: *self,
                height,
                timestamp,
            });
        }
        Ok(())
    }
}

impl Display for Timeout {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{{ height: {}, timestamp: {} }}", self.height, self.timestamp)
    }
}

/// Detail of a timeout found elapsed against a chain height and timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeoutElapsed {
    pub timeout: Timeout,
    pub height: Height,
    pub timestamp: Timestamp,
}

impl Display for TimeoutElapsed {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "timeout {} elapsed at height {} and {}",
            self.timeout, self.height, self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn timestamp(nanos: u64) -> Timestamp {
        Timestamp::from_nanoseconds(nanos).expect("valid timestamp")
    }

    #[rstest]
    #[case::height_reached(Height::new(1, 100), 0, Height::new(1, 100), 5, true)]
    #[case::height_passed(Height::new(1, 100), 0, Height::new(1, 150), 5, true)]
    #[case::height_below(Height::new(1, 100), 0, Height::new(1, 99), 5, false)]
    #[case::revision_dominates(Height::new(1, 100), 0, Height::new(2, 1), 5, true)]
    #[case::timestamp_reached(Height::zero(), 50, Height::new(1, 1), 50, true)]
    #[case::timestamp_below(Height::zero(), 50, Height::new(1, 1), 49, false)]
    #[case::either_bound(Height::new(1, 100), 50, Height::new(1, 1), 60, true)]
    fn elapsed_is_inclusive(
        #[case] timeout_height: Height,
        #[case] timeout_nanos: u64,
        #[case] height: Height,
        #[case] nanos: u64,
        #[case] expected: bool,
    ) {
        let timeout = Timeout::new(
            timeout_height.into(),
            TimeoutTimestamp::from_nanoseconds(timeout_nanos).expect("valid timestamp"),
        );

        assert_eq!(timeout.elapsed(height, &timestamp(nanos)), expected);
        assert_eq!(
            timeout.check_not_elapsed(height, timestamp(nanos)).is_err(),
            expected
        );
    }

    #[test]
    fn zero_bounds_never_elapse() {
        let timeout = Timeout::new(Height::zero().into(), TimeoutTimestamp::Never);

        assert!(!timeout.is_set());
        assert!(!timeout.elapsed(Height::new(u64::MAX, u64::MAX), &timestamp(u64::MAX)));
    }
}
