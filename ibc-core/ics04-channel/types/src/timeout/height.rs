use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use ibc_relay_client_types::Height;
use ibc_relay_primitives::prelude::*;

/// Indicates a consensus height on the destination chain after which the
/// packet will no longer be processed, and will instead count as having
/// timed-out.
///
/// `TimeoutHeight` treats a height value of zero as a special "no timeout
/// height" value, which is carried on the wire as the zero height.
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
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum TimeoutHeight {
    #[default]
    Never,
    At(Height),
}

impl TimeoutHeight {
    pub fn no_timeout() -> Self {
        Self::Never
    }

    /// Revision number to be used in packet commitment computation
    pub fn commitment_revision_number(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_number(),
            Self::Never => 0,
        }
    }

    /// Revision height to be used in packet commitment computation
    pub fn commitment_revision_height(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_height(),
            Self::Never => 0,
        }
    }

    /// Checks whether the given height has reached the timeout height.
    ///
    /// The bound is inclusive: a chain at exactly the timeout height can no
    /// longer process the packet.
    pub fn has_elapsed(&self, height: Height) -> bool {
        match self {
            Self::At(timeout_height) => *timeout_height <= height,
            Self::Never => false,
        }
    }

    /// Returns whether this timeout height is set.
    pub fn is_set(&self) -> bool {
        match self {
            Self::At(_) => true,
            Self::Never => false,
        }
    }
}

impl From<Height> for TimeoutHeight {
    fn from(height: Height) -> Self {
        if height.is_zero() {
            Self::Never
        } else {
            Self::At(height)
        }
    }
}

impl From<RawHeight> for TimeoutHeight {
    fn from(raw_height: RawHeight) -> Self {
        Height::from(raw_height).into()
    }
}

impl From<Option<RawHeight>> for TimeoutHeight {
    fn from(raw_height: Option<RawHeight>) -> Self {
        raw_height.map(Self::from).unwrap_or_default()
    }
}

impl From<TimeoutHeight> for RawHeight {
    fn from(timeout_height: TimeoutHeight) -> Self {
        match timeout_height {
            TimeoutHeight::At(height) => height.into(),
            TimeoutHeight::Never => Height::zero().into(),
        }
    }
}

impl From<TimeoutHeight> for Option<RawHeight> {
    fn from(timeout_height: TimeoutHeight) -> Self {
        match timeout_height {
            TimeoutHeight::At(height) => Some(height.into()),
            TimeoutHeight::Never => None,
        }
    }
}

impl Display for TimeoutHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::At(timeout_height) => write!(f, "{timeout_height}"),
            Self::Never => write!(f, "no timeout height"),
        }
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use ibc_relay_client_types::Height;
    use serde::{Deserialize, Serialize};

    use super::TimeoutHeight;

    impl Serialize for TimeoutHeight {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            match self {
                Self::At(height) => height.serialize(serializer),
                Self::Never => Height::zero().serialize(serializer),
            }
        }
    }

    impl<'de> Deserialize<'de> for TimeoutHeight {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            Height::deserialize(deserializer).map(Self::from)
        }
    }
}
