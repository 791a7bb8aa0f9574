//! Defines the core `Height` type used throughout the library

use core::cmp::Ordering;
use core::num::ParseIntError;
use core::str::FromStr;

use displaydoc::Display;
use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use ibc_relay_primitives::prelude::*;

/// The core IBC height type, which represents the height of a chain,
/// which typically is the number of blocks since genesis
/// (or more generally, since the last revision/hard upgrade).
///
/// Heights compare lexicographically: the revision number dominates, so
/// `1-5 < 2-1`. The zero height is a valid value; it is how packets spell
/// "no height timeout".
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
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Height {
    /// Previously known as "epoch"
    revision_number: u64,

    /// The height of a block
    revision_height: u64,
}

impl Height {
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn min(revision_number: u64) -> Self {
        Self {
            revision_number,
            revision_height: 1,
        }
    }

    pub fn revision_number(&self) -> u64 {
        self.revision_number
    }

    pub fn revision_height(&self) -> u64 {
        self.revision_height
    }

    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }

    pub fn add(&self, delta: u64) -> Height {
        Height {
            revision_number: self.revision_number,
            revision_height: self.revision_height.saturating_add(delta),
        }
    }

    pub fn increment(&self) -> Height {
        self.add(1)
    }

    pub fn sub(&self, delta: u64) -> Result<Height, HeightError> {
        let revision_height = self.revision_height.checked_sub(delta).ok_or(
            HeightError::InvalidHeightResult {
                height: *self,
                delta,
            },
        )?;

        Ok(Height {
            revision_number: self.revision_number,
            revision_height,
        })
    }

    /// Fails iff the revision height is already zero.
    pub fn decrement(&self) -> Result<Height, HeightError> {
        self.sub(1)
    }
}

impl PartialOrd for Height {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Height {
    fn cmp(&self, other: &Self) -> Ordering {
        self.revision_number
            .cmp(&other.revision_number)
            .then(self.revision_height.cmp(&other.revision_height))
    }
}

impl From<RawHeight> for Height {
    fn from(raw_height: RawHeight) -> Self {
        Height::new(raw_height.revision_number, raw_height.revision_height)
    }
}

impl From<Height> for RawHeight {
    fn from(ics_height: Height) -> Self {
        RawHeight {
            revision_number: ics_height.revision_number,
            revision_height: ics_height.revision_height,
        }
    }
}

impl core::fmt::Debug for Height {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        f.debug_struct("Height")
            .field("revision", &self.revision_number)
            .field("height", &self.revision_height)
            .finish()
    }
}

impl core::fmt::Display for Height {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

/// Encodes all errors related to chain heights
#[derive(Debug, Display, PartialEq, Eq)]
pub enum HeightError {
    /// cannot convert into a `Height` type from string `{height}`
    HeightConversion {
        height: String,
        error: ParseIntError,
    },
    /// the height(`{raw_height}`) is not valid format, this format must be used: \[revision_number\]-\[revision_height\]
    InvalidFormat { raw_height: String },
    /// cannot subtract `{delta}` from height `{height}`
    InvalidHeightResult { height: Height, delta: u64 },
}

#[cfg(feature = "std")]
impl std::error::Error for HeightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            HeightError::HeightConversion { error: e, .. } => Some(e),
            HeightError::InvalidFormat { .. } | HeightError::InvalidHeightResult { .. } => None,
        }
    }
}

impl TryFrom<&str> for Height {
    type Error = HeightError;

    /// Parses `{revision_number}-{revision_height}`, both plain decimal
    /// numbers without sign.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid_format = || HeightError::InvalidFormat {
            raw_height: value.to_owned(),
        };

        let (rev_number_str, rev_height_str) = value.split_once('-').ok_or_else(invalid_format)?;

        let is_decimal = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !is_decimal(rev_number_str) || !is_decimal(rev_height_str) {
            return Err(invalid_format());
        }

        let parse = |s: &str| {
            s.parse::<u64>().map_err(|e| HeightError::HeightConversion {
                height: value.to_owned(),
                error: e,
            })
        };

        Ok(Height::new(parse(rev_number_str)?, parse(rev_height_str)?))
    }
}

impl From<Height> for String {
    fn from(height: Height) -> Self {
        format!("{}-{}", height.revision_number, height.revision_height)
    }
}

impl FromStr for Height {
    type Err = HeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Height::try_from(s)
    }
}
