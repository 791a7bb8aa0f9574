//! Merkle path utilities

use core::fmt;

use ibc_proto::ibc::core::commitment::v1::MerklePath as RawMerklePath;
use ibc_relay_primitives::prelude::*;

use crate::commitment::CommitmentPrefix;
use crate::error::CommitmentError;

/// An ordered sequence of key segments, root-to-leaf, addressing a value in
/// a counterparty's committed state.
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
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MerklePath {
    pub key_path: Vec<String>,
}

impl MerklePath {
    pub fn new(key_path: Vec<String>) -> Self {
        Self { key_path }
    }

    pub fn len(&self) -> usize {
        self.key_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_path.is_empty()
    }

    /// Returns the segment at `index`, counted from the root.
    pub fn get_key(&self, index: u64) -> Result<&str, CommitmentError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.key_path.get(i))
            .map(String::as_str)
            .ok_or(CommitmentError::IndexOutOfRange {
                index,
                len: self.key_path.len() as u64,
            })
    }
}

impl fmt::Display for MerklePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.key_path.join("/"))
    }
}

impl From<RawMerklePath> for MerklePath {
    fn from(raw: RawMerklePath) -> Self {
        Self {
            key_path: raw.key_path,
        }
    }
}

impl From<MerklePath> for RawMerklePath {
    fn from(path: MerklePath) -> Self {
        Self {
            key_path: path.key_path,
        }
    }
}

/// A single-segment path holding the prefix, the shape a lite counterparty
/// binding takes when provisioned from a plain store prefix.
impl TryFrom<&CommitmentPrefix> for MerklePath {
    type Error = CommitmentError;

    fn try_from(prefix: &CommitmentPrefix) -> Result<Self, Self::Error> {
        Ok(Self::new(vec![prefix_segment(prefix)?]))
    }
}

/// The prefix as a key segment. Segments are strings, so a prefix that is
/// not UTF-8 cannot name the counterparty's store.
fn prefix_segment(prefix: &CommitmentPrefix) -> Result<String, CommitmentError> {
    core::str::from_utf8(prefix.as_bytes())
        .map(ToString::to_string)
        .map_err(|_| CommitmentError::NonUtf8Prefix {
            prefix: prefix.as_bytes().to_vec(),
        })
}

/// Prepends `prefix` to `path` as a new root segment.
///
/// Fails with [`CommitmentError::EmptyCommitmentPrefix`] if the prefix is
/// empty, and with [`CommitmentError::NonUtf8Prefix`] if it is not UTF-8.
pub fn apply_prefix(
    prefix: &CommitmentPrefix,
    path: MerklePath,
) -> Result<MerklePath, CommitmentError> {
    if prefix.is_empty() {
        return Err(CommitmentError::EmptyCommitmentPrefix);
    }

    let mut key_path = vec![prefix_segment(prefix)?];
    key_path.extend(path.key_path);

    Ok(MerklePath { key_path })
}

/// Builds the proof key of a lite route.
///
/// Unlike [`apply_prefix`], the store path is appended onto the *last*
/// segment of the counterparty prefix rather than pushed as a new segment.
/// A prefix without segments yields a single-segment path.
pub fn build_merkle_path(prefix: &MerklePath, path: &str) -> MerklePath {
    let mut key_path = prefix.key_path.clone();

    match key_path.last_mut() {
        Some(last) => last.push_str(path),
        None => key_path.push(path.to_string()),
    }

    MerklePath { key_path }
}
