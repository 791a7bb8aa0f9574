//! Defines the commitment error type

use displaydoc::Display;
use ibc_relay_primitives::prelude::*;

#[derive(Debug, Display)]
pub enum CommitmentError {
    /// empty commitment prefix
    EmptyCommitmentPrefix,
    /// empty merkle proof
    EmptyMerkleProof,
    /// empty merkle path
    EmptyMerklePath,
    /// commitment prefix `{prefix:?}` is not valid UTF-8
    NonUtf8Prefix { prefix: Vec<u8> },
    /// key index `{index}` out of range for merkle path of length `{len}`
    IndexOutOfRange { index: u64, len: u64 },
}

#[cfg(feature = "std")]
impl std::error::Error for CommitmentError {}
