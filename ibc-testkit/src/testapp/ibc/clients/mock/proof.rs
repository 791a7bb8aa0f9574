//! Proofs understood by the mock light client.
//!
//! A mock chain commits to nothing, so a proof is a digest binding the key
//! to the value claimed at it. Relayer helpers build proofs from the state
//! they read off the counterparty store.

use ibc_relay_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_core::commitment_types::merkle::MerklePath;
use ibc_relay_core::primitives::prelude::*;
use sha2::{Digest, Sha256};

const ABSENT: &[u8] = b"absent";

fn digest(path: &MerklePath, value: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string().as_bytes());
    hasher.update(value);
    hasher.finalize().to_vec()
}

/// Proof that `value` is stored at `path`.
pub fn membership_proof(path: &MerklePath, value: &[u8]) -> CommitmentProofBytes {
    CommitmentProofBytes::try_from(digest(path, value)).expect("digest is never empty")
}

/// Proof that nothing is stored at `path`.
pub fn non_membership_proof(path: &MerklePath) -> CommitmentProofBytes {
    CommitmentProofBytes::try_from(digest(path, ABSENT)).expect("digest is never empty")
}

pub(super) fn proves_membership(proof: &CommitmentProofBytes, path: &MerklePath, value: &[u8]) -> bool {
    let proof: &[u8] = proof.as_ref();
    proof == digest(path, value).as_slice()
}

pub(super) fn proves_absence(proof: &CommitmentProofBytes, path: &MerklePath) -> bool {
    let proof: &[u8] = proof.as_ref();
    proof == digest(path, ABSENT).as_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> MerklePath {
        MerklePath::new(vec!["ibc".to_string(), "commitments/ports/mock".to_string()])
    }

    #[test]
    fn membership_proof_binds_the_value() {
        let proof = membership_proof(&path(), b"value");

        assert!(proves_membership(&proof, &path(), b"value"));
        assert!(!proves_membership(&proof, &path(), b"other"));
        assert!(!proves_absence(&proof, &path()));
    }

    #[test]
    fn non_membership_proof_binds_the_path() {
        let proof = non_membership_proof(&path());

        assert!(proves_absence(&proof, &path()));
        assert!(!proves_absence(&proof, &MerklePath::new(vec!["ibc".to_string()])));
    }
}
