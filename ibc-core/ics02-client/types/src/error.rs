//! Defines the client error type

use displaydoc::Display;
use ibc_relay_commitment_types::error::CommitmentError;
use ibc_relay_host_types::error::{DecodingError, HostError, IdentifierError};
use ibc_relay_host_types::identifiers::{ClientId, ClientType};
use ibc_relay_primitives::prelude::*;

use crate::height::{Height, HeightError};
use crate::Status;

/// Encodes all the possible client errors
#[derive(Debug, Display)]
pub enum ClientError {
    /// host error : `{0}`
    Host(HostError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// height error: `{0}`
    Height(HeightError),
    /// commitment error: `{0}`
    Commitment(CommitmentError),
    /// client `{client_id}` not found
    ClientNotFound { client_id: ClientId },
    /// client `{client_id}` already exists
    ClientAlreadyExists { client_id: ClientId },
    /// no light client module registered for client type `{client_type}`
    MissingClientModule { client_type: ClientType },
    /// client type `{client_type}` is not allowed by the host
    ClientTypeNotAllowed { client_type: ClientType },
    /// client is not active; status is `{status}`
    ClientNotActive { status: Status },
    /// invalid client state: `{description}`
    InvalidClientState { description: String },
    /// invalid consensus state: `{description}`
    InvalidConsensusState { description: String },
    /// invalid client message: `{description}`
    InvalidClientMessage { description: String },
    /// invalid height: `{description}`
    InvalidHeight { description: String },
    /// consensus state not found for client `{client_id}` at height `{height}`
    ConsensusStateNotFound { client_id: ClientId, height: Height },
    /// invalid proof: `{description}`
    InvalidProof { description: String },
    /// proof height too recent: `{description}`
    ProofHeightTooRecent { description: String },
    /// invalid counterparty: `{description}`
    InvalidCounterparty { description: String },
    /// missing counterparty for client `{client_id}`
    MissingCounterparty { client_id: ClientId },
    /// missing client message
    MissingClientMessage,
    /// missing raw client state
    MissingRawClientState,
    /// missing raw consensus state
    MissingRawConsensusState,
    /// other error: `{description}`
    Other { description: String },
}

impl ClientError {
    /// Returns `true` for the failures of proof verification: invalid
    /// proofs, unelapsed delay periods and missing consensus states.
    pub fn is_proof_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidProof { .. }
                | Self::ProofHeightTooRecent { .. }
                | Self::ConsensusStateNotFound { .. }
        )
    }
}

impl From<CommitmentError> for ClientError {
    fn from(e: CommitmentError) -> Self {
        Self::Commitment(e)
    }
}

impl From<DecodingError> for ClientError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<HostError> for ClientError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<IdentifierError> for ClientError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<HeightError> for ClientError {
    fn from(e: HeightError) -> Self {
        Self::Height(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::Identifier(e) => Some(e),
            Self::Height(e) => Some(e),
            Self::Commitment(e) => Some(e),
            _ => None,
        }
    }
}
