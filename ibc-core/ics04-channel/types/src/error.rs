//! Defines the packet and channel error type

use displaydoc::Display;
use ibc_relay_client_types::error::ClientError;
use ibc_relay_client_types::Height;
use ibc_relay_commitment_types::error::CommitmentError;
use ibc_relay_host_types::error::{DecodingError, HostError, IdentifierError};
use ibc_relay_host_types::identifiers::{ChannelId, ClientId, PortId, Sequence};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::{Timestamp, TimestampError};

use crate::timeout::{Timeout, TimeoutElapsed};

#[derive(Debug, Display)]
pub enum ChannelError {
    /// host error: `{0}`
    Host(HostError),
    /// client error: `{0}`
    Client(ClientError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// commitment error: `{0}`
    Commitment(CommitmentError),
    /// timestamp error: `{0}`
    Timestamp(TimestampError),
    /// application module error: `{description}`
    AppModule { description: String },
    /// no-op: `{description}`
    NoOp { description: String },
    /// non-existent channel end: (`{port_id}`, `{channel_id}`)
    MissingChannel {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// no counterparty registered for client `{client_id}`
    MissingCounterparty { client_id: ClientId },
    /// mismatched counterparty: expected `{expected}`, actual `{actual}`
    MismatchedCounterparty { expected: String, actual: String },
    /// invalid channel state: expected `{expected}`, actual `{actual}`
    InvalidState { expected: String, actual: String },
    /// invalid channel order type: expected `{expected}`, actual `{actual}`
    InvalidOrderType { expected: String, actual: String },
    /// invalid packet: `{description}`
    InvalidPacket { description: String },
    /// invalid packet: stored commitment for packet `{sequence}` does not match the packet
    MismatchedPacketCommitment { sequence: Sequence },
    /// invalid packet sequence: expected `{expected}`, actual `{actual}`
    InvalidPacketSequence {
        expected: Sequence,
        actual: Sequence,
    },
    /// invalid packet timeout: `{0}`
    InvalidTimeout(TimeoutElapsed),
    /// packet timeout `{timeout}` not reached at height `{height}` and `{timestamp}`
    TimeoutNotReached {
        timeout: Timeout,
        height: Height,
        timestamp: Timestamp,
    },
    /// client `{client_id}` has a zero latest height
    ZeroLatestHeight { client_id: ClientId },
    /// empty acknowledgement not allowed
    EmptyAcknowledgement,
    /// empty acknowledgement status not allowed
    EmptyAcknowledgementStatus,
    /// packet acknowledgement for sequence `{sequence}` already exists
    AcknowledgementExists { sequence: Sequence },
    /// failed packet verification for packet with sequence `{sequence}`: `{client_error}`
    FailedPacketVerification {
        sequence: Sequence,
        client_error: ClientError,
    },
    /// failed proof verification: `{0}`
    FailedProofVerification(ClientError),
}

impl ChannelError {
    /// The redundant-message outcome: the packet was already settled.
    pub fn no_op(description: impl ToString) -> Self {
        Self::NoOp {
            description: description.to_string(),
        }
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOp { .. })
    }

    /// Returns the client error behind a failed verification, if any.
    pub fn verification_error(&self) -> Option<&ClientError> {
        match self {
            Self::FailedPacketVerification { client_error, .. }
            | Self::FailedProofVerification(client_error) => Some(client_error),
            _ => None,
        }
    }
}

impl From<HostError> for ChannelError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<ClientError> for ChannelError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<DecodingError> for ChannelError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for ChannelError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<CommitmentError> for ChannelError {
    fn from(e: CommitmentError) -> Self {
        Self::Commitment(e)
    }
}

impl From<TimestampError> for ChannelError {
    fn from(e: TimestampError) -> Self {
        Self::Timestamp(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            Self::Client(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::Identifier(e) => Some(e),
            Self::Commitment(e) => Some(e),
            Self::Timestamp(e) => Some(e),
            Self::FailedPacketVerification {
                client_error: e, ..
            } => Some(e),
            Self::FailedProofVerification(e) => Some(e),
            _ => None,
        }
    }
}
