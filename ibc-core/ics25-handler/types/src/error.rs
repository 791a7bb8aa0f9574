//! Defines the top-level handler error type

use derive_more::From;
use displaydoc::Display;
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_client_types::error::ClientError;
use ibc_relay_host_types::error::{DecodingError, HostError};
use ibc_relay_router_types::error::RouterError;
use ibc_relay_primitives::prelude::*;

/// Top-level error
#[derive(Debug, Display, From)]
pub enum HandlerError {
    /// ICS02 Client error: {0}
    Client(ClientError),
    /// ICS04 Channel error: {0}
    Channel(ChannelError),
    /// ICS24 Host error: {0}
    Host(HostError),
    /// ICS26 Routing error: {0}
    Router(RouterError),
    /// decoding error: {0}
    Decoding(DecodingError),
    /// unknown message type URL `{url}`
    #[from(ignore)]
    UnknownMessageTypeUrl { url: String },
    /// all `{total}` packet messages of the transaction are redundant
    #[from(ignore)]
    RedundantTransaction { total: u64 },
}

/// The class a [`HandlerError`] falls into, which tells a caller how to
/// react to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: bad identifiers, empty fields, unusable timeouts,
    /// wrong channel state or order.
    Validation,
    /// A proof failed verification, its delay period has not passed or no
    /// consensus state exists at its height. The relayer may retry with
    /// fresh proof material.
    Proof,
    /// The message was redundant; nothing changed.
    NoOp,
    /// The stored state contradicts the message, e.g. a packet commitment
    /// mismatch. Never swallowed.
    Consistency,
    /// The client is frozen, expired, unknown or not allowed.
    ClientStatus,
    /// The host failed to read or write its store.
    Host,
    /// No module or route serves the message, or the whole transaction was
    /// rejected at admission.
    Routing,
}

fn client_error_kind(e: &ClientError) -> ErrorKind {
    match e {
        e if e.is_proof_error() => ErrorKind::Proof,
        ClientError::ClientNotActive { .. }
        | ClientError::ClientNotFound { .. }
        | ClientError::ClientTypeNotAllowed { .. } => ErrorKind::ClientStatus,
        ClientError::Host(_) => ErrorKind::Host,
        ClientError::MissingClientModule { .. } => ErrorKind::Routing,
        _ => ErrorKind::Validation,
    }
}

fn channel_error_kind(e: &ChannelError) -> ErrorKind {
    match e {
        ChannelError::NoOp { .. } => ErrorKind::NoOp,
        ChannelError::Client(e) => client_error_kind(e),
        ChannelError::FailedPacketVerification { client_error, .. }
        | ChannelError::FailedProofVerification(client_error) => {
            match client_error_kind(client_error) {
                ErrorKind::Validation => ErrorKind::Proof,
                kind => kind,
            }
        }
        ChannelError::MismatchedPacketCommitment { .. } => ErrorKind::Consistency,
        ChannelError::Host(_) => ErrorKind::Host,
        ChannelError::MissingChannel { .. } => ErrorKind::Routing,
        _ => ErrorKind::Validation,
    }
}

impl HandlerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client(e) => client_error_kind(e),
            Self::Channel(e) => channel_error_kind(e),
            Self::Host(_) => ErrorKind::Host,
            Self::Router(_) | Self::UnknownMessageTypeUrl { .. } => ErrorKind::Routing,
            Self::RedundantTransaction { .. } => ErrorKind::Routing,
            Self::Decoding(_) => ErrorKind::Validation,
        }
    }

    /// Returns `true` for the redundant-message outcome of an
    /// acknowledgement, timeout or receive.
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::Channel(e) if e.is_no_op())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            Self::Channel(e) => Some(e),
            Self::Host(e) => Some(e),
            Self::Router(e) => Some(e),
            Self::Decoding(e) => Some(e),
            _ => None,
        }
    }
}
