use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::proto::{Any, Protobuf};
use ibc_relay_core::primitives::Timestamp;

use super::header::MockHeader;
use super::proto::ConsensusState as RawMockConsensusState;

pub const MOCK_CONSENSUS_STATE_TYPE_URL: &str = "/ibc.mock.ConsensusState";

/// What the mock client trusts about the counterparty at one height.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockConsensusState {
    pub header: MockHeader,
}

impl MockConsensusState {
    pub fn new(header: MockHeader) -> Self {
        Self { header }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp
    }
}

impl Protobuf<RawMockConsensusState> for MockConsensusState {}

impl TryFrom<RawMockConsensusState> for MockConsensusState {
    type Error = ClientError;

    fn try_from(raw: RawMockConsensusState) -> Result<Self, Self::Error> {
        let header = raw.header.ok_or(ClientError::InvalidConsensusState {
            description: "missing header".into(),
        })?;

        Ok(Self {
            header: header.try_into()?,
        })
    }
}

impl From<MockConsensusState> for RawMockConsensusState {
    fn from(value: MockConsensusState) -> Self {
        Self {
            header: Some(value.header.into()),
        }
    }
}

impl Protobuf<Any> for MockConsensusState {}

impl TryFrom<Any> for MockConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != MOCK_CONSENSUS_STATE_TYPE_URL {
            return Err(ClientError::InvalidConsensusState {
                description: format!("unexpected type URL `{}`", raw.type_url),
            });
        }

        <Self as Protobuf<RawMockConsensusState>>::decode_vec(&raw.value).map_err(|e| {
            ClientError::InvalidConsensusState {
                description: e.to_string(),
            }
        })
    }
}

impl From<MockConsensusState> for Any {
    fn from(consensus_state: MockConsensusState) -> Self {
        Any {
            type_url: MOCK_CONSENSUS_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawMockConsensusState>::encode_vec(consensus_state),
        }
    }
}
