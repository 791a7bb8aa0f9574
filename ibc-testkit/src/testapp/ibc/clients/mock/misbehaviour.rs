use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::host::types::identifiers::ClientId;
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::proto::{Any, Protobuf};

use super::header::MockHeader;
use super::proto::Misbehaviour as RawMisbehaviour;

pub const MOCK_MISBEHAVIOUR_TYPE_URL: &str = "/ibc.mock.Misbehavior";

/// Two headers for the same height. Conflicting timestamps prove the
/// counterparty equivocated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Misbehaviour {
    pub client_id: ClientId,
    pub header1: MockHeader,
    pub header2: MockHeader,
}

impl Misbehaviour {
    pub fn is_conflicting(&self) -> bool {
        self.header1.height == self.header2.height
            && self.header1.timestamp != self.header2.timestamp
    }
}

impl Protobuf<RawMisbehaviour> for Misbehaviour {}

impl TryFrom<RawMisbehaviour> for Misbehaviour {
    type Error = ClientError;

    fn try_from(raw: RawMisbehaviour) -> Result<Self, Self::Error> {
        let missing = |which: &str| ClientError::InvalidClientMessage {
            description: format!("misbehaviour is missing {which}"),
        };

        Ok(Self {
            client_id: raw.client_id.parse()?,
            header1: raw.header1.ok_or_else(|| missing("header1"))?.try_into()?,
            header2: raw.header2.ok_or_else(|| missing("header2"))?.try_into()?,
        })
    }
}

impl From<Misbehaviour> for RawMisbehaviour {
    fn from(value: Misbehaviour) -> Self {
        Self {
            client_id: value.client_id.to_string(),
            header1: Some(value.header1.into()),
            header2: Some(value.header2.into()),
        }
    }
}

impl Protobuf<Any> for Misbehaviour {}

impl TryFrom<Any> for Misbehaviour {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            MOCK_MISBEHAVIOUR_TYPE_URL => <Self as Protobuf<RawMisbehaviour>>::decode_vec(&raw.value)
                .map_err(|e| ClientError::InvalidClientMessage {
                    description: e.to_string(),
                }),
            _ => Err(ClientError::InvalidClientMessage {
                description: format!("unexpected type URL `{}`", raw.type_url),
            }),
        }
    }
}

impl From<Misbehaviour> for Any {
    fn from(misbehaviour: Misbehaviour) -> Self {
        Any {
            type_url: MOCK_MISBEHAVIOUR_TYPE_URL.to_string(),
            value: Protobuf::<RawMisbehaviour>::encode_vec(misbehaviour),
        }
    }
}
