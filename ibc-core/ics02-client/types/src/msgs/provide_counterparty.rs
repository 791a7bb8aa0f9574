//! Definition of domain type message `MsgProvideCounterparty`.

use ibc_relay_host_types::error::DecodingError;
use ibc_relay_host_types::identifiers::ClientId;
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;
use ibc_relay_primitives::Signer;

use crate::counterparty::{Counterparty, RawCounterparty};
use crate::error::ClientError;

pub const PROVIDE_COUNTERPARTY_TYPE_URL: &str = "/ibc.core.client.v1.MsgProvideCounterparty";

/// Wire form of [`MsgProvideCounterparty`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMsgProvideCounterparty {
    #[prost(string, tag = "1")]
    pub client_id: String,
    #[prost(message, optional, tag = "2")]
    pub counterparty: Option<RawCounterparty>,
    #[prost(string, tag = "3")]
    pub signer: String,
}

/// Defines the message used to bind a local client to the client identifier
/// and Merkle path prefix of its counterparty, which enables the lite
/// (client-addressed) packet route.
///
/// Providing a counterparty again overwrites the previous binding.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgProvideCounterparty {
    /// Client identifier of the local client.
    pub client_id: ClientId,
    /// The counterparty client and the prefix of its store.
    pub counterparty: Counterparty,
    /// The address of the signer who provisions the binding.
    pub signer: Signer,
}

impl MsgProvideCounterparty {
    pub fn new(client_id: ClientId, counterparty: Counterparty, signer: Signer) -> Self {
        Self {
            client_id,
            counterparty,
            signer,
        }
    }
}

impl Protobuf<RawMsgProvideCounterparty> for MsgProvideCounterparty {}

impl TryFrom<RawMsgProvideCounterparty> for MsgProvideCounterparty {
    type Error = ClientError;

    fn try_from(raw: RawMsgProvideCounterparty) -> Result<Self, Self::Error> {
        let counterparty = raw
            .counterparty
            .ok_or(DecodingError::missing_raw_data("counterparty"))?
            .try_into()?;

        Ok(Self {
            client_id: raw.client_id.parse()?,
            counterparty,
            signer: raw.signer.into(),
        })
    }
}

impl From<MsgProvideCounterparty> for RawMsgProvideCounterparty {
    fn from(msg: MsgProvideCounterparty) -> Self {
        Self {
            client_id: msg.client_id.to_string(),
            counterparty: Some(msg.counterparty.into()),
            signer: msg.signer.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_message_requires_counterparty() {
        let raw = RawMsgProvideCounterparty {
            client_id: "9999-mock-0".to_string(),
            counterparty: None,
            signer: "relayer".to_string(),
        };

        assert!(matches!(
            MsgProvideCounterparty::try_from(raw),
            Err(ClientError::Decoding(DecodingError::MissingRawData { .. }))
        ));
    }

    #[test]
    fn to_and_from() {
        let raw = RawMsgProvideCounterparty {
            client_id: "9999-mock-0".to_string(),
            counterparty: Some(RawCounterparty {
                client_id: "9999-mock-3".to_string(),
                merkle_path_prefix: vec!["ibc".to_string(), String::new()],
            }),
            signer: "relayer".to_string(),
        };

        let msg = MsgProvideCounterparty::try_from(raw.clone()).expect("valid message");
        assert_eq!(msg.counterparty.client_id.as_str(), "9999-mock-3");
        assert_eq!(RawMsgProvideCounterparty::from(msg), raw);
    }
}
