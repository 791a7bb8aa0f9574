//! Defines the lite counterparty binding of a client.

use core::str::FromStr;

use ibc_relay_commitment_types::merkle::MerklePath;
use ibc_relay_host_types::error::DecodingError;
use ibc_relay_host_types::identifiers::ClientId;
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;

use crate::error::ClientError;

/// Wire form of [`Counterparty`], as stored under
/// `clients/{client_id}/counterparty`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCounterparty {
    #[prost(string, tag = "1")]
    pub client_id: String,
    #[prost(string, repeated, tag = "2")]
    pub merkle_path_prefix: Vec<String>,
}

/// The remote client identifier and proof-key prefix a local client trusts.
///
/// On a lite route the counterparty binding stands in for a channel end:
/// packets name the local client in their channel fields and the remote
/// client in the counterparty fields, and every packet operation checks the
/// two against this binding before any proof is verified.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counterparty {
    pub client_id: ClientId,
    pub merkle_path_prefix: MerklePath,
}

impl Counterparty {
    pub fn new(client_id: ClientId, merkle_path_prefix: MerklePath) -> Self {
        Self {
            client_id,
            merkle_path_prefix,
        }
    }

    /// A binding needs at least one prefix segment to build proof keys
    /// under the counterparty's store.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.merkle_path_prefix.is_empty() {
            return Err(ClientError::InvalidCounterparty {
                description: "merkle path prefix cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Protobuf<RawCounterparty> for Counterparty {}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = DecodingError;

    fn try_from(raw: RawCounterparty) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: ClientId::from_str(&raw.client_id)?,
            merkle_path_prefix: MerklePath::new(raw.merkle_path_prefix),
        })
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(value: Counterparty) -> Self {
        Self {
            client_id: value.client_id.to_string(),
            merkle_path_prefix: value.merkle_path_prefix.key_path,
        }
    }
}
