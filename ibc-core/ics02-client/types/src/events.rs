//! Types for the events emitted by the client handlers.

use ibc_relay_host_types::identifiers::{ClientId, ClientType};
use ibc_relay_primitives::prelude::*;

use crate::height::Height;

/// Client event types
pub const CREATE_CLIENT_EVENT: &str = "create_client";
pub const UPDATE_CLIENT_EVENT: &str = "update_client";
pub const CLIENT_MISBEHAVIOUR_EVENT: &str = "client_misbehaviour";
pub const PROVIDE_COUNTERPARTY_EVENT: &str = "provide_counterparty";

/// The content of the `key` field for the attribute containing the client identifier.
pub const CLIENT_ID_ATTRIBUTE_KEY: &str = "client_id";

/// The content of the `key` field for the attribute containing the client type.
pub const CLIENT_TYPE_ATTRIBUTE_KEY: &str = "client_type";

/// The content of the `key` field for the attribute containing the height.
pub const CONSENSUS_HEIGHT_ATTRIBUTE_KEY: &str = "consensus_height";

/// The content of the `key` field for the attribute containing the heights of consensus states that were processed.
pub const CONSENSUS_HEIGHTS_ATTRIBUTE_KEY: &str = "consensus_heights";

/// The content of the `key` field for the attribute containing the counterparty client identifier.
pub const COUNTERPARTY_CLIENT_ID_ATTRIBUTE_KEY: &str = "counterparty_client_id";

/// CreateClient event signals the creation of a new on-chain client (IBC client).
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
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateClient {
    client_id: ClientId,
    client_type: ClientType,
    consensus_height: Height,
}

impl CreateClient {
    pub fn new(client_id: ClientId, client_type: ClientType, consensus_height: Height) -> Self {
        Self {
            client_id,
            client_type,
            consensus_height,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn consensus_height(&self) -> &Height {
        &self.consensus_height
    }

    pub fn event_type(&self) -> &str {
        CREATE_CLIENT_EVENT
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            (CLIENT_ID_ATTRIBUTE_KEY, self.client_id.to_string()),
            (CLIENT_TYPE_ATTRIBUTE_KEY, self.client_type.to_string()),
            (
                CONSENSUS_HEIGHT_ATTRIBUTE_KEY,
                self.consensus_height.to_string(),
            ),
        ]
    }
}

/// UpdateClient event signals a recent update of an on-chain client (IBC Client).
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
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateClient {
    client_id: ClientId,
    client_type: ClientType,
    consensus_heights: Vec<Height>,
}

impl UpdateClient {
    /// Constructs a new UpdateClient event.
    ///
    /// `consensus_heights` lists every height made available by the update,
    /// the first one being reported as the `consensus_height`.
    pub fn new(client_id: ClientId, client_type: ClientType, consensus_heights: Vec<Height>) -> Self {
        Self {
            client_id,
            client_type,
            consensus_heights,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn consensus_height(&self) -> Option<&Height> {
        self.consensus_heights.first()
    }

    pub fn consensus_heights(&self) -> &[Height] {
        &self.consensus_heights
    }

    pub fn event_type(&self) -> &str {
        UPDATE_CLIENT_EVENT
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let heights = self
            .consensus_heights
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut attributes = vec![
            (CLIENT_ID_ATTRIBUTE_KEY, self.client_id.to_string()),
            (CLIENT_TYPE_ATTRIBUTE_KEY, self.client_type.to_string()),
        ];
        if let Some(height) = self.consensus_height() {
            attributes.push((CONSENSUS_HEIGHT_ATTRIBUTE_KEY, height.to_string()));
        }
        attributes.push((CONSENSUS_HEIGHTS_ATTRIBUTE_KEY, heights));
        attributes
    }
}

/// ClientMisbehaviour event signals the update of an on-chain client (IBC Client) with evidence of
/// misbehaviour.
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
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientMisbehaviour {
    client_id: ClientId,
    client_type: ClientType,
}

impl ClientMisbehaviour {
    pub fn new(client_id: ClientId, client_type: ClientType) -> Self {
        Self {
            client_id,
            client_type,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn event_type(&self) -> &str {
        CLIENT_MISBEHAVIOUR_EVENT
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            (CLIENT_ID_ATTRIBUTE_KEY, self.client_id.to_string()),
            (CLIENT_TYPE_ATTRIBUTE_KEY, self.client_type.to_string()),
        ]
    }
}

/// ProvideCounterparty event signals that a lite counterparty binding was
/// set for a local client.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvideCounterparty {
    client_id: ClientId,
    counterparty_client_id: ClientId,
}

impl ProvideCounterparty {
    pub fn new(client_id: ClientId, counterparty_client_id: ClientId) -> Self {
        Self {
            client_id,
            counterparty_client_id,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn counterparty_client_id(&self) -> &ClientId {
        &self.counterparty_client_id
    }

    pub fn event_type(&self) -> &str {
        PROVIDE_COUNTERPARTY_EVENT
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            (CLIENT_ID_ATTRIBUTE_KEY, self.client_id.to_string()),
            (
                COUNTERPARTY_CLIENT_ID_ATTRIBUTE_KEY,
                self.counterparty_client_id.to_string(),
            ),
        ]
    }
}
