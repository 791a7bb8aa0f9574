use ibc_proto::google::protobuf::Any;
use ibc_relay_channel_types::msgs::{
    MsgAcknowledgement, MsgRecvPacket, MsgSendPacket, MsgTimeout, MsgTimeoutOnClose, PacketMsg,
    ACKNOWLEDGEMENT_TYPE_URL, RECV_PACKET_TYPE_URL, SEND_PACKET_TYPE_URL,
    TIMEOUT_ON_CLOSE_TYPE_URL, TIMEOUT_TYPE_URL,
};
use ibc_relay_client_types::msgs::{
    ClientMsg, MsgCreateClient, MsgProvideCounterparty, MsgUpdateClient, CREATE_CLIENT_TYPE_URL,
    PROVIDE_COUNTERPARTY_TYPE_URL, UPDATE_CLIENT_TYPE_URL,
};
use ibc_relay_host_types::error::DecodingError;
use ibc_relay_host_types::identifiers::Sequence;
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;
use ibc_relay_primitives::Signer;

use crate::error::HandlerError;

/// Enumeration of all messages that the core is capable of routing.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum MsgEnvelope {
    Client(ClientMsg),
    Packet(PacketMsg),
}

impl MsgEnvelope {
    pub fn signer(&self) -> &Signer {
        match self {
            MsgEnvelope::Client(msg) => match msg {
                ClientMsg::CreateClient(msg) => &msg.signer,
                ClientMsg::UpdateClient(msg) => &msg.signer,
                ClientMsg::ProvideCounterparty(msg) => &msg.signer,
            },
            MsgEnvelope::Packet(msg) => msg.signer(),
        }
    }

    pub fn type_url(&self) -> &'static str {
        match self {
            MsgEnvelope::Client(msg) => match msg {
                ClientMsg::CreateClient(_) => CREATE_CLIENT_TYPE_URL,
                ClientMsg::UpdateClient(_) => UPDATE_CLIENT_TYPE_URL,
                ClientMsg::ProvideCounterparty(_) => PROVIDE_COUNTERPARTY_TYPE_URL,
            },
            MsgEnvelope::Packet(msg) => match msg {
                PacketMsg::Send(_) => SEND_PACKET_TYPE_URL,
                PacketMsg::Recv(_) => RECV_PACKET_TYPE_URL,
                PacketMsg::Ack(_) => ACKNOWLEDGEMENT_TYPE_URL,
                PacketMsg::Timeout(_) => TIMEOUT_TYPE_URL,
                PacketMsg::TimeoutOnClose(_) => TIMEOUT_ON_CLOSE_TYPE_URL,
            },
        }
    }
}

fn decode<T, R>(value: &[u8]) -> Result<T, HandlerError>
where
    T: Protobuf<R>,
    R: prost::Message + Default + From<T>,
    <T as TryFrom<R>>::Error: core::fmt::Display,
{
    T::decode_vec(value).map_err(|e| DecodingError::invalid_raw_data(e).into())
}

impl TryFrom<Any> for MsgEnvelope {
    type Error = HandlerError;

    fn try_from(any_msg: Any) -> Result<Self, Self::Error> {
        let value = any_msg.value.as_slice();

        let envelope = match any_msg.type_url.as_str() {
            // ICS2 messages
            CREATE_CLIENT_TYPE_URL => ClientMsg::CreateClient(decode::<MsgCreateClient, _>(value)?).into(),
            UPDATE_CLIENT_TYPE_URL => ClientMsg::UpdateClient(decode::<MsgUpdateClient, _>(value)?).into(),
            PROVIDE_COUNTERPARTY_TYPE_URL => {
                ClientMsg::ProvideCounterparty(decode::<MsgProvideCounterparty, _>(value)?).into()
            }

            // ICS04 packet messages
            SEND_PACKET_TYPE_URL => PacketMsg::Send(decode::<MsgSendPacket, _>(value)?).into(),
            RECV_PACKET_TYPE_URL => PacketMsg::Recv(decode::<MsgRecvPacket, _>(value)?).into(),
            ACKNOWLEDGEMENT_TYPE_URL => PacketMsg::Ack(decode::<MsgAcknowledgement, _>(value)?).into(),
            TIMEOUT_TYPE_URL => PacketMsg::Timeout(decode::<MsgTimeout, _>(value)?).into(),
            TIMEOUT_ON_CLOSE_TYPE_URL => {
                PacketMsg::TimeoutOnClose(decode::<MsgTimeoutOnClose, _>(value)?).into()
            }
            _ => {
                return Err(HandlerError::UnknownMessageTypeUrl {
                    url: any_msg.type_url,
                })
            }
        };

        Ok(envelope)
    }
}

/// The outcome of a message that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MsgResult {
    /// The message was applied.
    Executed,
    /// A packet was committed under the given sequence.
    Sent(Sequence),
    /// The message was redundant and left the state untouched.
    NoOp,
}

impl MsgResult {
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}
