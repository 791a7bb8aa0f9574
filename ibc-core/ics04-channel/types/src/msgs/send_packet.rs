use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use ibc_relay_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;
use ibc_relay_primitives::Signer;

use crate::error::ChannelError;
use crate::packet::Packet;
use crate::timeout::{TimeoutHeight, TimeoutTimestamp};

pub const SEND_PACKET_TYPE_URL: &str = "/ibc.core.channel.v1.MsgSendPacket";

/// Wire form of [`MsgSendPacket`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawMsgSendPacket {
    #[prost(string, tag = "1")]
    pub source_port: String,
    #[prost(string, tag = "2")]
    pub source_channel: String,
    #[prost(string, tag = "3")]
    pub dest_port: String,
    #[prost(string, tag = "4")]
    pub dest_channel: String,
    #[prost(bytes = "vec", tag = "5")]
    pub data: Vec<u8>,
    #[prost(message, optional, tag = "6")]
    pub timeout_height: Option<RawHeight>,
    #[prost(uint64, tag = "7")]
    pub timeout_timestamp: u64,
    #[prost(string, tag = "8")]
    pub signer: String,
}

///
/// Message definition for sending a packet. The sequence is allocated by the
/// sending chain, so the message carries everything but.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgSendPacket {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub data: Vec<u8>,
    pub timeout_height_on_b: TimeoutHeight,
    pub timeout_timestamp_on_b: TimeoutTimestamp,
    pub signer: Signer,
}

impl MsgSendPacket {
    /// Builds the packet this message sends under the allocated sequence.
    pub fn packet(&self, seq_on_a: Sequence) -> Packet {
        Packet {
            seq_on_a,
            port_id_on_a: self.port_id_on_a.clone(),
            chan_id_on_a: self.chan_id_on_a.clone(),
            port_id_on_b: self.port_id_on_b.clone(),
            chan_id_on_b: self.chan_id_on_b.clone(),
            data: self.data.clone(),
            timeout_height_on_b: self.timeout_height_on_b,
            timeout_timestamp_on_b: self.timeout_timestamp_on_b,
        }
    }
}

impl Protobuf<RawMsgSendPacket> for MsgSendPacket {}

impl TryFrom<RawMsgSendPacket> for MsgSendPacket {
    type Error = ChannelError;

    fn try_from(raw_msg: RawMsgSendPacket) -> Result<Self, Self::Error> {
        Ok(MsgSendPacket {
            port_id_on_a: raw_msg.source_port.parse()?,
            chan_id_on_a: raw_msg.source_channel.parse()?,
            port_id_on_b: raw_msg.dest_port.parse()?,
            chan_id_on_b: raw_msg.dest_channel.parse()?,
            data: raw_msg.data,
            timeout_height_on_b: raw_msg.timeout_height.into(),
            timeout_timestamp_on_b: TimeoutTimestamp::from_nanoseconds(raw_msg.timeout_timestamp)?,
            signer: raw_msg.signer.into(),
        })
    }
}

impl From<MsgSendPacket> for RawMsgSendPacket {
    fn from(domain_msg: MsgSendPacket) -> Self {
        RawMsgSendPacket {
            source_port: domain_msg.port_id_on_a.to_string(),
            source_channel: domain_msg.chan_id_on_a.to_string(),
            dest_port: domain_msg.port_id_on_b.to_string(),
            dest_channel: domain_msg.chan_id_on_b.to_string(),
            data: domain_msg.data,
            timeout_height: domain_msg.timeout_height_on_b.into(),
            timeout_timestamp: domain_msg.timeout_timestamp_on_b.nanoseconds(),
            signer: domain_msg.signer.to_string(),
        }
    }
}
