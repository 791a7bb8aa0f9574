//! Message definitions for the packet lifecycle: send, receive,
//! acknowledgement, timeout and timeout on close.

mod acknowledgement;
mod recv_packet;
mod send_packet;
mod timeout;
mod timeout_on_close;

pub use acknowledgement::*;
use ibc_relay_host_types::identifiers::*;
use ibc_relay_primitives::Signer;
pub use recv_packet::*;
pub use send_packet::*;
pub use timeout::*;
pub use timeout_on_close::*;

use crate::packet::Packet;

/// All packet messages
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum PacketMsg {
    Send(MsgSendPacket),
    Recv(MsgRecvPacket),
    Ack(MsgAcknowledgement),
    Timeout(MsgTimeout),
    TimeoutOnClose(MsgTimeoutOnClose),
}

impl PacketMsg {
    /// The packet a proof-carrying message settles; `None` for a send, whose
    /// packet does not exist yet.
    pub fn packet(&self) -> Option<&Packet> {
        match self {
            PacketMsg::Send(_) => None,
            PacketMsg::Recv(msg) => Some(&msg.packet),
            PacketMsg::Ack(msg) => Some(&msg.packet),
            PacketMsg::Timeout(msg) => Some(&msg.packet),
            PacketMsg::TimeoutOnClose(msg) => Some(&msg.packet),
        }
    }

    pub fn signer(&self) -> &Signer {
        match self {
            PacketMsg::Send(msg) => &msg.signer,
            PacketMsg::Recv(msg) => &msg.signer,
            PacketMsg::Ack(msg) => &msg.signer,
            PacketMsg::Timeout(msg) => &msg.signer,
            PacketMsg::TimeoutOnClose(msg) => &msg.signer,
        }
    }
}

/// The port of the application module a packet message is delivered to.
pub fn packet_msg_to_port_id(msg: &PacketMsg) -> &PortId {
    match msg {
        PacketMsg::Send(msg) => &msg.port_id_on_a,
        PacketMsg::Recv(msg) => &msg.packet.port_id_on_b,
        PacketMsg::Ack(msg) => &msg.packet.port_id_on_a,
        PacketMsg::Timeout(msg) => &msg.packet.port_id_on_a,
        PacketMsg::TimeoutOnClose(msg) => &msg.packet.port_id_on_a,
    }
}

/// The local (port, channel) a packet message is routed by: the source end
/// for send, ack and timeouts, the destination end for receive.
pub fn packet_msg_to_local_end(msg: &PacketMsg) -> (&PortId, &ChannelId) {
    match msg {
        PacketMsg::Send(msg) => (&msg.port_id_on_a, &msg.chan_id_on_a),
        PacketMsg::Recv(msg) => (&msg.packet.port_id_on_b, &msg.packet.chan_id_on_b),
        PacketMsg::Ack(msg) => (&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a),
        PacketMsg::Timeout(msg) => (&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a),
        PacketMsg::TimeoutOnClose(msg) => (&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a),
    }
}
