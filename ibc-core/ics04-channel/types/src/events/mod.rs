//! Types for the events emitted by the packet handlers.
//!
//! Every event exposes its kind through `event_type()` and its payload as
//! ordered `(key, value)` attributes through `attributes()`. A lite route
//! reports its packets as unordered.

mod packet_attributes;

use ibc_relay_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_relay_primitives::prelude::*;

pub use self::packet_attributes::*;
use super::acknowledgement::Acknowledgement;
use super::channel::Order;
use crate::packet::Packet;

/// Channel event types
pub const CHANNEL_CLOSED_EVENT: &str = "channel_close";

/// Packet event types
pub const SEND_PACKET_EVENT: &str = "send_packet";
pub const RECEIVE_PACKET_EVENT: &str = "recv_packet";
pub const WRITE_ACK_EVENT: &str = "write_acknowledgement";
pub const ACK_PACKET_EVENT: &str = "acknowledge_packet";
pub const TIMEOUT_EVENT: &str = "timeout_packet";

pub const PORT_ID_ATTRIBUTE_KEY: &str = "port_id";
pub const CHANNEL_ID_ATTRIBUTE_KEY: &str = "channel_id";
pub const COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY: &str = "counterparty_port_id";
pub const COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY: &str = "counterparty_channel_id";

/// Emitted when an ordered channel is closed by a timeout.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelClosed {
    port_id_on_a: PortId,
    chan_id_on_a: ChannelId,
    port_id_on_b: PortId,
    chan_id_on_b: ChannelId,
    channel_ordering: Order,
}

impl ChannelClosed {
    pub fn new(
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
        port_id_on_b: PortId,
        chan_id_on_b: ChannelId,
        channel_ordering: Order,
    ) -> Self {
        Self {
            port_id_on_a,
            chan_id_on_a,
            port_id_on_b,
            chan_id_on_b,
            channel_ordering,
        }
    }

    pub fn port_id_on_a(&self) -> &PortId {
        &self.port_id_on_a
    }

    pub fn chan_id_on_a(&self) -> &ChannelId {
        &self.chan_id_on_a
    }

    pub fn port_id_on_b(&self) -> &PortId {
        &self.port_id_on_b
    }

    pub fn chan_id_on_b(&self) -> &ChannelId {
        &self.chan_id_on_b
    }

    pub fn channel_ordering(&self) -> &Order {
        &self.channel_ordering
    }

    pub fn event_type(&self) -> &str {
        CHANNEL_CLOSED_EVENT
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            (PORT_ID_ATTRIBUTE_KEY, self.port_id_on_a.to_string()),
            (CHANNEL_ID_ATTRIBUTE_KEY, self.chan_id_on_a.to_string()),
            (
                COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY,
                self.port_id_on_b.to_string(),
            ),
            (
                COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY,
                self.chan_id_on_b.to_string(),
            ),
            ordering_attribute(&self.channel_ordering),
        ]
    }
}

/// Generates a packet event carrying the whole packet and the channel
/// ordering, with the packet data in its attributes.
macro_rules! packet_event {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[cfg_attr(
            feature = "borsh",
            derive(borsh::BorshSerialize, borsh::BorshDeserialize)
        )]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            packet: Packet,
            channel_ordering: Order,
        }

        impl $name {
            pub fn new(packet: Packet, channel_ordering: Order) -> Self {
                Self {
                    packet,
                    channel_ordering,
                }
            }

            pub fn packet(&self) -> &Packet {
                &self.packet
            }

            pub fn seq_on_a(&self) -> &Sequence {
                &self.packet.seq_on_a
            }

            pub fn channel_ordering(&self) -> &Order {
                &self.channel_ordering
            }

            pub fn event_type(&self) -> &str {
                $kind
            }

            pub fn attributes(&self) -> Vec<(&'static str, String)> {
                let mut attributes = vec![(PKT_DATA_ATTRIBUTE_KEY, encode_hex(&self.packet.data))];
                attributes.extend(packet_id_attributes(&self.packet));
                attributes.push(ordering_attribute(&self.channel_ordering));
                attributes
            }
        }
    };
}

packet_event!(
    /// Emitted once a packet is committed on its source chain.
    SendPacket,
    SEND_PACKET_EVENT
);

packet_event!(
    /// Emitted once a packet is received on its destination chain.
    ReceivePacket,
    RECEIVE_PACKET_EVENT
);

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    packet: Packet,
    acknowledgement: Acknowledgement,
}

impl WriteAcknowledgement {
    pub fn new(packet: Packet, acknowledgement: Acknowledgement) -> Self {
        Self {
            packet,
            acknowledgement,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn acknowledgement(&self) -> &Acknowledgement {
        &self.acknowledgement
    }

    pub fn event_type(&self) -> &str {
        WRITE_ACK_EVENT
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![(PKT_DATA_ATTRIBUTE_KEY, encode_hex(&self.packet.data))];
        attributes.extend(packet_id_attributes(&self.packet));
        attributes.push((
            PKT_ACK_ATTRIBUTE_KEY,
            encode_hex(self.acknowledgement.as_bytes()),
        ));
        attributes
    }
}

/// Generates a settlement event, which identifies the packet without
/// carrying its data.
macro_rules! settlement_event {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[cfg_attr(
            feature = "borsh",
            derive(borsh::BorshSerialize, borsh::BorshDeserialize)
        )]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            packet: Packet,
            channel_ordering: Order,
        }

        impl $name {
            pub fn new(packet: Packet, channel_ordering: Order) -> Self {
                Self {
                    packet,
                    channel_ordering,
                }
            }

            pub fn packet(&self) -> &Packet {
                &self.packet
            }

            pub fn seq_on_a(&self) -> &Sequence {
                &self.packet.seq_on_a
            }

            pub fn channel_ordering(&self) -> &Order {
                &self.channel_ordering
            }

            pub fn event_type(&self) -> &str {
                $kind
            }

            pub fn attributes(&self) -> Vec<(&'static str, String)> {
                let mut attributes = packet_id_attributes(&self.packet);
                attributes.push(ordering_attribute(&self.channel_ordering));
                attributes
            }
        }
    };
}

settlement_event!(
    /// Emitted once an acknowledgement settles a packet on its source chain.
    AcknowledgePacket,
    ACK_PACKET_EVENT
);

settlement_event!(
    /// Emitted once a timeout settles a packet on its source chain.
    TimeoutPacket,
    TIMEOUT_EVENT
);
