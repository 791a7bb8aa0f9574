//! Defines the packet type
use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;
use ibc_relay_client_types::Height;
use ibc_relay_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::Timestamp;

use crate::commitment::{compute_packet_commitment, PacketCommitment};
use crate::error::ChannelError;
use crate::timeout::{Timeout, TimeoutHeight, TimeoutTimestamp};

/// Packet receipt, the marker a destination writes once it has received a
/// sequence.
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
pub enum Receipt {
    Ok,
}

impl Receipt {
    /// The stored form of a receipt.
    pub const BYTES: [u8; 1] = [0x01];

    pub fn to_vec(&self) -> Vec<u8> {
        Self::BYTES.to_vec()
    }
}

/// The packet type; this is what applications send to one another.
///
/// Each application defines the structure of the `data` field. On a lite
/// route the channel fields carry client identifiers: `chan_id_on_a` names
/// the sender's client for the destination and `chan_id_on_b` the
/// destination's client for the sender.
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
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct Packet {
    pub seq_on_a: Sequence,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "ibc_relay_commitment_types::serializer::ser_hex_upper")
    )]
    pub data: Vec<u8>,
    pub timeout_height_on_b: TimeoutHeight,
    pub timeout_timestamp_on_b: TimeoutTimestamp,
}

struct PacketData<'a>(&'a [u8]);

impl<'a> core::fmt::Debug for PacketData<'a> {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(formatter, "{:?}", self.0)
    }
}

impl core::fmt::Debug for Packet {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        // Remember: if you alter the definition of `Packet`,
        // 1. update the formatter debug struct builder calls (return object of
        //    this function)
        // 2. update this destructuring assignment accordingly
        let Packet {
            seq_on_a: _,
            port_id_on_a: _,
            chan_id_on_a: _,
            port_id_on_b: _,
            chan_id_on_b: _,
            data,
            timeout_height_on_b: _,
            timeout_timestamp_on_b: _,
        } = self;
        let data_wrapper = PacketData(data);

        formatter
            .debug_struct("Packet")
            .field("sequence", &self.seq_on_a)
            .field("source_port", &self.port_id_on_a)
            .field("source_channel", &self.chan_id_on_a)
            .field("destination_port", &self.port_id_on_b)
            .field("destination_channel", &self.chan_id_on_b)
            .field("data", &data_wrapper)
            .field("timeout_height", &self.timeout_height_on_b)
            .field("timeout_timestamp", &self.timeout_timestamp_on_b)
            .finish()
    }
}

impl Packet {
    pub fn timeout(&self) -> Timeout {
        Timeout::new(self.timeout_height_on_b, self.timeout_timestamp_on_b)
    }

    /// Stateless checks every packet must pass before it is committed or
    /// received: a non-zero sequence, non-empty data, and at least one
    /// timeout bound so the packet can expire.
    ///
    /// Port and channel identifiers are validated when they are constructed.
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        if self.seq_on_a.is_zero() {
            return Err(ChannelError::InvalidPacket {
                description: "packet sequence cannot be 0".to_string(),
            });
        }

        if self.data.is_empty() {
            return Err(ChannelError::InvalidPacket {
                description: "packet data bytes cannot be empty".to_string(),
            });
        }

        if !self.timeout().is_set() {
            return Err(ChannelError::InvalidPacket {
                description: "packet timeout height and timeout timestamp cannot both be 0"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Checks whether the packet is timed-out relative to the destination
    /// chain's height `dst_chain_height` and timestamp `dst_chain_ts`.
    pub fn timed_out(&self, dst_chain_ts: &Timestamp, dst_chain_height: Height) -> bool {
        self.timeout().elapsed(dst_chain_height, dst_chain_ts)
    }

    pub fn commitment(&self) -> PacketCommitment {
        compute_packet_commitment(
            &self.data,
            &self.timeout_height_on_b,
            &self.timeout_timestamp_on_b,
        )
    }
}

/// Custom debug output to omit the packet data
impl core::fmt::Display for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(
            f,
            "seq:{}, path:{}/{}->{}/{}, toh:{}, tos:{})",
            self.seq_on_a,
            self.chan_id_on_a,
            self.port_id_on_a,
            self.chan_id_on_b,
            self.port_id_on_b,
            self.timeout_height_on_b,
            self.timeout_timestamp_on_b
        )
    }
}

impl TryFrom<RawPacket> for Packet {
    type Error = ChannelError;

    fn try_from(raw_pkt: RawPacket) -> Result<Self, Self::Error> {
        let packet = Packet {
            seq_on_a: Sequence::from(raw_pkt.sequence),
            port_id_on_a: raw_pkt.source_port.parse()?,
            chan_id_on_a: raw_pkt.source_channel.parse()?,
            port_id_on_b: raw_pkt.destination_port.parse()?,
            chan_id_on_b: raw_pkt.destination_channel.parse()?,
            data: raw_pkt.data,
            timeout_height_on_b: raw_pkt.timeout_height.into(),
            timeout_timestamp_on_b: TimeoutTimestamp::from_nanoseconds(raw_pkt.timeout_timestamp)?,
        };

        packet.validate_basic()?;

        Ok(packet)
    }
}

impl From<Packet> for RawPacket {
    fn from(packet: Packet) -> Self {
        RawPacket {
            sequence: packet.seq_on_a.value(),
            source_port: packet.port_id_on_a.to_string(),
            source_channel: packet.chan_id_on_a.to_string(),
            destination_port: packet.port_id_on_b.to_string(),
            destination_channel: packet.chan_id_on_b.to_string(),
            data: packet.data,
            timeout_height: packet.timeout_height_on_b.into(),
            timeout_timestamp: packet.timeout_timestamp_on_b.nanoseconds(),
        }
    }
}
