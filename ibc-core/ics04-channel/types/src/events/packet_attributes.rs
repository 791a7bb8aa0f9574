//! Attribute keys and encoders shared by the packet events.

use ibc_relay_primitives::prelude::*;
use subtle_encoding::{Encoding, Hex};

use crate::channel::Order;
use crate::packet::Packet;

pub const PKT_SEQ_ATTRIBUTE_KEY: &str = "packet_sequence";
pub const PKT_DATA_ATTRIBUTE_KEY: &str = "packet_data_hex";
pub const PKT_SRC_PORT_ATTRIBUTE_KEY: &str = "packet_src_port";
pub const PKT_SRC_CHANNEL_ATTRIBUTE_KEY: &str = "packet_src_channel";
pub const PKT_DST_PORT_ATTRIBUTE_KEY: &str = "packet_dst_port";
pub const PKT_DST_CHANNEL_ATTRIBUTE_KEY: &str = "packet_dst_channel";
pub const PKT_CHANNEL_ORDERING_ATTRIBUTE_KEY: &str = "packet_channel_ordering";
pub const PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY: &str = "packet_timeout_height";
pub const PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY: &str = "packet_timeout_timestamp";
pub const PKT_ACK_ATTRIBUTE_KEY: &str = "packet_ack_hex";

pub(super) fn encode_hex(bytes: &[u8]) -> String {
    // Hex encoding of a byte slice cannot fail.
    Hex::lower_case()
        .encode_to_string(bytes)
        .unwrap_or_default()
}

/// Identifying attributes of a packet, without its data.
pub(super) fn packet_id_attributes(packet: &Packet) -> Vec<(&'static str, String)> {
    vec![
        (
            PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY,
            match packet.timeout_height_on_b {
                crate::timeout::TimeoutHeight::At(height) => height.to_string(),
                crate::timeout::TimeoutHeight::Never => "0-0".to_string(),
            },
        ),
        (
            PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY,
            packet.timeout_timestamp_on_b.nanoseconds().to_string(),
        ),
        (PKT_SEQ_ATTRIBUTE_KEY, packet.seq_on_a.to_string()),
        (PKT_SRC_PORT_ATTRIBUTE_KEY, packet.port_id_on_a.to_string()),
        (PKT_SRC_CHANNEL_ATTRIBUTE_KEY, packet.chan_id_on_a.to_string()),
        (PKT_DST_PORT_ATTRIBUTE_KEY, packet.port_id_on_b.to_string()),
        (PKT_DST_CHANNEL_ATTRIBUTE_KEY, packet.chan_id_on_b.to_string()),
    ]
}

pub(super) fn ordering_attribute(ordering: &Order) -> (&'static str, String) {
    (PKT_CHANNEL_ORDERING_ATTRIBUTE_KEY, ordering.to_string())
}
