use ibc_relay_core::channel::types::msgs::MsgSendPacket;
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
use ibc_relay_core::client::types::Height;
use ibc_relay_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::Signer;
use typed_builder::TypedBuilder;

use crate::fixtures::core::signer::dummy_account_id;
use crate::testapp::ibc::applications::mock::mock_port_id;

/// Configuration of the `Packet` type for building dummy packets. Packets
/// time out at height 1000 of the destination unless told otherwise.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = Packet))]
pub struct PacketConfig {
    #[builder(default = Sequence::from(1))]
    pub seq_on_a: Sequence,
    #[builder(default = mock_port_id())]
    pub port_id_on_a: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_a: ChannelId,
    #[builder(default = mock_port_id())]
    pub port_id_on_b: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_b: ChannelId,
    #[builder(default = b"mock packet".to_vec())]
    pub data: Vec<u8>,
    #[builder(default = TimeoutHeight::At(Height::new(0, 1000)))]
    pub timeout_height_on_b: TimeoutHeight,
    #[builder(default = TimeoutTimestamp::Never)]
    pub timeout_timestamp_on_b: TimeoutTimestamp,
}

impl From<PacketConfig> for Packet {
    fn from(config: PacketConfig) -> Self {
        Packet {
            seq_on_a: config.seq_on_a,
            port_id_on_a: config.port_id_on_a,
            chan_id_on_a: config.chan_id_on_a,
            port_id_on_b: config.port_id_on_b,
            chan_id_on_b: config.chan_id_on_b,
            data: config.data,
            timeout_height_on_b: config.timeout_height_on_b,
            timeout_timestamp_on_b: config.timeout_timestamp_on_b,
        }
    }
}

/// Configuration of `MsgSendPacket`, defaulting to the mock port on both
/// ends.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgSendPacket))]
pub struct MsgSendPacketConfig {
    #[builder(default = mock_port_id())]
    pub port_id_on_a: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_a: ChannelId,
    #[builder(default = mock_port_id())]
    pub port_id_on_b: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_b: ChannelId,
    #[builder(default = b"mock packet".to_vec())]
    pub data: Vec<u8>,
    #[builder(default = TimeoutHeight::At(Height::new(0, 1000)))]
    pub timeout_height_on_b: TimeoutHeight,
    #[builder(default = TimeoutTimestamp::Never)]
    pub timeout_timestamp_on_b: TimeoutTimestamp,
    #[builder(default = dummy_account_id())]
    pub signer: Signer,
}

impl From<MsgSendPacketConfig> for MsgSendPacket {
    fn from(config: MsgSendPacketConfig) -> Self {
        MsgSendPacket {
            port_id_on_a: config.port_id_on_a,
            chan_id_on_a: config.chan_id_on_a,
            port_id_on_b: config.port_id_on_b,
            chan_id_on_b: config.chan_id_on_b,
            data: config.data,
            timeout_height_on_b: config.timeout_height_on_b,
            timeout_timestamp_on_b: config.timeout_timestamp_on_b,
            signer: config.signer,
        }
    }
}
