use ibc_proto::ibc::core::channel::v1::MsgTimeoutOnClose as RawMsgTimeoutOnClose;
use ibc_relay_client_types::Height;
use ibc_relay_commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_host_types::error::DecodingError;
use ibc_relay_host_types::identifiers::Sequence;
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;
use ibc_relay_primitives::Signer;

use crate::error::ChannelError;
use crate::packet::Packet;

pub const TIMEOUT_ON_CLOSE_TYPE_URL: &str = "/ibc.core.channel.v1.MsgTimeoutOnClose";

///
/// Message definition for timing out a packet whose destination channel
/// was closed before the packet was received.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgTimeoutOnClose {
    pub packet: Packet,
    pub next_seq_recv_on_b: Sequence,
    pub proof_unreceived_on_b: CommitmentProofBytes,
    pub proof_close_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

impl Protobuf<RawMsgTimeoutOnClose> for MsgTimeoutOnClose {}

impl TryFrom<RawMsgTimeoutOnClose> for MsgTimeoutOnClose {
    type Error = ChannelError;

    fn try_from(raw_msg: RawMsgTimeoutOnClose) -> Result<Self, Self::Error> {
        if raw_msg.next_sequence_recv == 0 {
            return Err(DecodingError::invalid_raw_data(
                "msg timeout on close packet sequence cannot be 0",
            )
            .into());
        }

        if raw_msg.counterparty_upgrade_sequence != 0 {
            return Err(DecodingError::invalid_raw_data(
                "channel upgrades are not supported",
            )
            .into());
        }

        Ok(MsgTimeoutOnClose {
            packet: raw_msg
                .packet
                .ok_or(DecodingError::missing_raw_data(
                    "msg timeout on close packet data",
                ))?
                .try_into()?,
            next_seq_recv_on_b: Sequence::from(raw_msg.next_sequence_recv),
            proof_unreceived_on_b: raw_msg.proof_unreceived.try_into()?,
            proof_close_on_b: raw_msg.proof_close.try_into()?,
            proof_height_on_b: raw_msg.proof_height.map(Height::from).ok_or(
                DecodingError::missing_raw_data("msg timeout on close proof height"),
            )?,
            signer: raw_msg.signer.into(),
        })
    }
}

impl From<MsgTimeoutOnClose> for RawMsgTimeoutOnClose {
    fn from(domain_msg: MsgTimeoutOnClose) -> Self {
        RawMsgTimeoutOnClose {
            packet: Some(domain_msg.packet.into()),
            proof_unreceived: domain_msg.proof_unreceived_on_b.into(),
            proof_close: domain_msg.proof_close_on_b.into(),
            proof_height: Some(domain_msg.proof_height_on_b.into()),
            next_sequence_recv: domain_msg.next_seq_recv_on_b.into(),
            signer: domain_msg.signer.to_string(),
            counterparty_upgrade_sequence: 0,
        }
    }
}
