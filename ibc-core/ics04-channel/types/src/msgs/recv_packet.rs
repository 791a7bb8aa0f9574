use ibc_proto::ibc::core::channel::v1::MsgRecvPacket as RawMsgRecvPacket;
use ibc_relay_client_types::Height;
use ibc_relay_commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_host_types::error::DecodingError;
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;
use ibc_relay_primitives::Signer;

use crate::error::ChannelError;
use crate::packet::Packet;

pub const RECV_PACKET_TYPE_URL: &str = "/ibc.core.channel.v1.MsgRecvPacket";

///
/// Message definition for the "packet receiving" datagram.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgRecvPacket {
    /// The packet to be received
    pub packet: Packet,
    /// Proof of packet commitment on the sending chain
    pub proof_commitment_on_a: CommitmentProofBytes,
    /// Height at which the commitment proof in this message were taken
    pub proof_height_on_a: Height,
    /// The signer of the message
    pub signer: Signer,
}

impl Protobuf<RawMsgRecvPacket> for MsgRecvPacket {}

impl TryFrom<RawMsgRecvPacket> for MsgRecvPacket {
    type Error = ChannelError;

    fn try_from(raw_msg: RawMsgRecvPacket) -> Result<Self, Self::Error> {
        Ok(MsgRecvPacket {
            packet: raw_msg
                .packet
                .ok_or(DecodingError::missing_raw_data("msg recv packet data"))?
                .try_into()?,
            proof_commitment_on_a: raw_msg.proof_commitment.try_into()?,
            proof_height_on_a: raw_msg
                .proof_height
                .map(Height::from)
                .ok_or(DecodingError::missing_raw_data("msg recv proof height"))?,
            signer: raw_msg.signer.into(),
        })
    }
}

impl From<MsgRecvPacket> for RawMsgRecvPacket {
    fn from(domain_msg: MsgRecvPacket) -> Self {
        RawMsgRecvPacket {
            packet: Some(domain_msg.packet.into()),
            proof_commitment: domain_msg.proof_commitment_on_a.into(),
            proof_height: Some(domain_msg.proof_height_on_a.into()),
            signer: domain_msg.signer.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;

    use super::*;

    fn raw_msg() -> RawMsgRecvPacket {
        RawMsgRecvPacket {
            packet: Some(RawPacket {
                sequence: 1,
                source_port: "transfer".to_string(),
                source_channel: "channel-0".to_string(),
                destination_port: "transfer".to_string(),
                destination_channel: "channel-1".to_string(),
                data: b"payload".to_vec(),
                timeout_height: Some(Height::new(0, 20).into()),
                timeout_timestamp: 0,
            }),
            proof_commitment: vec![1, 2, 3],
            proof_height: Some(Height::new(0, 10).into()),
            signer: "relayer".to_string(),
        }
    }

    #[test]
    fn msg_recv_packet_try_from_raw() {
        struct Test {
            name: &'static str,
            raw: RawMsgRecvPacket,
            want_pass: bool,
        }

        let tests = vec![
            Test {
                name: "Good parameters",
                raw: raw_msg(),
                want_pass: true,
            },
            Test {
                name: "Missing proof",
                raw: RawMsgRecvPacket {
                    proof_commitment: Vec::new(),
                    ..raw_msg()
                },
                want_pass: false,
            },
            Test {
                name: "Missing proof height",
                raw: RawMsgRecvPacket {
                    proof_height: None,
                    ..raw_msg()
                },
                want_pass: false,
            },
            Test {
                name: "Missing packet",
                raw: RawMsgRecvPacket {
                    packet: None,
                    ..raw_msg()
                },
                want_pass: false,
            },
            Test {
                name: "Empty signer",
                raw: RawMsgRecvPacket {
                    signer: String::new(),
                    ..raw_msg()
                },
                want_pass: true,
            },
        ];

        for test in tests {
            let res_msg: Result<MsgRecvPacket, ChannelError> = test.raw.clone().try_into();

            assert_eq!(
                res_msg.is_ok(),
                test.want_pass,
                "MsgRecvPacket::try_from failed for test {} \nraw message: {:?} with error: {:?}",
                test.name,
                test.raw,
                res_msg.err()
            );
        }
    }

    #[test]
    fn to_and_from() {
        let raw = raw_msg();
        let msg = MsgRecvPacket::try_from(raw.clone()).unwrap();
        let raw_back = RawMsgRecvPacket::from(msg.clone());
        let msg_back = MsgRecvPacket::try_from(raw_back.clone()).unwrap();
        assert_eq!(raw, raw_back);
        assert_eq!(msg, msg_back);
    }
}
