use ibc_relay_core::channel::handler::write_acknowledgement;
use ibc_relay_core::channel::types::acknowledgement::{AcknowledgementStatus, StatusValue};
use ibc_relay_core::channel::types::channel::Order;
use ibc_relay_core::channel::types::error::ChannelError;
use ibc_relay_core::channel::types::msgs::{MsgSendPacket, PacketMsg};
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::client::types::Height;
use ibc_relay_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::MsgResult;
use ibc_relay_core::host::types::identifiers::Sequence;
use ibc_relay_core::host::types::path::{AckPath, ReceiptPath, SeqRecvPath};
use ibc_relay_core::host::{Store, ValidationContext};
use ibc_relay_testkit::fixtures::core::channel::MsgSendPacketConfig;
use ibc_relay_testkit::testapp::ibc::applications::mock::{
    mock_record_key, AckBehaviour, MockModule, ModuleCallback, MOCK_ACK_RESULT,
};
use rstest::rstest;
use test_log::test;

use crate::core::{classic_pair, RelayedPair};

fn send(pair: &mut RelayedPair, msg: MsgSendPacket) -> Packet {
    pair.relayer.send_packet_on_a(msg).expect("send succeeds")
}

fn default_send() -> MsgSendPacket {
    MsgSendPacketConfig::builder().build()
}

fn recv(pair: &mut RelayedPair, packet: &Packet) -> Result<MsgResult, HandlerError> {
    let msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, packet);
    pair.relayer.b.deliver(PacketMsg::from(msg))
}

fn count_receive_events(pair: &RelayedPair) -> usize {
    pair.relayer
        .get_ctx_b()
        .get_events()
        .iter()
        .filter(|event| matches!(event, IbcEvent::ReceivePacket(_)))
        .count()
}

#[test]
fn recv_packet_writes_receipt_and_acknowledgement() {
    let module_b = MockModule::new();
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), module_b.clone());
    let packet = send(&mut pair, default_send());

    let res = recv(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    let ctx_b = pair.relayer.get_ctx_b();
    let receipt_path = ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    assert!(ctx_b.get_packet_receipt(&receipt_path).expect("no error").is_some());

    let ack_path = AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    assert!(ctx_b.get_packet_acknowledgement(&ack_path).expect("no error").is_some());

    let ack = pair
        .relayer
        .acknowledgement_on_b(&packet)
        .expect("acknowledgement written");
    let expected = AcknowledgementStatus::success(StatusValue::new(MOCK_ACK_RESULT).expect("no error"));
    assert_eq!(ack, expected.into());

    assert_eq!(module_b.callbacks(), vec![ModuleCallback::Recv(packet.seq_on_a)]);
    assert_eq!(
        ctx_b.ibc_store.get(&mock_record_key("received", packet.seq_on_a)),
        Some(packet.data.clone())
    );
    assert_eq!(count_receive_events(&pair), 1);
}

#[test]
fn recv_packet_twice_is_a_no_op() {
    let module_b = MockModule::new();
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), module_b.clone());
    let packet = send(&mut pair, default_send());

    recv(&mut pair, &packet).expect("first receive succeeds");

    let res = recv(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::NoOp)), "{res:?}");

    assert_eq!(count_receive_events(&pair), 1);
    assert_eq!(module_b.callbacks().len(), 1);
}

#[test]
fn error_acknowledgement_discards_application_writes() {
    let module_b = MockModule::new().with_ack_behaviour(AckBehaviour::Error);
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), module_b);
    let packet = send(&mut pair, default_send());

    let res = recv(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    let ctx_b = pair.relayer.get_ctx_b();

    // the receipt and the acknowledgement survive
    let receipt_path = ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    assert!(ctx_b.get_packet_receipt(&receipt_path).expect("no error").is_some());
    let ack = pair
        .relayer
        .acknowledgement_on_b(&packet)
        .expect("acknowledgement written");
    assert!(ack.as_bytes().starts_with(b"{\"error\""));

    assert_eq!(
        ctx_b.ibc_store.get(&mock_record_key("received", packet.seq_on_a)),
        None
    );
    assert!(!ctx_b
        .get_events()
        .iter()
        .any(|event| matches!(event, IbcEvent::Module(_))));
    assert!(ctx_b
        .get_logs()
        .iter()
        .any(|log| log.contains("application writes discarded")));
}

#[test]
fn async_acknowledgement_is_written_later() {
    let module_b = MockModule::new().with_ack_behaviour(AckBehaviour::Async);
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), module_b);
    let packet = send(&mut pair, default_send());

    recv(&mut pair, &packet).expect("receive succeeds");

    let ack_path = AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    assert!(pair
        .relayer
        .get_ctx_b()
        .get_packet_acknowledgement(&ack_path)
        .expect("no error")
        .is_none());
    assert!(pair.relayer.acknowledgement_on_b(&packet).is_none());
    // application writes are kept for a pending acknowledgement
    assert!(pair
        .relayer
        .get_ctx_b()
        .ibc_store
        .get(&mock_record_key("received", packet.seq_on_a))
        .is_some());

    let ack = AcknowledgementStatus::success(StatusValue::new("done").expect("no error"));
    write_acknowledgement(&mut pair.relayer.b.ctx, &packet, ack.clone().into())
        .expect("first write succeeds");

    assert!(pair
        .relayer
        .get_ctx_b()
        .get_packet_acknowledgement(&ack_path)
        .expect("no error")
        .is_some());

    let res = write_acknowledgement(&mut pair.relayer.b.ctx, &packet, ack.into());
    assert!(
        matches!(res, Err(ChannelError::AcknowledgementExists { .. })),
        "{res:?}"
    );
}

#[test]
fn ordered_channel_receives_in_sequence() {
    let mut pair = classic_pair(Order::Ordered, MockModule::new(), MockModule::new());

    let first = send(&mut pair, default_send());
    let second = send(&mut pair, default_send());

    let err = recv(&mut pair, &second).expect_err("sequence 1 comes first");
    assert!(
        matches!(
            err,
            HandlerError::Channel(ChannelError::InvalidPacketSequence { expected, actual })
                if expected == Sequence::from(1) && actual == Sequence::from(2)
        ),
        "{err:?}"
    );

    recv(&mut pair, &first).expect("first packet received");
    recv(&mut pair, &second).expect("second packet received");

    let seq_recv_path = SeqRecvPath::new(&second.port_id_on_b, &second.chan_id_on_b);
    assert_eq!(
        pair.relayer
            .get_ctx_b()
            .get_next_sequence_recv(&seq_recv_path)
            .expect("no error"),
        Sequence::from(3)
    );

    let res = recv(&mut pair, &first);
    assert!(matches!(res, Ok(MsgResult::NoOp)), "{res:?}");
}

#[test]
fn recv_packet_with_forged_proof_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let packet = send(&mut pair, default_send());

    let mut msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    msg.proof_commitment_on_a = CommitmentProofBytes::try_from(vec![7; 32]).expect("no error");

    let err = pair
        .relayer
        .b
        .deliver(PacketMsg::from(msg))
        .expect_err("forged proof");
    assert_eq!(err.kind(), ErrorKind::Proof);
    assert_eq!(count_receive_events(&pair), 0);
}

#[test]
fn recv_packet_at_unknown_proof_height_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let packet = send(&mut pair, default_send());

    let mut msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    msg.proof_height_on_a = Height::new(0, 1000);

    let err = pair
        .relayer
        .b
        .deliver(PacketMsg::from(msg))
        .expect_err("no consensus state at the proof height");
    assert_eq!(err.kind(), ErrorKind::Proof);
}

#[rstest]
#[case::at_host_height(7)]
#[case::below_host_height(6)]
#[test_log::test]
fn recv_packet_past_its_timeout_fails(#[case] timeout_height: u64) {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());

    // B's client on A is at height 5 when the packet is sent, and B reaches
    // height 7 by the time the packet is delivered
    let packet = send(
        &mut pair,
        MsgSendPacketConfig::builder()
            .timeout_height_on_b(Height::new(0, timeout_height).into())
            .build(),
    );

    let err = recv(&mut pair, &packet).expect_err("timeout elapsed on B");
    assert!(
        matches!(err, HandlerError::Channel(ChannelError::InvalidTimeout(_))),
        "{err:?}"
    );
}
