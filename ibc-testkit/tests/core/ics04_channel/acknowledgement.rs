use ibc_relay_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus, StatusValue};
use ibc_relay_core::channel::types::channel::{Order, State};
use ibc_relay_core::channel::types::error::ChannelError;
use ibc_relay_core::channel::types::msgs::PacketMsg;
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::MsgResult;
use ibc_relay_core::host::types::identifiers::Sequence;
use ibc_relay_core::host::types::path::{ChannelEndPath, CommitmentPath, SeqAckPath};
use ibc_relay_core::host::{ExecutionContext, ValidationContext};
use ibc_relay_testkit::fixtures::core::channel::MsgSendPacketConfig;
use ibc_relay_testkit::testapp::ibc::applications::mock::{MockModule, ModuleCallback};
use test_log::test;

use crate::core::{classic_pair, RelayedPair};

/// Sends a packet from A and delivers it to B, returning it with B's
/// acknowledgement.
fn sent_and_received(pair: &mut RelayedPair) -> (Packet, Acknowledgement) {
    let packet = pair
        .relayer
        .send_packet_on_a(MsgSendPacketConfig::builder().build())
        .expect("send succeeds");

    let msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    pair.relayer
        .b
        .deliver(PacketMsg::from(msg))
        .expect("receive succeeds");

    let ack = pair
        .relayer
        .acknowledgement_on_b(&packet)
        .expect("acknowledgement written");

    (packet, ack)
}

fn acknowledge(pair: &mut RelayedPair, packet: &Packet, ack: Acknowledgement) -> Result<MsgResult, HandlerError> {
    let msg = pair
        .relayer
        .build_ack_packet_on_a(&pair.client_id_on_a, packet, ack);
    pair.relayer.a.deliver(PacketMsg::from(msg))
}

fn commitment_on_a(pair: &RelayedPair, packet: &Packet) -> bool {
    let commitment_path = CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);
    pair.relayer
        .get_ctx_a()
        .get_packet_commitment(&commitment_path)
        .expect("no error")
        .is_some()
}

#[test]
fn acknowledgement_settles_the_packet() {
    let module_a = MockModule::new();
    let mut pair = classic_pair(Order::Unordered, module_a.clone(), MockModule::new());
    let (packet, ack) = sent_and_received(&mut pair);

    assert!(commitment_on_a(&pair, &packet));

    let res = acknowledge(&mut pair, &packet, ack.clone());
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert!(!commitment_on_a(&pair, &packet));
    assert!(pair
        .relayer
        .get_ctx_a()
        .get_events()
        .iter()
        .any(|event| matches!(event, IbcEvent::AcknowledgePacket(e) if e.packet() == &packet)));
    assert_eq!(
        module_a.callbacks(),
        vec![
            ModuleCallback::Send(packet.seq_on_a),
            ModuleCallback::Ack(packet.seq_on_a, ack),
        ]
    );
}

#[test]
fn acknowledging_twice_is_a_no_op() {
    let module_a = MockModule::new();
    let mut pair = classic_pair(Order::Unordered, module_a.clone(), MockModule::new());
    let (packet, ack) = sent_and_received(&mut pair);

    acknowledge(&mut pair, &packet, ack.clone()).expect("first acknowledgement succeeds");

    let res = acknowledge(&mut pair, &packet, ack);
    assert!(matches!(res, Ok(MsgResult::NoOp)), "{res:?}");

    let acks = module_a
        .callbacks()
        .into_iter()
        .filter(|callback| matches!(callback, ModuleCallback::Ack(..)))
        .count();
    assert_eq!(acks, 1);
}

#[test]
fn acknowledgement_not_written_by_the_destination_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let (packet, _) = sent_and_received(&mut pair);

    let forged: Acknowledgement =
        AcknowledgementStatus::error(StatusValue::new("forged").expect("no error")).into();

    let err = acknowledge(&mut pair, &packet, forged).expect_err("B never wrote this");
    assert_eq!(err.kind(), ErrorKind::Proof);
    assert!(commitment_on_a(&pair, &packet));
}

#[test]
fn acknowledgement_of_altered_packet_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let (mut packet, ack) = sent_and_received(&mut pair);

    packet.data = b"altered".to_vec();

    let err = acknowledge(&mut pair, &packet, ack).expect_err("commitment mismatch");
    assert!(
        matches!(
            err,
            HandlerError::Channel(ChannelError::MismatchedPacketCommitment { .. })
        ),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Consistency);
}

#[test]
fn ordered_channel_acknowledges_in_sequence() {
    let mut pair = classic_pair(Order::Ordered, MockModule::new(), MockModule::new());
    let (first, first_ack) = sent_and_received(&mut pair);
    let (second, second_ack) = sent_and_received(&mut pair);

    let err = acknowledge(&mut pair, &second, second_ack.clone()).expect_err("sequence 1 comes first");
    assert!(
        matches!(
            err,
            HandlerError::Channel(ChannelError::InvalidPacketSequence { .. })
        ),
        "{err:?}"
    );

    acknowledge(&mut pair, &first, first_ack).expect("first acknowledgement succeeds");
    acknowledge(&mut pair, &second, second_ack).expect("second acknowledgement succeeds");

    let seq_ack_path = SeqAckPath::new(&first.port_id_on_a, &first.chan_id_on_a);
    assert_eq!(
        pair.relayer
            .get_ctx_a()
            .get_next_sequence_ack(&seq_ack_path)
            .expect("no error"),
        Sequence::from(3)
    );
}

#[test]
fn acknowledgement_on_closed_channel_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let (packet, ack) = sent_and_received(&mut pair);

    let path = ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
    let ctx_a = &mut pair.relayer.a.ctx;
    let mut chan_end_on_a = ctx_a.channel_end(&path).expect("no error").expect("channel exists");
    chan_end_on_a.set_state(State::Closed);
    ctx_a.store_channel(&path, chan_end_on_a).expect("no error");

    let res = acknowledge(&mut pair, &packet, ack);
    assert!(
        matches!(res, Err(HandlerError::Channel(ChannelError::InvalidState { .. }))),
        "{res:?}"
    );
}
