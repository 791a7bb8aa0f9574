use std::time::Duration;

use ibc_relay_core::channel::types::channel::{Order, State};
use ibc_relay_core::channel::types::error::ChannelError;
use ibc_relay_core::channel::types::msgs::{MsgSendPacket, PacketMsg};
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::channel::types::timeout::TimeoutHeight;
use ibc_relay_core::client::types::Height;
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::MsgResult;
use ibc_relay_core::host::types::path::{ChannelEndPath, CommitmentPath};
use ibc_relay_core::host::ValidationContext;
use ibc_relay_testkit::fixtures::core::channel::MsgSendPacketConfig;
use ibc_relay_testkit::testapp::ibc::applications::mock::{MockModule, ModuleCallback};
use ibc_relay_testkit::utils::year_2023;
use rstest::rstest;
use test_log::test;

use crate::core::{classic_pair, RelayedPair};

const TIMEOUT_HEIGHT: u64 = 8;

fn send_expiring(pair: &mut RelayedPair) -> Packet {
    let msg: MsgSendPacket = MsgSendPacketConfig::builder()
        .timeout_height_on_b(Height::new(0, TIMEOUT_HEIGHT).into())
        .build();

    pair.relayer.send_packet_on_a(msg).expect("send succeeds")
}

/// Produces blocks on B until it reaches `height`.
fn advance_b_to(pair: &mut RelayedPair, height: u64) {
    while pair.relayer.get_ctx_b().latest_height() < Height::new(0, height) {
        pair.relayer.b.ctx.advance_block();
    }
}

fn time_out(pair: &mut RelayedPair, packet: &Packet) -> Result<MsgResult, HandlerError> {
    let msg = pair
        .relayer
        .build_timeout_packet_on_a(&pair.client_id_on_a, packet);
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
fn timeout_settles_an_unreceived_packet() {
    let module_a = MockModule::new();
    let mut pair = classic_pair(Order::Unordered, module_a.clone(), MockModule::new());
    let packet = send_expiring(&mut pair);

    advance_b_to(&mut pair, TIMEOUT_HEIGHT);

    let res = time_out(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert!(!commitment_on_a(&pair, &packet));
    assert!(pair
        .relayer
        .get_ctx_a()
        .get_events()
        .iter()
        .any(|event| matches!(event, IbcEvent::TimeoutPacket(e) if e.packet() == &packet)));
    assert_eq!(
        module_a.callbacks().last(),
        Some(&ModuleCallback::Timeout(packet.seq_on_a))
    );

    // the unordered channel stays open
    let chan_end_on_a = pair
        .relayer
        .get_ctx_a()
        .channel_end(&ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a))
        .expect("no error")
        .expect("channel exists");
    assert_eq!(chan_end_on_a.state, State::Open);
}

#[rstest]
#[case::unordered(Order::Unordered)]
#[case::ordered_after_close(Order::Ordered)]
#[test_log::test]
fn timing_out_twice_is_a_no_op(#[case] ordering: Order) {
    let module_a = MockModule::new();
    let mut pair = classic_pair(ordering, module_a.clone(), MockModule::new());
    let packet = send_expiring(&mut pair);

    advance_b_to(&mut pair, TIMEOUT_HEIGHT);
    time_out(&mut pair, &packet).expect("first timeout succeeds");

    let res = time_out(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::NoOp)), "{res:?}");

    let timeouts = module_a
        .callbacks()
        .into_iter()
        .filter(|callback| matches!(callback, ModuleCallback::Timeout(_)))
        .count();
    assert_eq!(timeouts, 1);
}

#[test]
fn timeout_before_it_elapsed_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let packet = send_expiring(&mut pair);

    let err = time_out(&mut pair, &packet).expect_err("B is below the timeout height");
    assert!(
        matches!(err, HandlerError::Channel(ChannelError::TimeoutNotReached { .. })),
        "{err:?}"
    );
    assert!(commitment_on_a(&pair, &packet));
}

#[test]
fn timeout_of_a_received_packet_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let packet = send_expiring(&mut pair);

    let msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    pair.relayer
        .b
        .deliver(PacketMsg::from(msg))
        .expect("receive succeeds");

    advance_b_to(&mut pair, TIMEOUT_HEIGHT);

    let err = time_out(&mut pair, &packet).expect_err("B holds a receipt");
    assert_eq!(err.kind(), ErrorKind::Proof);
    assert!(commitment_on_a(&pair, &packet));
}

#[test]
fn timeout_on_ordered_channel_closes_it() {
    let mut pair = classic_pair(Order::Ordered, MockModule::new(), MockModule::new());
    let packet = send_expiring(&mut pair);

    advance_b_to(&mut pair, TIMEOUT_HEIGHT);

    let res = time_out(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    let chan_end_on_a = pair
        .relayer
        .get_ctx_a()
        .channel_end(&ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a))
        .expect("no error")
        .expect("channel exists");
    assert_eq!(chan_end_on_a.state, State::Closed);

    assert!(pair
        .relayer
        .get_ctx_a()
        .get_events()
        .iter()
        .any(|event| matches!(event, IbcEvent::ChannelClosed(_))));
}

#[test]
fn timeout_on_ordered_channel_after_receipt_fails() {
    let mut pair = classic_pair(Order::Ordered, MockModule::new(), MockModule::new());
    let packet = send_expiring(&mut pair);

    let msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    pair.relayer
        .b
        .deliver(PacketMsg::from(msg))
        .expect("receive succeeds");

    advance_b_to(&mut pair, TIMEOUT_HEIGHT);

    let err = time_out(&mut pair, &packet).expect_err("B moved past the packet");
    assert!(
        matches!(err, HandlerError::Channel(ChannelError::InvalidPacketSequence { .. })),
        "{err:?}"
    );
}

#[rstest]
#[case::timestamp_only(3)]
#[case::well_past(5)]
#[test_log::test]
fn timeout_by_timestamp(#[case] blocks_past: u32) {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());

    let timeout_timestamp = (year_2023() + Duration::from_secs(10)).expect("no overflow");
    let msg: MsgSendPacket = MsgSendPacketConfig::builder()
        .timeout_height_on_b(TimeoutHeight::Never)
        .timeout_timestamp_on_b(timeout_timestamp.into())
        .build();
    let packet = pair.relayer.send_packet_on_a(msg).expect("send succeeds");

    for _ in 0..blocks_past {
        pair.relayer.b.ctx.advance_block();
    }
    assert!(pair.relayer.get_ctx_b().latest_timestamp() >= timeout_timestamp);

    let res = time_out(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");
}
