use ibc_relay_core::channel::types::channel::Order;
use ibc_relay_core::channel::types::error::ChannelError;
use ibc_relay_core::channel::types::msgs::PacketMsg;
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::msgs::MsgResult;
use ibc_relay_core::host::types::path::CommitmentPath;
use ibc_relay_core::host::ValidationContext;
use ibc_relay_testkit::fixtures::core::channel::MsgSendPacketConfig;
use ibc_relay_testkit::testapp::ibc::applications::mock::{MockModule, ModuleCallback};
use rstest::rstest;
use test_log::test;

use crate::core::{classic_pair, RelayedPair};

fn send(pair: &mut RelayedPair) -> Packet {
    pair.relayer
        .send_packet_on_a(MsgSendPacketConfig::builder().build())
        .expect("send succeeds")
}

fn time_out_on_close(pair: &mut RelayedPair, packet: &Packet) -> Result<MsgResult, HandlerError> {
    let msg = pair
        .relayer
        .build_timeout_on_close_packet_on_a(&pair.client_id_on_a, packet);
    pair.relayer.a.deliver(PacketMsg::from(msg))
}

#[rstest]
#[case(Order::Unordered)]
#[case(Order::Ordered)]
#[test_log::test]
fn timeout_on_close_settles_the_packet(#[case] ordering: Order) {
    let module_a = MockModule::new();
    let mut pair = classic_pair(ordering, module_a.clone(), MockModule::new());
    let packet = send(&mut pair);

    // the packet's own timeout is far off
    pair.relayer.close_channel_on_b(&pair.chan_id_on_b);

    let res = time_out_on_close(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    let commitment_path = CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);
    assert!(pair
        .relayer
        .get_ctx_a()
        .get_packet_commitment(&commitment_path)
        .expect("no error")
        .is_none());
    assert_eq!(
        module_a.callbacks().last(),
        Some(&ModuleCallback::Timeout(packet.seq_on_a))
    );

    let res = time_out_on_close(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::NoOp)), "{res:?}");
}

#[test]
fn timeout_on_close_with_open_counterparty_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let packet = send(&mut pair);

    let err = time_out_on_close(&mut pair, &packet).expect_err("B's end is still open");
    assert_eq!(err.kind(), ErrorKind::Proof);
}

#[test]
fn timeout_on_close_of_a_received_packet_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let packet = send(&mut pair);

    let msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    pair.relayer
        .b
        .deliver(PacketMsg::from(msg))
        .expect("receive succeeds");

    pair.relayer.close_channel_on_b(&pair.chan_id_on_b);

    let err = time_out_on_close(&mut pair, &packet).expect_err("B holds a receipt");
    assert_eq!(err.kind(), ErrorKind::Proof);
}

#[test]
fn timeout_on_close_of_altered_packet_fails() {
    let mut pair = classic_pair(Order::Unordered, MockModule::new(), MockModule::new());
    let mut packet = send(&mut pair);
    pair.relayer.close_channel_on_b(&pair.chan_id_on_b);

    packet.data = b"altered".to_vec();

    let res = time_out_on_close(&mut pair, &packet);
    assert!(
        matches!(
            res,
            Err(HandlerError::Channel(ChannelError::MismatchedPacketCommitment { .. }))
        ),
        "{res:?}"
    );
}
