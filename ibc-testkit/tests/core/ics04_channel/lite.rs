use ibc_relay_core::channel::types::error::ChannelError;
use ibc_relay_core::channel::types::msgs::{MsgSendPacket, MsgTimeoutOnClose, PacketMsg};
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::client::types::Height;
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::MsgResult;
use ibc_relay_core::host::types::identifiers::{ChannelId, ClientId};
use ibc_relay_core::host::types::path::{ChannelEndPath, CommitmentPath, ReceiptPath};
use ibc_relay_core::host::ValidationContext;
use ibc_relay_testkit::fixtures::core::channel::MsgSendPacketConfig;
use ibc_relay_testkit::testapp::ibc::applications::mock::{mock_port_id, MockModule, ModuleCallback};
use test_log::test;

use crate::core::{lite_pair, RelayedPair};

fn send_msg(pair: &RelayedPair, timeout_height: u64) -> MsgSendPacket {
    MsgSendPacketConfig::builder()
        .chan_id_on_a(pair.chan_id_on_a.clone())
        .chan_id_on_b(pair.chan_id_on_b.clone())
        .timeout_height_on_b(Height::new(0, timeout_height).into())
        .build()
}

fn recv(pair: &mut RelayedPair, packet: &Packet) -> Result<MsgResult, HandlerError> {
    let msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, packet);
    pair.relayer.b.deliver(PacketMsg::from(msg))
}

#[test]
fn lite_route_relays_a_packet_end_to_end() {
    let module_a = MockModule::new();
    let module_b = MockModule::new();
    let mut pair = lite_pair(module_a.clone(), module_b.clone());

    let msg = send_msg(&pair, 1000);
    let packet = pair.relayer.send_packet_on_a(msg).expect("send succeeds");

    // no channel end backs the route on either chain
    let path = ChannelEndPath::new(&mock_port_id(), &pair.chan_id_on_a);
    assert!(pair
        .relayer
        .get_ctx_a()
        .channel_end(&path)
        .expect("no error")
        .is_none());

    let res = recv(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    let receipt_path = ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
    assert!(pair
        .relayer
        .get_ctx_b()
        .get_packet_receipt(&receipt_path)
        .expect("no error")
        .is_some());
    assert_eq!(module_b.callbacks(), vec![ModuleCallback::Recv(packet.seq_on_a)]);

    let res = recv(&mut pair, &packet);
    assert!(matches!(res, Ok(MsgResult::NoOp)), "{res:?}");

    let ack = pair
        .relayer
        .acknowledgement_on_b(&packet)
        .expect("acknowledgement written");
    let msg = pair
        .relayer
        .build_ack_packet_on_a(&pair.client_id_on_a, &packet, ack.clone());
    let res = pair.relayer.a.deliver(PacketMsg::from(msg));
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
        Some(&ModuleCallback::Ack(packet.seq_on_a, ack))
    );
}

#[test]
fn lite_receive_after_timeout_is_rejected() {
    let module_a = MockModule::new();
    let module_b = MockModule::new();
    let mut pair = lite_pair(module_a.clone(), module_b.clone());

    let msg = send_msg(&pair, 9);
    let packet = pair.relayer.send_packet_on_a(msg).expect("send succeeds");

    // proven while the commitment still exists on A
    let recv_msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);

    while pair.relayer.get_ctx_b().latest_height() < Height::new(0, 9) {
        pair.relayer.b.ctx.advance_block();
    }

    let timeout_msg = pair
        .relayer
        .build_timeout_packet_on_a(&pair.client_id_on_a, &packet);
    let res = pair.relayer.a.deliver(PacketMsg::from(timeout_msg));
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    let res = pair.relayer.b.deliver(PacketMsg::from(recv_msg));
    assert!(
        matches!(
            res,
            Err(HandlerError::Channel(ChannelError::InvalidTimeout(_)))
        ),
        "{res:?}"
    );

    assert_eq!(
        module_a.callbacks().last(),
        Some(&ModuleCallback::Timeout(packet.seq_on_a))
    );
    assert!(module_b.callbacks().is_empty());
}

#[test]
fn lite_timeout_settles_without_closing_anything() {
    let module_a = MockModule::new();
    let mut pair = lite_pair(module_a.clone(), MockModule::new());

    let msg = send_msg(&pair, 9);
    let packet = pair.relayer.send_packet_on_a(msg).expect("send succeeds");

    while pair.relayer.get_ctx_b().latest_height() < Height::new(0, 9) {
        pair.relayer.b.ctx.advance_block();
    }

    let msg = pair
        .relayer
        .build_timeout_packet_on_a(&pair.client_id_on_a, &packet);
    let res = pair.relayer.a.deliver(PacketMsg::from(msg));
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert_eq!(
        module_a.callbacks().last(),
        Some(&ModuleCallback::Timeout(packet.seq_on_a))
    );
    assert!(!pair
        .relayer
        .get_ctx_a()
        .get_events()
        .iter()
        .any(|event| matches!(event, IbcEvent::ChannelClosed(_))));
}

#[test]
fn lite_route_has_no_channel_to_close() {
    let mut pair = lite_pair(MockModule::new(), MockModule::new());

    let msg = send_msg(&pair, 1000);
    let packet = pair.relayer.send_packet_on_a(msg).expect("send succeeds");

    let timeout = pair
        .relayer
        .build_timeout_packet_on_a(&pair.client_id_on_a, &packet);
    let msg = MsgTimeoutOnClose {
        packet: timeout.packet,
        next_seq_recv_on_b: timeout.next_seq_recv_on_b,
        proof_close_on_b: timeout.proof_unreceived_on_b.clone(),
        proof_unreceived_on_b: timeout.proof_unreceived_on_b,
        proof_height_on_b: timeout.proof_height_on_b,
        signer: timeout.signer,
    };

    let res = pair.relayer.a.deliver(PacketMsg::from(msg));
    assert!(
        matches!(res, Err(HandlerError::Channel(ChannelError::InvalidPacket { .. }))),
        "{res:?}"
    );
}

#[test]
fn unbound_client_is_no_route() {
    let mut pair = lite_pair(MockModule::new(), MockModule::new());

    let unbound = ChannelId::from(ClientId::new("9999-mock", 5).expect("no error"));
    let msg: MsgSendPacket = MsgSendPacketConfig::builder()
        .chan_id_on_a(unbound)
        .chan_id_on_b(pair.chan_id_on_b.clone())
        .build();

    let err = pair.relayer.send_packet_on_a(msg).expect_err("no route");
    assert!(
        matches!(err, HandlerError::Channel(ChannelError::MissingChannel { .. })),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Routing);
}

#[test]
fn lite_packet_from_another_client_is_rejected() {
    let mut pair = lite_pair(MockModule::new(), MockModule::new());

    let msg = send_msg(&pair, 1000);
    let packet = pair.relayer.send_packet_on_a(msg).expect("send succeeds");

    let mut msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    msg.packet.chan_id_on_a = ChannelId::from(ClientId::new("9999-mock", 3).expect("no error"));

    let res = pair.relayer.b.deliver(PacketMsg::from(msg));
    assert!(
        matches!(res, Err(HandlerError::Channel(ChannelError::MismatchedCounterparty { .. }))),
        "{res:?}"
    );
}
