use std::time::Duration;

use ibc_relay_core::channel::types::channel::Order;
use ibc_relay_core::channel::types::msgs::{MsgSendPacket, PacketMsg};
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::client::context::prelude::*;
use ibc_relay_core::client::types::msgs::ClientMsg;
use ibc_relay_core::client::types::{Height, Status};
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::msgs::MsgResult;
use ibc_relay_core::host::types::identifiers::ClientId;
use ibc_relay_core::host::ValidationContext;
use ibc_relay_testkit::fixtures::core::channel::MsgSendPacketConfig;
use ibc_relay_testkit::fixtures::core::client::dummy_msg_misbehaviour;
use ibc_relay_testkit::relayer::context::Chain;
use ibc_relay_testkit::testapp::ibc::applications::mock::MockModule;
use ibc_relay_testkit::testapp::ibc::core::types::MockContext;
use ibc_relay_testkit::utils::year_2023;
use rstest::rstest;

use crate::core::{classic_pair, lite_pair, RelayedPair};

#[derive(Clone, Copy, Debug)]
enum Route {
    Classic,
    Lite,
}

/// How the client backing a route stops being usable.
#[derive(Clone, Copy, Debug)]
enum Impairment {
    Frozen,
    Expired,
}

fn relayed_pair(route: Route) -> RelayedPair {
    match route {
        Route::Classic => classic_pair(Order::Unordered, MockModule::new(), MockModule::new()),
        Route::Lite => lite_pair(MockModule::new(), MockModule::new()),
    }
}

fn send_msg(pair: &RelayedPair) -> MsgSendPacket {
    MsgSendPacketConfig::builder()
        .chan_id_on_a(pair.chan_id_on_a.clone())
        .chan_id_on_b(pair.chan_id_on_b.clone())
        .build()
}

fn client_status(ctx: &MockContext, client_id: &ClientId) -> Status {
    let module = ctx.clients.client_module(client_id).expect("registered");
    let client_store = ctx.client_store(client_id).expect("no error");
    module.status(&client_store, client_id)
}

/// Freezes `client_id` on `chain` with conflicting headers, or moves the
/// host clock past the default 14 day trusting period.
fn impair(chain: &mut Chain, client_id: &ClientId, impairment: Impairment) {
    match impairment {
        Impairment::Frozen => {
            let timestamp = year_2023();
            let conflicting = (timestamp + Duration::from_secs(1)).expect("no overflow");
            let res = chain.deliver(ClientMsg::from(dummy_msg_misbehaviour(
                client_id.clone(),
                Height::new(0, 1),
                timestamp,
                conflicting,
            )));
            assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");
        }
        Impairment::Expired => {
            chain.ctx.block_time = Duration::from_secs(15 * 24 * 60 * 60);
            chain.ctx.advance_block();
        }
    }

    let expected = match impairment {
        Impairment::Frozen => Status::Frozen,
        Impairment::Expired => Status::Expired,
    };
    assert_eq!(client_status(&chain.ctx, client_id), expected);
}

fn assert_client_status_error(res: Result<MsgResult, HandlerError>) {
    let err = res.expect_err("an inactive client settles nothing");
    assert_eq!(err.kind(), ErrorKind::ClientStatus, "{err:?}");
}

fn sent(pair: &mut RelayedPair) -> Packet {
    let msg = send_msg(pair);
    pair.relayer.send_packet_on_a(msg).expect("send succeeds")
}

#[rstest]
#[case::classic_frozen(Route::Classic, Impairment::Frozen)]
#[case::classic_expired(Route::Classic, Impairment::Expired)]
#[case::lite_frozen(Route::Lite, Impairment::Frozen)]
#[case::lite_expired(Route::Lite, Impairment::Expired)]
fn inactive_client_blocks_send(#[case] route: Route, #[case] impairment: Impairment) {
    let mut pair = relayed_pair(route);
    impair(&mut pair.relayer.a, &pair.client_id_on_a, impairment);

    let msg = send_msg(&pair);
    assert_client_status_error(pair.relayer.a.deliver(PacketMsg::from(msg)));
}

#[rstest]
#[case::classic_frozen(Route::Classic, Impairment::Frozen)]
#[case::classic_expired(Route::Classic, Impairment::Expired)]
#[case::lite_frozen(Route::Lite, Impairment::Frozen)]
#[case::lite_expired(Route::Lite, Impairment::Expired)]
fn inactive_client_blocks_recv(#[case] route: Route, #[case] impairment: Impairment) {
    let mut pair = relayed_pair(route);
    let packet = sent(&mut pair);

    let msg = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    impair(&mut pair.relayer.b, &pair.client_id_on_b, impairment);

    assert_client_status_error(pair.relayer.b.deliver(PacketMsg::from(msg)));
}

#[rstest]
#[case::classic_frozen(Route::Classic, Impairment::Frozen)]
#[case::classic_expired(Route::Classic, Impairment::Expired)]
#[case::lite_frozen(Route::Lite, Impairment::Frozen)]
#[case::lite_expired(Route::Lite, Impairment::Expired)]
fn inactive_client_blocks_ack(#[case] route: Route, #[case] impairment: Impairment) {
    let mut pair = relayed_pair(route);
    let packet = sent(&mut pair);

    let recv = pair
        .relayer
        .build_recv_packet_on_b(&pair.client_id_on_b, &packet);
    pair.relayer
        .b
        .deliver(PacketMsg::from(recv))
        .expect("receive succeeds");
    let ack = pair
        .relayer
        .acknowledgement_on_b(&packet)
        .expect("acknowledgement written");

    let msg = pair
        .relayer
        .build_ack_packet_on_a(&pair.client_id_on_a, &packet, ack);
    impair(&mut pair.relayer.a, &pair.client_id_on_a, impairment);

    assert_client_status_error(pair.relayer.a.deliver(PacketMsg::from(msg)));
}

#[rstest]
#[case::classic_frozen(Route::Classic, Impairment::Frozen)]
#[case::classic_expired(Route::Classic, Impairment::Expired)]
#[case::lite_frozen(Route::Lite, Impairment::Frozen)]
#[case::lite_expired(Route::Lite, Impairment::Expired)]
fn inactive_client_blocks_timeout(#[case] route: Route, #[case] impairment: Impairment) {
    let mut pair = relayed_pair(route);
    let packet = sent(&mut pair);

    let msg = pair
        .relayer
        .build_timeout_packet_on_a(&pair.client_id_on_a, &packet);
    impair(&mut pair.relayer.a, &pair.client_id_on_a, impairment);

    assert_client_status_error(pair.relayer.a.deliver(PacketMsg::from(msg)));
}
