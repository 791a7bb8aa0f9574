use ibc_relay_core::channel::types::channel::{Order, State};
use ibc_relay_core::channel::types::error::ChannelError;
use ibc_relay_core::channel::types::msgs::{MsgSendPacket, PacketMsg};
use ibc_relay_core::channel::types::timeout::TimeoutHeight;
use ibc_relay_core::client::types::Height;
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::{MsgEnvelope, MsgResult};
use ibc_relay_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_relay_core::host::types::path::{CommitmentPath, SeqSendPath};
use ibc_relay_core::host::{Store, ValidationContext};
use ibc_relay_testkit::fixtures::core::channel::{ChannelEndConfig, MsgSendPacketConfig};
use ibc_relay_testkit::fixtures::Fixture;
use ibc_relay_testkit::testapp::ibc::applications::mock::{
    mock_port_id, mock_record_key, MockModule, ModuleCallback,
};
use ibc_relay_testkit::testapp::ibc::core::router::MockRouter;
use ibc_relay_testkit::testapp::ibc::core::types::{MockClientConfig, MockContext};
use rstest::{fixture, rstest};

const CLIENT_HEIGHT: u64 = 10;

/// A chain with an open channel `mock/channel-0` tracked by a mock client
/// at height 10.
#[fixture]
fn fixture() -> Fixture<MsgSendPacket> {
    let ctx = MockContext::default()
        .with_client_config(
            MockClientConfig::builder()
                .latest_height(Height::new(0, CLIENT_HEIGHT))
                .build(),
        )
        .with_channel(mock_port_id(), ChannelId::zero(), ChannelEndConfig::builder().build());

    Fixture {
        ctx,
        msg: MsgSendPacketConfig::builder().build(),
    }
}

fn send(ctx: &mut MockContext, router: &mut MockRouter, msg: MsgSendPacket) -> Result<MsgResult, HandlerError> {
    ctx.deliver(router, MsgEnvelope::from(PacketMsg::from(msg)))
}

#[rstest]
fn send_packet_commits_and_numbers_packets(fixture: Fixture<MsgSendPacket>) {
    let Fixture { mut ctx, msg } = fixture;
    let module = MockModule::new();
    let mut router = MockRouter::new_with_module(module.clone());

    for expected in [1, 2, 3] {
        let res = send(&mut ctx, &mut router, msg.clone());
        assert!(
            matches!(res, Ok(MsgResult::Sent(seq)) if seq == Sequence::from(expected)),
            "{res:?}"
        );
    }

    let seq_send_path = SeqSendPath::new(&mock_port_id(), &ChannelId::zero());
    assert_eq!(
        ctx.get_next_sequence_send(&seq_send_path).expect("no error"),
        Sequence::from(4)
    );

    let commitment_path = CommitmentPath::new(&mock_port_id(), &ChannelId::zero(), Sequence::from(2));
    assert_eq!(
        ctx.get_packet_commitment(&commitment_path).expect("no error"),
        Some(msg.packet(Sequence::from(2)).commitment())
    );

    let sent: Vec<_> = ctx
        .get_events()
        .into_iter()
        .filter_map(|event| match event {
            IbcEvent::SendPacket(event) => Some(*event.seq_on_a()),
            _ => None,
        })
        .collect();
    assert_eq!(sent, vec![Sequence::from(1), Sequence::from(2), Sequence::from(3)]);

    assert_eq!(
        module.callbacks(),
        vec![
            ModuleCallback::Send(Sequence::from(1)),
            ModuleCallback::Send(Sequence::from(2)),
            ModuleCallback::Send(Sequence::from(3)),
        ]
    );
    assert_eq!(
        ctx.ibc_store.get(&mock_record_key("sent", Sequence::from(3))),
        Some(msg.data)
    );
}

#[rstest]
#[case::height(MsgSendPacketConfig::builder()
    .timeout_height_on_b(Height::new(0, CLIENT_HEIGHT).into())
    .build())]
#[case::below_client_height(MsgSendPacketConfig::builder()
    .timeout_height_on_b(Height::new(0, CLIENT_HEIGHT - 1).into())
    .build())]
fn send_packet_with_elapsed_timeout_fails(fixture: Fixture<MsgSendPacket>, #[case] msg: MsgSendPacket) {
    let Fixture { mut ctx, .. } = fixture;
    let mut router = MockRouter::new_with_module(MockModule::new());

    let err = send(&mut ctx, &mut router, msg.clone()).expect_err("timeout elapsed");
    assert!(
        matches!(err, HandlerError::Channel(ChannelError::InvalidTimeout(_))),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Validation);

    let commitment_path = CommitmentPath::new(&mock_port_id(), &ChannelId::zero(), Sequence::from(1));
    assert_eq!(ctx.get_packet_commitment(&commitment_path).expect("no error"), None);
}

#[rstest]
fn send_packet_without_timeout_fails(fixture: Fixture<MsgSendPacket>) {
    let Fixture { mut ctx, .. } = fixture;
    let mut router = MockRouter::new_with_module(MockModule::new());

    let msg: MsgSendPacket = MsgSendPacketConfig::builder()
        .timeout_height_on_b(TimeoutHeight::Never)
        .build();

    let res = send(&mut ctx, &mut router, msg);
    assert!(
        matches!(res, Err(HandlerError::Channel(ChannelError::InvalidPacket { .. }))),
        "{res:?}"
    );
}

#[rstest]
fn send_packet_on_closed_channel_fails(fixture: Fixture<MsgSendPacket>) {
    let Fixture { ctx, msg } = fixture;
    let mut ctx = ctx.with_channel(
        mock_port_id(),
        ChannelId::zero(),
        ChannelEndConfig::builder().state(State::Closed).build(),
    );
    let mut router = MockRouter::new_with_module(MockModule::new());

    let res = send(&mut ctx, &mut router, msg);
    assert!(
        matches!(res, Err(HandlerError::Channel(ChannelError::InvalidState { .. }))),
        "{res:?}"
    );
}

#[rstest]
fn send_packet_to_wrong_counterparty_fails(fixture: Fixture<MsgSendPacket>) {
    let Fixture { mut ctx, .. } = fixture;
    let mut router = MockRouter::new_with_module(MockModule::new());

    let msg: MsgSendPacket = MsgSendPacketConfig::builder()
        .chan_id_on_b(ChannelId::new(9))
        .build();

    let res = send(&mut ctx, &mut router, msg);
    assert!(
        matches!(res, Err(HandlerError::Channel(ChannelError::MismatchedCounterparty { .. }))),
        "{res:?}"
    );
}

#[rstest]
fn send_packet_without_route_fails(fixture: Fixture<MsgSendPacket>) {
    let Fixture { mut ctx, .. } = fixture;
    let mut router = MockRouter::new_with_module(MockModule::new());

    let msg: MsgSendPacket = MsgSendPacketConfig::builder()
        .chan_id_on_a(ChannelId::new(5))
        .build();

    let err = send(&mut ctx, &mut router, msg).expect_err("no route");
    assert!(matches!(
        err,
        HandlerError::Channel(ChannelError::MissingChannel { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::Routing);
}

#[rstest]
fn send_packet_rejected_by_the_application_leaves_no_commitment(fixture: Fixture<MsgSendPacket>) {
    let Fixture { mut ctx, msg } = fixture;
    let module = MockModule::new().rejecting();
    let mut router = MockRouter::new_with_module(module.clone());

    let res = send(&mut ctx, &mut router, msg);
    assert!(
        matches!(res, Err(HandlerError::Channel(ChannelError::AppModule { .. }))),
        "{res:?}"
    );
    assert!(module.callbacks().is_empty());
    assert_eq!(
        ctx.get_next_sequence_send(&SeqSendPath::new(&mock_port_id(), &ChannelId::zero()))
            .expect("no error"),
        Sequence::from(1)
    );
}

#[rstest]
fn send_packet_on_ordered_channel(fixture: Fixture<MsgSendPacket>) {
    let Fixture { ctx, msg } = fixture;
    let mut ctx = ctx.with_channel(
        mock_port_id(),
        ChannelId::zero(),
        ChannelEndConfig::builder().ordering(Order::Ordered).build(),
    );
    let mut router = MockRouter::new_with_module(MockModule::new());

    let res = send(&mut ctx, &mut router, msg);
    assert!(matches!(res, Ok(MsgResult::Sent(_))), "{res:?}");
}
