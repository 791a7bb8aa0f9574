use std::time::Duration;

use ibc_relay_core::client::context::prelude::*;
use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::client::types::msgs::{ClientMsg, MsgUpdateClient};
use ibc_relay_core::client::types::{Height, Status};
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::{MsgEnvelope, MsgResult};
use ibc_relay_core::host::types::identifiers::ClientId;
use ibc_relay_core::host::ValidationContext;
use ibc_relay_core::primitives::Timestamp;
use ibc_relay_testkit::fixtures::core::client::{dummy_msg_misbehaviour, dummy_msg_update_client};
use ibc_relay_testkit::fixtures::Fixture;
use ibc_relay_testkit::testapp::ibc::clients::mock::header::MockHeader;
use ibc_relay_testkit::testapp::ibc::core::router::MockRouter;
use ibc_relay_testkit::testapp::ibc::core::types::{MockClientConfig, MockContext};
use ibc_relay_testkit::utils::year_2023;
use rstest::{fixture, rstest};

const CLIENT_HEIGHT: u64 = 5;

fn client_id() -> ClientId {
    ClientId::new("9999-mock", 0).expect("no error")
}

/// A host at height 5 running a mock client whose latest height is 5.
#[fixture]
fn fixture() -> Fixture<MsgUpdateClient> {
    let ctx = MockContext::default().with_client_config(
        MockClientConfig::builder()
            .latest_height(Height::new(0, CLIENT_HEIGHT))
            .build(),
    );

    let header = MockHeader::new(
        Height::new(0, CLIENT_HEIGHT + 5),
        (year_2023() + Duration::from_secs(15)).expect("no overflow"),
    );

    Fixture {
        ctx,
        msg: dummy_msg_update_client(client_id(), header),
    }
}

fn update(ctx: &mut MockContext, msg: MsgUpdateClient) -> Result<MsgResult, HandlerError> {
    ctx.deliver(
        &mut MockRouter::default(),
        MsgEnvelope::from(ClientMsg::from(msg)),
    )
}

fn client_status(ctx: &MockContext) -> Status {
    let client_id = client_id();
    let module = ctx.clients.client_module(&client_id).expect("registered");
    let client_store = ctx.client_store(&client_id).expect("no error");
    module.status(&client_store, &client_id)
}

fn latest_client_height(ctx: &MockContext) -> Height {
    let client_id = client_id();
    let module = ctx.clients.client_module(&client_id).expect("registered");
    let client_store = ctx.client_store(&client_id).expect("no error");
    module
        .latest_height(&client_store, &client_id)
        .expect("no error")
}

#[rstest]
fn update_client_ok(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { mut ctx, msg } = fixture;

    let res = update(&mut ctx, msg);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert_eq!(latest_client_height(&ctx), Height::new(0, CLIENT_HEIGHT + 5));

    let Some(IbcEvent::UpdateClient(event)) = ctx.get_events().last().cloned() else {
        panic!("update emits an event");
    };
    assert_eq!(event.client_id(), &client_id());
    assert_eq!(event.consensus_heights(), &[Height::new(0, CLIENT_HEIGHT + 5)]);

    let client_id = client_id();
    let module = ctx.clients.client_module(&client_id).expect("registered");
    let client_store = ctx.client_store(&client_id).expect("no error");
    assert!(module
        .timestamp_at_height(&client_store, &client_id, &Height::new(0, CLIENT_HEIGHT + 5))
        .is_ok());
}

#[rstest]
fn update_to_an_older_height_keeps_the_latest_height(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { mut ctx, .. } = fixture;

    let older = MockHeader::new(
        Height::new(0, CLIENT_HEIGHT - 2),
        (year_2023() - Duration::from_secs(6)).expect("no underflow"),
    );

    let res = update(&mut ctx, dummy_msg_update_client(client_id(), older));
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert_eq!(latest_client_height(&ctx), Height::new(0, CLIENT_HEIGHT));
}

#[rstest]
fn duplicate_update_emits_no_event(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { mut ctx, msg } = fixture;

    update(&mut ctx, msg.clone()).expect("first update succeeds");
    let events_before = ctx.get_events().len();

    let res = update(&mut ctx, msg);
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert_eq!(ctx.get_events().len(), events_before);
    assert!(ctx
        .get_logs()
        .iter()
        .any(|log| log.starts_with("duplicate update for client")));
}

#[rstest]
fn misbehaviour_freezes_the_client(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { mut ctx, msg } = fixture;

    let height = Height::new(0, CLIENT_HEIGHT + 1);
    let timestamp = year_2023();
    let conflicting = (timestamp + Duration::from_secs(1)).expect("no overflow");

    let res = update(
        &mut ctx,
        dummy_msg_misbehaviour(client_id(), height, timestamp, conflicting),
    );
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert!(matches!(
        ctx.get_events().last(),
        Some(IbcEvent::ClientMisbehaviour(_))
    ));
    assert_eq!(client_status(&ctx), Status::Frozen);

    let err = update(&mut ctx, msg).expect_err("frozen clients accept no updates");
    assert!(matches!(
        err,
        HandlerError::Client(ClientError::ClientNotActive {
            status: Status::Frozen
        })
    ));
    assert_eq!(err.kind(), ErrorKind::ClientStatus);
}

#[rstest]
fn conflicting_header_freezes_the_client(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { mut ctx, .. } = fixture;

    // the stored consensus state at the client height has a different time
    let conflicting = MockHeader::new(
        Height::new(0, CLIENT_HEIGHT),
        (year_2023() + Duration::from_secs(1)).expect("no overflow"),
    );

    let res = update(&mut ctx, dummy_msg_update_client(client_id(), conflicting));
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert_eq!(client_status(&ctx), Status::Frozen);
}

#[rstest]
fn misbehaviour_naming_another_client_is_rejected(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { mut ctx, .. } = fixture;

    let mut msg = dummy_msg_misbehaviour(
        ClientId::new("9999-mock", 7).expect("no error"),
        Height::new(0, CLIENT_HEIGHT),
        year_2023(),
        Timestamp::from_nanoseconds(1).expect("no error"),
    );
    msg.client_id = client_id();

    let res = update(&mut ctx, msg);
    assert!(
        matches!(res, Err(HandlerError::Client(ClientError::InvalidClientMessage { .. }))),
        "{res:?}"
    );
    assert_eq!(client_status(&ctx), Status::Active);
}

#[rstest]
fn update_unknown_client_fails(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { mut ctx, mut msg } = fixture;
    msg.client_id = ClientId::new("9999-mock", 3).expect("no error");

    let err = update(&mut ctx, msg).expect_err("no such client");
    assert!(matches!(
        err,
        HandlerError::Client(ClientError::ClientNotActive {
            status: Status::Unknown
        })
    ));
}

#[rstest]
fn expired_client_accepts_no_updates(fixture: Fixture<MsgUpdateClient>) {
    let Fixture { msg, .. } = fixture;

    let mut ctx = MockContext::default().with_client_config(
        MockClientConfig::builder()
            .latest_height(Height::new(0, CLIENT_HEIGHT))
            .trusting_period(Duration::from_secs(60))
            .build(),
    );
    assert_eq!(client_status(&ctx), Status::Active);

    ctx.advance_time(Duration::from_secs(90));
    assert_eq!(client_status(&ctx), Status::Expired);

    let err = update(&mut ctx, msg).expect_err("expired clients accept no updates");
    assert_eq!(err.kind(), ErrorKind::ClientStatus);
}
