use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::client::types::msgs::{ClientMsg, MsgProvideCounterparty};
use ibc_relay_core::client::types::{Counterparty, Height};
use ibc_relay_core::commitment_types::merkle::MerklePath;
use ibc_relay_core::handler::types::error::HandlerError;
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::{MsgEnvelope, MsgResult};
use ibc_relay_core::host::types::identifiers::ClientId;
use ibc_relay_core::host::ValidationContext;
use ibc_relay_testkit::fixtures::core::signer::dummy_account_id;
use ibc_relay_testkit::fixtures::Fixture;
use ibc_relay_testkit::testapp::ibc::core::router::MockRouter;
use ibc_relay_testkit::testapp::ibc::core::types::{MockClientConfig, MockContext};
use rstest::{fixture, rstest};

fn local_client_id() -> ClientId {
    ClientId::new("9999-mock", 0).expect("no error")
}

fn remote_client_id() -> ClientId {
    ClientId::new("9999-mock", 4).expect("no error")
}

#[fixture]
fn fixture() -> Fixture<MsgProvideCounterparty> {
    let ctx = MockContext::default()
        .with_client_config(MockClientConfig::builder().latest_height(Height::new(0, 3)).build());

    let msg = MsgProvideCounterparty::new(
        local_client_id(),
        Counterparty::new(remote_client_id(), MerklePath::new(vec!["ibc".into()])),
        dummy_account_id(),
    );

    Fixture { ctx, msg }
}

fn provide(ctx: &mut MockContext, msg: MsgProvideCounterparty) -> Result<MsgResult, HandlerError> {
    ctx.deliver(
        &mut MockRouter::default(),
        MsgEnvelope::from(ClientMsg::from(msg)),
    )
}

#[rstest]
fn provide_counterparty_binds_the_client(fixture: Fixture<MsgProvideCounterparty>) {
    let Fixture { mut ctx, msg } = fixture;

    let res = provide(&mut ctx, msg.clone());
    assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");

    assert_eq!(
        ctx.client_counterparty(&local_client_id()).expect("no error"),
        Some(msg.counterparty)
    );

    let Some(IbcEvent::ProvideCounterparty(event)) = ctx.get_events().last().cloned() else {
        panic!("binding emits an event");
    };
    assert_eq!(event.client_id(), &local_client_id());
    assert_eq!(event.counterparty_client_id(), &remote_client_id());
}

#[rstest]
fn provide_counterparty_replaces_an_earlier_binding(fixture: Fixture<MsgProvideCounterparty>) {
    let Fixture { mut ctx, msg } = fixture;

    provide(&mut ctx, msg.clone()).expect("first binding succeeds");

    let rebound = Counterparty::new(
        ClientId::new("9999-mock", 9).expect("no error"),
        MerklePath::new(vec!["ibc".into(), "store".into()]),
    );
    let res = provide(
        &mut ctx,
        MsgProvideCounterparty::new(local_client_id(), rebound.clone(), msg.signer),
    );
    assert!(res.is_ok(), "{res:?}");

    assert_eq!(
        ctx.client_counterparty(&local_client_id()).expect("no error"),
        Some(rebound)
    );
}

#[rstest]
fn provide_counterparty_for_unknown_client_fails(fixture: Fixture<MsgProvideCounterparty>) {
    let Fixture { mut ctx, mut msg } = fixture;
    msg.client_id = ClientId::new("9999-mock", 2).expect("no error");

    let res = provide(&mut ctx, msg);
    assert!(
        matches!(res, Err(HandlerError::Client(ClientError::ClientNotFound { .. }))),
        "{res:?}"
    );
}

#[rstest]
fn provide_counterparty_requires_a_prefix(fixture: Fixture<MsgProvideCounterparty>) {
    let Fixture { mut ctx, mut msg } = fixture;
    msg.counterparty = Counterparty::new(remote_client_id(), MerklePath::new(vec![]));

    let res = provide(&mut ctx, msg);
    assert!(
        matches!(res, Err(HandlerError::Client(ClientError::InvalidCounterparty { .. }))),
        "{res:?}"
    );
    assert_eq!(
        ctx.client_counterparty(&local_client_id()).expect("no error"),
        None
    );
}
