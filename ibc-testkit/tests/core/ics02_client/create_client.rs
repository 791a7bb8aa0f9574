use ibc_relay_core::client::context::prelude::*;
use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::client::types::msgs::ClientMsg;
use ibc_relay_core::client::types::{Height, Status};
use ibc_relay_core::handler::types::error::{ErrorKind, HandlerError};
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::{MsgEnvelope, MsgResult};
use ibc_relay_core::host::types::identifiers::ClientId;
use ibc_relay_core::host::{ClientParams, ValidationContext};
use ibc_relay_testkit::fixtures::core::client::dummy_msg_create_client;
use ibc_relay_testkit::fixtures::core::context::MockContextConfig;
use ibc_relay_testkit::testapp::ibc::clients::mock::header::MockHeader;
use ibc_relay_testkit::testapp::ibc::core::router::MockRouter;
use ibc_relay_testkit::testapp::ibc::core::types::MockContext;
use ibc_relay_testkit::utils::year_2023;
use rstest::rstest;
use test_log::test;

fn create(ctx: &mut MockContext, header: MockHeader) -> Result<MsgResult, HandlerError> {
    let msg = MsgEnvelope::from(ClientMsg::from(dummy_msg_create_client(header)));
    ctx.deliver(&mut MockRouter::default(), msg)
}

#[test]
fn create_client_assigns_identifiers_from_the_counter() {
    let mut ctx = MockContext::default();
    let header = MockHeader::new(Height::new(0, 42), year_2023());

    for _ in 0..2 {
        let res = create(&mut ctx, header);
        assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");
    }

    let created: Vec<ClientId> = ctx
        .get_events()
        .into_iter()
        .filter_map(|event| match event {
            IbcEvent::CreateClient(event) => Some(event.client_id().clone()),
            _ => None,
        })
        .collect();

    assert_eq!(
        created,
        vec![
            ClientId::new("9999-mock", 0).expect("no error"),
            ClientId::new("9999-mock", 1).expect("no error"),
        ]
    );
    assert_eq!(ctx.client_counter().expect("no error"), 2);

    let client_id = &created[0];
    let module = ctx.clients.client_module(client_id).expect("registered");
    let client_store = ctx.client_store(client_id).expect("no error");

    assert_eq!(module.status(&client_store, client_id), Status::Active);
    assert_eq!(
        module.latest_height(&client_store, client_id).expect("no error"),
        Height::new(0, 42)
    );
}

#[test]
fn create_client_with_zero_height_leaves_no_state() {
    let mut ctx = MockContext::default();

    let res = create(&mut ctx, MockHeader::new(Height::new(0, 0), year_2023()));

    assert!(
        matches!(res, Err(HandlerError::Client(ClientError::InvalidClientState { .. }))),
        "{res:?}"
    );
    assert_eq!(ctx.client_counter().expect("no error"), 0);
    assert!(ctx.get_events().is_empty());
}

#[rstest]
#[case(vec!["9999-mock".to_string()], true)]
#[case(vec![ClientParams::ALLOW_ALL.to_string()], true)]
#[case(vec!["07-tendermint".to_string()], false)]
#[case(vec![], false)]
#[test_log::test]
fn create_client_respects_allowed_client_types(
    #[case] allowed_clients: Vec<String>,
    #[case] admitted: bool,
) {
    let mut ctx: MockContext = MockContextConfig::builder()
        .client_params(ClientParams { allowed_clients })
        .build();

    let res = create(&mut ctx, MockHeader::new(Height::new(0, 1), year_2023()));

    if admitted {
        assert!(matches!(res, Ok(MsgResult::Executed)), "{res:?}");
    } else {
        let err = res.expect_err("client type is not allowed");
        assert!(matches!(
            err,
            HandlerError::Client(ClientError::ClientTypeNotAllowed { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::ClientStatus);
    }
}
