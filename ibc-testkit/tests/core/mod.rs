use ibc_relay_core::channel::types::channel::Order;
use ibc_relay_core::client::types::msgs::ClientMsg;
use ibc_relay_core::host::types::identifiers::{ChannelId, ClientId};
use ibc_relay_testkit::relayer::context::{Chain, RelayerContext};
use ibc_relay_testkit::testapp::ibc::applications::mock::MockModule;
use ibc_relay_testkit::testapp::ibc::core::router::MockRouter;
use ibc_relay_testkit::testapp::ibc::core::types::MockContext;

pub mod ics02_client;
pub mod ics04_channel;
pub mod ics25_handler;

/// Two mock chains with clients of each other and a packet route between
/// their `mock` ports.
pub struct RelayedPair {
    pub relayer: RelayerContext,
    pub client_id_on_a: ClientId,
    pub client_id_on_b: ClientId,
    pub chan_id_on_a: ChannelId,
    pub chan_id_on_b: ChannelId,
}

fn connected_chains(module_a: MockModule, module_b: MockModule) -> (RelayerContext, ClientId, ClientId) {
    let mut relayer = RelayerContext::new(
        Chain::new(MockContext::default(), MockRouter::new_with_module(module_a)),
        Chain::new(MockContext::default(), MockRouter::new_with_module(module_b)),
    );

    let client_id_on_a = relayer.create_client_on_a();
    let client_id_on_b = relayer.create_client_on_b();

    (relayer, client_id_on_a, client_id_on_b)
}

/// A provisioned `channel-0` on both chains.
pub fn classic_pair(ordering: Order, module_a: MockModule, module_b: MockModule) -> RelayedPair {
    let (mut relayer, client_id_on_a, client_id_on_b) = connected_chains(module_a, module_b);

    let chan_id_on_a = ChannelId::zero();
    let chan_id_on_b = ChannelId::zero();

    relayer.open_channel(
        ordering,
        &client_id_on_a,
        &chan_id_on_a,
        &client_id_on_b,
        &chan_id_on_b,
    );

    RelayedPair {
        relayer,
        client_id_on_a,
        client_id_on_b,
        chan_id_on_a,
        chan_id_on_b,
    }
}

/// Packets addressed by client identifiers, once each client is bound to
/// the other.
pub fn lite_pair(module_a: MockModule, module_b: MockModule) -> RelayedPair {
    let (mut relayer, client_id_on_a, client_id_on_b) = connected_chains(module_a, module_b);

    relayer.bind_lite_clients(&client_id_on_a, &client_id_on_b);

    RelayedPair {
        chan_id_on_a: ChannelId::from(client_id_on_a.clone()),
        chan_id_on_b: ChannelId::from(client_id_on_b.clone()),
        relayer,
        client_id_on_a,
        client_id_on_b,
    }
}

/// Builds the update message a relayer submits before proofs at the
/// counterparty's latest height can be checked.
pub fn client_update_on_b(pair: &RelayedPair) -> ClientMsg {
    ibc_relay_testkit::fixtures::core::client::dummy_msg_update_client(
        pair.client_id_on_b.clone(),
        pair.relayer.get_ctx_a().latest_header(),
    )
    .into()
}
