mod packet;

use core::time::Duration;

use ibc_relay_core::channel::types::channel::{ChannelEnd, Counterparty, Order, State};
use ibc_relay_core::channel::types::Version;
use ibc_relay_core::commitment_types::commitment::CommitmentPrefix;
use ibc_relay_core::host::types::identifiers::{ChannelId, ClientId, PortId};
use ibc_relay_core::primitives::prelude::*;
pub use packet::*;
use typed_builder::TypedBuilder;

use crate::testapp::ibc::applications::mock::mock_port_id;

pub fn mock_client_id(counter: u64) -> ClientId {
    ClientId::new("9999-mock", counter).expect("no error")
}

/// Configuration of a provisioned `ChannelEnd`. The defaults describe an
/// open unordered channel from `mock/channel-0` to `mock/channel-0`, both
/// ends tracked by the first mock client of each chain.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = ChannelEnd))]
pub struct ChannelEndConfig {
    #[builder(default = State::Open)]
    pub state: State,
    #[builder(default = Order::Unordered)]
    pub ordering: Order,
    #[builder(default = mock_port_id())]
    pub port_id_on_b: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_b: ChannelId,
    #[builder(default = mock_client_id(0))]
    pub client_id_on_b: ClientId,
    #[builder(default = mock_client_id(0))]
    pub client_id: ClientId,
    #[builder(default = CommitmentPrefix::try_from(b"ibc".to_vec()).expect("Never fails"))]
    pub counterparty_prefix: CommitmentPrefix,
    #[builder(default)]
    pub delay_period: Duration,
    #[builder(default = Version::new("mock-v1".to_string()))]
    pub version: Version,
}

impl From<ChannelEndConfig> for ChannelEnd {
    fn from(config: ChannelEndConfig) -> Self {
        ChannelEnd::new(
            config.state,
            config.ordering,
            Counterparty::new(config.port_id_on_b, config.chan_id_on_b, config.client_id_on_b),
            config.client_id,
            config.counterparty_prefix,
            config.delay_period,
            config.version,
        )
    }
}
