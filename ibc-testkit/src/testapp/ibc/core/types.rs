//! Implementation of a global context mock. Used in testing handlers of all IBC modules.

use alloc::sync::Arc;
use core::fmt::{Debug, Formatter};
use core::time::Duration;

use ibc_relay_core::channel::types::channel::ChannelEnd;
use ibc_relay_core::channel::types::commitment::PacketCommitment;
use ibc_relay_core::client::context::prelude::*;
use ibc_relay_core::client::context::LightClientRegistry;
use ibc_relay_core::client::types::{Counterparty, Height};
use ibc_relay_core::commitment_types::commitment::CommitmentPrefix;
use ibc_relay_core::entrypoint::dispatch;
use ibc_relay_core::handler::types::error::HandlerError;
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::handler::types::msgs::{MsgEnvelope, MsgResult};
use ibc_relay_core::host::types::error::HostError;
use ibc_relay_core::host::types::identifiers::{ChannelId, ClientId, PortId, Sequence};
use ibc_relay_core::host::types::path::{
    ChannelEndPath, CommitmentPath, Path, SeqAckPath, SeqRecvPath,
    SeqSendPath,
};
use ibc_relay_core::host::{ClientParams, ExecutionContext, Store, StoreMut};
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::proto::Any;
use ibc_relay_core::primitives::Timestamp;
use ibc_relay_core::router::router::Router;
use typed_builder::TypedBuilder;

use crate::fixtures::core::context::MockContextConfig;
use crate::testapp::ibc::clients::mock::client_state::MockClientState;
use crate::testapp::ibc::clients::mock::consensus_state::MockConsensusState;
use crate::testapp::ibc::clients::mock::header::MockHeader;
use crate::testapp::ibc::clients::mock_client_router;
use crate::utils::year_2023;

pub const DEFAULT_BLOCK_TIME_SECS: u64 = 3;

/// An object that stores all IBC related data.
#[derive(Clone, Debug, Default)]
pub struct MockIbcStore {
    /// The key-value store, keyed by the bytes of an ICS-24 path.
    pub store: BTreeMap<Vec<u8>, Vec<u8>>,

    /// Emitted IBC events in order
    pub events: Vec<IbcEvent>,

    /// Logs of the IBC module
    pub logs: Vec<String>,
}

impl Store for MockIbcStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.get(key).cloned()
    }
}

impl StoreMut for MockIbcStore {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, HostError> {
        tracing::trace!(key = %String::from_utf8_lossy(&key), "store set");
        Ok(self.store.insert(key, value))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), HostError> {
        tracing::trace!(key = %String::from_utf8_lossy(key), "store delete");
        self.store.remove(key);
        Ok(())
    }
}

/// A context implementing the dependencies necessary for testing any IBC module.
#[derive(Clone)]
pub struct MockContext {
    /// The blocks of the host chain, ascending by height. The last one is
    /// the block currently being executed.
    pub history: Vec<MockHeader>,

    /// Average time duration between blocks
    pub block_time: Duration,

    /// Prefix the host's packet state is proven under.
    pub commitment_prefix: CommitmentPrefix,

    pub client_params: ClientParams,

    /// An object that stores all IBC related data.
    pub ibc_store: MockIbcStore,

    /// The light clients the host runs.
    pub clients: Arc<LightClientRegistry>,
}

impl Debug for MockContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockContext")
            .field("latest_header", &self.history.last())
            .field("block_time", &self.block_time)
            .field("commitment_prefix", &self.commitment_prefix)
            .field("ibc_store", &self.ibc_store)
            .finish_non_exhaustive()
    }
}

/// Configuration of a mock client installed directly into the store,
/// bypassing `MsgCreateClient`.
#[derive(Debug, TypedBuilder)]
pub struct MockClientConfig {
    #[builder(default = ClientId::new("9999-mock", 0).expect("no error"))]
    pub client_id: ClientId,
    pub latest_height: Height,
    #[builder(default = year_2023())]
    pub latest_timestamp: Timestamp,
    #[builder(default)]
    pub consensus_state_heights: Vec<Height>,
    #[builder(default = crate::testapp::ibc::clients::mock::client_state::DEFAULT_TRUSTING_PERIOD)]
    pub trusting_period: Duration,
    #[builder(default = false)]
    pub frozen: bool,
}

/// Returns a MockContext with bare minimum initialization: no clients and
/// no channels are present, and the chain has Height(5).
impl Default for MockContext {
    fn default() -> Self {
        MockContextConfig::builder().build()
    }
}

/// Implementation of internal interface for use in testing. The methods in this interface should
/// _not_ be accessible to any Ics handler.
impl MockContext {
    pub fn new(
        latest_height: Height,
        latest_timestamp: Timestamp,
        block_time: Duration,
        commitment_prefix: CommitmentPrefix,
        client_params: ClientParams,
    ) -> Self {
        assert_ne!(
            latest_height.revision_height(),
            0,
            "The chain must have a non-zero revision_height"
        );

        let blocks = latest_height.revision_height();
        let history = (1..=blocks)
            .map(|revision_height| {
                let blocks_before = u32::try_from(blocks - revision_height).expect("no overflow");
                MockHeader::new(
                    Height::new(latest_height.revision_number(), revision_height),
                    (latest_timestamp - block_time * blocks_before).expect("no underflow"),
                )
            })
            .collect();

        Self {
            history,
            block_time,
            commitment_prefix,
            client_params,
            ibc_store: MockIbcStore::default(),
            clients: Arc::new(mock_client_router()),
        }
    }

    /// The block currently being executed.
    pub fn latest_header(&self) -> MockHeader {
        *self.history.last().expect("history cannot be empty")
    }

    pub fn latest_height(&self) -> Height {
        self.latest_header().height()
    }

    pub fn latest_timestamp(&self) -> Timestamp {
        self.latest_header().timestamp
    }

    /// The header of the host at `height`, if the chain ever reached it.
    pub fn host_header(&self, height: &Height) -> Option<MockHeader> {
        self.history
            .iter()
            .find(|header| header.height() == *height)
            .copied()
    }

    /// Produces the next block, `block_time` after the latest one.
    pub fn advance_block(&mut self) {
        let latest = self.latest_header();
        let next = MockHeader::new(
            latest.height().increment(),
            (latest.timestamp + self.block_time).expect("Never fails"),
        );
        self.history.push(next);
    }

    /// Produces blocks until the chain reaches `target_height`.
    pub fn advance_block_up_to(mut self, target_height: Height) -> Self {
        assert_eq!(
            self.latest_height().revision_number(),
            target_height.revision_number(),
            "Cannot advance history of the chain to a different revision number!"
        );

        while self.latest_height() < target_height {
            self.advance_block();
        }

        self
    }

    /// Produces blocks until `time` has passed on the host.
    pub fn advance_time(&mut self, time: Duration) {
        let target = (self.latest_timestamp() + time).expect("Never fails");
        while self.latest_timestamp() < target {
            self.advance_block();
        }
    }

    /// Installs a mock client with consensus states at the configured
    /// heights, processed at the current host block.
    pub fn with_client_config(mut self, config: MockClientConfig) -> Self {
        let MockClientConfig {
            client_id,
            latest_height,
            latest_timestamp,
            mut consensus_state_heights,
            trusting_period,
            frozen,
        } = config;

        consensus_state_heights.push(latest_height);
        consensus_state_heights.sort();
        consensus_state_heights.dedup();

        let block_time = self.block_time;
        let header_at = |height: Height| {
            let blocks_before = latest_height.revision_height() - height.revision_height();
            let blocks_before = u32::try_from(blocks_before).expect("no overflow");
            MockHeader::new(
                height,
                (latest_timestamp - block_time * blocks_before).expect("no underflow"),
            )
        };

        let latest_header = header_at(latest_height);
        let client_state = MockClientState::new(latest_header).with_trusting_period(trusting_period);

        {
            let clients = self.clients.clone();
            let module = clients.client_module(&client_id).expect("mock client type is registered");
            let mut client_store = self
                .client_store_mut(&client_id)
                .expect("client store is available");

            module
                .initialise(
                    &mut client_store,
                    &client_id,
                    client_state.into(),
                    MockConsensusState::new(latest_header).into(),
                )
                .expect("valid client");

            for height in consensus_state_heights {
                let header: Any = header_at(height).into();
                module
                    .update_state(&mut client_store, &client_id, &header)
                    .expect("valid header");
            }

            if frozen {
                module.update_state_on_misbehaviour(
                    &mut client_store,
                    &client_id,
                    &Any::from(latest_header),
                );
            }
        }

        self.increase_client_counter().expect("no error");
        self
    }

    /// Binds `client_id` to its counterparty, making the client a lite route.
    pub fn with_counterparty(mut self, client_id: &ClientId, counterparty: Counterparty) -> Self {
        self.store_client_counterparty(client_id, counterparty)
            .expect("no error");
        self
    }

    pub fn with_channel(mut self, port_id: PortId, chan_id: ChannelId, channel_end: ChannelEnd) -> Self {
        let channel_end_path = ChannelEndPath::new(&port_id, &chan_id);
        self.store_channel(&channel_end_path, channel_end)
            .expect("error writing to store");
        self
    }

    pub fn with_send_sequence(mut self, port_id: PortId, chan_id: ChannelId, seq_number: Sequence) -> Self {
        let seq_send_path = SeqSendPath::new(&port_id, &chan_id);
        self.store_next_sequence_send(&seq_send_path, seq_number)
            .expect("error writing to store");
        self
    }

    pub fn with_recv_sequence(mut self, port_id: PortId, chan_id: ChannelId, seq_number: Sequence) -> Self {
        let seq_recv_path = SeqRecvPath::new(&port_id, &chan_id);
        self.store_next_sequence_recv(&seq_recv_path, seq_number)
            .expect("error writing to store");
        self
    }

    pub fn with_ack_sequence(mut self, port_id: PortId, chan_id: ChannelId, seq_number: Sequence) -> Self {
        let seq_ack_path = SeqAckPath::new(&port_id, &chan_id);
        self.store_next_sequence_ack(&seq_ack_path, seq_number)
            .expect("error writing to store");
        self
    }

    pub fn with_packet_commitment(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
        data: PacketCommitment,
    ) -> Self {
        let commitment_path = CommitmentPath::new(&port_id, &chan_id, seq);
        self.store_packet_commitment(&commitment_path, data)
            .expect("error writing to store");
        self
    }

    /// Validates and executes `msg`, then produces a block.
    pub fn deliver<R>(&mut self, router: &mut R, msg: MsgEnvelope) -> Result<MsgResult, HandlerError>
    where
        R: Router + ?Sized,
    {
        let clients = self.clients.clone();
        let result = dispatch(self, &*clients, router, msg)?;
        self.advance_block();
        Ok(result)
    }

    /// The raw value stored at `path`.
    pub fn query(&self, path: impl Into<Path>) -> Option<Vec<u8>> {
        self.ibc_store.get(&path.into().into_bytes())
    }

    pub fn get_events(&self) -> Vec<IbcEvent> {
        self.ibc_store.events.clone()
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.ibc_store.logs.clone()
    }
}
