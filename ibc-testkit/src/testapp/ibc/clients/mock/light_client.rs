use core::time::Duration;

use ibc_relay_core::client::context::prelude::*;
use ibc_relay_core::client::types::error::ClientError;
use ibc_relay_core::client::types::{Height, Status};
use ibc_relay_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_core::commitment_types::merkle::MerklePath;
use ibc_relay_core::host::types::identifiers::{ClientId, ClientType};
use ibc_relay_core::host::types::path::{
    ClientConsensusStatePath, ClientStatePath, ClientUpdateHeightPath, ClientUpdateTimePath,
};
use ibc_relay_core::host::{ClientStore, ClientStoreMut, Store, StoreMut};
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::proto::{Any, Protobuf};
use ibc_relay_core::primitives::Timestamp;
use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use prost::Message;

use super::client_state::{client_type, MockClientState, MOCK_CLIENT_STATE_TYPE_URL};
use super::consensus_state::MockConsensusState;
use super::header::{MockHeader, MOCK_HEADER_TYPE_URL};
use super::misbehaviour::{Misbehaviour, MOCK_MISBEHAVIOUR_TYPE_URL};
use super::proof::{proves_absence, proves_membership};

/// The light client of a mock chain.
///
/// Headers are trusted as they come; the client only checks that proofs
/// match what the counterparty claims, that they respect the delay periods,
/// and that no two headers disagree about the same height.
#[derive(Debug, Default)]
pub struct MockClientModule;

/// A verified client message.
enum ClientMessage {
    Header(MockHeader),
    Misbehaviour(Misbehaviour),
}

impl ClientMessage {
    fn decode(client_message: &Any) -> Result<Self, ClientError> {
        match client_message.type_url.as_str() {
            MOCK_HEADER_TYPE_URL => Ok(Self::Header(MockHeader::try_from(client_message.clone())?)),
            MOCK_MISBEHAVIOUR_TYPE_URL => Ok(Self::Misbehaviour(Misbehaviour::try_from(
                client_message.clone(),
            )?)),
            _ => Err(ClientError::InvalidClientMessage {
                description: format!("unknown client message type `{}`", client_message.type_url),
            }),
        }
    }
}

fn consensus_state_key(height: &Height) -> Vec<u8> {
    ClientConsensusStatePath::new(height.revision_number(), height.revision_height())
        .to_string()
        .into_bytes()
}

fn client_state(store: &dyn Store, client_id: &ClientId) -> Result<MockClientState, ClientError> {
    let bytes = store
        .get(ClientStatePath.to_string().as_bytes())
        .ok_or_else(|| ClientError::ClientNotFound {
            client_id: client_id.clone(),
        })?;

    <MockClientState as Protobuf<Any>>::decode_vec(&bytes).map_err(|e| ClientError::InvalidClientState {
        description: e.to_string(),
    })
}

fn consensus_state(
    store: &dyn Store,
    client_id: &ClientId,
    height: &Height,
) -> Result<Option<MockConsensusState>, ClientError> {
    store
        .get(&consensus_state_key(height))
        .map(|bytes| {
            <MockConsensusState as Protobuf<Any>>::decode_vec(&bytes).map_err(|e| {
                ClientError::InvalidConsensusState {
                    description: format!("client {client_id} at {height}: {e}"),
                }
            })
        })
        .transpose()
}

fn write(store: &mut dyn StoreMut, key: Vec<u8>, value: Vec<u8>) -> Result<(), ClientError> {
    store.set(key, value)?;
    Ok(())
}

fn store_client_state(store: &mut dyn StoreMut, client_state: MockClientState) -> Result<(), ClientError> {
    write(
        store,
        ClientStatePath.to_string().into_bytes(),
        <MockClientState as Protobuf<Any>>::encode_vec(client_state),
    )
}

/// Stores the consensus state of `header` along with the host time and
/// height it was processed at, which the delay periods are measured from.
fn store_consensus_state(store: &mut ClientStoreMut<'_>, header: MockHeader) -> Result<(), ClientError> {
    let height = header.height();
    let processed_time = store.host_timestamp();
    let processed_height = store.host_height();

    write(
        store,
        consensus_state_key(&height),
        <MockConsensusState as Protobuf<Any>>::encode_vec(MockConsensusState::new(header)),
    )?;
    write(
        store,
        ClientUpdateTimePath::new(height.revision_number(), height.revision_height())
            .to_string()
            .into_bytes(),
        processed_time.nanoseconds().to_be_bytes().to_vec(),
    )?;
    write(
        store,
        ClientUpdateHeightPath::new(height.revision_number(), height.revision_height())
            .to_string()
            .into_bytes(),
        RawHeight::from(processed_height).encode_to_vec(),
    )
}

fn processed_at(store: &ClientStore<'_>, height: &Height) -> Result<(Timestamp, Height), ClientError> {
    let missing = |what: &str| ClientError::Other {
        description: format!("processed {what} of consensus state at {height} is missing"),
    };

    let time_bytes = store
        .get(
            ClientUpdateTimePath::new(height.revision_number(), height.revision_height())
                .to_string()
                .as_bytes(),
        )
        .ok_or_else(|| missing("time"))?;
    let nanos = <[u8; 8]>::try_from(time_bytes.as_slice())
        .map(u64::from_be_bytes)
        .map_err(|_| missing("time"))?;
    let processed_time = Timestamp::from_nanoseconds(nanos).map_err(|e| ClientError::Other {
        description: e.to_string(),
    })?;

    let height_bytes = store
        .get(
            ClientUpdateHeightPath::new(height.revision_number(), height.revision_height())
                .to_string()
                .as_bytes(),
        )
        .ok_or_else(|| missing("height"))?;
    let processed_height = RawHeight::decode(height_bytes.as_slice())
        .map(Height::from)
        .map_err(|_| missing("height"))?;

    Ok((processed_time, processed_height))
}

impl MockClientModule {
    pub fn new() -> Self {
        Self
    }

    /// Looks up the consensus state a proof at `height` is checked against,
    /// and rejects the proof until both delay periods have passed.
    fn verify_delay_passed(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        height: &Height,
        delay_time_period: Duration,
        delay_block_period: u64,
    ) -> Result<(), ClientError> {
        if consensus_state(store, client_id, height)?.is_none() {
            return Err(ClientError::ConsensusStateNotFound {
                client_id: client_id.clone(),
                height: *height,
            });
        }

        let (processed_time, processed_height) = processed_at(store, height)?;

        let earliest_time = (processed_time + delay_time_period).map_err(|e| ClientError::Other {
            description: e.to_string(),
        })?;
        if store.host_timestamp() < earliest_time {
            return Err(ClientError::ProofHeightTooRecent {
                description: format!(
                    "proof at {height} usable from {earliest_time}, host time is {}",
                    store.host_timestamp()
                ),
            });
        }

        let earliest_height = processed_height.add(delay_block_period);
        if store.host_height() < earliest_height {
            return Err(ClientError::ProofHeightTooRecent {
                description: format!(
                    "proof at {height} usable from host height {earliest_height}, host height is {}",
                    store.host_height()
                ),
            });
        }

        Ok(())
    }
}

impl LightClientModule for MockClientModule {
    fn client_type(&self) -> ClientType {
        client_type()
    }

    fn client_state_type_url(&self) -> &str {
        MOCK_CLIENT_STATE_TYPE_URL
    }

    fn initialise(
        &self,
        store: &mut ClientStoreMut<'_>,
        _client_id: &ClientId,
        client_state: Any,
        consensus_state: Any,
    ) -> Result<(), ClientError> {
        let client_state = MockClientState::try_from(client_state)?;
        let consensus_state = MockConsensusState::try_from(consensus_state)?;

        if client_state.latest_height().is_zero() {
            return Err(ClientError::InvalidClientState {
                description: "latest height must be non-zero".into(),
            });
        }

        if client_state.header != consensus_state.header {
            return Err(ClientError::InvalidConsensusState {
                description: format!(
                    "consensus state {} does not match the client's latest header {}",
                    consensus_state.header, client_state.header
                ),
            });
        }

        store_client_state(store, client_state)?;
        store_consensus_state(store, consensus_state.header)
    }

    fn verify_client_message(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        client_message: &Any,
    ) -> Result<(), ClientError> {
        client_state(store, client_id)?;

        match ClientMessage::decode(client_message)? {
            ClientMessage::Header(header) => {
                if header.height().is_zero() {
                    return Err(ClientError::InvalidClientMessage {
                        description: "header height must be non-zero".into(),
                    });
                }
            }
            ClientMessage::Misbehaviour(misbehaviour) => {
                if &misbehaviour.client_id != client_id {
                    return Err(ClientError::InvalidClientMessage {
                        description: format!(
                            "misbehaviour targets client {}, not {client_id}",
                            misbehaviour.client_id
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    fn check_for_misbehaviour(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        client_message: &Any,
    ) -> Result<bool, ClientError> {
        match ClientMessage::decode(client_message)? {
            ClientMessage::Header(header) => Ok(consensus_state(store, client_id, &header.height())?
                .map_or(false, |known| known.header != header)),
            ClientMessage::Misbehaviour(misbehaviour) => Ok(misbehaviour.is_conflicting()),
        }
    }

    fn update_state_on_misbehaviour(
        &self,
        store: &mut ClientStoreMut<'_>,
        client_id: &ClientId,
        _client_message: &Any,
    ) {
        // Freezing an already frozen client rewrites the same bytes.
        if let Ok(client_state) = client_state(store, client_id) {
            let _ = store_client_state(store, client_state.frozen());
        }
    }

    fn update_state(
        &self,
        store: &mut ClientStoreMut<'_>,
        client_id: &ClientId,
        client_message: &Any,
    ) -> Result<Vec<Height>, ClientError> {
        let ClientMessage::Header(header) = ClientMessage::decode(client_message)? else {
            return Err(ClientError::InvalidClientMessage {
                description: "only headers update the client state".into(),
            });
        };

        let height = header.height();

        if consensus_state(store, client_id, &height)?.is_some() {
            return Ok(Vec::new());
        }

        store_consensus_state(store, header)?;

        let client_state = client_state(store, client_id)?;
        if height > client_state.latest_height() {
            store_client_state(store, MockClientState { header, ..client_state })?;
        }

        Ok(vec![height])
    }

    fn verify_membership(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        height: &Height,
        delay_time_period: Duration,
        delay_block_period: u64,
        proof: &CommitmentProofBytes,
        path: &MerklePath,
        value: &[u8],
    ) -> Result<(), ClientError> {
        self.verify_delay_passed(store, client_id, height, delay_time_period, delay_block_period)?;

        if !proves_membership(proof, path, value) {
            return Err(ClientError::InvalidProof {
                description: format!("membership proof does not match the value at {path}"),
            });
        }

        Ok(())
    }

    fn verify_non_membership(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        height: &Height,
        delay_time_period: Duration,
        delay_block_period: u64,
        proof: &CommitmentProofBytes,
        path: &MerklePath,
    ) -> Result<(), ClientError> {
        self.verify_delay_passed(store, client_id, height, delay_time_period, delay_block_period)?;

        if !proves_absence(proof, path) {
            return Err(ClientError::InvalidProof {
                description: format!("non-membership proof does not match {path}"),
            });
        }

        Ok(())
    }

    fn status(&self, store: &ClientStore<'_>, client_id: &ClientId) -> Status {
        let Ok(client_state) = client_state(store, client_id) else {
            return Status::Unknown;
        };

        if client_state.is_frozen() {
            return Status::Frozen;
        }

        let latest = match consensus_state(store, client_id, &client_state.latest_height()) {
            Ok(Some(consensus_state)) => consensus_state,
            // no consensus state for the latest height means it was pruned
            Ok(None) => return Status::Expired,
            Err(_) => return Status::Unknown,
        };

        if client_state.is_expired(latest.timestamp(), store.host_timestamp()) {
            return Status::Expired;
        }

        Status::Active
    }

    fn latest_height(&self, store: &ClientStore<'_>, client_id: &ClientId) -> Result<Height, ClientError> {
        Ok(client_state(store, client_id)?.latest_height())
    }

    fn timestamp_at_height(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Timestamp, ClientError> {
        consensus_state(store, client_id, height)?
            .map(|consensus_state| consensus_state.timestamp())
            .ok_or_else(|| ClientError::ConsensusStateNotFound {
                client_id: client_id.clone(),
                height: *height,
            })
    }
}
