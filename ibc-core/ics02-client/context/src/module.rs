//! Defines `LightClientModule`, the capability implemented once per
//! counterparty consensus type.

use core::time::Duration;

use ibc_relay_client_types::error::ClientError;
use ibc_relay_client_types::{Height, Status};
use ibc_relay_commitment_types::commitment::CommitmentProofBytes;
use ibc_relay_commitment_types::merkle::MerklePath;
use ibc_relay_host::{ClientStore, ClientStoreMut};
use ibc_relay_host_types::identifiers::{ClientId, ClientType};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Any;
use ibc_relay_primitives::Timestamp;

/// A light client implementation for one client type.
///
/// One value serves every client instance of its type: each method takes the
/// instance's `client_id` along with a store scoped to that instance's
/// `clients/{client_id}/` namespace, so the module keeps no per-instance
/// state of its own.
pub trait LightClientModule {
    /// The client type this module serves, also the prefix of the
    /// identifiers of its instances.
    fn client_type(&self) -> ClientType;

    /// Type URL of the client states this module decodes. Routes
    /// `MsgCreateClient` to the module.
    fn client_state_type_url(&self) -> &str;

    /// Validates and persists the initial client and consensus states.
    fn initialise(
        &self,
        store: &mut ClientStoreMut<'_>,
        client_id: &ClientId,
        client_state: Any,
        consensus_state: Any,
    ) -> Result<(), ClientError>;

    /// verify_client_message must verify a client_message. A client_message
    /// could be a Header, Misbehaviour or a batch update. Calls to
    /// check_for_misbehaviour, update_state, and update_state_on_misbehaviour
    /// will assume that the content of the client_message has been verified
    /// and can be trusted. An error should be returned if the client_message
    /// fails to verify.
    fn verify_client_message(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        client_message: &Any,
    ) -> Result<(), ClientError>;

    /// Checks for evidence of a misbehaviour in Header or Misbehaviour type. It
    /// assumes the client_message has already been verified.
    fn check_for_misbehaviour(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        client_message: &Any,
    ) -> Result<bool, ClientError>;

    /// Freezes the client once misbehaviour has been detected and verified.
    ///
    /// Must not fail and must be idempotent.
    fn update_state_on_misbehaviour(
        &self,
        store: &mut ClientStoreMut<'_>,
        client_id: &ClientId,
        client_message: &Any,
    );

    /// Persists the consensus states carried by a verified client message and
    /// returns the heights newly made available. An empty list means the
    /// update was a duplicate.
    fn update_state(
        &self,
        store: &mut ClientStoreMut<'_>,
        client_id: &ClientId,
        client_message: &Any,
    ) -> Result<Vec<Height>, ClientError>;

    /// Verifies that `value` is stored at `path` in the counterparty state
    /// committed at `height`.
    ///
    /// Proofs whose height is not yet `delay_time_period` old by the host
    /// clock, or `delay_block_period` blocks old by the host height, are
    /// rejected with [`ClientError::ProofHeightTooRecent`].
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<(), ClientError>;

    /// Verifies that nothing is stored at `path` in the counterparty state
    /// committed at `height`, under the same delay rules as
    /// [`LightClientModule::verify_membership`].
    #[allow(clippy::too_many_arguments)]
    fn verify_non_membership(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        height: &Height,
        delay_time_period: Duration,
        delay_block_period: u64,
        proof: &CommitmentProofBytes,
        path: &MerklePath,
    ) -> Result<(), ClientError>;

    /// Returns the status of the client. Only Active clients are allowed to
    /// process packets. A client without stored state is `Unknown`.
    fn status(&self, store: &ClientStore<'_>, client_id: &ClientId) -> Status;

    /// Latest height the client was updated to
    fn latest_height(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
    ) -> Result<Height, ClientError>;

    /// Timestamp of the consensus state stored at `height`.
    fn timestamp_at_height(
        &self,
        store: &ClientStore<'_>,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Timestamp, ClientError>;
}
