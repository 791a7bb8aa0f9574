use core::time::Duration;

use ibc_relay_channel_types::channel::ChannelEnd;
use ibc_relay_channel_types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_relay_channel_types::packet::Receipt;
use ibc_relay_client_types::{Counterparty, Height};
use ibc_relay_commitment_types::commitment::CommitmentPrefix;
use ibc_relay_handler_types::events::IbcEvent;
use ibc_relay_host_types::error::{DecodingError, HostError};
use ibc_relay_host_types::identifiers::{ClientId, ClientType, Sequence};
use ibc_relay_host_types::path::{
    AckPath, ChannelEndPath, ClientCounterpartyPath, CommitmentPath, NextClientSequencePath, Path,
    ReceiptPath, SeqAckPath, SeqRecvPath, SeqSendPath,
};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Protobuf;
use ibc_relay_primitives::{Signer, Timestamp};

use crate::store::{ClientStore, ClientStoreMut, Store, StoreMut};
use crate::utils::calculate_block_delay;

/// Host parameters governing which light clients may be created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientParams {
    /// Client types that may be created; [`ClientParams::ALLOW_ALL`] admits
    /// every type.
    pub allowed_clients: Vec<String>,
}

impl ClientParams {
    pub const ALLOW_ALL: &'static str = "*";

    pub fn is_allowed(&self, client_type: &ClientType) -> bool {
        self.allowed_clients
            .iter()
            .any(|allowed| allowed == Self::ALLOW_ALL || allowed == client_type.as_str())
    }
}

impl Default for ClientParams {
    fn default() -> Self {
        Self {
            allowed_clients: vec![Self::ALLOW_ALL.to_string()],
        }
    }
}

fn key(path: impl Into<Path>) -> Vec<u8> {
    path.into().into_bytes()
}

fn read_sequence(store: &dyn Store, key: &[u8]) -> Result<Sequence, HostError> {
    match store.get(key) {
        Some(bytes) => Sequence::from_be_slice(&bytes)
            .map_err(|e| HostError::from(DecodingError::from(e))),
        None => Ok(Sequence::default()),
    }
}

/// Context to be implemented by the host that provides all "read-only" methods.
///
/// Every typed getter is provided on top of [`ValidationContext::store`], so
/// a host only supplies its store, its clock and a few parameters.
pub trait ValidationContext {
    /// The host's key-value store, keyed by ICS-24 path bytes.
    fn store(&self) -> &dyn Store;

    /// Returns the current height of the local chain.
    fn host_height(&self) -> Result<Height, HostError>;

    /// Returns the current timestamp of the local chain.
    fn host_timestamp(&self) -> Result<Timestamp, HostError>;

    /// Returns the prefix under which the host commits the values
    /// counterparties prove.
    fn commitment_prefix(&self) -> CommitmentPrefix;

    /// Returns the maximum expected time per block
    fn max_expected_time_per_block(&self) -> Duration;

    fn client_params(&self) -> ClientParams {
        ClientParams::default()
    }

    /// Validates the `signer` field of IBC messages, which represents the address
    /// of the user/relayer that signed the given message.
    fn validate_message_signer(&self, signer: &Signer) -> Result<(), HostError>;

    /// Calculates the block delay period using the channel's delay period and the
    /// maximum expected time per block.
    fn block_delay(&self, delay_period_time: &Duration) -> u64 {
        calculate_block_delay(delay_period_time, &self.max_expected_time_per_block())
    }

    /// The namespace of `client_id`, as its light client module sees it.
    fn client_store(&self, client_id: &ClientId) -> Result<ClientStore<'_>, HostError> {
        Ok(ClientStore::new(
            self.store(),
            client_id,
            self.host_height()?,
            self.host_timestamp()?,
        ))
    }

    /// Returns a natural number, counting how many clients have been created
    /// thus far.
    fn client_counter(&self) -> Result<u64, HostError> {
        match self.store().get(&key(NextClientSequencePath)) {
            Some(bytes) => <[u8; 8]>::try_from(bytes.as_slice())
                .map(u64::from_be_bytes)
                .map_err(|_| HostError::invalid_data("client counter is not 8 bytes")),
            None => Ok(0),
        }
    }

    /// Returns the lite counterparty binding of `client_id`, if one was
    /// provided.
    fn client_counterparty(&self, client_id: &ClientId) -> Result<Option<Counterparty>, HostError> {
        self.store()
            .get(&key(ClientCounterpartyPath::new(client_id.clone())))
            .map(|bytes| {
                <Counterparty as Protobuf<_>>::decode_vec(&bytes).map_err(|e| {
                    HostError::FailedToParseData {
                        description: e.to_string(),
                    }
                })
            })
            .transpose()
    }

    /// Returns the classic channel end stored at `channel_end_path`.
    fn channel_end(&self, channel_end_path: &ChannelEndPath) -> Result<Option<ChannelEnd>, HostError> {
        self.store()
            .get(&key(channel_end_path.clone()))
            .map(|bytes| {
                ChannelEnd::decode_vec(&bytes).map_err(|e| HostError::FailedToParseData {
                    description: e.to_string(),
                })
            })
            .transpose()
    }

    fn get_next_sequence_send(&self, seq_send_path: &SeqSendPath) -> Result<Sequence, HostError> {
        read_sequence(self.store(), &key(seq_send_path.clone()))
    }

    fn get_next_sequence_recv(&self, seq_recv_path: &SeqRecvPath) -> Result<Sequence, HostError> {
        read_sequence(self.store(), &key(seq_recv_path.clone()))
    }

    fn get_next_sequence_ack(&self, seq_ack_path: &SeqAckPath) -> Result<Sequence, HostError> {
        read_sequence(self.store(), &key(seq_ack_path.clone()))
    }

    fn get_packet_commitment(
        &self,
        commitment_path: &CommitmentPath,
    ) -> Result<Option<PacketCommitment>, HostError> {
        Ok(self
            .store()
            .get(&key(commitment_path.clone()))
            .map(PacketCommitment::from))
    }

    fn get_packet_receipt(&self, receipt_path: &ReceiptPath) -> Result<Option<Receipt>, HostError> {
        match self.store().get(&key(receipt_path.clone())) {
            Some(bytes) if bytes == Receipt::BYTES => Ok(Some(Receipt::Ok)),
            Some(_) => Err(HostError::invalid_data(format!(
                "malformed packet receipt at `{receipt_path}`"
            ))),
            None => Ok(None),
        }
    }

    fn get_packet_acknowledgement(
        &self,
        ack_path: &AckPath,
    ) -> Result<Option<AcknowledgementCommitment>, HostError> {
        Ok(self
            .store()
            .get(&key(ack_path.clone()))
            .map(AcknowledgementCommitment::from))
    }
}

/// Context to be implemented by the host that provides all "write-only" methods.
///
/// As with [`ValidationContext`], the typed writers are provided over
/// [`ExecutionContext::store_mut`].
pub trait ExecutionContext: ValidationContext {
    fn store_mut(&mut self) -> &mut dyn StoreMut;

    /// Ibc events
    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), HostError>;

    /// Logging facility
    fn log_message(&mut self, message: String) -> Result<(), HostError>;

    /// Writable namespace of `client_id`.
    fn client_store_mut(&mut self, client_id: &ClientId) -> Result<ClientStoreMut<'_>, HostError> {
        let host_height = self.host_height()?;
        let host_timestamp = self.host_timestamp()?;
        Ok(ClientStoreMut::new(
            self.store_mut(),
            client_id,
            host_height,
            host_timestamp,
        ))
    }

    /// Called upon client creation.
    /// Increases the counter, that keeps track of how many clients have been created.
    fn increase_client_counter(&mut self) -> Result<(), HostError> {
        let next = self
            .client_counter()?
            .checked_add(1)
            .ok_or_else(|| HostError::invalid_data("client counter overflow"))?;
        self.store_mut()
            .set(key(NextClientSequencePath), next.to_be_bytes().to_vec())
            .map(|_| ())
    }

    fn store_client_counterparty(
        &mut self,
        client_id: &ClientId,
        counterparty: Counterparty,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(
                key(ClientCounterpartyPath::new(client_id.clone())),
                <Counterparty as Protobuf<_>>::encode_vec(counterparty),
            )
            .map(|_| ())
    }

    /// Stores the given channel_end at a path associated with the port_id and channel_id.
    fn store_channel(
        &mut self,
        channel_end_path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(key(channel_end_path.clone()), channel_end.encode_vec())
            .map(|_| ())
    }

    fn store_next_sequence_send(
        &mut self,
        seq_send_path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(key(seq_send_path.clone()), seq.to_vec())
            .map(|_| ())
    }

    fn store_next_sequence_recv(
        &mut self,
        seq_recv_path: &SeqRecvPath,
        seq: Sequence,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(key(seq_recv_path.clone()), seq.to_vec())
            .map(|_| ())
    }

    fn store_next_sequence_ack(
        &mut self,
        seq_ack_path: &SeqAckPath,
        seq: Sequence,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(key(seq_ack_path.clone()), seq.to_vec())
            .map(|_| ())
    }

    fn store_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(key(commitment_path.clone()), commitment.into_vec())
            .map(|_| ())
    }

    fn delete_packet_commitment(&mut self, commitment_path: &CommitmentPath) -> Result<(), HostError> {
        self.store_mut().delete(&key(commitment_path.clone()))
    }

    fn store_packet_receipt(
        &mut self,
        receipt_path: &ReceiptPath,
        receipt: Receipt,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(key(receipt_path.clone()), receipt.to_vec())
            .map(|_| ())
    }

    fn store_packet_acknowledgement(
        &mut self,
        ack_path: &AckPath,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), HostError> {
        self.store_mut()
            .set(key(ack_path.clone()), ack_commitment.into_vec())
            .map(|_| ())
    }
}
