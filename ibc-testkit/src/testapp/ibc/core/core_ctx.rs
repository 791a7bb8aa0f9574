//! Implementation of the host traits for the mock context.

use core::time::Duration;

use ibc_relay_core::client::types::Height;
use ibc_relay_core::commitment_types::commitment::CommitmentPrefix;
use ibc_relay_core::handler::types::events::IbcEvent;
use ibc_relay_core::host::types::error::HostError;
use ibc_relay_core::host::{ClientParams, ExecutionContext, Store, StoreMut, ValidationContext};
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::{Signer, Timestamp};

use super::types::MockContext;

impl ValidationContext for MockContext {
    fn store(&self) -> &dyn Store {
        &self.ibc_store
    }

    fn host_height(&self) -> Result<Height, HostError> {
        Ok(self.latest_height())
    }

    fn host_timestamp(&self) -> Result<Timestamp, HostError> {
        Ok(self.latest_timestamp())
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        self.commitment_prefix.clone()
    }

    fn max_expected_time_per_block(&self) -> Duration {
        self.block_time
    }

    fn client_params(&self) -> ClientParams {
        self.client_params.clone()
    }

    fn validate_message_signer(&self, signer: &Signer) -> Result<(), HostError> {
        if signer.is_empty() {
            return Err(HostError::invalid_data("message signer is empty"));
        }
        Ok(())
    }
}

impl ExecutionContext for MockContext {
    fn store_mut(&mut self) -> &mut dyn StoreMut {
        &mut self.ibc_store
    }

    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), HostError> {
        tracing::debug!(?event, "ibc event");
        self.ibc_store.events.push(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), HostError> {
        tracing::debug!(%message, "ibc log");
        self.ibc_store.logs.push(message);
        Ok(())
    }
}
