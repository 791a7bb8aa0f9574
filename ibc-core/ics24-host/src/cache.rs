use core::time::Duration;

use ibc_relay_client_types::Height;
use ibc_relay_commitment_types::commitment::CommitmentPrefix;
use ibc_relay_handler_types::events::IbcEvent;
use ibc_relay_host_types::error::HostError;
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::{Signer, Timestamp};

use crate::context::{ClientParams, ExecutionContext, ValidationContext};
use crate::store::{Store, StoreMut};

/// A copy-on-write overlay over a read-only parent store.
///
/// Writes are buffered in an arena keyed by store key, `None` marking a
/// deletion. Reads see the buffered writes first, then the parent. Nothing
/// reaches the parent unless the overlay is turned into [`StoreWrites`] and
/// applied; dropping it discards every pending write.
pub struct CacheStore<'a> {
    parent: &'a dyn Store,
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a dyn Store) -> Self {
        Self {
            parent,
            pending: BTreeMap::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn into_writes(self) -> StoreWrites {
        StoreWrites {
            pending: self.pending,
        }
    }
}

impl Store for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(value) => value.clone(),
            None => self.parent.get(key),
        }
    }
}

impl StoreMut for CacheStore<'_> {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, HostError> {
        let previous = self.get(&key);
        self.pending.insert(key, Some(value));
        Ok(previous)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), HostError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }
}

/// The pending writes of a [`CacheStore`], detached from its parent so they
/// can be committed once the parent is mutably available again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreWrites {
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl StoreWrites {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Commits the writes to `store` in key order.
    pub fn apply_to(self, store: &mut dyn StoreMut) -> Result<(), HostError> {
        for (key, value) in self.pending {
            match value {
                Some(value) => {
                    store.set(key, value)?;
                }
                None => store.delete(&key)?,
            }
        }
        Ok(())
    }
}

/// A context that reads through to `inner` and keeps its own writes, events
/// and logs to itself.
///
/// This is the speculative state admission checks run against: a message can
/// be validated and then executed without touching the host's committed
/// store, and a later message of the same batch observes its effects.
pub struct CachedContext<'a, Ctx>
where
    Ctx: ValidationContext + ?Sized,
{
    inner: &'a Ctx,
    cache: CacheStore<'a>,
    events: Vec<IbcEvent>,
    logs: Vec<String>,
}

impl<'a, Ctx> CachedContext<'a, Ctx>
where
    Ctx: ValidationContext + ?Sized,
{
    pub fn new(inner: &'a Ctx) -> Self {
        Self {
            inner,
            cache: CacheStore::new(inner.store()),
            events: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn events(&self) -> &[IbcEvent] {
        &self.events
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn into_writes(self) -> StoreWrites {
        self.cache.into_writes()
    }
}

impl<Ctx> ValidationContext for CachedContext<'_, Ctx>
where
    Ctx: ValidationContext + ?Sized,
{
    fn store(&self) -> &dyn Store {
        &self.cache
    }

    fn host_height(&self) -> Result<Height, HostError> {
        self.inner.host_height()
    }

    fn host_timestamp(&self) -> Result<Timestamp, HostError> {
        self.inner.host_timestamp()
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        self.inner.commitment_prefix()
    }

    fn max_expected_time_per_block(&self) -> Duration {
        self.inner.max_expected_time_per_block()
    }

    fn client_params(&self) -> ClientParams {
        self.inner.client_params()
    }

    fn validate_message_signer(&self, signer: &Signer) -> Result<(), HostError> {
        self.inner.validate_message_signer(signer)
    }
}

impl<Ctx> ExecutionContext for CachedContext<'_, Ctx>
where
    Ctx: ValidationContext + ?Sized,
{
    fn store_mut(&mut self) -> &mut dyn StoreMut {
        &mut self.cache
    }

    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), HostError> {
        self.events.push(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), HostError> {
        self.logs.push(message);
        Ok(())
    }
}
