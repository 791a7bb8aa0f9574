use ibc_relay_client_types::Height;
use ibc_relay_host_types::error::HostError;
use ibc_relay_host_types::identifiers::ClientId;
use ibc_relay_host_types::path::ClientStorePath;
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::Timestamp;

/// Read access to the host's key-value store.
///
/// Keys are the bytes of an ICS-24 path. The core never iterates the store,
/// so point lookups are all a host has to provide.
pub trait Store {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Write access to the host's key-value store.
pub trait StoreMut: Store {
    /// Stores `value` under `key`, returning the value it replaced.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, HostError>;

    /// Removes `key`. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), HostError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }
}

impl<S: StoreMut + ?Sized> StoreMut for &mut S {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, HostError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), HostError> {
        (**self).delete(key)
    }
}

fn namespaced(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    let mut full = Vec::with_capacity(prefix.len() + key.len());
    full.extend_from_slice(prefix);
    full.extend_from_slice(key);
    full
}

/// Read-only view of the `clients/{client_id}/` namespace handed to a light
/// client module, together with the host clock the module may need to judge
/// expiry or delay periods.
pub struct ClientStore<'a> {
    parent: &'a dyn Store,
    prefix: Vec<u8>,
    host_height: Height,
    host_timestamp: Timestamp,
}

impl<'a> ClientStore<'a> {
    pub fn new(
        parent: &'a dyn Store,
        client_id: &ClientId,
        host_height: Height,
        host_timestamp: Timestamp,
    ) -> Self {
        Self {
            parent,
            prefix: ClientStorePath::new(client_id.clone()).to_string().into_bytes(),
            host_height,
            host_timestamp,
        }
    }

    pub fn host_height(&self) -> Height {
        self.host_height
    }

    pub fn host_timestamp(&self) -> Timestamp {
        self.host_timestamp
    }
}

impl Store for ClientStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.parent.get(&namespaced(&self.prefix, key))
    }
}

/// Writable counterpart of [`ClientStore`].
pub struct ClientStoreMut<'a> {
    parent: &'a mut dyn StoreMut,
    prefix: Vec<u8>,
    host_height: Height,
    host_timestamp: Timestamp,
}

impl<'a> ClientStoreMut<'a> {
    pub fn new(
        parent: &'a mut dyn StoreMut,
        client_id: &ClientId,
        host_height: Height,
        host_timestamp: Timestamp,
    ) -> Self {
        Self {
            parent,
            prefix: ClientStorePath::new(client_id.clone()).to_string().into_bytes(),
            host_height,
            host_timestamp,
        }
    }

    pub fn host_height(&self) -> Height {
        self.host_height
    }

    pub fn host_timestamp(&self) -> Timestamp {
        self.host_timestamp
    }
}

impl Store for ClientStoreMut<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.parent.get(&namespaced(&self.prefix, key))
    }
}

impl StoreMut for ClientStoreMut<'_> {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, HostError> {
        self.parent.set(namespaced(&self.prefix, &key), value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), HostError> {
        self.parent.delete(&namespaced(&self.prefix, key))
    }
}
