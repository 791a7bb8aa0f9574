use ibc_relay_client_types::error::ClientError;
use ibc_relay_host_types::identifiers::{ClientId, ClientType};
use ibc_relay_primitives::prelude::*;
use ibc_relay_primitives::proto::Any;

use crate::module::LightClientModule;

/// Routes client types to their [`LightClientModule`].
pub trait ClientRouter {
    fn get_client_module(&self, client_type: &ClientType) -> Option<&dyn LightClientModule>;

    /// Returns the module decoding `client_state`, by its type URL.
    fn client_module_for_state(&self, client_state: &Any) -> Option<&dyn LightClientModule>;

    /// Returns the module serving `client_id`, found by the client type
    /// prefix of the identifier.
    fn client_module(&self, client_id: &ClientId) -> Result<&dyn LightClientModule, ClientError> {
        let client_type = client_id.client_type()?;
        self.get_client_module(&client_type)
            .ok_or(ClientError::MissingClientModule { client_type })
    }
}

/// A [`ClientRouter`] backed by an ordered map from client type to module.
#[derive(Default)]
pub struct LightClientRegistry {
    modules: BTreeMap<ClientType, Box<dyn LightClientModule>>,
}

impl LightClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `module` under its client type, returning the module it
    /// replaced.
    pub fn register(
        &mut self,
        module: Box<dyn LightClientModule>,
    ) -> Option<Box<dyn LightClientModule>> {
        self.modules.insert(module.client_type(), module)
    }

    pub fn with_module(mut self, module: impl LightClientModule + 'static) -> Self {
        self.register(Box::new(module));
        self
    }

    pub fn client_types(&self) -> impl Iterator<Item = &ClientType> {
        self.modules.keys()
    }
}

impl ClientRouter for LightClientRegistry {
    fn get_client_module(&self, client_type: &ClientType) -> Option<&dyn LightClientModule> {
        self.modules.get(client_type).map(|module| &**module)
    }

    fn client_module_for_state(&self, client_state: &Any) -> Option<&dyn LightClientModule> {
        self.modules
            .values()
            .find(|module| module.client_state_type_url() == client_state.type_url)
            .map(|module| &**module)
    }
}
