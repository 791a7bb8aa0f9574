pub mod mock;

use ibc_relay_core::client::context::LightClientRegistry;

use self::mock::light_client::MockClientModule;

/// The light clients every mock chain runs.
pub fn mock_client_router() -> LightClientRegistry {
    LightClientRegistry::new().with_module(MockClientModule::new())
}
