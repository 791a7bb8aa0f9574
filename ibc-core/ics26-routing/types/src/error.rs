use displaydoc::Display;
use ibc_relay_host_types::error::HostError;
use ibc_relay_host_types::identifiers::PortId;
use ibc_relay_primitives::prelude::*;

use crate::module::ModuleId;

/// Error type for the router module.
#[derive(Debug, Display, derive_more::From)]
pub enum RouterError {
    /// host error: {0}
    Host(HostError),
    /// no module bound to port `{port_id}`
    UnknownPort { port_id: PortId },
    /// missing module `{module_id}`
    MissingModule { module_id: ModuleId },
}

#[cfg(feature = "std")]
impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}
