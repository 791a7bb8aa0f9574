//! Re-exports the data structures and handlers of the packet-relay core.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::disallowed_methods, clippy::disallowed_types,))]
#![deny(
    warnings,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

/// Re-exports the message entrypoints from the `ibc-relay-handler` crate for
/// added convenience.
pub mod entrypoint {
    #[doc(inline)]
    pub use ibc_relay_handler::entrypoint::*;
}

/// Re-exports primitive types from the `ibc-relay-primitives` crate
pub mod primitives {
    #[doc(inline)]
    pub use ibc_relay_primitives::*;
}

/// Re-exports ICS-02 implementation from the `ibc-relay-client` crate
pub mod client {
    #[doc(inline)]
    pub use ibc_relay_client::*;
}

/// Re-exports ICS-04 implementation from the `ibc-relay-channel` crate
pub mod channel {
    #[doc(inline)]
    pub use ibc_relay_channel::*;
}

/// Re-exports ICS-23 data structures from the `ibc-relay-commitment-types` crate
pub mod commitment_types {
    #[doc(inline)]
    pub use ibc_relay_commitment_types::*;
}

/// Re-exports ICS-24 implementation from the `ibc-relay-host` crate
pub mod host {
    #[doc(inline)]
    pub use ibc_relay_host::*;
}

/// Re-exports ICS-25 implementation from the `ibc-relay-handler` crate
pub mod handler {
    #[doc(inline)]
    pub use ibc_relay_handler::*;
}

/// Re-exports ICS-26 implementation from the `ibc-relay-router` crate
pub mod router {
    #[doc(inline)]
    pub use ibc_relay_router::*;
}
