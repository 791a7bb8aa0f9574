//! ICS-02: Client Semantics implementation for verifying remote chains,
//! along with re-exporting data structures from `ibc-relay-client-types` crate.
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

#[allow(unused_extern_crates)]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod handler;

/// Re-exports the light client capability from `ibc-relay-client-context`.
pub mod context {
    #[doc(inline)]
    pub use ibc_relay_client_context::*;
}

/// Re-exports ICS-02 data structures from the `ibc-relay-client-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_relay_client_types::*;
}
