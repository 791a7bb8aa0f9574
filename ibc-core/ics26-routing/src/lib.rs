//! Connects application modules to the packet lifecycle: the callbacks a
//! module implements and the router binding modules to ports.
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

pub mod module;
pub mod router;

/// Re-exports router data structures from the `ibc-relay-router-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_relay_router_types::*;
}
