//! ICS-04: Packet Semantics implementation to process the lifecycle of
//! packets over classic channel ends and lite client-addressed routes, along
//! with re-exporting data structures from the `ibc-relay-channel-types` crate.
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

/// Re-exports ICS-04 data structures from the `ibc-relay-channel-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_relay_channel_types::*;
}
