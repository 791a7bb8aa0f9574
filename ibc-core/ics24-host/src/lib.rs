//! Traits a host chain implements to run the packet-relay core: raw store
//! access, per-client namespaces, the overlay used around application
//! callbacks and the typed views over the commitment store.
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

pub(crate) mod utils;

mod cache;
mod context;
mod store;

pub use cache::*;
pub use context::*;
pub use store::*;
pub use utils::calculate_block_delay;

/// Re-exports the ICS-24 identifiers, paths and host errors.
pub mod types {
    #[doc(inline)]
    pub use ibc_relay_host_types::*;
}
