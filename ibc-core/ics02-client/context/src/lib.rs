//! This crate sits between the host store and light client implementations.
//! A light client implementation provides [`LightClientModule`] for one
//! consensus type; the host registers its implementations in a
//! [`ClientRouter`] and the core reaches every client instance through it by
//! client identifier alone.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::disallowed_methods, clippy::disallowed_types))]
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

mod module;
mod router;

pub use module::*;
pub use router::*;

/// Trait preludes for the ICS-02 client implementation.
pub mod prelude {
    pub use crate::module::LightClientModule;
    pub use crate::router::ClientRouter;
}

pub mod types {
    #[doc(inline)]
    pub use ibc_relay_client_types::*;
}
