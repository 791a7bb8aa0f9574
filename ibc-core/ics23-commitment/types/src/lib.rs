//! ICS-23: Commitment types used to build the keys under which a
//! counterparty's committed values are proven.
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

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod commitment;
pub mod error;
pub mod merkle;

#[cfg(feature = "serde")]
pub mod serializer;

/// Re-exports the commitment proto types from the `ibc-proto` crate.
pub mod proto {
    pub use ibc_proto::ibc::core::commitment::*;
}
