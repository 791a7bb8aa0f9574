pub mod channel;
pub mod client;
pub mod context;
pub mod signer;
