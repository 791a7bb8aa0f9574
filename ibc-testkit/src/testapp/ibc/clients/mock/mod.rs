pub mod client_state;
pub mod consensus_state;
pub mod header;
pub mod light_client;
pub mod misbehaviour;
pub mod proof;
pub mod proto;
