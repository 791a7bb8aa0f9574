//! Wire forms of the mock client types.

use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use ibc_relay_core::primitives::prelude::*;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Header {
    #[prost(message, optional, tag = "1")]
    pub height: Option<RawHeight>,
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientState {
    #[prost(message, optional, tag = "1")]
    pub header: Option<Header>,
    #[prost(bool, tag = "2")]
    pub frozen: bool,
    /// Zero means the client never expires.
    #[prost(uint64, tag = "3")]
    pub trusting_period_secs: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusState {
    #[prost(message, optional, tag = "1")]
    pub header: Option<Header>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Misbehaviour {
    #[prost(string, tag = "1")]
    pub client_id: String,
    #[prost(message, optional, tag = "2")]
    pub header1: Option<Header>,
    #[prost(message, optional, tag = "3")]
    pub header2: Option<Header>,
}
