//! Defines the client message types that are sent to the chain by the relayer.

mod create_client;
mod provide_counterparty;
mod update_client;

pub use create_client::*;
pub use provide_counterparty::*;
pub use update_client::*;

/// Encodes all the different client messages
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum ClientMsg {
    CreateClient(MsgCreateClient),
    UpdateClient(MsgUpdateClient),
    ProvideCounterparty(MsgProvideCounterparty),
}
