//! Defines events emitted during handling of packet-relay messages

use ibc_relay_channel_types::events as ChannelEvents;
use ibc_relay_client_types::events::{self as ClientEvents};
use ibc_relay_router_types::event::ModuleEvent;
use ibc_relay_primitives::prelude::*;

pub const MESSAGE_EVENT: &str = "message";

/// The key of the single attribute of a [`MessageEvent`].
pub const MODULE_ATTRIBUTE_KEY: &str = "module";

/// Events created by the core of a chain, destined for a relayer.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IbcEvent {
    CreateClient(ClientEvents::CreateClient),
    UpdateClient(ClientEvents::UpdateClient),
    ClientMisbehaviour(ClientEvents::ClientMisbehaviour),
    ProvideCounterparty(ClientEvents::ProvideCounterparty),

    SendPacket(ChannelEvents::SendPacket),
    ReceivePacket(ChannelEvents::ReceivePacket),
    WriteAcknowledgement(ChannelEvents::WriteAcknowledgement),
    AcknowledgePacket(ChannelEvents::AcknowledgePacket),
    TimeoutPacket(ChannelEvents::TimeoutPacket),
    ChannelClosed(ChannelEvents::ChannelClosed),

    Module(ModuleEvent),
    Message(MessageEvent),
}

impl IbcEvent {
    pub fn event_type(&self) -> &str {
        match self {
            IbcEvent::CreateClient(event) => event.event_type(),
            IbcEvent::UpdateClient(event) => event.event_type(),
            IbcEvent::ClientMisbehaviour(event) => event.event_type(),
            IbcEvent::ProvideCounterparty(event) => event.event_type(),
            IbcEvent::SendPacket(event) => event.event_type(),
            IbcEvent::ReceivePacket(event) => event.event_type(),
            IbcEvent::WriteAcknowledgement(event) => event.event_type(),
            IbcEvent::AcknowledgePacket(event) => event.event_type(),
            IbcEvent::TimeoutPacket(event) => event.event_type(),
            IbcEvent::ChannelClosed(event) => event.event_type(),
            IbcEvent::Module(module_event) => module_event.kind.as_str(),
            IbcEvent::Message(_) => MESSAGE_EVENT,
        }
    }

    /// The `(key, value)` attributes of the event, in emission order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        fn owned(attributes: Vec<(&'static str, String)>) -> Vec<(String, String)> {
            attributes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect()
        }

        match self {
            IbcEvent::CreateClient(event) => owned(event.attributes()),
            IbcEvent::UpdateClient(event) => owned(event.attributes()),
            IbcEvent::ClientMisbehaviour(event) => owned(event.attributes()),
            IbcEvent::ProvideCounterparty(event) => owned(event.attributes()),
            IbcEvent::SendPacket(event) => owned(event.attributes()),
            IbcEvent::ReceivePacket(event) => owned(event.attributes()),
            IbcEvent::WriteAcknowledgement(event) => owned(event.attributes()),
            IbcEvent::AcknowledgePacket(event) => owned(event.attributes()),
            IbcEvent::TimeoutPacket(event) => owned(event.attributes()),
            IbcEvent::ChannelClosed(event) => owned(event.attributes()),
            IbcEvent::Module(event) => event
                .attributes
                .iter()
                .map(|a| (a.key.clone(), a.value.clone()))
                .collect(),
            IbcEvent::Message(event) => {
                vec![(MODULE_ATTRIBUTE_KEY.to_string(), event.module_attribute())]
            }
        }
    }
}

/// Names the core module that handled a message. Emitted ahead of the
/// events of every handled message.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEvent {
    Client,
    Channel,
    // stores the module name
    Module(String),
}

impl MessageEvent {
    /// The value of the `module` attribute.
    pub fn module_attribute(&self) -> String {
        match self {
            MessageEvent::Client => "ibc_client".to_string(),
            MessageEvent::Channel => "ibc_channel".to_string(),
            MessageEvent::Module(module_name) => module_name.clone(),
        }
    }
}

impl From<MessageEvent> for IbcEvent {
    fn from(e: MessageEvent) -> Self {
        IbcEvent::Message(e)
    }
}

impl From<ModuleEvent> for IbcEvent {
    fn from(e: ModuleEvent) -> Self {
        IbcEvent::Module(e)
    }
}
