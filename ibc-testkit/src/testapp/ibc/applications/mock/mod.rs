//! An application that records the packet callbacks it receives.

use alloc::sync::Arc;

use ibc_relay_core::channel::types::acknowledgement::{
    Acknowledgement, AcknowledgementStatus, StatusValue,
};
use ibc_relay_core::channel::types::error::ChannelError;
use ibc_relay_core::channel::types::packet::Packet;
use ibc_relay_core::host::types::identifiers::{PortId, Sequence};
use ibc_relay_core::host::StoreMut;
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::Signer;
use ibc_relay_core::router::module::Module;
use ibc_relay_core::router::types::event::ModuleEvent;
use ibc_relay_core::router::types::module::{ModuleExtras, ModuleId};
use parking_lot::Mutex;

pub const MOCK_MODULE_ID: &str = "mock";
pub const MOCK_PORT_ID: &str = "mock";

/// Ack sent back for a received packet.
pub const MOCK_ACK_RESULT: &str = "AQ==";

pub fn mock_module_id() -> ModuleId {
    ModuleId::new(MOCK_MODULE_ID)
}

pub fn mock_port_id() -> PortId {
    MOCK_PORT_ID.parse().expect("never fails because it's a valid port id")
}

/// How the module acknowledges received packets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AckBehaviour {
    #[default]
    Success,
    /// Fails the receive with an error acknowledgement.
    Error,
    /// Acknowledges later, through `write_acknowledgement`.
    Async,
}

/// A packet callback the module saw executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleCallback {
    Send(Sequence),
    Recv(Sequence),
    Ack(Sequence, Acknowledgement),
    Timeout(Sequence),
}

/// Store key under which the module records having handled `seq` for
/// `callback`, one of `sent`, `received`, `acked` or `timedout`.
pub fn mock_record_key(callback: &str, seq: Sequence) -> Vec<u8> {
    format!("{MOCK_MODULE_ID}/{callback}/{seq}").into_bytes()
}

/// Cloning shares the callback log, so a test can keep a handle on a module
/// it moved into a router.
#[derive(Clone, Debug, Default)]
pub struct MockModule {
    pub ack_behaviour: AckBehaviour,
    /// Makes every validation callback reject the packet.
    pub reject_packets: bool,
    callbacks: Arc<Mutex<Vec<ModuleCallback>>>,
}

impl MockModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ack_behaviour(self, ack_behaviour: AckBehaviour) -> Self {
        Self {
            ack_behaviour,
            ..self
        }
    }

    pub fn rejecting(self) -> Self {
        Self {
            reject_packets: true,
            ..self
        }
    }

    pub fn callbacks(&self) -> Vec<ModuleCallback> {
        self.callbacks.lock().clone()
    }

    fn check(&self, packet: &Packet) -> Result<(), ChannelError> {
        if self.reject_packets {
            return Err(ChannelError::AppModule {
                description: format!("mock module rejects packet {}", packet.seq_on_a),
            });
        }
        Ok(())
    }

    /// Records the callback in the store and the callback log.
    fn record(
        &self,
        store: &mut dyn StoreMut,
        kind: &str,
        callback: ModuleCallback,
        packet: &Packet,
    ) -> (ModuleExtras, Result<(), ChannelError>) {
        let mut extras = ModuleExtras::empty();

        if let Err(e) = store.set(mock_record_key(kind, packet.seq_on_a), packet.data.clone()) {
            return (extras, Err(e.into()));
        }

        self.callbacks.lock().push(callback);

        extras.events.push(
            ModuleEvent::new(format!("mock_{kind}"))
                .with_attribute("packet_sequence", packet.seq_on_a),
        );
        extras
            .log
            .push(format!("mock module: packet {} {kind}", packet.seq_on_a));

        (extras, Ok(()))
    }
}

impl Module for MockModule {
    fn on_send_packet_validate(&self, packet: &Packet, _signer: &Signer) -> Result<(), ChannelError> {
        self.check(packet)
    }

    fn on_send_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        _signer: &Signer,
    ) -> (ModuleExtras, Result<(), ChannelError>) {
        self.record(store, "sent", ModuleCallback::Send(packet.seq_on_a), packet)
    }

    fn on_recv_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Option<AcknowledgementStatus>) {
        let (extras, result) =
            self.record(store, "received", ModuleCallback::Recv(packet.seq_on_a), packet);

        let ack = match (result, self.ack_behaviour) {
            (Err(_), _) | (Ok(()), AckBehaviour::Error) => Some(AcknowledgementStatus::error(
                StatusValue::new(format!("mock module failed packet {}", packet.seq_on_a))
                    .expect("error message is never empty"),
            )),
            (Ok(()), AckBehaviour::Success) => Some(AcknowledgementStatus::success(
                StatusValue::new(MOCK_ACK_RESULT).expect("ack result is never empty"),
            )),
            (Ok(()), AckBehaviour::Async) => None,
        };

        (extras, ack)
    }

    fn on_acknowledgement_packet_validate(
        &self,
        packet: &Packet,
        _acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> Result<(), ChannelError> {
        self.check(packet)
    }

    fn on_acknowledgement_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), ChannelError>) {
        self.record(
            store,
            "acked",
            ModuleCallback::Ack(packet.seq_on_a, acknowledgement.clone()),
            packet,
        )
    }

    fn on_timeout_packet_validate(&self, packet: &Packet, _relayer: &Signer) -> Result<(), ChannelError> {
        self.check(packet)
    }

    fn on_timeout_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), ChannelError>) {
        self.record(store, "timedout", ModuleCallback::Timeout(packet.seq_on_a), packet)
    }
}
