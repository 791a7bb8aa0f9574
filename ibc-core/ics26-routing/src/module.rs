//! Defines the `Module` callbacks an application implements.

use core::fmt::Debug;

use ibc_relay_channel_types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_channel_types::packet::Packet;
use ibc_relay_host::StoreMut;
use ibc_relay_primitives::Signer;
use ibc_relay_router_types::module::ModuleExtras;

/// Packet callbacks of an application module.
///
/// `*_validate` callbacks run before any core state change and may reject
/// the message. `*_execute` callbacks run after the core has updated its
/// store; application state lives in the `store` handed to them so the core
/// controls whether it is kept.
pub trait Module: Debug {
    fn on_send_packet_validate(&self, packet: &Packet, signer: &Signer)
        -> Result<(), ChannelError>;

    fn on_send_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        signer: &Signer,
    ) -> (ModuleExtras, Result<(), ChannelError>);

    /// Handles an incoming packet.
    ///
    /// `store` is an overlay: its writes are kept only when the returned
    /// acknowledgement is successful or absent. `None` means the module will
    /// write the acknowledgement later. Failures are reported through an
    /// error acknowledgement, never as an error of the receive itself.
    fn on_recv_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Option<AcknowledgementStatus>);

    fn on_acknowledgement_packet_validate(
        &self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> Result<(), ChannelError>;

    fn on_acknowledgement_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), ChannelError>);

    /// Note: `MsgTimeout` and `MsgTimeoutOnClose` use the same callback
    fn on_timeout_packet_validate(
        &self,
        packet: &Packet,
        relayer: &Signer,
    ) -> Result<(), ChannelError>;

    /// Note: `MsgTimeout` and `MsgTimeoutOnClose` use the same callback
    fn on_timeout_packet_execute(
        &mut self,
        store: &mut dyn StoreMut,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), ChannelError>);
}
