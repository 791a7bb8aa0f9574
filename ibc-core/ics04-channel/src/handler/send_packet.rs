//! Protocol logic for processing `MsgSendPacket`.

use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_channel_types::events::SendPacket;
use ibc_relay_channel_types::msgs::MsgSendPacket;
use ibc_relay_client::context::prelude::*;
use ibc_relay_handler_types::events::IbcEvent;
use ibc_relay_host::types::identifiers::Sequence;
use ibc_relay_host::types::path::{CommitmentPath, SeqSendPath};
use ibc_relay_host::{ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;
use ibc_relay_router::module::Module;

use super::{emit_channel_event, emit_module_extras, packet_route};

/// Send the packet built from `msg`, including all necessary validation.
///
/// Equivalent to calling [`send_packet_validate`], followed by
/// [`send_packet_execute`].
pub fn send_packet<Ctx, R>(
    ctx_a: &mut Ctx,
    clients: &R,
    module: &mut dyn Module,
    msg: MsgSendPacket,
) -> Result<Sequence, ChannelError>
where
    Ctx: ExecutionContext,
    R: ClientRouter + ?Sized,
{
    send_packet_validate(ctx_a, clients, &*module, &msg)?;
    send_packet_execute(ctx_a, module, msg)
}

/// Validate that sending the packet would succeed.
///
/// The packet is rejected if it could never be delivered: its timeout must
/// not have elapsed at the latest height, and the consensus timestamp at
/// that height, that the source chain knows of the destination.
pub fn send_packet_validate<Ctx, R>(
    ctx_a: &Ctx,
    clients: &R,
    module: &dyn Module,
    msg: &MsgSendPacket,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let route = packet_route(ctx_a, &msg.port_id_on_a, &msg.chan_id_on_a)?;

    route.verify_open()?;
    route.verify_counterparty_matches(&msg.port_id_on_b, &msg.chan_id_on_b)?;

    let client_id_on_a = route.client_id();
    let client_module = clients.client_module(client_id_on_a)?;
    let client_store = ctx_a.client_store(client_id_on_a)?;

    client_module
        .status(&client_store, client_id_on_a)
        .verify_is_active()?;

    let latest_height_on_a = client_module.latest_height(&client_store, client_id_on_a)?;

    if latest_height_on_a.is_zero() {
        return Err(ChannelError::ZeroLatestHeight {
            client_id: client_id_on_a.clone(),
        });
    }

    let latest_timestamp =
        client_module.timestamp_at_height(&client_store, client_id_on_a, &latest_height_on_a)?;

    let seq_send_path_on_a = SeqSendPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let seq_on_a = ctx_a.get_next_sequence_send(&seq_send_path_on_a)?;

    let packet = msg.packet(seq_on_a);

    packet.validate_basic()?;

    packet
        .timeout()
        .check_not_elapsed(latest_height_on_a, latest_timestamp)
        .map_err(ChannelError::InvalidTimeout)?;

    module.on_send_packet_validate(&packet, &msg.signer)
}

/// Commit the packet built from `msg` and return its sequence.
///
/// A prior call to [`send_packet_validate`] MUST have succeeded.
pub fn send_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgSendPacket,
) -> Result<Sequence, ChannelError>
where
    Ctx: ExecutionContext,
{
    let route = packet_route(ctx_a, &msg.port_id_on_a, &msg.chan_id_on_a)?;

    let seq_send_path_on_a = SeqSendPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let seq_on_a = ctx_a.get_next_sequence_send(&seq_send_path_on_a)?;

    let packet = msg.packet(seq_on_a);

    ctx_a.store_next_sequence_send(&seq_send_path_on_a, seq_on_a.increment())?;
    ctx_a.store_packet_commitment(
        &CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, seq_on_a),
        packet.commitment(),
    )?;

    let (extras, cb_result) = module.on_send_packet_execute(ctx_a.store_mut(), &packet, &msg.signer);

    cb_result?;

    // emit events and logs
    {
        ctx_a.log_message(format!(
            "packet sent: sequence: {}, src_port: {}, src_channel: {}, dst_port: {}, dst_channel: {}",
            seq_on_a,
            packet.port_id_on_a,
            packet.chan_id_on_a,
            packet.port_id_on_b,
            packet.chan_id_on_b
        ))?;

        let event = IbcEvent::SendPacket(SendPacket::new(packet, route.ordering()));
        emit_channel_event(ctx_a, event)?;

        emit_module_extras(ctx_a, extras)?;
    }

    Ok(seq_on_a)
}
