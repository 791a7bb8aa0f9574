//! Protocol logic for processing `MsgRecvPacket`.

use ibc_relay_channel_types::acknowledgement::AcknowledgementStatus;
use ibc_relay_channel_types::channel::Order;
use ibc_relay_channel_types::error::ChannelError;
use ibc_relay_channel_types::events::ReceivePacket;
use ibc_relay_channel_types::msgs::MsgRecvPacket;
use ibc_relay_channel_types::packet::{Packet, Receipt};
use ibc_relay_client::context::prelude::*;
use ibc_relay_handler_types::events::IbcEvent;
use ibc_relay_host::types::path::{CommitmentPath, ReceiptPath, SeqRecvPath};
use ibc_relay_host::{CacheStore, ExecutionContext, ValidationContext};
use ibc_relay_primitives::prelude::*;
use ibc_relay_router::module::Module;

use super::{
    emit_channel_event, emit_module_extras, packet_route, verify_packet_proof,
    write_acknowledgement, PacketProof, PacketRoute,
};

/// Receive the packet of `msg`, including all necessary validation.
pub fn recv_packet<Ctx, R>(
    ctx_b: &mut Ctx,
    clients: &R,
    module: &mut dyn Module,
    msg: MsgRecvPacket,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
    R: ClientRouter + ?Sized,
{
    recv_packet_validate(ctx_b, clients, &msg)?;
    recv_packet_execute(ctx_b, module, msg)
}

/// Validate that receiving the packet would succeed.
///
/// An already received packet yields the no-op error. A packet whose
/// timeout has elapsed on this chain is rejected on every route, since the
/// sender may already have timed it out.
pub fn recv_packet_validate<Ctx, R>(
    ctx_b: &Ctx,
    clients: &R,
    msg: &MsgRecvPacket,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
    R: ClientRouter + ?Sized,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let route = packet_route(ctx_b, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    route.verify_open()?;
    route.verify_counterparty_matches(&packet.port_id_on_a, &packet.chan_id_on_a)?;

    verify_not_received(ctx_b, &route, packet)?;

    packet
        .timeout()
        .check_not_elapsed(ctx_b.host_height()?, ctx_b.host_timestamp()?)
        .map_err(ChannelError::InvalidTimeout)?;

    let commitment_path_on_a =
        CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);

    verify_packet_proof(
        ctx_b,
        clients,
        &route,
        PacketProof {
            sequence: packet.seq_on_a,
            height: &msg.proof_height_on_a,
            proof: &msg.proof_commitment_on_a,
        },
        commitment_path_on_a.into(),
        Some(packet.commitment().into_vec()),
    )
}

/// Record the receipt and deliver the packet to the application.
///
/// The application writes to an overlay of the host store. The overlay is
/// kept when the acknowledgement is successful or asynchronous, and dropped
/// with the callback's events and logs on an error acknowledgement; the
/// receipt and the acknowledgement are written either way.
pub fn recv_packet_execute<Ctx>(
    ctx_b: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgRecvPacket,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    let MsgRecvPacket { packet, signer, .. } = msg;

    let route = packet_route(ctx_b, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    verify_not_received(ctx_b, &route, &packet)?;

    mark_received(ctx_b, &route, &packet)?;

    let event = IbcEvent::ReceivePacket(ReceivePacket::new(packet.clone(), route.ordering()));
    emit_channel_event(ctx_b, event)?;

    let (kept, acknowledgement) = {
        let mut cache = CacheStore::new(ctx_b.store());
        let (extras, acknowledgement) = module.on_recv_packet_execute(&mut cache, &packet, &signer);

        let keep = acknowledgement
            .as_ref()
            .map_or(true, AcknowledgementStatus::is_successful);

        if keep {
            (Some((extras, cache.into_writes())), acknowledgement)
        } else {
            (None, acknowledgement)
        }
    };

    match kept {
        Some((extras, writes)) => {
            writes.apply_to(ctx_b.store_mut())?;
            emit_module_extras(ctx_b, extras)?;
        }
        None => ctx_b.log_message(format!(
            "packet receive: error acknowledgement for sequence {}, application writes discarded",
            packet.seq_on_a
        ))?,
    }

    ctx_b.log_message("success: packet receive".to_string())?;

    if let Some(acknowledgement) = acknowledgement {
        write_acknowledgement(ctx_b, &packet, acknowledgement.into())?;
    }

    Ok(())
}

/// Records `packet` as received without delivering it: a receipt on
/// unordered routes, the next expected sequence on ordered channels.
pub fn record_packet_receipt<Ctx>(ctx_b: &mut Ctx, packet: &Packet) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    let route = packet_route(ctx_b, &packet.port_id_on_b, &packet.chan_id_on_b)?;
    mark_received(ctx_b, &route, packet)
}

fn mark_received<Ctx>(ctx_b: &mut Ctx, route: &PacketRoute, packet: &Packet) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    match route.ordering() {
        Order::Ordered => {
            let seq_recv_path_on_b = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);
            ctx_b.store_next_sequence_recv(&seq_recv_path_on_b, packet.seq_on_a.increment())?;
        }
        Order::Unordered => {
            let receipt_path_on_b =
                ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
            ctx_b.store_packet_receipt(&receipt_path_on_b, Receipt::Ok)?;
        }
    }

    Ok(())
}

/// Returns the no-op error if the packet was already received.
fn verify_not_received<Ctx>(
    ctx_b: &Ctx,
    route: &PacketRoute,
    packet: &Packet,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
{
    match route.ordering() {
        Order::Ordered => {
            let seq_recv_path_on_b = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);
            let next_seq_recv = ctx_b.get_next_sequence_recv(&seq_recv_path_on_b)?;

            if packet.seq_on_a < next_seq_recv {
                return Err(ChannelError::no_op(format!(
                    "packet {} already received",
                    packet.seq_on_a
                )));
            }

            if packet.seq_on_a > next_seq_recv {
                return Err(ChannelError::InvalidPacketSequence {
                    expected: next_seq_recv,
                    actual: packet.seq_on_a,
                });
            }
        }
        Order::Unordered => {
            let receipt_path_on_b =
                ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);

            if ctx_b.get_packet_receipt(&receipt_path_on_b)?.is_some() {
                return Err(ChannelError::no_op(format!(
                    "packet {} already received",
                    packet.seq_on_a
                )));
            }
        }
    }

    Ok(())
}
